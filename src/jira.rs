//! Jira REST integration for jira-describe
//!
//! Only two calls are needed: fetching an issue and replacing its description.
//! Both go to `{base}/rest/api/2/issue/{key}` with a bearer token. Neither call
//! retries; failures are mapped to typed errors and handed back to the caller.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};

const API_PATH: &str = "rest/api/2";

lazy_static! {
    static ref ISSUE_KEY: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*-[0-9]+$").unwrap();
}

/// Whether `key` looks like a Jira issue key (e.g., "PROJ-123")
pub fn is_valid_issue_key(key: &str) -> bool {
    ISSUE_KEY.is_match(key.trim())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Named {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssueFields {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "issuetype")]
    pub issue_type: Named,
    pub project: Project,
    pub status: Named,
    #[serde(default)]
    pub assignee: Option<Person>,
    #[serde(default)]
    pub reporter: Option<Person>,
    #[serde(default)]
    pub priority: Option<Named>,
}

/// A Jira issue as returned by `GET /rest/api/2/issue/{key}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The issue key (e.g., "PROJ-123")
    pub key: String,
    pub fields: IssueFields,
}

impl Issue {
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// The current description for display, `None` when the field is null or blank
    pub fn description(&self) -> Option<&str> {
        self.fields
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

/// How the rendered template is written back to the issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Replace,
    Append,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Replace => write!(f, "replace"),
            UpdateMode::Append => write!(f, "append"),
        }
    }
}

/// Build the description that will be sent for the given update mode
///
/// Append keeps the existing text and adds two newlines before the template.
pub fn compose_description(mode: UpdateMode, existing: Option<&str>, template: &str) -> String {
    match mode {
        UpdateMode::Replace => template.to_string(),
        UpdateMode::Append => format!("{}\n\n{}", existing.unwrap_or(""), template),
    }
}

/// Blocking client for a single Jira instance
#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    token: String,
    http: Client,
}

impl JiraClient {
    /// Creates a client for `base_url` authenticating with `token`
    ///
    /// A token pasted with its `Bearer ` prefix is accepted as well.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let token = token
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .unwrap_or(token);

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issue_url(&self, issue_key: &str) -> String {
        format!("{}/{}/issue/{}", self.base_url, API_PATH, issue_key)
    }

    /// Browser link to the issue
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{}", self.base_url, issue_key)
    }

    /// Fetch an issue by key
    pub fn fetch(&self, issue_key: &str) -> Result<Issue> {
        let url = self.issue_url(issue_key);
        tracing::debug!(%url, "fetching issue");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| Error::RequestFailure(format!("Network error while fetching issue: {}", e)))?;

        let status = response.status();
        tracing::debug!(%status, "fetch response");

        match status {
            s if s.is_success() => response
                .json::<Issue>()
                .map_err(|e| Error::RequestFailure(format!("Invalid issue payload: {}", e))),
            StatusCode::NOT_FOUND => Err(Error::NotFound(issue_key.to_string())),
            StatusCode::UNAUTHORIZED => Err(Error::AuthFailure),
            _ => Err(Error::RequestFailure(format!(
                "Failed to fetch issue: {}",
                status
            ))),
        }
    }

    /// Replace the description of an issue
    pub fn update_description(&self, issue_key: &str, description: &str) -> Result<()> {
        let url = self.issue_url(issue_key);
        let payload = json!({ "fields": { "description": description } });
        tracing::debug!(%url, bytes = description.len(), "updating issue description");

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .map_err(|e| Error::RequestFailure(format!("Network error while updating issue: {}", e)))?;

        let status = response.status();
        tracing::debug!(%status, "update response");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::NotFound(issue_key.to_string())),
            StatusCode::UNAUTHORIZED => Err(Error::AuthFailure),
            StatusCode::FORBIDDEN => Err(Error::PermissionDenied(issue_key.to_string())),
            _ => Err(Error::RequestFailure(format!(
                "Failed to update issue: {}. {}",
                status,
                body_text(response)
            ))),
        }
    }
}

fn body_text(response: Response) -> String {
    response.text().unwrap_or_default().trim().to_string()
}
