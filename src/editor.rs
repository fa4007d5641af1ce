//! External editor sessions on scoped temporary files

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tempfile::NamedTempFile;
use wait_timeout::ChildExt;

use crate::config::EditorConfig;
use crate::error::{Error, Result};

const HEADER_TITLE: &str = "# Jira section: ";
const HEADER_NOTES: [&str; 2] = [
    "# Edit the content below, save the file, and close the editor to continue",
    "# These header lines will be removed",
];

fn header(section_name: &str) -> String {
    format!("{}{}\n{}\n\n", HEADER_TITLE, section_name, HEADER_NOTES.join("\n"))
}

fn is_header_line(line: &str) -> bool {
    line.starts_with(HEADER_TITLE) || HEADER_NOTES.contains(&line)
}

/// Remove the header lines written above the editable content
///
/// Other `#` lines are kept since they are numbered list items in Jira markup.
pub fn strip_header_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !is_header_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Opens a text editor on a temporary file and waits for it to close
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
    args: Vec<String>,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
            temp_dir: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Place edit files in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    /// Let the user edit `content` for `section_name`
    ///
    /// Returns the edited text, or `content` unchanged when the file comes
    /// back empty.
    pub fn edit(&self, section_name: &str, content: &str) -> Result<String> {
        let program = which::which(&self.command)
            .map_err(|_| Error::ToolMissing(format!("Editor '{}' not found on PATH", self.command)))?;

        let mut builder = tempfile::Builder::new();
        let prefix = format!("jira-{}-", slug(section_name));
        builder.prefix(&prefix).suffix(".md");
        let mut file: NamedTempFile = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        write!(file, "{}{}", header(section_name), content)?;
        file.flush()?;

        tracing::debug!(editor = %program.display(), file = %file.path().display(), "opening editor");

        let mut child = Command::new(&program)
            .args(&self.args)
            .arg(file.path())
            .spawn()?;

        match child.wait_timeout(self.timeout)? {
            Some(status) if !status.success() => {
                // Some editors exit non-zero after a normal save; read the file anyway.
                tracing::warn!(%status, "editor exited with failure status");
            }
            Some(_) => {}
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Prompt(format!(
                    "editor did not close within {} seconds",
                    self.timeout.as_secs()
                )));
            }
        }

        let edited = strip_header_lines(&std::fs::read_to_string(file.path())?);
        if edited.is_empty() {
            tracing::debug!("editor returned no content, keeping original");
            return Ok(content.trim().to_string());
        }
        Ok(edited)
    }
}
