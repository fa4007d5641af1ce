//! AI suggestion client
//!
//! Drafts are produced by an external AI command line tool. The prompt is
//! written to a uniquely named temporary file which becomes the tool's stdin,
//! so arbitrarily long prompts never hit command line length limits. The file
//! is a [`NamedTempFile`] and is removed when it goes out of scope, whatever
//! the outcome of the call.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::NamedTempFile;
use wait_timeout::ChildExt;

use crate::config::AiConfig;
use crate::error::{Error, Result};

/// Outcome of a single AI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiResponse {
    pub content: String,
    pub success: bool,
    pub error: Option<String>,
}

impl AiResponse {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// True when the response can be offered to the user as a draft
    pub fn is_usable(&self) -> bool {
        self.success && self.error.is_none() && !self.content.trim().is_empty()
    }
}

/// Runs the configured AI command with a prompt on stdin
#[derive(Debug, Clone)]
pub struct AiClient {
    command: String,
    args: Vec<String>,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl AiClient {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
            temp_dir: None,
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(
            config.command.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Sets the timeout and returns self for chaining
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Place prompt files in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the command can be found on PATH
    pub fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    /// Generate text for `prompt`; failures are reported in the response
    pub fn generate(&self, prompt: &str) -> AiResponse {
        match self.try_generate(prompt) {
            Ok(content) => AiResponse::success(content),
            Err(err) => {
                tracing::warn!(command = %self.command, error = %err, "AI generation failed");
                AiResponse::failure(err.to_string())
            }
        }
    }

    /// Generate text for `prompt`, returning the failure kind on error
    pub fn try_generate(&self, prompt: &str) -> Result<String> {
        let program = which::which(&self.command).map_err(|_| {
            Error::ToolMissing(format!(
                "AI command '{}' not found on PATH. Please install it first.",
                self.command
            ))
        })?;

        let prompt_file = self.write_prompt(prompt)?;
        tracing::debug!(
            command = %program.display(),
            prompt_file = %prompt_file.path().display(),
            bytes = prompt.len(),
            "running AI command"
        );

        // Output goes to anonymous files so a chatty child can't fill a pipe
        // while we wait on it.
        let mut stdout = self.scratch_file()?;
        let mut stderr = self.scratch_file()?;

        let mut child = Command::new(&program)
            .args(&self.args)
            .stdin(Stdio::from(File::open(prompt_file.path())?))
            .stdout(Stdio::from(stdout.try_clone()?))
            .stderr(Stdio::from(stderr.try_clone()?))
            .spawn()
            .map_err(|e| Error::ExecutionFailure(format!("failed to start {}: {}", self.command, e)))?;

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                if let Err(e) = child.kill() {
                    tracing::error!(error = %e, "failed to kill timed-out AI command");
                }
                let _ = child.wait();
                return Err(Error::Timeout {
                    after: self.timeout,
                });
            }
        };
        drop(prompt_file);

        let out = read_all(&mut stdout)?;
        let err = read_all(&mut stderr)?;

        if !status.success() {
            let diagnostic = err.trim();
            return Err(Error::ExecutionFailure(if diagnostic.is_empty() {
                status.to_string()
            } else {
                format!("{}: {}", status, diagnostic)
            }));
        }

        let output = out.trim();
        if output.is_empty() {
            return Err(Error::EmptyResponse);
        }

        Ok(output.to_string())
    }

    fn write_prompt(&self, prompt: &str) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ai-prompt-").suffix(".txt");

        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(prompt.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    fn scratch_file(&self) -> Result<File> {
        Ok(match &self.temp_dir {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        })
    }
}

fn read_all(file: &mut File) -> Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
