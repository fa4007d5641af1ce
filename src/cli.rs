use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Jira issue key to describe (e.g., PROJ-123)
    #[clap(value_parser)]
    pub issue_key: String,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[clap(short, long, value_parser, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to the config file [default: ~/.config/jira-describe/config.yaml]
    #[clap(short, long, value_parser, env = "JIRA_DESCRIBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the description that would be sent instead of updating the issue
    #[clap(short, long, value_parser, default_value_t = false)]
    pub dry_run: bool,

    /// AI command to run instead of the configured one
    #[clap(long, value_parser)]
    pub ai_command: Option<String>,

    /// Seconds to wait for the AI command
    #[clap(long, value_parser)]
    pub ai_timeout: Option<u64>,

    /// Editor command line, e.g. "code --wait"
    #[clap(long, value_parser)]
    pub editor: Option<String>,
}

impl Args {
    /// Default diagnostic level selected by the verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// The `--editor` value split into program and arguments
    pub fn editor_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.editor.as_deref()?.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}
