use crate::ai::AiClient;
use crate::cli::Args;
use crate::config::{self, Config};
use crate::editor::ExternalEditor;
use crate::error::Result;
use crate::jira::JiraClient;
use crate::session::{Outcome, Session};
use crate::template::TemplateBuilder;
use crate::ui::{self, TerminalPrompter};

/// Main application entry point
pub fn run(args: Args) -> Result<Outcome> {
    ui::init_render_config();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::get_config_path()?,
    };
    let mut config = Config::load(&config_path)?;
    apply_overrides(&mut config, &args);

    if config.jira.token.is_empty() {
        tracing::warn!("no Jira token configured; requests will be rejected");
    }

    let jira = JiraClient::new(&config.jira.url, &config.jira.token)?;
    let ai = AiClient::from_config(&config.ai);
    let builder = TemplateBuilder::new(config.sections.clone());
    let mut prompter = TerminalPrompter::new(ExternalEditor::from_config(&config.editor));

    ui::show_banner(&args.issue_key, jira.base_url());
    if !ai.is_available() {
        ui::warn(&format!(
            "AI command '{}' not found. AI suggestions will fall back to manual entry.",
            ai.command()
        ));
    }

    Session::new(&jira, &ai, &builder, &mut prompter)
        .with_dry_run(args.dry_run)
        .run(&args.issue_key)
}

/// Command line flags take precedence over the config file
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(command) = &args.ai_command {
        config.ai.command = command.clone();
    }
    if let Some(timeout) = args.ai_timeout {
        config.ai.timeout_secs = timeout;
    }
    if let Some((command, editor_args)) = args.editor_command() {
        config.editor.command = command;
        config.editor.args = editor_args;
    }
}
