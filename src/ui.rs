use std::fmt;

use colored::Colorize;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::validator::Validation;
use inquire::{set_global_render_config, Confirm, CustomUserError, Select, Text};

use crate::editor::ExternalEditor;
use crate::error::{Error, Result};
use crate::input::{read_text_block, TextBlock};
use crate::jira::{is_valid_issue_key, Issue};
use crate::section::Section;

/// How a section gets its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMethod {
    Ai,
    Manual,
    Skip,
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillMethod::Ai => write!(f, "AI suggestion (with context)"),
            FillMethod::Manual => write!(f, "Write it myself"),
            FillMethod::Skip => write!(f, "Skip this section"),
        }
    }
}

/// What to do with an AI draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    Accept,
    Edit,
    Regenerate,
    Manual,
}

impl fmt::Display for ReviewChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewChoice::Accept => write!(f, "Accept"),
            ReviewChoice::Edit => write!(f, "Edit"),
            ReviewChoice::Regenerate => write!(f, "Regenerate"),
            ReviewChoice::Manual => write!(f, "Discard and write it myself"),
        }
    }
}

/// Final menu once the template is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Replace,
    Append,
    Show,
    EditPanels,
    Restart,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::Replace => write!(f, "Replace description with this template"),
            MenuChoice::Append => write!(f, "Append template to existing description"),
            MenuChoice::Show => write!(f, "Show template only"),
            MenuChoice::EditPanels => write!(f, "Edit panels"),
            MenuChoice::Restart => write!(f, "Start over (rebuild template)"),
            MenuChoice::Quit => write!(f, "Quit"),
        }
    }
}

/// Ways to rework a panel that was already collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Improve,
    Regenerate,
    Manual,
    Keep,
}

impl fmt::Display for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelAction::Improve => write!(f, "Improve existing content with AI"),
            PanelAction::Regenerate => write!(f, "Replace with new AI content"),
            PanelAction::Manual => write!(f, "Edit manually"),
            PanelAction::Keep => write!(f, "Keep current content"),
        }
    }
}

/// Everything the session needs to ask the user
pub trait Prompter {
    fn choose_method(&mut self, section: &Section) -> Result<FillMethod>;

    /// Free-text context for the AI; may be empty
    fn ai_context(&mut self, section: &Section) -> Result<String>;

    fn review_suggestion(&mut self, section: &Section, suggestion: &str) -> Result<ReviewChoice>;

    /// Edit existing text; returns the final text
    fn edit_text(&mut self, section: &Section, initial: &str) -> Result<String>;

    /// Write text from scratch; empty when skipped
    fn manual_text(&mut self, section: &Section) -> Result<String>;

    fn menu_choice(&mut self) -> Result<MenuChoice>;

    /// Pick a panel by index, `None` when done
    fn select_panel(&mut self, names: &[String]) -> Result<Option<usize>>;

    fn panel_action(&mut self, section: &Section) -> Result<PanelAction>;

    fn improvement_feedback(&mut self, section: &Section) -> Result<String>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    /// Another issue to describe, `None` to stop
    fn next_issue_key(&mut self) -> Result<Option<String>>;
}

/// Interactive prompts on the terminal
pub struct TerminalPrompter {
    editor: ExternalEditor,
}

impl TerminalPrompter {
    pub fn new(editor: ExternalEditor) -> Self {
        Self { editor }
    }

    fn read_block(&self) -> Result<TextBlock> {
        println!(
            "{}",
            "(Press Enter twice to finish, or type \"skip\" to leave empty)".dimmed()
        );
        let stdin = std::io::stdin();
        Ok(read_text_block(&mut stdin.lock())?)
    }
}

impl Prompter for TerminalPrompter {
    fn choose_method(&mut self, section: &Section) -> Result<FillMethod> {
        let mut options = vec![FillMethod::Ai, FillMethod::Manual];
        if !section.required {
            options.push(FillMethod::Skip);
        }

        let message = format!("How do you want to fill \"{}\"?", section.name);
        Select::new(&message, options)
            .prompt()
            .map_err(map_inquire_error)
    }

    fn ai_context(&mut self, section: &Section) -> Result<String> {
        let message = format!("Context to guide the AI for \"{}\":", section.name);
        let mut prompt = Text::new(&message);
        if !section.user_prompt.is_empty() {
            prompt = prompt.with_help_message(&section.user_prompt);
        }
        prompt
            .prompt()
            .map(|c| c.trim().to_string())
            .map_err(map_inquire_error)
    }

    fn review_suggestion(&mut self, section: &Section, suggestion: &str) -> Result<ReviewChoice> {
        show_block(&format!("AI suggestion for {}", section.name), suggestion);
        Select::new(
            "What do you want to do with this suggestion?",
            vec![
                ReviewChoice::Accept,
                ReviewChoice::Edit,
                ReviewChoice::Regenerate,
                ReviewChoice::Manual,
            ],
        )
        .prompt()
        .map_err(map_inquire_error)
    }

    fn edit_text(&mut self, section: &Section, initial: &str) -> Result<String> {
        if self.editor.is_available() {
            match self.editor.edit(&section.name, initial) {
                Ok(text) => {
                    success("Content updated from editor");
                    return Ok(text);
                }
                Err(err) => {
                    error(&format!("Editing failed: {}", err));
                    info("Falling back to inline editing...");
                }
            }
        } else {
            warn(&format!(
                "Editor '{}' is not available. Falling back to inline editing.",
                self.editor.command()
            ));
        }

        show_block("Current content", initial);
        println!("Enter your edited version:");
        match self.read_block()? {
            TextBlock::Text(text) if !text.is_empty() => Ok(text),
            _ => Ok(initial.trim().to_string()),
        }
    }

    fn manual_text(&mut self, section: &Section) -> Result<String> {
        println!("\n{} Write your content for \"{}\":", "✏".bright_green(), section.name);
        if !section.user_prompt.is_empty() {
            println!("{}", section.user_prompt.dimmed());
        }
        Ok(self.read_block()?.into_text())
    }

    fn menu_choice(&mut self) -> Result<MenuChoice> {
        Select::new(
            "What do you want to do?",
            vec![
                MenuChoice::Replace,
                MenuChoice::Append,
                MenuChoice::Show,
                MenuChoice::EditPanels,
                MenuChoice::Restart,
                MenuChoice::Quit,
            ],
        )
        .prompt()
        .map_err(map_inquire_error)
    }

    fn select_panel(&mut self, names: &[String]) -> Result<Option<usize>> {
        const DONE: &str = "Done editing";

        let mut options: Vec<String> = names.to_vec();
        options.push(DONE.to_string());

        let choice = Select::new("Select a panel to edit:", options)
            .prompt()
            .map_err(map_inquire_error)?;

        Ok(names.iter().position(|n| *n == choice))
    }

    fn panel_action(&mut self, section: &Section) -> Result<PanelAction> {
        let message = format!("How do you want to change \"{}\"?", section.name);
        Select::new(
            &message,
            vec![
                PanelAction::Improve,
                PanelAction::Regenerate,
                PanelAction::Manual,
                PanelAction::Keep,
            ],
        )
        .prompt()
        .map_err(map_inquire_error)
    }

    fn improvement_feedback(&mut self, section: &Section) -> Result<String> {
        let message = format!("What should be improved in \"{}\"?", section.name);
        Text::new(&message)
            .with_help_message("Leave empty for a general refinement")
            .prompt()
            .map_err(map_inquire_error)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(map_inquire_error)
    }

    fn next_issue_key(&mut self) -> Result<Option<String>> {
        if !self.confirm("Do you want to describe another issue?", false)? {
            return Ok(None);
        }

        Text::new("Issue key (e.g., PROJ-526):")
            .with_validator(issue_key_validator)
            .prompt()
            .map(|key| Some(key.trim().to_string()))
            .map_err(map_inquire_error)
    }
}

/// Validator for issue key input
pub fn issue_key_validator(key: &str) -> std::result::Result<Validation, CustomUserError> {
    if is_valid_issue_key(key) {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid(
            "This does not look like a valid issue key (e.g., PROJ-123)".into(),
        ))
    }
}

/// Initialize the global render configuration for inquire prompts
pub fn init_render_config() {
    let mut style = RenderConfig::default_colored();
    style.prompt_prefix = Styled::new(">").with_fg(Color::LightGreen);
    set_global_render_config(style);
}

/// Map inquire errors to our error type
fn map_inquire_error(err: InquireError) -> Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => Error::Cancelled,
        _ => Error::Prompt(err.to_string()),
    }
}

pub fn show_banner(issue_key: &str, base_url: &str) {
    println!("{}", "Jira Description Assistant".bold());
    println!("{}", "==========================".dimmed());
    println!("{} Issue: {}", ">".bright_green(), issue_key.bright_cyan());
    println!("{} Base URL: {}", ">".bright_green(), base_url.bright_cyan());
}

pub fn show_issue(issue: &Issue) {
    println!("{} Title: {}", ">".bright_green(), issue.summary().bright_cyan());
    println!(
        "{} Type: {} | Status: {}",
        ">".bright_green(),
        issue.fields.issue_type.name,
        issue.fields.status.name
    );
    show_block(
        "Current description",
        issue.description().unwrap_or("(No description)"),
    );
}

/// Print `body` under a titled rule
pub fn show_block(title: &str, body: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    println!("{}", body);
    println!("{}", "─".repeat(50).dimmed());
}

pub fn show_template(template: &str) {
    show_block("Generated template", template);
}

pub fn step(current: usize, total: usize, message: &str) {
    println!(
        "\n{} {} {}",
        format!("[{}/{}]", current, total).bright_blue(),
        ">".bright_green(),
        message
    );
}

pub fn progress(message: &str) {
    println!("{} {}", "…".bright_cyan(), message);
}

pub fn success(message: &str) {
    println!("{} {}", "+".bright_green(), message);
}

pub fn info(message: &str) {
    println!("{} {}", ">".bright_blue(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", "!".yellow(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "x".red(), message.red());
}

pub fn goodbye() {
    println!("\n{}", "Bye!".bright_green());
}
