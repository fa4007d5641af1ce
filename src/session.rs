//! The interactive description wizard
//!
//! The session is a loop over [`State`]. Every transition returns the next
//! state, so restarting the section loop or moving on to another issue never
//! grows the call stack.

use crate::ai::AiClient;
use crate::error::{Error, Result};
use crate::jira::{compose_description, Issue, JiraClient, UpdateMode};
use crate::prompt;
use crate::section::{Section, SectionContent};
use crate::template::TemplateBuilder;
use crate::ui::{self, FillMethod, MenuChoice, PanelAction, Prompter, ReviewChoice};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one description was written and the user is finished
    Done,
    /// The user quit from the menu or declined to rebuild
    Exited,
}

enum State {
    FetchingIssue(String),
    CollectingSections(Issue),
    Rendering {
        issue: Issue,
        contents: Vec<SectionContent>,
    },
    AwaitingMenuChoice {
        issue: Issue,
        contents: Vec<SectionContent>,
        template: String,
    },
    NextIssue,
    Done,
    Exiting,
}

pub struct Session<'a> {
    jira: &'a JiraClient,
    ai: &'a AiClient,
    builder: &'a TemplateBuilder,
    prompter: &'a mut dyn Prompter,
    dry_run: bool,
}

impl<'a> Session<'a> {
    pub fn new(
        jira: &'a JiraClient,
        ai: &'a AiClient,
        builder: &'a TemplateBuilder,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            jira,
            ai,
            builder,
            prompter,
            dry_run: false,
        }
    }

    /// Print update payloads instead of sending them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the wizard starting with `issue_key`
    ///
    /// Fetch failures and an entirely empty pass end the session with an
    /// error; update failures are reported and the menu is offered again.
    pub fn run(&mut self, issue_key: &str) -> Result<Outcome> {
        let mut state = State::FetchingIssue(issue_key.to_string());

        loop {
            state = match state {
                State::FetchingIssue(key) => self.fetch(&key)?,
                State::CollectingSections(issue) => {
                    let contents = self.collect_sections(&issue)?;
                    State::Rendering { issue, contents }
                }
                State::Rendering { issue, contents } => self.render(issue, contents)?,
                State::AwaitingMenuChoice {
                    issue,
                    contents,
                    template,
                } => self.handle_menu(issue, contents, template)?,
                State::NextIssue => match self.prompter.next_issue_key()? {
                    Some(key) => {
                        ui::info(&format!("Processing next issue: {}", key));
                        State::FetchingIssue(key)
                    }
                    None => State::Done,
                },
                State::Done => {
                    ui::goodbye();
                    return Ok(Outcome::Done);
                }
                State::Exiting => {
                    ui::goodbye();
                    return Ok(Outcome::Exited);
                }
            };
        }
    }

    fn fetch(&mut self, key: &str) -> Result<State> {
        ui::progress(&format!("Fetching issue {}...", key));
        let issue = self.jira.fetch(key)?;
        tracing::info!(key = %issue.key, "issue fetched");
        ui::show_issue(&issue);
        Ok(State::CollectingSections(issue))
    }

    fn collect_sections(&mut self, issue: &Issue) -> Result<Vec<SectionContent>> {
        let builder = self.builder;
        let sections = builder.sections();
        let total = sections.len();
        let mut contents = Vec::with_capacity(total);

        for (index, section) in sections.iter().enumerate() {
            ui::step(index + 1, total, &format!("Section: {}", section.name));

            let text = self.fill_section(issue, section)?;
            if !text.trim().is_empty() {
                ui::success(&format!("Section \"{}\" completed", section.name));
            } else if section.required {
                ui::warn(&format!("Section \"{}\" is required but empty", section.name));
            }

            contents.push(SectionContent::new(section.clone(), text));
        }

        Ok(contents)
    }

    fn fill_section(&mut self, issue: &Issue, section: &Section) -> Result<String> {
        loop {
            match self.prompter.choose_method(section)? {
                FillMethod::Skip if section.required => {
                    ui::warn("This section is required and can't be skipped.");
                }
                FillMethod::Skip => return Ok(String::new()),
                FillMethod::Manual => return self.prompter.manual_text(section),
                FillMethod::Ai => return self.fill_with_ai(issue, section),
            }
        }
    }

    fn fill_with_ai(&mut self, issue: &Issue, section: &Section) -> Result<String> {
        let mut context = self.prompter.ai_context(section)?;

        loop {
            let prompt = prompt::section_prompt(section, issue, Some(&context));
            ui::progress(&format!("Asking {} for a suggestion...", self.ai.command()));
            let response = self.ai.generate(&prompt);

            if !response.is_usable() {
                ui::error(&format!(
                    "AI error: {}",
                    response.error.as_deref().unwrap_or("empty response")
                ));
                ui::info("Continuing without AI suggestion. You can write the content manually.");
                return self.prompter.manual_text(section);
            }

            match self.prompter.review_suggestion(section, &response.content)? {
                ReviewChoice::Accept => return Ok(response.content),
                ReviewChoice::Edit => return self.prompter.edit_text(section, &response.content),
                ReviewChoice::Manual => return self.prompter.manual_text(section),
                ReviewChoice::Regenerate => {
                    let fresh = self.prompter.ai_context(section)?;
                    if !fresh.trim().is_empty() {
                        context = fresh;
                    }
                }
            }
        }
    }

    fn render(&mut self, issue: Issue, contents: Vec<SectionContent>) -> Result<State> {
        if contents.iter().all(SectionContent::is_empty) {
            return Err(Error::NoContentProvided);
        }

        match self.builder.render(&contents) {
            Ok(template) => {
                let missing = self.builder.validate(&template);
                if !missing.is_empty() {
                    ui::warn(&format!("Missing required sections: {}", missing.join(", ")));
                }
                ui::show_template(&template);
                Ok(State::AwaitingMenuChoice {
                    issue,
                    contents,
                    template,
                })
            }
            Err(err @ Error::MissingRequiredSection(_)) => {
                ui::error(&err.to_string());
                if self.prompter.confirm("Rebuild the template?", true)? {
                    Ok(State::CollectingSections(issue))
                } else {
                    Ok(State::Exiting)
                }
            }
            Err(err) => Err(err),
        }
    }

    fn handle_menu(
        &mut self,
        issue: Issue,
        contents: Vec<SectionContent>,
        template: String,
    ) -> Result<State> {
        let mode = match self.prompter.menu_choice()? {
            MenuChoice::Replace => UpdateMode::Replace,
            MenuChoice::Append => UpdateMode::Append,
            MenuChoice::Show => {
                ui::show_template(&template);
                return Ok(State::AwaitingMenuChoice {
                    issue,
                    contents,
                    template,
                });
            }
            MenuChoice::EditPanels => {
                let contents = self.edit_panels(&issue, contents)?;
                return Ok(State::Rendering { issue, contents });
            }
            MenuChoice::Restart => {
                ui::info("Starting over...");
                return Ok(State::CollectingSections(issue));
            }
            MenuChoice::Quit => return Ok(State::Exiting),
        };

        match self.update(&issue, mode, &template) {
            Ok(()) => Ok(State::NextIssue),
            Err(err) => {
                tracing::error!(key = %issue.key, %mode, error = %err, "update failed");
                ui::error(&format!("Update failed: {}", err));
                Ok(State::AwaitingMenuChoice {
                    issue,
                    contents,
                    template,
                })
            }
        }
    }

    fn update(&mut self, issue: &Issue, mode: UpdateMode, template: &str) -> Result<()> {
        let existing = issue.fields.description.as_deref();
        let description = compose_description(mode, existing, template);

        if self.dry_run {
            ui::show_block(
                &format!("Dry run: {} description of {}", mode, issue.key),
                &description,
            );
            return Ok(());
        }

        ui::progress(match mode {
            UpdateMode::Replace => "Replacing description with template...",
            UpdateMode::Append => "Appending template to existing description...",
        });
        self.jira.update_description(&issue.key, &description)?;
        tracing::info!(key = %issue.key, %mode, "description updated");

        ui::success(match mode {
            UpdateMode::Replace => "Description replaced successfully!",
            UpdateMode::Append => "Template appended successfully!",
        });
        ui::info(&self.jira.browse_url(&issue.key));
        Ok(())
    }

    fn edit_panels(
        &mut self,
        issue: &Issue,
        mut contents: Vec<SectionContent>,
    ) -> Result<Vec<SectionContent>> {
        loop {
            let names: Vec<String> = contents.iter().map(|c| c.section.name.clone()).collect();
            let index = match self.prompter.select_panel(&names)? {
                Some(index) if index < contents.len() => index,
                _ => return Ok(contents),
            };

            let section = contents[index].section.clone();
            let current = contents[index].content.clone();
            ui::show_block(&format!("Editing: {}", section.name), &current);

            let updated = match self.prompter.panel_action(&section)? {
                PanelAction::Improve => {
                    let feedback = self.prompter.improvement_feedback(&section)?;
                    let prompt = prompt::improve_prompt(&section, &current, &feedback);
                    self.offer_replacement(&current, &prompt)?
                }
                PanelAction::Regenerate => {
                    let context = self.prompter.ai_context(&section)?;
                    let prompt = prompt::section_prompt(&section, issue, Some(&context));
                    self.offer_replacement(&current, &prompt)?
                }
                PanelAction::Manual => self.prompter.edit_text(&section, &current)?,
                PanelAction::Keep => current,
            };

            contents[index].content = updated;
            ui::success("Panel updated");
        }
    }

    /// Ask the AI for a new version and let the user decide whether to keep it
    fn offer_replacement(&mut self, current: &str, prompt: &str) -> Result<String> {
        ui::progress(&format!("Asking {}...", self.ai.command()));
        let response = self.ai.generate(prompt);

        if !response.is_usable() {
            ui::error(&format!(
                "AI error: {}",
                response.error.as_deref().unwrap_or("empty response")
            ));
            return Ok(current.to_string());
        }

        ui::show_block("AI version", &response.content);
        if self.prompter.confirm("Use this version?", true)? {
            Ok(response.content)
        } else {
            Ok(current.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use mockito::{Matcher, Server};
    use serde_json::json;

    use crate::template::panel_header;

    #[derive(Debug)]
    enum Answer {
        Method(FillMethod),
        Context(&'static str),
        Review(ReviewChoice),
        Edit(&'static str),
        Manual(&'static str),
        Menu(MenuChoice),
        Panel(Option<usize>),
        Action(PanelAction),
        Feedback(&'static str),
        Confirm(bool),
        NextKey(Option<&'static str>),
    }

    /// Replays a fixed list of answers and fails on any unexpected question
    struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        edited: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                edited: Vec::new(),
            }
        }

        fn next(&mut self, question: &str) -> Answer {
            self.answers
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted answer for {}", question))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn choose_method(&mut self, _: &Section) -> Result<FillMethod> {
            match self.next("choose_method") {
                Answer::Method(m) => Ok(m),
                other => panic!("expected Method, got {:?}", other),
            }
        }

        fn ai_context(&mut self, _: &Section) -> Result<String> {
            match self.next("ai_context") {
                Answer::Context(c) => Ok(c.to_string()),
                other => panic!("expected Context, got {:?}", other),
            }
        }

        fn review_suggestion(&mut self, _: &Section, _: &str) -> Result<ReviewChoice> {
            match self.next("review_suggestion") {
                Answer::Review(r) => Ok(r),
                other => panic!("expected Review, got {:?}", other),
            }
        }

        fn edit_text(&mut self, _: &Section, initial: &str) -> Result<String> {
            self.edited.push(initial.to_string());
            match self.next("edit_text") {
                Answer::Edit(t) => Ok(t.to_string()),
                other => panic!("expected Edit, got {:?}", other),
            }
        }

        fn manual_text(&mut self, _: &Section) -> Result<String> {
            match self.next("manual_text") {
                Answer::Manual(t) => Ok(t.to_string()),
                other => panic!("expected Manual, got {:?}", other),
            }
        }

        fn menu_choice(&mut self) -> Result<MenuChoice> {
            match self.next("menu_choice") {
                Answer::Menu(m) => Ok(m),
                other => panic!("expected Menu, got {:?}", other),
            }
        }

        fn select_panel(&mut self, _: &[String]) -> Result<Option<usize>> {
            match self.next("select_panel") {
                Answer::Panel(p) => Ok(p),
                other => panic!("expected Panel, got {:?}", other),
            }
        }

        fn panel_action(&mut self, _: &Section) -> Result<PanelAction> {
            match self.next("panel_action") {
                Answer::Action(a) => Ok(a),
                other => panic!("expected Action, got {:?}", other),
            }
        }

        fn improvement_feedback(&mut self, _: &Section) -> Result<String> {
            match self.next("improvement_feedback") {
                Answer::Feedback(f) => Ok(f.to_string()),
                other => panic!("expected Feedback, got {:?}", other),
            }
        }

        fn confirm(&mut self, _: &str, _: bool) -> Result<bool> {
            match self.next("confirm") {
                Answer::Confirm(c) => Ok(c),
                other => panic!("expected Confirm, got {:?}", other),
            }
        }

        fn next_issue_key(&mut self) -> Result<Option<String>> {
            match self.next("next_issue_key") {
                Answer::NextKey(k) => Ok(k.map(str::to_string)),
                other => panic!("expected NextKey, got {:?}", other),
            }
        }
    }

    fn issue_json(key: &str, description: Option<&str>) -> String {
        json!({
            "key": key,
            "fields": {
                "summary": "Export invoices",
                "description": description,
                "issuetype": { "name": "Story" },
                "project": { "key": "PROJ", "name": "Project" },
                "status": { "name": "Open" },
                "reporter": { "displayName": "Sam" }
            }
        })
        .to_string()
    }

    fn mock_issue(server: &mut Server, key: &str, description: Option<&str>) -> mockito::Mock {
        server
            .mock("GET", format!("/rest/api/2/issue/{}", key).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(issue_json(key, description))
            .create()
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("Goal").with_required(true),
            Section::new("Notes"),
        ]
    }

    fn panel(section: &Section, body: &str) -> String {
        format!("{}\n{}\n{{panel}}", panel_header(section), body)
    }

    fn missing_ai() -> AiClient {
        AiClient::new("no-such-ai-tool-3141", vec![], Duration::from_secs(5))
    }

    fn echo_ai() -> AiClient {
        AiClient::new("cat", vec![], Duration::from_secs(10))
    }

    fn run_session(
        server: &Server,
        ai: &AiClient,
        prompter: &mut ScriptedPrompter,
        dry_run: bool,
    ) -> Result<Outcome> {
        let jira = JiraClient::new(server.url(), "tok").unwrap();
        let builder = TemplateBuilder::new(sections());
        Session::new(&jira, ai, &builder, prompter)
            .with_dry_run(dry_run)
            .run("PROJ-1")
    }

    #[test]
    fn test_manual_entry_and_replace() {
        let mut server = Server::new();
        let get = mock_issue(&mut server, "PROJ-1", Some("old"));
        let expected = panel(&sections()[0], "alpha");
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Json(json!({ "fields": { "description": expected } })))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("alpha"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        assert_eq!(outcome, Outcome::Done);
        get.assert();
        put.assert();
        assert!(prompter.answers.is_empty());
    }

    #[test]
    fn test_append_keeps_existing_description() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", Some("Existing text"));
        let expected = format!(
            "Existing text\n\n{}\n{}",
            panel(&sections()[0], "g"),
            panel(&sections()[1], "n")
        );
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Json(json!({ "fields": { "description": expected } })))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("g"),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("n"),
            Answer::Menu(MenuChoice::Append),
            Answer::NextKey(None),
        ]);

        run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        put.assert();
    }

    #[test]
    fn test_append_keeps_whitespace_only_description_verbatim() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", Some("   "));
        let expected = format!(
            "   \n\n{}\n{}",
            panel(&sections()[0], "g"),
            panel(&sections()[1], "n")
        );
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Json(json!({ "fields": { "description": expected } })))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("g"),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("n"),
            Answer::Menu(MenuChoice::Append),
            Answer::NextKey(None),
        ]);

        run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        put.assert();
    }

    #[test]
    fn test_fetch_not_found_aborts_before_any_update() {
        let mut server = Server::new();
        server
            .mock("GET", "/rest/api/2/issue/PROJ-1")
            .with_status(404)
            .create();
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .expect(0)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![]);
        let err = run_session(&server, &missing_ai(), &mut prompter, false).unwrap_err();

        assert!(matches!(err, Error::NotFound(ref key) if key == "PROJ-1"));
        put.assert();
    }

    #[test]
    fn test_ai_failure_falls_back_to_manual() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .expect(0)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Ai),
            Answer::Context("some context"),
            Answer::Manual("typed instead"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Show),
            Answer::Menu(MenuChoice::Quit),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        assert_eq!(outcome, Outcome::Exited);
        assert!(prompter.answers.is_empty());
        put.assert();
    }

    #[test]
    fn test_ai_suggestion_accepted_and_edited() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Regex("Section to generate: Goal".into()))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Ai),
            Answer::Context("billing team request"),
            Answer::Review(ReviewChoice::Accept),
            Answer::Method(FillMethod::Ai),
            Answer::Context(""),
            Answer::Review(ReviewChoice::Edit),
            Answer::Edit("hand edited notes"),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        run_session(&server, &echo_ai(), &mut prompter, false).unwrap();

        put.assert();
        assert_eq!(prompter.edited.len(), 1);
        assert!(prompter.edited[0].contains("Section to generate: Notes"));
    }

    #[test]
    fn test_regenerate_uses_new_context() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Regex("second try".into()))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Ai),
            Answer::Context("first try"),
            Answer::Review(ReviewChoice::Regenerate),
            Answer::Context("second try"),
            Answer::Review(ReviewChoice::Accept),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        run_session(&server, &echo_ai(), &mut prompter, false).unwrap();

        put.assert();
    }

    #[test]
    fn test_required_section_cannot_be_skipped() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Skip),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("goal"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Quit),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        assert_eq!(outcome, Outcome::Exited);
        assert!(prompter.answers.is_empty());
    }

    #[test]
    fn test_no_content_is_an_error() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .expect(0)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual(""),
            Answer::Method(FillMethod::Skip),
        ]);

        let err = run_session(&server, &missing_ai(), &mut prompter, false).unwrap_err();

        assert!(matches!(err, Error::NoContentProvided));
        put.assert();
    }

    #[test]
    fn test_empty_required_section_offers_rebuild() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual(""),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("notes only"),
            Answer::Confirm(true),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("goal now"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Quit),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        assert_eq!(outcome, Outcome::Exited);
        assert!(prompter.answers.is_empty());
    }

    #[test]
    fn test_update_failure_returns_to_menu() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .with_status(403)
            .expect(1)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("goal"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Replace),
            Answer::Menu(MenuChoice::Quit),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        assert_eq!(outcome, Outcome::Exited);
        put.assert();
    }

    #[test]
    fn test_restart_runs_sections_again() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Regex("second pass".into()))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("first pass"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Restart),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("second pass"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        put.assert();
    }

    #[test]
    fn test_next_issue_is_processed_in_same_session() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let second = mock_issue(&mut server, "PROJ-2", None);
        server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .with_status(204)
            .create();
        let put_second = server
            .mock("PUT", "/rest/api/2/issue/PROJ-2")
            .match_body(Matcher::Regex("for two".into()))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("for one"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(Some("PROJ-2")),
            Answer::Method(FillMethod::Manual),
            Answer::Manual("for two"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        assert_eq!(outcome, Outcome::Done);
        second.assert();
        put_second.assert();
    }

    #[test]
    fn test_dry_run_sends_nothing() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .expect(0)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("goal"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::Append),
            Answer::NextKey(None),
        ]);

        let outcome = run_session(&server, &missing_ai(), &mut prompter, true).unwrap();

        assert_eq!(outcome, Outcome::Done);
        put.assert();
    }

    #[test]
    fn test_edit_panels_manual_change() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let expected = panel(&sections()[0], "revised goal");
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Json(json!({ "fields": { "description": expected } })))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("goal"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::EditPanels),
            Answer::Panel(Some(0)),
            Answer::Action(PanelAction::Manual),
            Answer::Edit("revised goal"),
            Answer::Panel(Some(1)),
            Answer::Action(PanelAction::Keep),
            Answer::Panel(None),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        run_session(&server, &missing_ai(), &mut prompter, false).unwrap();

        put.assert();
        assert_eq!(prompter.edited, vec!["goal".to_string()]);
    }

    #[test]
    fn test_edit_panels_improve_with_ai() {
        let mut server = Server::new();
        mock_issue(&mut server, "PROJ-1", None);
        let put = server
            .mock("PUT", "/rest/api/2/issue/PROJ-1")
            .match_body(Matcher::Regex("make it shorter".into()))
            .with_status(204)
            .create();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Method(FillMethod::Manual),
            Answer::Manual("goal"),
            Answer::Method(FillMethod::Skip),
            Answer::Menu(MenuChoice::EditPanels),
            Answer::Panel(Some(0)),
            Answer::Action(PanelAction::Improve),
            Answer::Feedback("make it shorter"),
            Answer::Confirm(true),
            Answer::Panel(None),
            Answer::Menu(MenuChoice::Replace),
            Answer::NextKey(None),
        ]);

        run_session(&server, &echo_ai(), &mut prompter, false).unwrap();

        put.assert();
    }
}
