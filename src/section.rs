use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#dcf3f9";
pub const DEFAULT_TITLE_BACKGROUND_COLOR: &str = "#457b9d";

/// A named slot in the generated description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Display name, also the panel title (e.g., "Acceptance criteria")
    pub name: String,
    /// Whether the rendered description must contain this section
    #[serde(default)]
    pub required: bool,
    /// Panel body color
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Panel title bar color
    #[serde(default = "default_title_background_color")]
    pub title_background_color: String,
    /// Instruction sent to the AI when drafting this section
    #[serde(default)]
    pub generation_instruction: String,
    /// Question shown to the user for this section
    #[serde(default)]
    pub user_prompt: String,
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

fn default_title_background_color() -> String {
    DEFAULT_TITLE_BACKGROUND_COLOR.to_string()
}

impl Section {
    /// Creates an optional section with default colors
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            background_color: default_background_color(),
            title_background_color: default_title_background_color(),
            generation_instruction: String::new(),
            user_prompt: String::new(),
        }
    }

    /// Sets whether the section is required and returns self for chaining
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets both panel colors and returns self for chaining
    pub fn with_colors(
        mut self,
        background: impl Into<String>,
        title_background: impl Into<String>,
    ) -> Self {
        self.background_color = background.into();
        self.title_background_color = title_background.into();
        self
    }

    /// Sets the AI generation instruction and returns self for chaining
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.generation_instruction = instruction.into();
        self
    }

    /// Sets the question shown to the user and returns self for chaining
    pub fn with_user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = prompt.into();
        self
    }

    /// Opening panel marker prefix, used to detect the section in rendered text
    pub fn marker_prefix(&self) -> String {
        format!("{{panel:title={}", self.name)
    }
}

/// Text collected for one section during a pass of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionContent {
    pub section: Section,
    pub content: String,
}

impl SectionContent {
    pub fn new(section: Section, content: impl Into<String>) -> Self {
        Self {
            section,
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// The built-in section list, in display order
pub fn default_sections() -> Vec<Section> {
    vec![
        Section::new("Context")
            .with_required(true)
            .with_colors("#fceae6", "#e76f51")
            .with_instruction(
                "Explain WHY this work is needed - business justification, background information, \
                 and motivation. Be extremely concise and focus only on essential context.",
            )
            .with_user_prompt(
                "What background context should be included to explain why this work is needed?",
            ),
        Section::new("Description")
            .with_required(true)
            .with_colors("#edfaf9", "#2a9d8f")
            .with_instruction(
                "Focus on WHAT and WHY, not HOW. Explain business goals, benefits, and desired \
                 outcomes. Avoid technical implementation details.",
            )
            .with_user_prompt(
                "What needs to be accomplished and why is this work important \
                 (avoid technical implementation details)?",
            ),
        Section::new("Technical Requirements")
            .with_required(false)
            .with_colors("#f0f3ff", "#6366f1")
            .with_instruction(
                "Focus on HOW the work will be implemented. Include technical constraints, \
                 dependencies, specifications, technology stack, performance requirements, and \
                 implementation approach.",
            )
            .with_user_prompt(
                "What specific technical requirements, constraints, and implementation details \
                 need to be defined?",
            ),
        Section::new("Acceptance criteria")
            .with_required(true)
            .with_colors("#dcf3f9", "#457b9d")
            .with_instruction(
                "Define specific, measurable, testable conditions that must be met. Use clear \
                 bullet points or Given/When/Then format. Include functional and non-functional \
                 requirements.",
            )
            .with_user_prompt(
                "What specific criteria must be met for this ticket to be considered complete?",
            ),
    ]
}
