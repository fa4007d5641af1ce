//! Description template rendering
//!
//! Each section with content becomes a Jira panel block:
//!
//! ```text
//! {panel:title=<name>|borderStyle=none|titleBGColor=<hex>|bgColor=<hex>}
//! <content>
//! {panel}
//! ```
//!
//! This is the exact markup stored in the issue description, so its shape
//! must not change.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::section::{Section, SectionContent};

lazy_static! {
    static ref PANEL_TITLE: Regex = Regex::new(r"\{panel:title=([^|}]*)").unwrap();
}

const PANEL_END: &str = "{panel}";

/// Opening marker for a section's panel
pub fn panel_header(section: &Section) -> String {
    format!(
        "{{panel:title={}|borderStyle=none|titleBGColor={}|bgColor={}}}",
        section.name, section.title_background_color, section.background_color
    )
}

/// Titles of all panel blocks found in `text`, in order of appearance
pub fn panel_titles(text: &str) -> Vec<String> {
    PANEL_TITLE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Holds the ordered section list and renders collected content
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    sections: Vec<Section>,
}

impl TemplateBuilder {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Replace the section with the same name, or append a new one
    pub fn add_section(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    /// Remove a section by name, returning whether it existed
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    /// Render the collected content as panel blocks
    ///
    /// Empty optional sections are skipped. An empty required section fails
    /// the whole render, as does a render that produced no block at all.
    pub fn render(&self, contents: &[SectionContent]) -> Result<String> {
        let mut parts: Vec<String> = Vec::new();

        for entry in contents {
            if entry.is_empty() {
                if entry.section.required {
                    return Err(Error::MissingRequiredSection(entry.section.name.clone()));
                }
                continue;
            }

            parts.push(panel_header(&entry.section));
            parts.push(entry.content.trim().to_string());
            parts.push(PANEL_END.to_string());
        }

        if parts.is_empty() {
            return Err(Error::EmptyTemplate);
        }

        Ok(parts.join("\n"))
    }

    /// Names of required sections whose panel is absent from `rendered`
    pub fn validate(&self, rendered: &str) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| s.required && !rendered.contains(&s.marker_prefix()))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Render, or describe why rendering failed
    pub fn preview(&self, contents: &[SectionContent]) -> String {
        match self.render(contents) {
            Ok(text) => text,
            Err(err) => format!("Error generating preview: {}", err),
        }
    }
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new(crate::section::default_sections())
    }
}
