//! # jira-describe
//!
//! An interactive assistant that builds structured Jira issue descriptions from
//! issue metadata, optional AI drafts and manual editing.

pub mod ai;
pub mod app;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod jira;
pub mod prompt;
pub mod section;
pub mod session;
pub mod template;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use section::{Section, SectionContent};
pub use template::TemplateBuilder;
