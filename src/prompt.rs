//! Prompt construction for AI drafts

use crate::jira::Issue;
use crate::section::Section;

const SYSTEM_INSTRUCTIONS: &str = r#"You are a Senior Software Engineer with extensive experience in Jira ticket management and technical documentation. Your role is to help create professional, comprehensive Jira ticket descriptions that meet enterprise standards.

CRITICAL FORMATTING RULES:
- Use single asterisk (*) for emphasis, NEVER double asterisks (**)
- Use plain text with bullet points (-) for lists
- Avoid markdown-style headers (#, ##, ###)
- Write in plain, professional prose suitable for Jira panels
- Do NOT repeat the section name in your content (e.g., don't write "Description:" in a Description section)

CONTENT CONSTRAINTS:
- MAXIMUM 150 words per response (Context: 100 words max)
- Focus ONLY on what is essential and important
- Avoid verbose explanations and unnecessary details
- Be direct and actionable

Generate content that is:
1. Specific and actionable
2. Relevant to the technical context
3. Appropriate for the audience (developers, QA, product managers)
4. Prioritizing the most important points first"#;

/// Fixed instructions placed at the top of every prompt
pub fn system_instructions() -> &'static str {
    SYSTEM_INSTRUCTIONS
}

/// Word budget for a section's generated text
pub fn word_limit(section_name: &str) -> usize {
    if section_name == "Context" {
        100
    } else {
        150
    }
}

/// Closing directive, specialised for the built-in section names
fn section_directive(section_name: &str) -> String {
    let limit = word_limit(section_name);
    match section_name {
        "Description" => format!(
            "CRITICAL: Focus on WHAT and WHY only. Avoid technical implementation details (HOW). \
             Do NOT start with \"Description:\" or similar labels. \
             Keep your response under {} words and focus on business goals and objectives.",
            limit
        ),
        "Technical Requirements" => format!(
            "CRITICAL: Focus on HOW the work will be implemented. Include technical details, \
             constraints, and specifications. \
             Do NOT start with \"Technical Requirements:\" or similar labels. \
             Keep your response under {} words and focus on technical implementation details.",
            limit
        ),
        "Context" => format!(
            "CRITICAL: Keep your response under {} words and focus only on essential background \
             context. Do NOT start with \"Context:\" or similar labels.",
            limit
        ),
        "Acceptance criteria" => format!(
            "CRITICAL: Focus on specific, testable conditions. Use clear bullet points or numbered \
             lists. Do NOT start with \"Acceptance Criteria:\" or similar labels. \
             Keep your response under {} words.",
            limit
        ),
        _ => format!(
            "IMPORTANT: Keep your response under {} words and focus only on essential information. \
             Do NOT start with section labels or repeat the section name.",
            limit
        ),
    }
}

/// Bullet list of the issue fields the AI should know about
pub fn format_issue(issue: &Issue) -> String {
    let fields = &issue.fields;
    let mut info = vec![
        format!("• Issue Key: {}", issue.key),
        format!("• Summary: {}", fields.summary),
        format!("• Issue Type: {}", fields.issue_type.name),
        format!("• Project: {} ({})", fields.project.name, fields.project.key),
        format!("• Status: {}", fields.status.name),
    ];

    if let Some(assignee) = &fields.assignee {
        info.push(format!("• Assignee: {}", assignee.display_name));
    }
    if let Some(reporter) = &fields.reporter {
        info.push(format!("• Reporter: {}", reporter.display_name));
    }
    if let Some(priority) = &fields.priority {
        info.push(format!("• Priority: {}", priority.name));
    }
    if let Some(description) = issue.description() {
        info.push(format!("• Current Description: {}", description));
    }

    info.join("\n")
}

/// Prompt asking for a fresh draft of `section`
pub fn section_prompt(section: &Section, issue: &Issue, user_context: Option<&str>) -> String {
    let mut prompt = format!("{}\n\n", system_instructions());
    prompt.push_str(&format!(
        "Current Jira Issue Information:\n{}\n\n",
        format_issue(issue)
    ));
    prompt.push_str(&format!("Section to generate: {}\n", section.name));
    prompt.push_str(&format!(
        "Requirements: {}\n\n",
        section.generation_instruction
    ));

    if let Some(context) = user_context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("Additional context from user:\n{}\n\n", context));
    }

    prompt.push_str(&format!(
        "Please generate professional content for the \"{}\" section of this Jira ticket. \
         Ensure the content is specific to this issue and follows the requirements above. \
         Write in a clear, professional tone suitable for enterprise environments. ",
        section.name
    ));
    prompt.push_str(&section_directive(&section.name));
    prompt
}

/// Prompt asking the AI to rework existing content according to feedback
pub fn improve_prompt(section: &Section, current: &str, feedback: &str) -> String {
    let feedback = match feedback.trim() {
        "" => "Please improve and refine this content while keeping the core message.",
        f => f,
    };

    format!(
        "{}\n\nSection: {}\nCurrent content:\n{}\n\nUser feedback/improvement request:\n{}\n\n\
         Please improve the content based on the feedback while maintaining professional standards. \
         Do NOT repeat the section name or add labels like \"{}:\". \
         Use single asterisks (*) for emphasis, never double (**). \
         Keep your response under {} words and focus only on essential information.",
        system_instructions(),
        section.name,
        current.trim(),
        feedback,
        section.name,
        word_limit(&section.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::{IssueFields, Named, Person, Project};

    fn issue() -> Issue {
        Issue {
            key: "PROJ-9".into(),
            fields: IssueFields {
                summary: "Add SSO login".into(),
                description: None,
                issue_type: Named { name: "Story".into() },
                project: Project {
                    key: "PROJ".into(),
                    name: "Portal".into(),
                },
                status: Named {
                    name: "Open".into(),
                },
                assignee: Some(Person {
                    display_name: "Alex".into(),
                }),
                reporter: None,
                priority: None,
            },
        }
    }

    #[test]
    fn test_format_issue_skips_absent_fields() {
        let text = format_issue(&issue());
        assert!(text.contains("• Issue Key: PROJ-9"));
        assert!(text.contains("• Project: Portal (PROJ)"));
        assert!(text.contains("• Assignee: Alex"));
        assert!(!text.contains("Reporter"));
        assert!(!text.contains("Priority"));
        assert!(!text.contains("Current Description"));
    }

    #[test]
    fn test_section_prompt_includes_parts_in_order() {
        let section = Section::new("Context").with_instruction("Explain why.");
        let prompt = section_prompt(&section, &issue(), Some("customers asked for it"));

        let system = prompt.find("CRITICAL FORMATTING RULES").unwrap();
        let info = prompt.find("Summary: Add SSO login").unwrap();
        let requirements = prompt.find("Requirements: Explain why.").unwrap();
        let context = prompt.find("customers asked for it").unwrap();
        let directive = prompt.find("under 100 words").unwrap();

        assert!(system < info && info < requirements);
        assert!(requirements < context && context < directive);
    }

    #[test]
    fn test_blank_context_is_omitted() {
        let prompt = section_prompt(&Section::new("Notes"), &issue(), Some("   "));
        assert!(!prompt.contains("Additional context from user"));
    }

    #[test]
    fn test_word_limit_varies_by_section() {
        assert_eq!(word_limit("Context"), 100);
        assert_eq!(word_limit("Description"), 150);
        assert!(section_directive("Custom").contains("under 150 words"));
        assert!(section_directive("Description").contains("WHAT and WHY"));
    }

    #[test]
    fn test_improve_prompt_defaults_feedback() {
        let prompt = improve_prompt(&Section::new("Context"), "old text", "");
        assert!(prompt.contains("Current content:\nold text"));
        assert!(prompt.contains("keeping the core message"));
        assert!(prompt.contains("under 100 words"));
    }
}
