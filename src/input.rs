//! Multi-line text entry on a plain line reader
//!
//! A block ends after two consecutive empty lines or at end of input. A line
//! consisting only of `skip` (any case) abandons the block. Single empty
//! lines inside a block are kept as paragraph breaks.

use std::io::BufRead;

pub const SKIP_TOKEN: &str = "skip";

/// Result of reading a delimited text block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    Text(String),
    Skipped,
}

impl TextBlock {
    /// The collected text, empty when skipped
    pub fn into_text(self) -> String {
        match self {
            TextBlock::Text(text) => text,
            TextBlock::Skipped => String::new(),
        }
    }
}

/// Read lines until the block terminates
pub fn read_text_block<R: BufRead>(reader: &mut R) -> std::io::Result<TextBlock> {
    let mut lines: Vec<String> = Vec::new();
    let mut empty_run = 0;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case(SKIP_TOKEN) {
            return Ok(TextBlock::Skipped);
        }

        if trimmed.is_empty() {
            empty_run += 1;
            if empty_run >= 2 {
                break;
            }
        } else {
            empty_run = 0;
        }

        lines.push(line.trim_end_matches(['\r', '\n']).to_string());
    }

    Ok(TextBlock::Text(lines.join("\n").trim().to_string()))
}
