use serde::{Deserialize, Serialize};

use crate::core::primitives::format_grouped_number;
use crate::core::types::DataValue;

/// Approximate pixel width of one label character.
pub const CHAR_WIDTH_PX: f64 = 7.0;

/// Default maximum label length before trimming.
pub const DEFAULT_TRIM_LENGTH: usize = 16;

/// Human-facing text for an axis key: dates as `YYYY-MM-DD`, numbers with
/// thousands separators, text unchanged.
#[must_use]
pub fn format_label(value: &DataValue) -> String {
    match value {
        DataValue::Number(number) => format_grouped_number(*number),
        other => other.to_string(),
    }
}

/// Escapes the characters that are unsafe inside HTML tooltip markup.
#[must_use]
pub fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&#x27;"),
            '`' => escaped.push_str("&#x60;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Trims surrounding whitespace and cuts the label to `max` characters,
/// appending `...` when something was cut.
#[must_use]
pub fn trim_label(label: &str, max: usize) -> String {
    let trimmed = label.trim();
    if trimmed.chars().count() <= max {
        return trimmed.to_owned();
    }
    let mut cut: String = trimmed.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Splits a label into at most `max_lines` lines of about `max_length`
/// characters.
///
/// Labels containing whitespace are packed word by word; unbroken labels
/// are cut into fixed-size slices. When lines overflow, the last kept line
/// gets a `...` suffix.
#[must_use]
pub fn tick_lines(label: &str, max_length: usize, max_lines: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let mut lines: Vec<String> = Vec::new();

    if label.chars().any(char::is_whitespace) {
        for word in label.split_whitespace() {
            match lines.last_mut() {
                Some(last) if last.chars().count() + 1 + word.chars().count() <= max_length => {
                    last.push(' ');
                    last.push_str(word);
                }
                _ => lines.push(word.to_owned()),
            }
        }
    } else {
        let chars: Vec<char> = label.chars().collect();
        lines.extend(chars.chunks(max_length).map(|chunk| chunk.iter().collect()));
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines.max(1));
        if let Some(last) = lines.last_mut() {
            last.push_str("...");
        }
    }
    lines
}

/// Horizontal anchoring of a text label relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}
