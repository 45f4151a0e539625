//! Tokenizer for `%name%` placeholders.
//!
//! The grammar is deliberately small:
//!
//! - `%%` is an escaped delimiter and always produces a literal `%`;
//! - `%name%` is a placeholder, where `name` is non-empty and contains no
//!   whitespace or delimiter;
//! - any other `%` is an error: either it is never closed, or whitespace
//!   appears before the closing delimiter.

use crate::error::{DiError, DiResult};

/// Reserved placeholder delimiter.
pub(crate) const DELIMITER: char = '%';

/// One piece of a tokenized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Literal text with escapes already collapsed.
    Text(String),
    /// Parameter name between two delimiters.
    Placeholder(&'a str),
}

/// Splits `raw` into literal text and placeholder segments.
///
/// Adjacent literal characters are merged into one `Text` segment, so a string
/// consisting of exactly one placeholder yields exactly one segment.
pub(crate) fn tokenize(raw: &str) -> DiResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != DELIMITER {
            text.push(c);
            continue;
        }

        if matches!(chars.peek(), Some(&(_, DELIMITER))) {
            chars.next();
            text.push(DELIMITER);
            continue;
        }

        let mut end = None;
        for (position, c) in chars.by_ref() {
            if c == DELIMITER {
                end = Some(position);
                break;
            }
            if c.is_whitespace() {
                return Err(malformed(raw, start, "whitespace inside a placeholder name"));
            }
        }
        let end = end.ok_or_else(|| malformed(raw, start, "unterminated placeholder"))?;

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }
        segments.push(Segment::Placeholder(&raw[start + 1..end]));
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

/// Doubles every delimiter so the result reads back as literal text.
pub(crate) fn escape(literal: &str) -> String {
    literal.replace(DELIMITER, "%%")
}

fn malformed(raw: &str, position: usize, reason: &'static str) -> DiError {
    DiError::MalformedPlaceholder {
        value: raw.to_string(),
        position,
        reason,
    }
}
