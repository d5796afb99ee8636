use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("prompt is empty")]
    Empty,
}

/// A prompt that is known to be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptText(String);

impl PromptText {
    pub fn parse(raw: &str) -> Result<Self, PromptError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PromptError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PromptText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase, trim, and collapse runs of whitespace so phrase matching is stable
/// across recognizer quirks.
pub fn normalize_transcript(text: &str) -> String {
    let lowered = text.to_lowercase();
    whitespace_re()
        .replace_all(lowered.trim(), " ")
        .into_owned()
}

/// Shortened, single-line form of a prompt or reply for log lines.
pub fn preview(text: &str, max_chars: usize) -> String {
    let one_line = whitespace_re().replace_all(text.trim(), " ");
    let mut out: String = one_line.chars().take(max_chars).collect();
    if one_line.chars().count() > max_chars {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_trimmed() {
        let p = PromptText::parse("  tell me about Mars \n").unwrap();
        assert_eq!(p.as_str(), "tell me about Mars");
    }

    #[test]
    fn whitespace_only_prompt_is_rejected() {
        assert_eq!(PromptText::parse(""), Err(PromptError::Empty));
        assert_eq!(PromptText::parse(" \t\n "), Err(PromptError::Empty));
    }

    #[test]
    fn transcript_is_normalized() {
        assert_eq!(
            normalize_transcript("  Open   YouTube\tplease "),
            "open youtube please"
        );
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("héllo world", 5), "héllo…");
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("a\n\nb", 10), "a b");
    }
}
