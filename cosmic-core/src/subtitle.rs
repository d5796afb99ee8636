use std::time::Duration;

pub const NBSP: char = '\u{00A0}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub delay: Duration,
}

/// Per-character reveal schedule for the animated subtitle.
/// Spaces become non-breaking so the layout does not collapse them.
pub fn stagger(text: &str, step: Duration) -> Vec<Glyph> {
    text.chars()
        .enumerate()
        .map(|(i, ch)| Glyph {
            ch: if ch == ' ' { NBSP } else { ch },
            delay: step.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)),
        })
        .collect()
}
