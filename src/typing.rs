//! Character-by-character typing effect as a plain iterator.
//!
//! The timer that paces it lives on the wasm side; this type only decides
//! what is shown at each step.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const HEADLINE_DELAY: Duration = Duration::from_millis(120);
pub const TAGLINE: &str = "Building the future with code...";
pub const TAGLINE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: String,
    delay: Duration,
    /// Byte offset of the end of the currently shown prefix.
    shown: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay,
            shown: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn shown(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.text.len()
    }

    pub fn restart(&mut self) {
        self.shown = 0;
    }
}

impl Iterator for Typewriter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let next = self.text[self.shown..].chars().next()?;
        self.shown += next.len_utf8();
        Some(self.text[..self.shown].to_owned())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.text[self.shown..].chars().count();
        (remaining, Some(remaining))
    }
}

/// One typed line of the hero section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedLine {
    /// Id of the element whose text is replaced at each step.
    pub target: String,
    pub text: String,
    pub delay_ms: u64,
}

impl TypedLine {
    pub fn typewriter(&self) -> Typewriter {
        Typewriter::new(self.text.clone(), Duration::from_millis(self.delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yields_growing_prefixes() {
        let steps: Vec<_> = Typewriter::new("abc", TAGLINE_DELAY).collect();
        assert_eq!(steps, vec!["a", "ab", "abc"]);
    }

    #[test]
    fn respects_char_boundaries() {
        let mut tw = Typewriter::new("né→", HEADLINE_DELAY);
        assert_eq!(tw.size_hint(), (3, Some(3)));
        assert_eq!(tw.next().as_deref(), Some("n"));
        assert_eq!(tw.next().as_deref(), Some("né"));
        assert_eq!(tw.next().as_deref(), Some("né→"));
        assert_eq!(tw.next(), None);
        assert!(tw.is_finished());
    }

    #[test]
    fn restart_begins_again() {
        let mut tw = Typewriter::new(TAGLINE, TAGLINE_DELAY);
        assert_eq!(tw.by_ref().count(), TAGLINE.len());
        tw.restart();
        assert_eq!(tw.shown(), "");
        assert_eq!(tw.next().as_deref(), Some("B"));
    }

    #[test]
    fn empty_text_finishes_immediately() {
        let mut tw = Typewriter::new("", TAGLINE_DELAY);
        assert!(tw.is_finished());
        assert_eq!(tw.next(), None);
    }
}
