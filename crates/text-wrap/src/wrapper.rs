//! Greedy word-level wrapping against a pixel width budget

use crate::measure::TextMeasurer;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered output lines of a wrap
///
/// Every line measures within the width budget except a single word that
/// is wider than the budget on its own. Such a word gets a line to itself
/// and is never broken or truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrappedLines(Vec<String>);

impl WrappedLines {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Join the lines with `\n`, the form painted by the editor
    pub fn to_text(&self) -> String {
        self.0.join("\n")
    }
}

impl Deref for WrappedLines {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for WrappedLines {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

impl IntoIterator for WrappedLines {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a WrappedLines {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Wrap `text` into lines no wider than `max_width_px`
///
/// Words are split on single spaces; newlines are ordinary characters here.
/// Each word is tentatively appended to the current line and the joined
/// line is measured. If it fits the word stays, otherwise the current line
/// is flushed and the word starts a new one.
///
/// # Arguments
/// * `measurer` - Width provider for the font
/// * `text` - Text to wrap
/// * `font_family` - Font family passed through to the measurer
/// * `font_size_px` - Font size in pixels
/// * `max_width_px` - Width budget in pixels
pub fn wrap_text<M>(
    measurer: &M,
    text: &str,
    font_family: &str,
    font_size_px: f64,
    max_width_px: f64,
) -> WrappedLines
where
    M: TextMeasurer + ?Sized,
{
    let mut lines = Vec::new();
    let mut current_line: Vec<&str> = Vec::new();

    for word in text.split(' ') {
        current_line.push(word);
        let candidate = current_line.join(" ");
        let width = measurer.measure_text_width(&candidate, font_family, font_size_px);

        if width > max_width_px {
            current_line.pop();
            if !current_line.is_empty() {
                lines.push(current_line.join(" "));
            }
            current_line.clear();
            current_line.push(word);
        }
    }

    // Don't forget the last line
    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    WrappedLines(lines)
}

/// Word wrapper bound to a measurement backend
#[derive(Debug, Clone)]
pub struct TextWrapper<M> {
    measurer: M,
}

impl<M: TextMeasurer> TextWrapper<M> {
    /// Create a new wrapper with the given measurer
    pub fn new(measurer: M) -> Self {
        Self { measurer }
    }

    /// Wrap text, see [`wrap_text`]
    pub fn wrap(
        &self,
        text: &str,
        font_family: &str,
        font_size_px: f64,
        max_width_px: f64,
    ) -> WrappedLines {
        wrap_text(
            &self.measurer,
            text,
            font_family,
            font_size_px,
            max_width_px,
        )
    }

    /// Width of the widest line as measured by this wrapper
    pub fn widest_line(&self, lines: &WrappedLines, font_family: &str, font_size_px: f64) -> f64 {
        lines
            .iter()
            .map(|line| {
                self.measurer
                    .measure_text_width(line, font_family, font_size_px)
            })
            .fold(0.0, f64::max)
    }

    /// Get reference to the measurer
    pub fn measurer(&self) -> &M {
        &self.measurer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedAdvanceMeasurer;
    use pretty_assertions::assert_eq;

    /// One pixel per character at size 1.0
    fn wrapper() -> TextWrapper<FixedAdvanceMeasurer> {
        TextWrapper::new(FixedAdvanceMeasurer::new(1.0))
    }

    #[test]
    fn test_wrap_basic() {
        let lines = wrapper().wrap("Hello world this is a test", "Arial", 1.0, 12.0);
        assert_eq!(lines.as_slice(), ["Hello world", "this is a", "test"]);
    }

    #[test]
    fn test_wrap_unlimited_width() {
        let lines = wrapper().wrap("The quick brown fox jumps", "Arial", 48.0, 9_999_999.0);
        assert_eq!(lines.as_slice(), ["The quick brown fox jumps"]);
    }

    #[test]
    fn test_wrap_exact_fit() {
        let lines = wrapper().wrap("Hello world", "Arial", 1.0, 11.0);
        assert_eq!(lines.as_slice(), ["Hello world"]);
    }

    #[test]
    fn test_wrap_just_over() {
        let lines = wrapper().wrap("Hello world", "Arial", 1.0, 10.0);
        assert_eq!(lines.as_slice(), ["Hello", "world"]);
    }

    #[test]
    fn test_overwide_word_kept_whole() {
        let lines = wrapper().wrap("a Supercalifragilistic b", "Arial", 1.0, 5.0);
        assert_eq!(lines.as_slice(), ["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn test_overwide_first_word() {
        let lines = wrapper().wrap("Supercalifragilistic", "Arial", 1.0, 5.0);
        assert_eq!(lines.as_slice(), ["Supercalifragilistic"]);
    }

    #[test]
    fn test_newline_is_part_of_word() {
        let lines = wrapper().wrap("one\ntwo three", "Arial", 1.0, 100.0);
        assert_eq!(lines.as_slice(), ["one\ntwo three"]);
    }

    #[test]
    fn test_empty_text_yields_one_empty_line() {
        let lines = wrapper().wrap("", "Arial", 1.0, 100.0);
        assert_eq!(lines.as_slice(), [""]);
    }

    #[test]
    fn test_negative_budget_one_word_per_line() {
        let lines = wrapper().wrap("a b c", "Arial", 1.0, -10.0);
        assert_eq!(lines.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_font_size_scales_budget() {
        let lines = wrapper().wrap("aa bb cc", "Arial", 10.0, 50.0);
        assert_eq!(lines.as_slice(), ["aa bb", "cc"]);
    }

    #[test]
    fn test_widest_line() {
        let w = wrapper();
        let lines = w.wrap("Hello world this is a test", "Arial", 1.0, 12.0);
        assert_eq!(w.widest_line(&lines, "Arial", 1.0), 11.0);
    }

    #[test]
    fn test_to_text() {
        let lines = WrappedLines::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(lines.to_text(), "a\nb");
        assert_eq!(serde_json::to_string(&lines).unwrap(), r#"["a","b"]"#);
    }
}
