// Text-slicing rules for the plain-text proposal pages.
//
// Header fields sit on "Label: value (affiliation)" lines; the abstract is
// every paragraph that is not a header or a "#" comment.

/// A label-anchored field rule: the value starts after the first
/// occurrence of `label`, ends at `terminator` or at a repeat of the label,
/// and is cut at `truncator` before trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRule {
    pub label: &'static str,
    pub terminator: char,
    pub truncator: char,
}

impl LabelRule {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            terminator: '\n',
            truncator: '(',
        }
    }

    /// Apply the rule to page text. `None` when the label is absent.
    pub fn apply<'a>(&self, text: &'a str) -> Option<&'a str> {
        let (_, rest) = text.split_once(self.label)?;
        let rest = rest.split_once(self.label).map_or(rest, |(before, _)| before);
        let line = rest.split_once(self.terminator).map_or(rest, |(line, _)| line);
        let value = line.split_once(self.truncator).map_or(line, |(value, _)| value);
        Some(value.trim())
    }
}

pub const TITLE: LabelRule = LabelRule::new("Title:");
pub const PI: LabelRule = LabelRule::new("PI:");
pub const COIS: LabelRule = LabelRule::new("CoIs:");

/// Paragraphs are separated by one blank line.
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Paragraphs starting with any of these are not part of the abstract.
pub const NON_ABSTRACT_PREFIXES: [&str; 4] = ["#", "Title:", "CoIs:", "PI:"];

/// Concatenate every abstract paragraph, without separators.
///
/// Paragraphs are tested as split, untrimmed; only the joined result is
/// trimmed. Returns an empty string when the page has no abstract.
pub fn extract_abstract(text: &str) -> String {
    let joined: String = text
        .split(PARAGRAPH_BREAK)
        .filter(|p| !NON_ABSTRACT_PREFIXES.iter().any(|prefix| p.starts_with(prefix)))
        .collect();
    joined.trim().to_string()
}
