use std::fmt;
use thiserror::Error;

use k2bib_model::ProposalRecord;

pub mod authors;

pub use authors::{format_author, format_authors};

/// Fixed `howpublished` value for every proposal citation.
pub const HOWPUBLISHED: &str = "K2 Proposal";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CiteError {
    #[error("proposal {0} lists no authors")]
    NoAuthors(String),

    #[error("author '{0}' does not end its first word with an initial")]
    MalformedAuthor(String),
}

/// A finished BibTeX `@MISC` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation(String);

impl Citation {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format a proposal record as a BibTeX `@MISC` entry.
///
/// The cite key is `{year}ktwo.prop{id}{c}`, where `c` is the first letter
/// of the first author's surname.
pub fn format(record: &ProposalRecord) -> Result<Citation, CiteError> {
    let authors = format_authors(&record.authors())?;
    // Rendered authors start with "{Surname", so index 1 is the surname's first letter.
    let key_char = authors
        .chars()
        .nth(1)
        .ok_or_else(|| CiteError::NoAuthors(record.id.to_string()))?;

    let year = record.date.year;
    let month = &record.date.month;
    let id = &record.id;

    Ok(Citation(format!(
        "@MISC{{{year}ktwo.prop{id}{key_char},\n\
         \tauthor = {{{authors}}},\n\
         \ttitle = {{{title}}},\n\
         \tabstract = {{{abstract_text}}},\n\
         \thowpublished = {{{HOWPUBLISHED}}},\n\
         \tyear = {{{year}}},\n\
         \tmonth = {{{month}}},\n\
         \turl = {{{url}}},\n\
         \tnotes = {{K2 Proposal {id}}}\n\
         }}",
        title = record.title,
        abstract_text = record.abstract_text,
        url = record.url,
    )))
}
