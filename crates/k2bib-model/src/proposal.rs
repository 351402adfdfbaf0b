use serde::{Deserialize, Serialize};

use crate::cycle::SubmissionDate;
use crate::identifier::Identifier;

/// A fully extracted K2 Guest Observer proposal.
///
/// Records are only ever built whole: the extractor either fills every
/// field or produces no record for the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: Identifier,
    pub title: String,
    /// Principal investigator as written on the page (e.g., "Howell, Steve").
    pub pi: String,
    /// Co-investigators in page order, split on ";".
    pub co_investigators: Vec<String>,
    /// Free-text abstract. Empty only when the abstract was not required.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub cycle: u32,
    pub date: SubmissionDate,
    /// The page the record was extracted from.
    pub url: String,
}

impl ProposalRecord {
    /// All authors in citation order: PI entries first, then co-investigators.
    ///
    /// The PI field may itself hold several ";"-separated names.
    pub fn authors(&self) -> Vec<&str> {
        split_names(&self.pi)
            .chain(self.co_investigators.iter().map(|s| s.trim()))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Split a ";"-separated name list, trimming and dropping empty entries.
pub fn split_names(field: &str) -> impl Iterator<Item = &str> {
    field.split(';').map(str::trim).filter(|s| !s.is_empty())
}
