use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;

use k2bib_acquire::RawPage;
use k2bib_model::{Identifier, ModelError, ProposalRecord, SubmissionDate};

pub mod rules;

/// Why a page could not be turned into a record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("label '{0}' not found in page text")]
    FieldNotFound(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Whether a proposal without an abstract still yields a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbstractPolicy {
    /// Pages without an abstract produce no record.
    #[default]
    Required,
    /// Keep the record with an empty abstract.
    Optional,
}

/// Extract a proposal record from a fetched page.
///
/// Returns `Ok(None)` for a missing page, or for a page without an abstract
/// under [`AbstractPolicy::Required`]. A page missing one of the header
/// labels, or an identifier whose cycle cannot be dated, is an error. A
/// record is only returned with every field filled.
pub fn extract(
    page: &RawPage,
    id: &Identifier,
    policy: AbstractPolicy,
) -> Result<Option<ProposalRecord>, ExtractError> {
    let Some(text) = page.text() else {
        tracing::debug!(id = %id, "Page not found");
        return Ok(None);
    };
    if text.contains(k2bib_acquire::types::NOT_FOUND_MARKER) {
        tracing::debug!(id = %id, "Page carries the not-found marker");
        return Ok(None);
    }

    let title = field(text, rules::TITLE)?;
    let pi = field(text, rules::PI)?;
    let cois = field(text, rules::COIS)?;

    let abstract_text = rules::extract_abstract(text);
    if abstract_text.is_empty() && policy == AbstractPolicy::Required {
        tracing::debug!(id = %id, "No abstract on page");
        return Ok(None);
    }

    let cycle = id.cycle()?;
    let date = SubmissionDate::for_cycle(cycle)?;

    Ok(Some(ProposalRecord {
        id: id.clone(),
        title: title.to_string(),
        pi: pi.to_string(),
        co_investigators: k2bib_model::split_names(cois).map(str::to_string).collect(),
        abstract_text,
        cycle,
        date,
        url: page.url().to_string(),
    }))
}

fn field(text: &str, rule: rules::LabelRule) -> Result<&str, ExtractError> {
    rule.apply(text).ok_or(ExtractError::FieldNotFound(rule.label))
}

/// Extract a record from a previously saved page file.
///
/// The file is classified exactly like a freshly fetched body; `url` is
/// recorded as the record's source.
pub fn extract_saved_page(
    page_path: &Path,
    id: &Identifier,
    url: &str,
    policy: AbstractPolicy,
) -> Result<Option<ProposalRecord>> {
    let body = fs::read_to_string(page_path)
        .with_context(|| format!("Failed to read {}", page_path.display()))?;
    let page = RawPage::from_body(url, &body);
    let record = extract(&page, id, policy)
        .with_context(|| format!("Failed to extract {id} from {}", page_path.display()))?;
    Ok(record)
}
