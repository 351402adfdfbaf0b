use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

use k2bib_acquire::output::{self, CitationWriter};
use k2bib_acquire::PageSource;
use k2bib_cite::Citation;
use k2bib_model::Identifier;
use k2bib_parse::AbstractPolicy;

pub mod identifiers;

pub use identifiers::{collect_identifiers, identifiers_from_cells, read_identifiers, ID_COLUMN};

/// Settings for a full batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// CSV metadata table with an "Investigation IDs" column.
    pub input: PathBuf,
    /// Citation output file.
    pub output: PathBuf,
    /// Append to `output` instead of replacing it.
    pub append: bool,
    pub policy: AbstractPolicy,
    /// Save every fetched page here as `{ID}.txt`.
    pub cache_dir: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("GO_proposal_metadata.csv"),
            output: PathBuf::from("K2bib.txt"),
            append: false,
            policy: AbstractPolicy::Required,
            cache_dir: None,
        }
    }
}

/// What happened to one identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Cited(Citation),
    NotFound,
    NoAbstract,
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub written: usize,
    pub not_found: usize,
    pub no_abstract: usize,
    pub failed: usize,
}

/// Fetch, extract and format one proposal.
///
/// Errors (network, missing labels, undatable cycles, malformed authors)
/// are returned; skipping is the caller's decision.
pub async fn process_one<S: PageSource>(
    source: &S,
    id: &Identifier,
    policy: AbstractPolicy,
    cache_dir: Option<&Path>,
) -> Result<Outcome> {
    let page = source.fetch_page(id).await?;
    if let Some(dir) = cache_dir {
        output::cache_page(dir, id.as_str(), &page)?;
    }
    if page.is_not_found() {
        return Ok(Outcome::NotFound);
    }

    let Some(record) = k2bib_parse::extract(&page, id, policy)? else {
        return Ok(Outcome::NoAbstract);
    };
    let citation = k2bib_cite::format(&record)?;
    Ok(Outcome::Cited(citation))
}

/// Process identifiers in order, writing each citation as it is produced.
///
/// A failing identifier is logged and skipped. Only write errors on the
/// output abort the run.
pub async fn run<S: PageSource, W: Write>(
    source: &S,
    ids: &[Identifier],
    writer: &mut CitationWriter<W>,
    policy: AbstractPolicy,
    cache_dir: Option<&Path>,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary {
        total: ids.len(),
        ..BatchSummary::default()
    };

    for (index, id) in ids.iter().enumerate() {
        tracing::info!(id = %id, progress = format!("{}/{}", index + 1, ids.len()), "Processing proposal");
        match process_one(source, id, policy, cache_dir).await {
            Ok(Outcome::Cited(citation)) => {
                writer.write_citation(citation.as_str())?;
                summary.written += 1;
            }
            Ok(Outcome::NotFound) => {
                tracing::info!(id = %id, "No program page, skipping");
                summary.not_found += 1;
            }
            Ok(Outcome::NoAbstract) => {
                tracing::info!(id = %id, "No abstract, skipping");
                summary.no_abstract += 1;
            }
            Err(e) => {
                tracing::warn!(id = %id, error = format!("{e:#}"), "Skipping proposal");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Run the whole batch: read identifiers, process them, write the output file.
pub async fn run_batch<S: PageSource>(source: &S, options: &BatchOptions) -> Result<BatchSummary> {
    let ids = read_identifiers(&options.input)?;
    let mut writer = CitationWriter::create(&options.output, options.append)?;

    let summary = run(source, &ids, &mut writer, options.policy, options.cache_dir.as_deref()).await?;
    writer.finish()?;

    tracing::info!(
        total = summary.total,
        written = summary.written,
        not_found = summary.not_found,
        no_abstract = summary.no_abstract,
        failed = summary.failed,
        path = %options.output.display(),
        "Batch complete"
    );
    Ok(summary)
}
