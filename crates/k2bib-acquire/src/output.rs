use crate::types::RawPage;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Separator written after every citation: three blank lines.
pub const CITATION_SEPARATOR: &str = "\n\n\n\n";

/// Cache a fetched page to `{cache_dir}/{file_stem}.txt` so it can be
/// re-examined (or re-extracted offline) without re-fetching.
///
/// Missing pages are not cached.
pub fn cache_page(cache_dir: &Path, file_stem: &str, page: &RawPage) -> Result<()> {
    let Some(text) = page.text() else {
        tracing::debug!(id = file_stem, "Not caching missing page");
        return Ok(());
    };

    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
    let path = cache_dir.join(format!("{file_stem}.txt"));
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Cached raw page");
    Ok(())
}

/// Writes citation blocks, each followed by [`CITATION_SEPARATOR`].
pub struct CitationWriter<W: Write> {
    inner: W,
}

impl CitationWriter<BufWriter<File>> {
    /// Open the output file. With `append` false the file is truncated
    /// first, so re-running a batch does not duplicate entries.
    pub fn create(path: &Path, append: bool) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        tracing::info!(path = %path.display(), append, "Opened citation output");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CitationWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_citation(&mut self, citation: &str) -> Result<()> {
        self.inner.write_all(citation.as_bytes())?;
        self.inner.write_all(CITATION_SEPARATOR.as_bytes())?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush().context("Failed to flush citation output")?;
        Ok(self.inner)
    }
}
