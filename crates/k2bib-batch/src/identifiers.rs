use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use k2bib_model::Identifier;

/// Metadata table column holding "|"-separated investigation IDs.
pub const ID_COLUMN: &str = "Investigation IDs";

/// Cadence suffixes attached to GO IDs in the target tables.
const CADENCE_SUFFIXES: [&str; 2] = ["_LC", "_SC"];

/// Turn investigation-ID cells into the sorted, de-duplicated set of GO
/// proposal identifiers.
///
/// `"GO1001_LC|GO1001_SC|GO2002"` contributes `GO1001` and `GO2002`.
/// Tokens not starting with "GO" (e.g., DDT or engineering programs) are
/// dropped.
pub fn identifiers_from_cells<'a, I>(cells: I) -> Vec<Identifier>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unique = BTreeSet::new();
    for cell in cells {
        for token in cell.split('|').map(str::trim) {
            if !token.starts_with("GO") {
                continue;
            }
            let stripped = CADENCE_SUFFIXES
                .iter()
                .fold(token.to_string(), |acc, suffix| acc.replace(suffix, ""));
            if let Ok(id) = Identifier::new(&stripped) {
                unique.insert(id);
            }
        }
    }
    unique.into_iter().collect()
}

/// Read GO identifiers from a CSV metadata table.
pub fn collect_identifiers<R: Read>(reader: R) -> Result<Vec<Identifier>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers().context("Failed to read CSV header")?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == ID_COLUMN)
        .with_context(|| format!("CSV has no '{ID_COLUMN}' column"))?;

    let mut cells = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", row + 1))?;
        if let Some(cell) = record.get(column) {
            cells.push(cell.to_string());
        }
    }

    let ids = identifiers_from_cells(cells.iter().map(String::as_str));
    tracing::info!(rows = cells.len(), identifiers = ids.len(), "Collected proposal identifiers");
    Ok(ids)
}

/// Read GO identifiers from a CSV file on disk.
pub fn read_identifiers(path: &Path) -> Result<Vec<Identifier>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    collect_identifiers(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ids: &[Identifier]) -> Vec<&str> {
        ids.iter().map(|i| i.as_str()).collect()
    }

    #[test]
    fn test_cadence_suffixes_collapse() {
        let ids = identifiers_from_cells(["GO1_LC|GO1_SC|GO2"]);
        assert_eq!(names(&ids), vec!["GO1", "GO2"]);
    }

    #[test]
    fn test_dedup_across_rows_and_sorted() {
        let ids = identifiers_from_cells(["GO5023_LC|GO1001_LC", "GO1001_SC", "GO5023_LC"]);
        assert_eq!(names(&ids), vec!["GO1001", "GO5023"]);
    }

    #[test]
    fn test_non_go_tokens_dropped() {
        let ids = identifiers_from_cells(["DDT5001_LC| GO3001_LC |ENG_LC", ""]);
        assert_eq!(names(&ids), vec!["GO3001"]);
    }

    #[test]
    fn test_collect_from_csv() {
        let csv = "\
EPIC ID,Investigation IDs,Campaign
201000001,GO1001_LC|GO1002_LC,1
201000002,\"GO1001_SC|DDT1001_LC\",1
201000003,GO2001_LC,2
";
        let ids = collect_identifiers(csv.as_bytes()).unwrap();
        assert_eq!(names(&ids), vec!["GO1001", "GO1002", "GO2001"]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "EPIC ID,Campaign\n201000001,1\n";
        let err = collect_identifiers(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains(ID_COLUMN));
    }

    #[test]
    fn test_short_rows_tolerated() {
        let csv = "EPIC ID,Investigation IDs\n201000001\n201000002,GO4001_LC\n";
        let ids = collect_identifiers(csv.as_bytes()).unwrap();
        assert_eq!(names(&ids), vec!["GO4001"]);
    }
}
