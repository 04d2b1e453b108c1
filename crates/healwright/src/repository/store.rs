//! CSV-backed persisted locator sources.
//!
//! One file per logical page. Row 1 is a two-column header whose content is
//! ignored on read; every following row is `element_key,selector`. Reading
//! is best-effort: a missing file is reported as [`SourceLoad::Missing`]
//! rather than an error, and rows that cannot be used are skipped.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;

/// Header written on every persist. Informational only; readers skip it.
pub const HEADER: [&str; 2] = ["Element Name", "Locator"];

/// Outcome of reading a persisted source file.
///
/// `Missing` is distinguishable from an empty or key-less source so callers
/// and tests can assert on which happened.
#[derive(Debug)]
pub enum SourceLoad {
    /// File existed; entries in file order, trimmed, blank rows skipped
    Loaded(Vec<(String, String)>),
    /// File absent or unreadable
    Missing,
}

/// Reads all usable entries from a source file.
///
/// Rows with an empty key or empty selector are skipped. A malformed row
/// aborts the read, keeping the rows parsed so far — a broken locator file
/// should degrade to "keys not found", never crash the suite.
pub fn load_source(path: &Path) -> SourceLoad {
    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "locator source unreadable");
            return SourceLoad::Missing;
        }
    };

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    parsed = entries.len(),
                    "malformed row in locator source; keeping rows parsed so far"
                );
                break;
            }
        };
        let key = record.get(0).map(str::trim).unwrap_or_default();
        let selector = record.get(1).map(str::trim).unwrap_or_default();
        if key.is_empty() || selector.is_empty() {
            continue;
        }
        entries.push((key.to_string(), selector.to_string()));
    }

    debug!(path = %path.display(), count = entries.len(), "locator source read");
    SourceLoad::Loaded(entries)
}

/// Overwrites the whole source file: header row plus one row per entry, in
/// the given order. No partial-write protection; a failure mid-write leaves
/// the file in an undefined state.
pub fn persist_source(path: &Path, entries: &[(String, String)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for (key, selector) in entries {
        writer.write_record([key.as_str(), selector.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    #[test]
    fn header_is_ignored_and_fields_are_trimmed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "Login_Elements.csv",
            "anything,goes here\n txtUsername , #user \nbtnLogin,#login-btn\n",
        );

        let SourceLoad::Loaded(entries) = load_source(&path) else {
            panic!("expected Loaded");
        };
        assert_eq!(
            entries,
            vec![
                ("txtUsername".to_string(), "#user".to_string()),
                ("btnLogin".to_string(), "#login-btn".to_string()),
            ]
        );
    }

    #[test]
    fn blank_and_partial_rows_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "page.csv",
            "Element Name,Locator\n,\nonly_key,\n,#only-selector\nok,#ok\n",
        );

        let SourceLoad::Loaded(entries) = load_source(&path) else {
            panic!("expected Loaded");
        };
        assert_eq!(entries, vec![("ok".to_string(), "#ok".to_string())]);
    }

    #[test]
    fn missing_file_is_distinguishable() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load_source(&dir.path().join("nope.csv")),
            SourceLoad::Missing
        ));
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.csv");
        let entries = vec![
            ("txtUsername".to_string(), "#user".to_string()),
            ("lnkLogout".to_string(), "//a[@id='logout']".to_string()),
        ];

        persist_source(&path, &entries).expect("persist");

        let raw = std::fs::read_to_string(&path).expect("read back");
        assert!(raw.starts_with("Element Name,Locator\n"));

        let SourceLoad::Loaded(loaded) = load_source(&path) else {
            panic!("expected Loaded");
        };
        assert_eq!(loaded, entries);
    }

    #[test]
    fn selectors_with_commas_survive_the_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.csv");
        let entries = vec![(
            "lst_SearchList".to_string(),
            "div[role='option'], li.search-item".to_string(),
        )];

        persist_source(&path, &entries).expect("persist");

        let SourceLoad::Loaded(loaded) = load_source(&path) else {
            panic!("expected Loaded");
        };
        assert_eq!(loaded, entries);
    }
}
