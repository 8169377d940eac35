//! Input records: strict schema, JSON/CSV parsing and file loading.

mod parse;
mod record;

use std::path::Path;

pub use parse::{parse_csv, parse_json};
pub use record::{Record, RecordError, ensure_unique_ids, validate_records};

/// Reads a record file, picking the parser from the file extension.
pub fn load_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = match extension.as_str() {
        "json" => parse_json(&raw)?,
        "csv" => parse_csv(&raw)?,
        other => {
            return Err(RecordError::UnsupportedFormat(format!(
                "{} (extension {other:?})",
                path.display()
            )));
        }
    };

    tracing::info!(
        count = records.len(),
        path = %path.display(),
        "loaded records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "id,value,name,category,group").unwrap();
        writeln!(file, "a,10,Alpha,low,g1").unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records, vec![
            Record::new("a", 10.0)
                .with_name("Alpha")
                .with_category("low")
                .with_group("g1")
        ]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();
        assert!(matches!(
            load_records(file.path()),
            Err(RecordError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let directory = tempfile::tempdir().unwrap();
        let error = load_records(&directory.path().join("absent.json")).unwrap_err();
        assert!(matches!(error, RecordError::Io { .. }));
    }
}
