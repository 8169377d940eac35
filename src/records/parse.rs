use serde::Deserialize;
use serde_json::{Map, Value};

use super::record::{RawRecord, Record, RecordError, ensure_unique_ids};

/// Parses a JSON document holding either a top-level array of record objects
/// or an object with a `records` array.
pub fn parse_json(raw: &str) -> Result<Vec<Record>, RecordError> {
    let parsed: Value = serde_json::from_str(raw)?;

    let rows = match parsed {
        Value::Array(rows) => rows,
        Value::Object(mut object) => match object.remove("records") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(RecordError::UnsupportedFormat(
                    "JSON object without a `records` array".to_string(),
                ));
            }
        },
        _ => {
            return Err(RecordError::UnsupportedFormat(
                "JSON records must be an array or an object".to_string(),
            ));
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let raw_record = RawRecord::deserialize(row)?;
        records.push(raw_record.into_record(index)?);
    }

    ensure_unique_ids(&records)?;
    Ok(records)
}

/// Parses comma separated text with a header row.
///
/// Fields may be wrapped in double quotes; `""` inside a quoted field is a
/// literal quote and quoted fields may span lines. Empty cells count as
/// missing.
pub fn parse_csv(raw: &str) -> Result<Vec<Record>, RecordError> {
    let mut rows = split_csv_rows(raw)?.into_iter();

    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = header
        .fields
        .into_iter()
        .map(|column| column.trim().to_string())
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for CsvRow { line, fields } in rows {
        if fields.len() != columns.len() {
            return Err(RecordError::Csv {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    columns.len(),
                    fields.len()
                ),
            });
        }

        let mut row = Map::with_capacity(columns.len());
        for (column, field) in columns.iter().zip(fields) {
            if field.trim().is_empty() {
                continue;
            }
            row.insert(column.clone(), Value::String(field));
        }

        let raw_record = RawRecord::deserialize(Value::Object(row)).map_err(|error| {
            RecordError::Csv {
                line,
                message: error.to_string(),
            }
        })?;
        records.push(raw_record.into_record(records.len())?);
    }

    ensure_unique_ids(&records)?;
    Ok(records)
}

/// One CSV row and the line it starts on.
struct CsvRow {
    line: usize,
    fields: Vec<String>,
}

fn push_row(rows: &mut Vec<CsvRow>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        rows.push(CsvRow { line, fields });
    }
}

fn split_csv_rows(raw: &str) -> Result<Vec<CsvRow>, RecordError> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_line = 1;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            '\n' if in_quotes => {
                line += 1;
                current.push('\n');
            }
            '\n' => {
                fields.push(std::mem::take(&mut current));
                push_row(&mut rows, row_line, std::mem::take(&mut fields));
                line += 1;
                row_line = line;
            }
            '\r' if !in_quotes => {}
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(RecordError::Csv {
            line: row_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    fields.push(current);
    push_row(&mut rows, row_line, fields);
    Ok(rows)
}
