use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning input files into records.
///
/// All of these are load-time failures: a chart is never built from a
/// partially valid record set.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("unsupported record format: {0}")]
    UnsupportedFormat(String),

    #[error("record #{index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("record `{id}` has a malformed value {raw:?}")]
    MalformedValue { id: String, raw: String },

    #[error("duplicate record id `{id}`")]
    DuplicateId { id: String },
}

/// One validated input row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub value: f64,
    pub name: String,
    pub category: String,
    pub group: String,
}

impl Record {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            value,
            category: String::new(),
            group: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// Loosely typed row as it comes out of JSON or CSV.
///
/// Legacy rows carry the split bucket in `year` and the fill level in
/// `group`. When `year` is present it becomes the group and the legacy
/// `group` stands in for a missing `category`.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawRecord {
    #[serde(default)]
    pub(super) id: Option<Value>,
    #[serde(default, alias = "total_amount")]
    pub(super) value: Option<Value>,
    #[serde(default, alias = "county_name")]
    pub(super) name: Option<Value>,
    #[serde(default)]
    pub(super) category: Option<Value>,
    #[serde(default)]
    pub(super) group: Option<Value>,
    #[serde(default)]
    pub(super) year: Option<Value>,
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_magnitude(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|magnitude| magnitude.is_finite())
}

impl RawRecord {
    pub(super) fn into_record(self, index: usize) -> Result<Record, RecordError> {
        let id = self
            .id
            .as_ref()
            .and_then(value_text)
            .ok_or(RecordError::MissingField { index, field: "id" })?;

        let raw_value = self.value.ok_or(RecordError::MissingField {
            index,
            field: "value",
        })?;
        let value = parse_magnitude(&raw_value).ok_or_else(|| RecordError::MalformedValue {
            id: id.clone(),
            raw: match &raw_value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        })?;

        let (category, group) = match self.year.filter(|year| value_text(year).is_some()) {
            Some(year) => (self.category.or(self.group), Some(year)),
            None => (self.category, self.group),
        };

        let category = category
            .as_ref()
            .and_then(value_text)
            .ok_or(RecordError::MissingField {
                index,
                field: "category",
            })?;
        let group = group
            .as_ref()
            .and_then(value_text)
            .ok_or(RecordError::MissingField {
                index,
                field: "group",
            })?;
        let name = self
            .name
            .as_ref()
            .and_then(value_text)
            .unwrap_or_else(|| id.clone());

        Ok(Record {
            id,
            value,
            name,
            category,
            group,
        })
    }
}

/// Checks a record set assembled in code the same way the parsers check
/// file input: finite values and unique ids.
pub fn validate_records(records: &[Record]) -> Result<(), RecordError> {
    if let Some(record) = records.iter().find(|record| !record.value.is_finite()) {
        return Err(RecordError::MalformedValue {
            id: record.id.clone(),
            raw: record.value.to_string(),
        });
    }
    ensure_unique_ids(records)
}

pub fn ensure_unique_ids(records: &[Record]) -> Result<(), RecordError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(RecordError::DuplicateId {
                id: record.id.clone(),
            });
        }
    }
    Ok(())
}
