//! Shared state for folding tagged rows into weekday/weekend vectors.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{Error, Result};
use crate::table::RawRow;
use crate::tag::ApplicabilityTag;

/// Weekday and weekend halves of a record, each set by the last row whose
/// tag covers it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySplit {
    pub weekday: Option<Vec<f64>>,
    pub weekend: Option<Vec<f64>>,
}

impl DaySplit {
    pub fn apply(&mut self, tag: ApplicabilityTag, values: Vec<f64>) {
        match tag {
            ApplicabilityTag::All => {
                self.weekday = Some(values.clone());
                self.weekend = Some(values);
            }
            ApplicabilityTag::Weekdays => self.weekday = Some(values),
            ApplicabilityTag::Weekends => self.weekend = Some(values),
        }
    }
}

/// Complete records keyed by name, plus every recoverable error raised while
/// building them.
#[derive(Debug)]
pub struct Normalized<R> {
    pub records: BTreeMap<String, R>,
    pub rejected: Vec<Error>,
}

impl<R> Normalized<R> {
    pub(crate) fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            rejected: Vec::new(),
        }
    }

    pub(crate) fn reject(&mut self, err: Error) {
        warn!("{err}");
        self.rejected.push(err);
    }
}

/// Reads the name and tag columns of a row. An unknown tag is fatal.
pub(crate) fn row_head<'a>(row: &'a RawRow, file: &str) -> Result<(&'a str, ApplicabilityTag)> {
    let tag_text = row.fields.get(1).map(String::as_str).unwrap_or_default();
    let tag = tag_text.parse::<ApplicabilityTag>().map_err(|_| Error::UnrecognizedTag {
        file: file.to_string(),
        line: row.line,
        tag: tag_text.to_string(),
    })?;
    let name = row.fields.first().map(String::as_str).unwrap_or_default();
    Ok((name, tag))
}

/// Rejects rows with a field that was not valid UTF-8.
pub(crate) fn check_encoding(row: &RawRow, file: &str) -> Result<()> {
    match row.undecodable.first() {
        Some(&index) => Err(Error::MalformedValue {
            file: file.to_string(),
            line: row.line,
            column: index + 1,
            value: row.fields[index].clone(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_name(name: &str, row: &RawRow, file: &str) -> Result<()> {
    check_encoding(row, file)?;
    if name.is_empty() {
        return Err(Error::MalformedValue {
            file: file.to_string(),
            line: row.line,
            column: 1,
            value: name.to_string(),
        });
    }
    Ok(())
}

/// Parses `row.fields[from..]` as finite numbers.
pub(crate) fn parse_values(row: &RawRow, from: usize, file: &str) -> Result<Vec<f64>> {
    row.fields
        .iter()
        .enumerate()
        .skip(from)
        .map(|(i, field)| parse_value(field, i, row, file))
        .collect()
}

pub(crate) fn parse_value(field: &str, index: usize, row: &RawRow, file: &str) -> Result<f64> {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::MalformedValue {
            file: file.to_string(),
            line: row.line,
            column: index + 1,
            value: field.to_string(),
        }),
    }
}
