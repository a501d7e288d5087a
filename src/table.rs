//! CSV row reader for the plans and profiles tables.
//!
//! Splits each line into trimmed fields and enforces a fixed column count
//! and a minimum number of data rows. Field values are left as strings for
//! the normalizers to interpret.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result, SchemaViolation};

pub const DEFAULT_HEADER_ROWS: usize = 1;
const MIN_DATA_ROWS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Plans,
    Profiles,
}

impl TableKind {
    /// Columns preceding the per-interval values.
    pub fn fixed_columns(self) -> usize {
        match self {
            // name, tag, daily charge
            TableKind::Plans => 3,
            // name, tag
            TableKind::Profiles => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub kind: TableKind,
    pub header_rows: usize,
    /// Intervals per day. `None` takes the width of the first line.
    pub intervals: Option<usize>,
}

impl TableSchema {
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            header_rows: DEFAULT_HEADER_ROWS,
            intervals: None,
        }
    }

    pub fn with_intervals(mut self, intervals: Option<usize>) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    fn expected_columns(&self) -> Option<usize> {
        self.intervals.map(|n| n + self.kind.fixed_columns())
    }
}

/// One data line of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub fields: Vec<String>,
    /// 0-based indices of fields that were not valid UTF-8. Their text in
    /// `fields` is lossily decoded.
    pub undecodable: Vec<usize>,
}

impl RawRow {
    pub fn new<I, S>(line: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
            undecodable: Vec::new(),
        }
    }

    fn from_bytes(line: u64, record: &ByteRecord) -> Self {
        let mut undecodable = Vec::new();
        let fields = record
            .iter()
            .enumerate()
            .map(|(i, bytes)| match std::str::from_utf8(bytes) {
                Ok(text) => text.to_string(),
                Err(_) => {
                    undecodable.push(i);
                    String::from_utf8_lossy(bytes).into_owned()
                }
            })
            .collect();
        Self {
            line,
            fields,
            undecodable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    /// File name used in diagnostics.
    pub source: String,
    pub rows: Vec<RawRow>,
}

impl Table {
    pub fn new(source: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            source: source.into(),
            rows,
        }
    }
}

/// Reads a whole table from `path`. The file is closed before returning.
pub fn read_table(path: &Path, schema: &TableSchema) -> Result<Table> {
    if !path.exists() {
        return Err(Error::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::Read {
        file: source.clone(),
        source: e.into(),
    })?;
    read_rows(BufReader::new(file), source, schema)
}

pub fn read_rows<R: Read>(reader: R, source: impl Into<String>, schema: &TableSchema) -> Result<Table> {
    let source = source.into();
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut expected = schema.expected_columns();
    let mut rows = Vec::new();

    for (index, result) in csv_reader.byte_records().enumerate() {
        let record = result.map_err(|e| Error::Read {
            file: source.clone(),
            source: e,
        })?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);
        let width = *expected.get_or_insert(record.len());

        if index < schema.header_rows {
            continue;
        }
        if record.len() != width {
            return Err(SchemaViolation::WrongWidth {
                file: source,
                line,
                expected: width,
                actual: record.len(),
            }
            .into());
        }
        rows.push(RawRow::from_bytes(line, &record));
    }

    if rows.len() < MIN_DATA_ROWS {
        return Err(SchemaViolation::TooFewRows {
            file: source,
            expected: MIN_DATA_ROWS,
            actual: rows.len(),
        }
        .into());
    }

    debug!(file = %source, rows = rows.len(), columns = ?expected, "Read table");
    Ok(Table::new(source, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans_schema() -> TableSchema {
        TableSchema::new(TableKind::Plans)
    }

    #[test]
    fn test_reads_rows_after_header() {
        let data = "name,days,daily,h1,h2\nFlat,All,1.0,0.3,0.3\nPeak,Weekdays, 0.9 ,0.5,0.2\n";
        let table = read_rows(data.as_bytes(), "plans.csv", &plans_schema()).unwrap();

        assert_eq!(table.source, "plans.csv");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], RawRow::new(2, ["Flat", "All", "1.0", "0.3", "0.3"]));
        // fields are trimmed
        assert_eq!(table.rows[1].fields[2], "0.9");
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_wrong_width_is_schema_violation() {
        let data = "name,days,daily,h1,h2\nFlat,All,1.0,0.3\n";
        let err = read_rows(data.as_bytes(), "plans.csv", &plans_schema()).unwrap_err();

        match err {
            Error::Schema(v) => assert_eq!(
                v,
                SchemaViolation::WrongWidth {
                    file: "plans.csv".into(),
                    line: 2,
                    expected: 5,
                    actual: 4,
                }
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_intervals_override_header_width() {
        let data = "name,days,h1\nHouse,All,1.0,2.0\n";
        let schema = TableSchema::new(TableKind::Profiles).with_intervals(Some(2));
        let table = read_rows(data.as_bytes(), "profiles.csv", &schema).unwrap();
        assert_eq!(table.rows[0].fields.len(), 4);

        let schema = TableSchema::new(TableKind::Profiles).with_intervals(Some(3));
        assert!(read_rows(data.as_bytes(), "profiles.csv", &schema).is_err());
    }

    #[test]
    fn test_header_only_file_has_too_few_rows() {
        let data = "name,days,daily,h1\n";
        let err = read_rows(data.as_bytes(), "plans.csv", &plans_schema()).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaViolation::TooFewRows { actual: 0, .. })
        ));
    }

    #[test]
    fn test_quotes_are_not_special() {
        let data = "name,days,daily,h1\n\"Flat\",All,1.0,0.3\n";
        let table = read_rows(data.as_bytes(), "plans.csv", &plans_schema()).unwrap();
        assert_eq!(table.rows[0].fields[0], "\"Flat\"");
    }

    #[test]
    fn test_invalid_utf8_field_is_kept() {
        let data = b"name,days,daily,h1\nFlat,All,1.0,0.3\nBad,All,1.0,0.\xFF\n";
        let table = read_rows(&data[..], "plans.csv", &plans_schema()).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].undecodable.is_empty());
        assert_eq!(table.rows[1].undecodable, vec![3]);
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_missing_file() {
        let err = read_table(Path::new("does/not/exist.csv"), &plans_schema()).unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
        assert!(err.is_fatal());
    }
}
