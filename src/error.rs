use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{} does not exist", path.display())]
    MissingFile { path: PathBuf },

    #[error("could not read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("Line {line} in {file} contains an invalid entry in column {column}: {value:?}")]
    MalformedValue {
        file: String,
        line: u64,
        column: usize,
        value: String,
    },

    #[error("Line {line} in {file} has an unrecognized applicability tag {tag:?}")]
    UnrecognizedTag { file: String, line: u64, tag: String },

    #[error("plan {plan:?} never receives its {field}")]
    IncompletePlan { plan: String, field: &'static str },

    #[error("profile {profile:?} never receives its {field}")]
    IncompleteProfile {
        profile: String,
        field: &'static str,
    },

    #[error("plan {plan:?} cannot be scored for profile {profile:?}: {expected} intervals vs {actual}")]
    DimensionMismatch {
        plan: String,
        profile: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("Line {line} in {file} does not have the correct number of entries! ({actual}/{expected})")]
    WrongWidth {
        file: String,
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error("{file} does not have enough rows! ({actual} data rows, at least {expected} required)")]
    TooFewRows {
        file: String,
        expected: usize,
        actual: usize,
    },
}

impl Error {
    /// Whether the error aborts the run. Recoverable errors reject a single
    /// row, entity or (profile, plan) pair.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MalformedValue { .. }
                | Error::IncompletePlan { .. }
                | Error::IncompleteProfile { .. }
                | Error::DimensionMismatch { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
