//! End-to-end comparison of a plans file against a profiles file.

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::plan::normalize_plans;
use crate::profile::normalize_profiles;
use crate::report::{Ranked, rank};
use crate::score::score_all;
use crate::table::{TableKind, TableSchema, read_table};

/// Reading options shared by both input files.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub intervals: Option<usize>,
    pub header_rows: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            intervals: None,
            header_rows: crate::table::DEFAULT_HEADER_ROWS,
        }
    }
}

#[derive(Debug)]
pub struct Comparison {
    /// Profile name and its plans, cheapest first, in profile name order.
    pub rankings: Vec<(String, Vec<Ranked>)>,
    /// Rows, entities and (profile, plan) pairs left out of the rankings.
    pub rejected: Vec<Error>,
}

/// Reads and normalizes both tables, then ranks every plan for every
/// profile. Both files are fully validated before any score is computed, so
/// a fatal error never leaves partial results behind.
pub fn compare(plans_path: &Path, profiles_path: &Path, options: Options) -> Result<Comparison> {
    let plans_table = read_table(
        plans_path,
        &TableSchema::new(TableKind::Plans)
            .with_header_rows(options.header_rows)
            .with_intervals(options.intervals),
    )?;
    let profiles_table = read_table(
        profiles_path,
        &TableSchema::new(TableKind::Profiles)
            .with_header_rows(options.header_rows)
            .with_intervals(options.intervals),
    )?;

    let plans = normalize_plans(&plans_table)?;
    let profiles = normalize_profiles(&profiles_table)?;
    info!(
        plans = plans.records.len(),
        profiles = profiles.records.len(),
        "Loaded inputs"
    );

    let mut rejected = plans.rejected;
    rejected.extend(profiles.rejected);

    let rankings: Vec<_> = score_all(&plans.records, &profiles.records)
        .into_iter()
        .map(|(profile, scored)| {
            rejected.extend(scored.rejected);
            (profile, rank(&scored.table))
        })
        .collect();

    Ok(Comparison { rankings, rejected })
}
