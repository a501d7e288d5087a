//! Profile normalizer: folds tagged usage rows into one [`UsageRecord`] per
//! household profile.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fold::{DaySplit, Normalized, check_name, parse_values, row_head};
use crate::table::{Table, TableKind};

#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub weekday_usage: Vec<f64>,
    pub weekend_usage: Vec<f64>,
}

impl UsageRecord {
    fn build(usage: DaySplit, profile: &str) -> Result<Self> {
        let missing = |field| Error::IncompleteProfile {
            profile: profile.to_string(),
            field,
        };
        Ok(UsageRecord {
            weekday_usage: usage.weekday.ok_or_else(|| missing("weekday usage"))?,
            weekend_usage: usage.weekend.ok_or_else(|| missing("weekend usage"))?,
        })
    }
}

/// Folds the rows of a profiles table. Same rules as
/// [`normalize_plans`](crate::plan::normalize_plans) without the daily charge.
pub fn normalize_profiles(table: &Table) -> Result<Normalized<UsageRecord>> {
    let file = table.source.as_str();
    let mut out = Normalized::new();
    let mut builders: BTreeMap<String, DaySplit> = BTreeMap::new();

    for row in &table.rows {
        let (name, tag) = row_head(row, file)?;

        let usage = check_name(name, row, file)
            .and_then(|_| parse_values(row, TableKind::Profiles.fixed_columns(), file));
        match usage {
            Ok(usage) => builders.entry(name.to_string()).or_default().apply(tag, usage),
            Err(err) => out.reject(err),
        }
    }

    for (profile, usage) in builders {
        match UsageRecord::build(usage, &profile) {
            Ok(record) => {
                out.records.insert(profile, record);
            }
            Err(err) => out.reject(err),
        }
    }

    debug!(file, profiles = out.records.len(), rejected = out.rejected.len(), "Normalized profiles");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawRow;

    fn table(rows: Vec<RawRow>) -> Table {
        Table::new("profiles.csv", rows)
    }

    #[test]
    fn test_split_profile() {
        let profiles = normalize_profiles(&table(vec![
            RawRow::new(2, ["House1", "Weekdays", "10.0", "2.0"]),
            RawRow::new(3, ["House1", "Weekends", "4.0", "6.0"]),
            RawRow::new(4, ["Flat", "All", "1.0", "1.5"]),
        ]))
        .unwrap();

        assert!(profiles.rejected.is_empty());
        let house = &profiles.records["House1"];
        assert_eq!(house.weekday_usage, vec![10.0, 2.0]);
        assert_eq!(house.weekend_usage, vec![4.0, 6.0]);
        let flat = &profiles.records["Flat"];
        assert_eq!(flat.weekday_usage, flat.weekend_usage);
    }

    #[test]
    fn test_malformed_usage_row_is_skipped() {
        let profiles = normalize_profiles(&table(vec![
            RawRow::new(2, ["House1", "All", "10.0", "2.0"]),
            RawRow::new(3, ["House1", "Weekends", "n/a", "6.0"]),
        ]))
        .unwrap();

        let house = &profiles.records["House1"];
        assert_eq!(house.weekend_usage, vec![10.0, 2.0]);
        assert!(matches!(
            profiles.rejected[0],
            Error::MalformedValue { line: 3, column: 3, .. }
        ));
    }

    #[test]
    fn test_incomplete_profile_is_dropped() {
        let profiles = normalize_profiles(&table(vec![RawRow::new(
            2,
            ["Weekender", "Weekends", "1.0", "1.0"],
        )]))
        .unwrap();

        assert!(profiles.records.is_empty());
        assert!(matches!(
            profiles.rejected[0],
            Error::IncompleteProfile { field: "weekday usage", .. }
        ));
    }

    #[test]
    fn test_unrecognized_tag_aborts() {
        let err = normalize_profiles(&table(vec![RawRow::new(2, ["House1", "Mondays", "1.0"])]))
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedTag { .. }));
    }
}
