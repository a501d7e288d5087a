//! Plan normalizer: folds tagged plan rows into one [`RateRecord`] per plan.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fold::{DaySplit, Normalized, check_name, parse_value, parse_values, row_head};
use crate::table::{Table, TableKind};

const DAILY_CHARGE_COLUMN: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub daily_charge: f64,
    pub weekday_rates: Vec<f64>,
    pub weekend_rates: Vec<f64>,
}

#[derive(Debug, Default)]
struct PlanBuilder {
    daily_charge: Option<f64>,
    rates: DaySplit,
}

impl PlanBuilder {
    fn build(self, plan: &str) -> Result<RateRecord> {
        let missing = |field| Error::IncompletePlan {
            plan: plan.to_string(),
            field,
        };
        Ok(RateRecord {
            daily_charge: self.daily_charge.ok_or_else(|| missing("daily charge"))?,
            weekday_rates: self.rates.weekday.ok_or_else(|| missing("weekday rates"))?,
            weekend_rates: self.rates.weekend.ok_or_else(|| missing("weekend rates"))?,
        })
    }
}

/// Folds the rows of a plans table.
///
/// Rows with malformed numbers or an empty name are skipped and plans that
/// never receive a daily charge and both rate halves are dropped; both are
/// reported in [`Normalized::rejected`].
///
/// # Errors
///
/// Returns [`Error::UnrecognizedTag`] if any row carries a tag other than
/// `All`, `Weekdays` or `Weekends`.
pub fn normalize_plans(table: &Table) -> Result<Normalized<RateRecord>> {
    let file = table.source.as_str();
    let mut out = Normalized::new();
    let mut builders: BTreeMap<String, PlanBuilder> = BTreeMap::new();

    for row in &table.rows {
        let (name, tag) = row_head(row, file)?;

        let parsed = check_name(name, row, file).and_then(|_| {
            let charge_text = row
                .fields
                .get(DAILY_CHARGE_COLUMN)
                .map(String::as_str)
                .unwrap_or_default();
            let charge = parse_value(charge_text, DAILY_CHARGE_COLUMN, row, file)?;
            let rates = parse_values(row, TableKind::Plans.fixed_columns(), file)?;
            Ok((charge, rates))
        });
        let (charge, rates) = match parsed {
            Ok(values) => values,
            Err(err) => {
                out.reject(err);
                continue;
            }
        };

        let builder = builders.entry(name.to_string()).or_default();
        builder.daily_charge = Some(charge);
        builder.rates.apply(tag, rates);
    }

    for (plan, builder) in builders {
        match builder.build(&plan) {
            Ok(record) => {
                out.records.insert(plan, record);
            }
            Err(err) => out.reject(err),
        }
    }

    debug!(file, plans = out.records.len(), rejected = out.rejected.len(), "Normalized plans");
    Ok(out)
}
