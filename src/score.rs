//! Weekly cost of every plan under one profile.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Error;
use crate::plan::RateRecord;
use crate::profile::UsageRecord;
use crate::tag::ApplicabilityTag;

/// Plan name to weekly cost, for one profile.
pub type ScoreTable = BTreeMap<String, f64>;

/// Multipliers applied to the daily charge and to one sampled day of usage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub days_billed: f64,
    pub weekday: f64,
    pub weekend: f64,
}

impl Weights {
    /// One calendar week: 7 billed days, 5 weekdays, 2 weekend days.
    pub fn week() -> Self {
        Self {
            days_billed: ApplicabilityTag::All.days_per_week() as f64,
            weekday: ApplicabilityTag::Weekdays.days_per_week() as f64,
            weekend: ApplicabilityTag::Weekends.days_per_week() as f64,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scored {
    pub table: ScoreTable,
    pub rejected: Vec<Error>,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Checks that both rate halves and both usage halves have the same length.
fn check_dimensions(plan: &str, profile: &str, rates: &RateRecord, usage: &UsageRecord) -> Result<(), Error> {
    let expected = rates.weekday_rates.len();
    let lengths = [
        rates.weekend_rates.len(),
        usage.weekday_usage.len(),
        usage.weekend_usage.len(),
    ];
    match lengths.into_iter().find(|&len| len != expected) {
        Some(actual) => Err(Error::DimensionMismatch {
            plan: plan.to_string(),
            profile: profile.to_string(),
            expected,
            actual,
        }),
        None => Ok(()),
    }
}

/// Weekly cost of one plan. Lengths must already agree.
///
/// Weekend rates are applied to the weekday usage vector; weekend usage is
/// not used.
pub fn plan_cost(rates: &RateRecord, usage: &UsageRecord, weights: &Weights) -> f64 {
    weights.days_billed * rates.daily_charge
        + weights.weekday * dot(&rates.weekday_rates, &usage.weekday_usage)
        + weights.weekend * dot(&rates.weekend_rates, &usage.weekday_usage)
}

/// Scores every plan against `profile`. Plans whose interval count differs
/// from the profile's are left out and reported in [`Scored::rejected`].
pub fn score_profile(
    plans: &BTreeMap<String, RateRecord>,
    profile_name: &str,
    profile: &UsageRecord,
) -> Scored {
    let weights = Weights::week();
    let mut scored = Scored::default();

    for (plan, rates) in plans {
        if let Err(err) = check_dimensions(plan, profile_name, rates, profile) {
            warn!("{err}");
            scored.rejected.push(err);
            continue;
        }
        scored
            .table
            .insert(plan.clone(), plan_cost(rates, profile, &weights));
    }

    debug!(profile = profile_name, plans = scored.table.len(), "Scored profile");
    scored
}

/// Scores each profile independently.
pub fn score_all(
    plans: &BTreeMap<String, RateRecord>,
    profiles: &BTreeMap<String, UsageRecord>,
) -> BTreeMap<String, Scored> {
    profiles
        .iter()
        .map(|(name, usage)| (name.clone(), score_profile(plans, name, usage)))
        .collect()
}
