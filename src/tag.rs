use std::str::FromStr;

use chrono::Weekday;

/// Which days of the week a plan or profile row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicabilityTag {
    All,
    Weekdays,
    Weekends,
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl ApplicabilityTag {
    // Mon-Fri are weekdays, Sat and Sun the weekend.
    pub fn covers(self, day: Weekday) -> bool {
        let weekday = day.num_days_from_monday() < 5;
        match self {
            ApplicabilityTag::All => true,
            ApplicabilityTag::Weekdays => weekday,
            ApplicabilityTag::Weekends => !weekday,
        }
    }

    /// Number of days in one week the tag covers.
    pub fn days_per_week(self) -> usize {
        WEEK.iter().filter(|day| self.covers(**day)).count()
    }
}

/// The unrecognized tag text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl FromStr for ApplicabilityTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "All" => Ok(ApplicabilityTag::All),
            "Weekdays" => Ok(ApplicabilityTag::Weekdays),
            "Weekends" => Ok(ApplicabilityTag::Weekends),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}
