//! Candidate-date domains for meeting variables

use chrono::NaiveDate;
use std::collections::HashSet;

/// The set of dates still considered possible for one meeting. Domains only
/// shrink after creation; filtering and search never add values back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDomain {
    pub values: HashSet<NaiveDate>,
}

impl MeetingDomain {
    /// Every date from `range_start` to `range_end` inclusive. An inverted
    /// range yields an empty domain rather than an error.
    pub fn new(range_start: NaiveDate, range_end: NaiveDate) -> Self {
        let mut values = HashSet::new();
        let mut date = range_start;
        while date <= range_end {
            values.insert(date);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        Self { values }
    }

    /// Number of candidate dates remaining
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no candidate dates remain
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `date` is still a candidate
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.values.contains(&date)
    }
}

/// Build one domain per meeting over the same date range, indexed by meeting
/// position. Arcs and constraints refer to domains only through these indices.
pub fn generate_domains(
    meetings: usize,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<MeetingDomain> {
    (0..meetings)
        .map(|_| MeetingDomain::new(range_start, range_end))
        .collect()
}
