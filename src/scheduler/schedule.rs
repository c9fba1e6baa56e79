//! Schedule representation for solved calendar problems

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// A complete assignment of one date per meeting, as returned by the solver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Scheduled dates, indexed by meeting
    pub dates: Vec<NaiveDate>,
    /// Start of the allowable date range the schedule was drawn from
    pub range_start: NaiveDate,
    /// End of the allowable date range (inclusive)
    pub range_end: NaiveDate,
    /// Time taken to find this schedule
    #[serde(skip)]
    pub solve_time: Duration,
    /// Derived facts about the schedule
    pub metadata: ScheduleMetadata,
}

/// Derived facts about a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Short identifier derived from the scheduled dates
    pub id: String,
    pub meeting_count: usize,
    /// Number of distinct dates used
    pub distinct_dates: usize,
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    /// Days between the earliest and latest meeting
    pub span_days: i64,
}

impl Schedule {
    /// Create a schedule and derive its metadata
    pub fn new(
        dates: Vec<NaiveDate>,
        range_start: NaiveDate,
        range_end: NaiveDate,
        solve_time: Duration,
    ) -> Self {
        let metadata = ScheduleMetadata::analyze(&dates, range_start);

        Self {
            dates,
            range_start,
            range_end,
            solve_time,
            metadata,
        }
    }

    /// The date assigned to a meeting, if the index is in range
    pub fn date_for(&self, meeting: usize) -> Option<NaiveDate> {
        self.dates.get(meeting).copied()
    }

    /// Whether every scheduled date lies within the allowable range
    pub fn within_range(&self) -> bool {
        self.dates
            .iter()
            .all(|date| *date >= self.range_start && *date <= self.range_end)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

impl ScheduleMetadata {
    /// Derive metadata from a list of scheduled dates
    pub fn analyze(dates: &[NaiveDate], range_start: NaiveDate) -> Self {
        let earliest = dates.iter().min().copied().unwrap_or(range_start);
        let latest = dates.iter().max().copied().unwrap_or(range_start);

        let mut hasher = DefaultHasher::new();
        dates.hash(&mut hasher);

        Self {
            id: format!("{:08x}", hasher.finish() as u32),
            meeting_count: dates.len(),
            distinct_dates: dates.iter().unique().count(),
            earliest,
            latest,
            span_days: (latest - earliest).num_days(),
        }
    }
}
