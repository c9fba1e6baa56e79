//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::csp::{DateConstraint, MeetingDomain};
use crate::scheduler::Schedule;
use anyhow::Result;
use itertools::Itertools;
use std::collections::HashSet;
use std::path::Path;

/// Format schedules for display
pub struct ScheduleFormatter;

impl ScheduleFormatter {
    /// Format a single schedule for console output
    pub fn format_schedule(schedule: &Schedule) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Schedule {} ===\n", schedule.metadata.id));
        output.push_str(&format!(
            "Range: {} to {}\n",
            schedule.range_start, schedule.range_end
        ));
        output.push_str(&format!(
            "Solve Time: {:.3}s\n",
            schedule.solve_time.as_secs_f64()
        ));
        output.push_str(&format!(
            "Meetings: {} on {} distinct date(s), spanning {} day(s)\n",
            schedule.metadata.meeting_count,
            schedule.metadata.distinct_dates,
            schedule.metadata.span_days
        ));
        output.push('\n');

        for (meeting, date) in schedule.dates.iter().enumerate() {
            output.push_str(&format!("Meeting {}: {}\n", meeting, date));
        }

        output
    }

    /// Format the constraint set alongside a schedule
    pub fn format_constraints(constraints: &HashSet<DateConstraint>) -> String {
        let mut output = String::new();

        output.push_str(&format!("Constraints ({}):\n", constraints.len()));
        for constraint in constraints.iter().map(|c| c.to_string()).sorted() {
            output.push_str(&format!("  {}\n", constraint));
        }

        output
    }

    /// Format per-meeting domains as a table, one sorted row per meeting
    pub fn format_domains(domains: &[MeetingDomain]) -> String {
        let mut output = String::new();

        output.push_str("Meeting | Size | Candidate dates\n");
        output.push_str("--------|------|----------------\n");

        for (meeting, domain) in domains.iter().enumerate() {
            let dates = domain
                .values
                .iter()
                .sorted()
                .map(|date| date.to_string())
                .join(", ");
            output.push_str(&format!(
                "{:7} | {:4} | {}\n",
                meeting,
                domain.len(),
                if dates.is_empty() { "(empty)" } else { dates.as_str() }
            ));
        }

        output
    }

    /// Save a schedule to the output directory in the configured format
    pub fn save_schedule<P: AsRef<Path>>(
        schedule: &Schedule,
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                let filename = format!("schedule_{}.txt", schedule.metadata.id);
                let content = Self::format_schedule(schedule);
                std::fs::write(output_dir.join(filename), content)?;
            }
            OutputFormat::Json => {
                let filename = format!("schedule_{}.json", schedule.metadata.id);
                schedule.save_to_file(output_dir.join(filename))?;
            }
        }

        Ok(())
    }
}

/// Colored console output helper
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
