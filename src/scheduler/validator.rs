//! Independent verification of solved schedules

use crate::config::Settings;
use crate::csp::DateConstraint;
use anyhow::Result;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashSet;

/// Re-checks a schedule against the full constraint set, independently of
/// whatever pruning the solver did on the way to it
pub struct ScheduleValidator {
    settings: Settings,
}

/// Result of schedule validation
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub violations: Vec<ConstraintViolation>,
    pub checked_constraints: usize,
    pub error_message: Option<String>,
}

/// A constraint the schedule fails to satisfy
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub constraint: DateConstraint,
    pub description: String,
}

impl ScheduleValidator {
    /// Create a new schedule validator
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Validate scheduled dates against the constraint set. Checks the
    /// meeting count, range membership of every date, and every constraint.
    pub fn validate(
        &self,
        dates: &[NaiveDate],
        constraints: &HashSet<DateConstraint>,
    ) -> Result<ValidationReport> {
        let expected = self.settings.scheduling.meetings;
        if dates.len() != expected {
            return Ok(ValidationReport {
                is_valid: false,
                violations: Vec::new(),
                checked_constraints: 0,
                error_message: Some(format!(
                    "Schedule has {} date(s) but {} meeting(s) were requested",
                    dates.len(),
                    expected
                )),
            });
        }

        let range_start = self.settings.scheduling.range_start;
        let range_end = self.settings.scheduling.range_end;
        if let Some((meeting, date)) = dates
            .iter()
            .enumerate()
            .find(|(_, date)| **date < range_start || **date > range_end)
        {
            return Ok(ValidationReport {
                is_valid: false,
                violations: Vec::new(),
                checked_constraints: 0,
                error_message: Some(format!(
                    "Meeting {} is scheduled on {} outside the range {} to {}",
                    meeting, date, range_start, range_end
                )),
            });
        }

        // Constraints are independent of each other, so they are checked in
        // parallel; the engine itself stays sequential.
        let mut violations: Vec<ConstraintViolation> = constraints
            .par_iter()
            .filter(|constraint| constraint.evaluate_on(dates) != Some(true))
            .map(|constraint| ConstraintViolation {
                constraint: *constraint,
                description: describe_violation(constraint, dates),
            })
            .collect();
        violations.sort_by_key(|violation| violation.description.clone());

        let is_valid = violations.is_empty();
        let error_message = if is_valid {
            None
        } else {
            Some(format!(
                "{} constraint(s) violated; first: {}",
                violations.len(),
                violations[0].description
            ))
        };

        Ok(ValidationReport {
            is_valid,
            violations,
            checked_constraints: constraints.len(),
            error_message,
        })
    }

    /// Quick check that every constraint holds, without violation details
    pub fn quick_validate(
        &self,
        dates: &[NaiveDate],
        constraints: &HashSet<DateConstraint>,
    ) -> bool {
        dates.len() == self.settings.scheduling.meetings
            && crate::csp::satisfies_all(constraints, dates)
    }
}

fn describe_violation(constraint: &DateConstraint, dates: &[NaiveDate]) -> String {
    match constraint {
        DateConstraint::Unary(unary) => match dates.get(unary.meeting) {
            Some(assigned) => format!(
                "meeting {} on {} violates '{}'",
                unary.meeting, assigned, constraint
            ),
            None => format!("meeting {} is unscheduled for '{}'", unary.meeting, constraint),
        },
        DateConstraint::Binary(binary) => {
            match (dates.get(binary.left), dates.get(binary.right)) {
                (Some(left), Some(right)) => format!(
                    "meetings {} on {} and {} on {} violate '{}'",
                    binary.left, left, binary.right, right, constraint
                ),
                _ => format!("a meeting is unscheduled for '{}'", constraint),
            }
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Validation Result: {}",
            if self.is_valid { "VALID" } else { "INVALID" }
        )?;
        writeln!(f, "Constraints checked: {}", self.checked_constraints)?;
        writeln!(f, "Violations: {}", self.violations.len())?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }
        for violation in &self.violations {
            writeln!(f, "  - {}", violation.description)?;
        }

        Ok(())
    }
}
