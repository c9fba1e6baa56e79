//! Backtracking search with forward constraint checking

use super::constraint::DateConstraint;
use super::domain::MeetingDomain;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Outcome of a backtracking run, with exploration counters
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// A complete, verified assignment, or `None` when the search space is exhausted
    pub assignment: Option<Vec<NaiveDate>>,
    /// Candidate extensions attempted across all depths
    pub nodes_explored: usize,
    /// Candidate extensions retracted after a dead end
    pub backtracks: usize,
}

/// Assign meetings in index order, trying each remaining domain value and
/// forward-checking every fully-bound constraint before recursing. Recursion
/// depth is bounded by the number of meetings. The domains are read-only:
/// retracting the tentative assignment is the only undo a branch needs.
pub fn backtracking_search(
    domains: &[MeetingDomain],
    constraints: &HashSet<DateConstraint>,
) -> SearchOutcome {
    let mut partial = Vec::with_capacity(domains.len());
    let mut nodes_explored = 0;
    let mut backtracks = 0;

    let assignment = extend(
        &mut partial,
        domains,
        constraints,
        &mut nodes_explored,
        &mut backtracks,
    );

    SearchOutcome {
        assignment,
        nodes_explored,
        backtracks,
    }
}

fn extend(
    partial: &mut Vec<NaiveDate>,
    domains: &[MeetingDomain],
    constraints: &HashSet<DateConstraint>,
    nodes_explored: &mut usize,
    backtracks: &mut usize,
) -> Option<Vec<NaiveDate>> {
    if partial.len() == domains.len() {
        // Full verification pass, independent of the partial checks that
        // guarded the way down.
        if satisfies_all(constraints, partial) {
            return Some(partial.clone());
        }
        return None;
    }

    let next = partial.len();
    for &candidate in &domains[next].values {
        partial.push(candidate);
        *nodes_explored += 1;

        if is_partially_consistent(constraints, partial) {
            if let Some(complete) = extend(partial, domains, constraints, nodes_explored, backtracks)
            {
                return Some(complete);
            }
        }

        partial.pop();
        *backtracks += 1;
    }

    None
}

/// Forward check: no fully-bound constraint may be violated. Constraints
/// still referencing unassigned meetings are skipped.
fn is_partially_consistent(
    constraints: &HashSet<DateConstraint>,
    partial: &[NaiveDate],
) -> bool {
    constraints
        .iter()
        .all(|constraint| constraint.evaluate_on(partial) != Some(false))
}

/// Whether a complete assignment satisfies every constraint in the set
pub fn satisfies_all(constraints: &HashSet<DateConstraint>, assignment: &[NaiveDate]) -> bool {
    constraints
        .iter()
        .all(|constraint| constraint.evaluate_on(assignment) == Some(true))
}
