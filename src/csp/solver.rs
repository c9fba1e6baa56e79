//! Solver facade tying domain generation, filtering, and search together

use super::constraint::DateConstraint;
use super::domain::generate_domains;
use super::filtering::{arc_consistency, node_consistency};
use super::search::backtracking_search;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// How much domain filtering runs before search. Search alone is still
/// correct, just slower; node consistency always precedes arc consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilteringLevel {
    /// Search the raw domains without any propagation
    None,
    /// Unary pruning only
    NodeOnly,
    /// Node consistency followed by AC-3
    Full,
}

/// Result classification of a solve run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResultType {
    Satisfiable,
    Unsatisfiable,
    /// The solver has not run yet
    Unknown,
}

/// Statistics about one solve run
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub meetings: usize,
    pub unary_constraints: usize,
    pub binary_constraints: usize,
    /// Dates per domain before filtering
    pub initial_domain_size: usize,
    /// Dates per domain after filtering, indexed by meeting
    pub filtered_domain_sizes: Vec<usize>,
    pub nodes_explored: usize,
    pub backtracks: usize,
    pub solve_time: Duration,
    pub result: SolverResultType,
}

/// Backtracking CSP solver for meeting scheduling over a bounded date range.
/// Each solve call owns its own domain store; the constraint set is read-only
/// input throughout.
pub struct CspSolver {
    meetings: usize,
    range_start: NaiveDate,
    range_end: NaiveDate,
    filtering: FilteringLevel,
    statistics: SolverStatistics,
}

impl CspSolver {
    /// Create a solver for `meetings` variables over the inclusive date range
    pub fn new(meetings: usize, range_start: NaiveDate, range_end: NaiveDate) -> Self {
        Self {
            meetings,
            range_start,
            range_end,
            filtering: FilteringLevel::Full,
            statistics: SolverStatistics {
                meetings,
                unary_constraints: 0,
                binary_constraints: 0,
                initial_domain_size: 0,
                filtered_domain_sizes: Vec::new(),
                nodes_explored: 0,
                backtracks: 0,
                solve_time: Duration::from_secs(0),
                result: SolverResultType::Unknown,
            },
        }
    }

    /// Override the filtering level (defaults to `Full`)
    pub fn with_filtering(mut self, filtering: FilteringLevel) -> Self {
        self.filtering = filtering;
        self
    }

    /// Find one date per meeting satisfying every constraint, or `Ok(None)`
    /// when no assignment exists. Fails fast on contract violations instead
    /// of producing silent wrong output.
    pub fn solve(
        &mut self,
        constraints: &HashSet<DateConstraint>,
    ) -> Result<Option<Vec<NaiveDate>>> {
        self.validate_inputs(constraints)?;
        let start_time = Instant::now();

        self.statistics.unary_constraints =
            constraints.iter().filter(|c| c.arity() == 1).count();
        self.statistics.binary_constraints =
            constraints.iter().filter(|c| c.arity() == 2).count();

        let mut domains = generate_domains(self.meetings, self.range_start, self.range_end);
        self.statistics.initial_domain_size = domains.first().map_or(0, |d| d.len());

        match self.filtering {
            FilteringLevel::None => {}
            FilteringLevel::NodeOnly => node_consistency(&mut domains, constraints),
            FilteringLevel::Full => {
                node_consistency(&mut domains, constraints);
                arc_consistency(&mut domains, constraints);
            }
        }
        self.statistics.filtered_domain_sizes = domains.iter().map(|d| d.len()).collect();

        // An emptied domain already proves unsatisfiability; search would
        // only rediscover it exhaustively.
        if domains.iter().any(|d| d.is_empty()) {
            self.statistics.result = SolverResultType::Unsatisfiable;
            self.statistics.solve_time = start_time.elapsed();
            return Ok(None);
        }

        let outcome = backtracking_search(&domains, constraints);

        self.statistics.nodes_explored = outcome.nodes_explored;
        self.statistics.backtracks = outcome.backtracks;
        self.statistics.solve_time = start_time.elapsed();
        self.statistics.result = match outcome.assignment {
            Some(_) => SolverResultType::Satisfiable,
            None => SolverResultType::Unsatisfiable,
        };

        Ok(outcome.assignment)
    }

    /// Statistics from the most recent solve run
    pub fn statistics(&self) -> SolverStatistics {
        self.statistics.clone()
    }

    fn validate_inputs(&self, constraints: &HashSet<DateConstraint>) -> Result<()> {
        if self.meetings == 0 {
            anyhow::bail!("Cannot schedule zero meetings");
        }
        if self.range_end < self.range_start {
            anyhow::bail!(
                "Scheduling range is inverted: {} to {}",
                self.range_start,
                self.range_end
            );
        }
        for constraint in constraints {
            let max_index = constraint.max_meeting_index();
            if max_index >= self.meetings {
                anyhow::bail!(
                    "Constraint '{}' references meeting {} but only {} meeting(s) are being scheduled",
                    constraint,
                    max_index,
                    self.meetings
                );
            }
        }
        Ok(())
    }
}

/// Single-call entry point: schedule `meetings` dates within the inclusive
/// range so that every constraint holds, or return `Ok(None)` when no such
/// schedule exists.
pub fn solve(
    meetings: usize,
    range_start: NaiveDate,
    range_end: NaiveDate,
    constraints: &HashSet<DateConstraint>,
) -> Result<Option<Vec<NaiveDate>>> {
    CspSolver::new(meetings, range_start, range_end).solve(constraints)
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Meetings: {}", self.meetings)?;
        writeln!(
            f,
            "  Constraints: {} unary, {} binary",
            self.unary_constraints, self.binary_constraints
        )?;
        writeln!(f, "  Initial domain size: {}", self.initial_domain_size)?;
        writeln!(
            f,
            "  Filtered domain sizes: {:?}",
            self.filtered_domain_sizes
        )?;
        writeln!(f, "  Nodes explored: {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Result: {:?}", self.result)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::constraint::Operator;
    use crate::csp::search::satisfies_all;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn constraint_set(constraints: Vec<DateConstraint>) -> HashSet<DateConstraint> {
        constraints.into_iter().collect()
    }

    #[test]
    fn test_single_meeting_forced_date() {
        let constraints = constraint_set(vec![DateConstraint::unary(
            0,
            Operator::Eq,
            date(2022, 1, 3),
        )]);

        let solution = solve(1, date(2022, 1, 1), date(2022, 1, 5), &constraints).unwrap();
        assert_eq!(solution, Some(vec![date(2022, 1, 3)]));
    }

    #[test]
    fn test_forced_date_outside_range_is_unsatisfiable() {
        let constraints = constraint_set(vec![DateConstraint::unary(
            0,
            Operator::Eq,
            date(2022, 1, 6),
        )]);

        let solution = solve(1, date(2022, 1, 1), date(2022, 1, 5), &constraints).unwrap();
        assert_eq!(solution, None);
    }

    #[test]
    fn test_strict_after_constraint() {
        let constraints = constraint_set(vec![DateConstraint::unary(
            0,
            Operator::Gt,
            date(2022, 1, 3),
        )]);

        let solution = solve(1, date(2022, 1, 1), date(2022, 1, 5), &constraints)
            .unwrap()
            .unwrap();
        assert!(satisfies_all(&constraints, &solution));
    }

    #[test]
    fn test_two_meetings_may_share_a_date() {
        let constraints = constraint_set(vec![
            DateConstraint::unary(0, Operator::Gt, date(2022, 1, 3)),
            DateConstraint::unary(1, Operator::Gt, date(2022, 1, 3)),
        ]);

        let solution = solve(2, date(2022, 1, 1), date(2022, 1, 5), &constraints)
            .unwrap()
            .unwrap();
        assert!(satisfies_all(&constraints, &solution));
    }

    #[test]
    fn test_distinct_dates_in_tight_window() {
        let constraints = constraint_set(vec![
            DateConstraint::unary(0, Operator::Le, date(2022, 1, 2)),
            DateConstraint::unary(1, Operator::Le, date(2022, 1, 2)),
            DateConstraint::binary(0, Operator::Ne, 1).unwrap(),
        ]);

        let solution = solve(2, date(2022, 1, 1), date(2022, 1, 5), &constraints)
            .unwrap()
            .unwrap();
        assert!(satisfies_all(&constraints, &solution));
    }

    #[test]
    fn test_pigeonhole_unsatisfiable() {
        let constraints = constraint_set(vec![
            DateConstraint::binary(0, Operator::Ne, 1).unwrap(),
            DateConstraint::binary(0, Operator::Ne, 2).unwrap(),
            DateConstraint::binary(1, Operator::Ne, 2).unwrap(),
        ]);

        let solution = solve(3, date(2022, 1, 1), date(2022, 1, 2), &constraints).unwrap();
        assert_eq!(solution, None);
    }

    #[test]
    fn test_pigeonhole_boundary_satisfiable() {
        let constraints = constraint_set(vec![
            DateConstraint::binary(0, Operator::Ne, 1).unwrap(),
            DateConstraint::binary(0, Operator::Ne, 2).unwrap(),
            DateConstraint::binary(1, Operator::Ne, 2).unwrap(),
        ]);

        let solution = solve(3, date(2022, 1, 1), date(2022, 1, 3), &constraints)
            .unwrap()
            .unwrap();
        assert!(satisfies_all(&constraints, &solution));
    }

    #[test]
    fn test_ordering_cycle_short_circuits_before_search() {
        let constraints = constraint_set(vec![
            DateConstraint::binary(0, Operator::Lt, 1).unwrap(),
            DateConstraint::binary(1, Operator::Lt, 2).unwrap(),
            DateConstraint::binary(2, Operator::Lt, 0).unwrap(),
        ]);

        let mut solver = CspSolver::new(3, date(2022, 1, 1), date(2022, 1, 2));
        let solution = solver.solve(&constraints).unwrap();
        let stats = solver.statistics();

        assert_eq!(solution, None);
        assert_eq!(stats.result, SolverResultType::Unsatisfiable);
        assert_eq!(stats.filtered_domain_sizes, vec![0, 0, 0]);
        // Filtering alone proved unsatisfiability
        assert_eq!(stats.nodes_explored, 0);
    }

    #[test]
    fn test_five_meeting_chain() {
        let constraints = constraint_set(vec![
            DateConstraint::binary(0, Operator::Ne, 1).unwrap(),
            DateConstraint::binary(1, Operator::Eq, 2).unwrap(),
            DateConstraint::binary(2, Operator::Ne, 3).unwrap(),
            DateConstraint::binary(3, Operator::Eq, 4).unwrap(),
            DateConstraint::binary(4, Operator::Lt, 0).unwrap(),
            DateConstraint::binary(3, Operator::Gt, 2).unwrap(),
        ]);

        let solution = solve(5, date(2022, 1, 1), date(2022, 1, 3), &constraints)
            .unwrap()
            .unwrap();
        assert!(satisfies_all(&constraints, &solution));
    }

    #[test]
    fn test_wide_range_needs_filtering_to_stay_tractable() {
        let constraints = constraint_set(vec![
            DateConstraint::unary(0, Operator::Gt, date(2022, 1, 1)),
            DateConstraint::unary(1, Operator::Gt, date(2022, 2, 1)),
            DateConstraint::unary(2, Operator::Gt, date(2022, 3, 1)),
            DateConstraint::unary(3, Operator::Gt, date(2022, 4, 1)),
            DateConstraint::unary(4, Operator::Gt, date(2022, 5, 1)),
            DateConstraint::binary(0, Operator::Gt, 4).unwrap(),
            DateConstraint::binary(1, Operator::Gt, 3).unwrap(),
            DateConstraint::binary(2, Operator::Ne, 3).unwrap(),
            DateConstraint::binary(4, Operator::Ne, 0).unwrap(),
            DateConstraint::binary(3, Operator::Gt, 2).unwrap(),
        ]);

        let solution = solve(5, date(2022, 1, 1), date(2022, 6, 30), &constraints)
            .unwrap()
            .unwrap();
        assert!(satisfies_all(&constraints, &solution));
    }

    #[test]
    fn test_zero_meetings_is_a_contract_violation() {
        let constraints = HashSet::new();
        let result = solve(0, date(2022, 1, 1), date(2022, 1, 5), &constraints);
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_range_is_a_contract_violation() {
        let constraints = HashSet::new();
        let result = solve(1, date(2022, 1, 5), date(2022, 1, 1), &constraints);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_bounds_constraint_index_fails_fast() {
        let constraints =
            constraint_set(vec![DateConstraint::binary(0, Operator::Lt, 5).unwrap()]);
        let result = solve(2, date(2022, 1, 1), date(2022, 1, 5), &constraints);

        let message = result.unwrap_err().to_string();
        assert!(message.contains("meeting 5"));
    }

    #[test]
    fn test_filtering_levels_agree_on_satisfiability() {
        let constraints = constraint_set(vec![
            DateConstraint::unary(0, Operator::Ge, date(2022, 1, 2)),
            DateConstraint::binary(0, Operator::Lt, 1).unwrap(),
        ]);

        for level in [
            FilteringLevel::None,
            FilteringLevel::NodeOnly,
            FilteringLevel::Full,
        ] {
            let mut solver =
                CspSolver::new(2, date(2022, 1, 1), date(2022, 1, 5)).with_filtering(level);
            let solution = solver.solve(&constraints).unwrap().unwrap();
            assert!(satisfies_all(&constraints, &solution));
        }
    }

    #[test]
    fn test_statistics_reflect_filtering() {
        let constraints =
            constraint_set(vec![DateConstraint::binary(0, Operator::Lt, 1).unwrap()]);
        let mut solver = CspSolver::new(2, date(2022, 1, 1), date(2022, 1, 5));

        solver.solve(&constraints).unwrap();
        let stats = solver.statistics();

        assert_eq!(stats.meetings, 2);
        assert_eq!(stats.binary_constraints, 1);
        assert_eq!(stats.initial_domain_size, 5);
        assert_eq!(stats.filtered_domain_sizes, vec![4, 4]);
        assert_eq!(stats.result, SolverResultType::Satisfiable);
    }
}
