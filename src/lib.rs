//! Calendar Satisfaction Problem Solver
//!
//! This library schedules n meetings within a bounded date range subject to
//! unary and binary date constraints, using node/arc-consistency filtering
//! and backtracking search.

pub mod config;
pub mod csp;
pub mod scheduler;
pub mod utils;

pub use config::Settings;
pub use csp::{solve, DateConstraint, Operator};
pub use scheduler::{Schedule, SchedulingProblem};

use anyhow::Result;

/// Main entry point for solving calendar scheduling problems
pub fn solve_schedule(settings: Settings) -> Result<Option<Schedule>> {
    let mut problem = SchedulingProblem::new(settings)?;
    problem.solve()
}
