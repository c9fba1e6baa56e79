//! Scheduling problem definition and solve orchestration

use super::{Schedule, ScheduleValidator};
use crate::config::Settings;
use crate::csp::{
    arc_consistency, generate_domains, load_constraints_from_file, node_consistency, CspSolver,
    DateConstraint, FilteringLevel, MeetingDomain, SolverStatistics,
};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Instant;

/// A calendar scheduling problem: meetings, a date range, and a constraint set
pub struct SchedulingProblem {
    settings: Settings,
    constraints: HashSet<DateConstraint>,
    validator: ScheduleValidator,
    solver_statistics: Option<SolverStatistics>,
}

impl SchedulingProblem {
    /// Create a new problem from settings, loading the constraint file
    pub fn new(settings: Settings) -> Result<Self> {
        let constraints = load_constraints_from_file(&settings.input.constraints_file)
            .context("Failed to load constraints file")?;

        Ok(Self::with_constraints(settings, constraints))
    }

    /// Create a problem with an explicit constraint set (useful for testing)
    pub fn with_constraints(settings: Settings, constraints: HashSet<DateConstraint>) -> Self {
        let validator = ScheduleValidator::new(settings.clone());

        Self {
            settings,
            constraints,
            validator,
            solver_statistics: None,
        }
    }

    /// Solve the problem, returning a validated schedule or `None` when no
    /// schedule can satisfy the constraints
    pub fn solve(&mut self) -> Result<Option<Schedule>> {
        let start_time = Instant::now();
        let scheduling = &self.settings.scheduling;

        println!(
            "Scheduling {} meeting(s) between {} and {}...",
            scheduling.meetings, scheduling.range_start, scheduling.range_end
        );
        println!("Constraints: {}", self.constraints.len());

        let mut solver = CspSolver::new(
            scheduling.meetings,
            scheduling.range_start,
            scheduling.range_end,
        )
        .with_filtering(self.settings.solver.filtering);

        let assignment = solver
            .solve(&self.constraints)
            .context("CSP solving failed")?;
        self.solver_statistics = Some(solver.statistics());

        let Some(dates) = assignment else {
            println!("No schedule satisfies the constraints");
            return Ok(None);
        };

        let report = self
            .validator
            .validate(&dates, &self.constraints)
            .context("Schedule validation failed")?;
        if !report.is_valid {
            // The solver's final verification should make this unreachable
            anyhow::bail!(
                "Solver produced a schedule that failed validation: {}",
                report
                    .error_message
                    .unwrap_or_else(|| "unknown violation".to_string())
            );
        }

        let schedule = Schedule::new(
            dates,
            scheduling.range_start,
            scheduling.range_end,
            start_time.elapsed(),
        );
        println!(
            "Found schedule {} in {:.3}s",
            schedule.metadata.id,
            schedule.solve_time.as_secs_f64()
        );

        Ok(Some(schedule))
    }

    /// The constraint set the problem was built with
    pub fn constraints(&self) -> &HashSet<DateConstraint> {
        &self.constraints
    }

    /// The problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Statistics from the most recent solve, if any
    pub fn solver_statistics(&self) -> Option<&SolverStatistics> {
        self.solver_statistics.as_ref()
    }

    /// Run only the configured filtering passes and return the resulting
    /// domains, without searching. Used by the analyze command.
    pub fn filtered_domains(&self) -> Vec<MeetingDomain> {
        let scheduling = &self.settings.scheduling;
        let mut domains = generate_domains(
            scheduling.meetings,
            scheduling.range_start,
            scheduling.range_end,
        );

        match self.settings.solver.filtering {
            FilteringLevel::None => {}
            FilteringLevel::NodeOnly => node_consistency(&mut domains, &self.constraints),
            FilteringLevel::Full => {
                node_consistency(&mut domains, &self.constraints);
                arc_consistency(&mut domains, &self.constraints);
            }
        }

        domains
    }

    /// Estimate how hard this problem is before solving it
    pub fn estimate_difficulty(&self) -> DifficultyEstimate {
        let scheduling = &self.settings.scheduling;
        let domain_size = (scheduling.range_end - scheduling.range_start).num_days() + 1;
        let domain_size = domain_size.max(0) as usize;

        let search_space = (domain_size as f64).powi(scheduling.meetings as i32);
        let constraint_density = if scheduling.meetings == 0 {
            0.0
        } else {
            self.constraints.len() as f64 / scheduling.meetings as f64
        };

        let likelihood = if domain_size == 0 {
            ScheduleLikelihood::Low
        } else if domain_size >= scheduling.meetings && constraint_density < 1.0 {
            ScheduleLikelihood::High
        } else if domain_size >= scheduling.meetings {
            ScheduleLikelihood::Medium
        } else {
            // Fewer days than meetings: only satisfiable when dates may repeat
            ScheduleLikelihood::Low
        };

        let mut recommendations = Vec::new();
        if search_space > 1e9 && self.settings.solver.filtering != FilteringLevel::Full {
            recommendations
                .push("Enable full filtering to keep the search tractable".to_string());
        }
        if domain_size < scheduling.meetings {
            recommendations.push(
                "The range has fewer days than meetings; distinct-date constraints cannot hold"
                    .to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push("Problem looks reasonable to solve".to_string());
        }

        DifficultyEstimate {
            domain_size,
            search_space,
            constraint_density,
            likelihood,
            recommendations,
        }
    }
}

/// Pre-solve estimate of problem difficulty
#[derive(Debug, Clone)]
pub struct DifficultyEstimate {
    /// Dates in each meeting's initial domain
    pub domain_size: usize,
    /// Raw assignment combinations before any pruning
    pub search_space: f64,
    /// Constraints per meeting
    pub constraint_density: f64,
    pub likelihood: ScheduleLikelihood,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleLikelihood {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for DifficultyEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Difficulty Estimate:")?;
        writeln!(f, "  Domain size: {} date(s)", self.domain_size)?;
        writeln!(f, "  Raw search space: {:.2e}", self.search_space)?;
        writeln!(
            f,
            "  Constraint density: {:.2} per meeting",
            self.constraint_density
        )?;
        writeln!(f, "  Likelihood: {:?}", self.likelihood)?;
        writeln!(f, "  Recommendations:")?;
        for recommendation in &self.recommendations {
            writeln!(f, "    - {}", recommendation)?;
        }
        Ok(())
    }
}
