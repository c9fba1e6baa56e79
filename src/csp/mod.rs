//! Constraint-satisfaction engine for calendar scheduling

pub mod constraint;
pub mod domain;
pub mod filtering;
pub mod io;
pub mod search;
pub mod solver;

pub use constraint::{
    BinaryDateConstraint, ConstraintError, DateConstraint, Operator, UnaryDateConstraint,
};
pub use domain::{generate_domains, MeetingDomain};
pub use filtering::{arc_consistency, node_consistency};
pub use io::{create_example_constraint_files, load_constraints_from_file, parse_constraints};
pub use search::{backtracking_search, satisfies_all, SearchOutcome};
pub use solver::{solve, CspSolver, FilteringLevel, SolverResultType, SolverStatistics};
