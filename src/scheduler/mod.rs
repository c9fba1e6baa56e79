//! Scheduling problem definition and schedule handling

pub mod problem;
pub mod schedule;
pub mod validator;

pub use problem::{DifficultyEstimate, ScheduleLikelihood, SchedulingProblem};
pub use schedule::{Schedule, ScheduleMetadata};
pub use validator::{ConstraintViolation, ScheduleValidator, ValidationReport};
