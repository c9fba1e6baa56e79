//! Configuration management for the calendar scheduler

pub mod settings;

pub use settings::{
    CliOverrides, InputConfig, OutputConfig, OutputFormat, SchedulingConfig, Settings,
    SolverConfig,
};
