//! Configuration settings for the calendar scheduler

use crate::csp::FilteringLevel;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub scheduling: SchedulingConfig,
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// How many meetings to place and over which inclusive date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub meetings: usize,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub filtering: FilteringLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub constraints_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scheduling: SchedulingConfig {
                meetings: 3,
                range_start: NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid literal date"),
                range_end: NaiveDate::from_ymd_opt(2022, 1, 31).expect("valid literal date"),
            },
            solver: SolverConfig {
                filtering: FilteringLevel::Full,
            },
            input: InputConfig {
                constraints_file: PathBuf::from("input/constraints/planning_week.yaml"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/schedules"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.scheduling.meetings == 0 {
            anyhow::bail!("Number of meetings must be positive");
        }

        if self.scheduling.range_end < self.scheduling.range_start {
            anyhow::bail!(
                "Scheduling range is inverted: {} to {}",
                self.scheduling.range_start,
                self.scheduling.range_end
            );
        }

        if !self.input.constraints_file.exists() {
            anyhow::bail!(
                "Constraints file does not exist: {}",
                self.input.constraints_file.display()
            );
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(meetings) = cli_overrides.meetings {
            self.scheduling.meetings = meetings;
        }
        if let Some(range_start) = cli_overrides.range_start {
            self.scheduling.range_start = range_start;
        }
        if let Some(range_end) = cli_overrides.range_end {
            self.scheduling.range_end = range_end;
        }
        if let Some(ref constraints_file) = cli_overrides.constraints_file {
            self.input.constraints_file = constraints_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub meetings: Option<usize>,
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,
    pub constraints_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn settings_with_existing_constraints_file(dir: &std::path::Path) -> Settings {
        let constraints_file = dir.join("constraints.yaml");
        std::fs::write(&constraints_file, "constraints: []\n").unwrap();

        let mut settings = Settings::default();
        settings.input.constraints_file = constraints_file;
        settings
    }

    #[test]
    fn test_default_settings_shape() {
        let settings = Settings::default();

        assert_eq!(settings.scheduling.meetings, 3);
        assert!(settings.scheduling.range_start <= settings.scheduling.range_end);
        assert_eq!(settings.solver.filtering, FilteringLevel::Full);
        assert_eq!(settings.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_validate_rejects_zero_meetings() {
        let temp_dir = tempdir().unwrap();
        let mut settings = settings_with_existing_constraints_file(temp_dir.path());
        settings.scheduling.meetings = 0;

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let temp_dir = tempdir().unwrap();
        let mut settings = settings_with_existing_constraints_file(temp_dir.path());
        settings.scheduling.range_start = date(2022, 1, 5);
        settings.scheduling.range_end = date(2022, 1, 1);

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_constraints_file() {
        let mut settings = Settings::default();
        settings.input.constraints_file = PathBuf::from("nope/missing.yaml");

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let settings = settings_with_existing_constraints_file(temp_dir.path());
        let config_path = temp_dir.path().join("config.yaml");

        settings.to_file(&config_path).unwrap();
        let loaded = Settings::from_file(&config_path).unwrap();

        assert_eq!(loaded.scheduling.meetings, settings.scheduling.meetings);
        assert_eq!(loaded.scheduling.range_start, settings.scheduling.range_start);
        assert_eq!(loaded.scheduling.range_end, settings.scheduling.range_end);
        assert_eq!(loaded.solver.filtering, FilteringLevel::Full);
    }

    #[test]
    fn test_merge_with_cli_overrides() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            meetings: Some(7),
            range_start: Some(date(2022, 3, 1)),
            range_end: Some(date(2022, 3, 14)),
            constraints_file: Some(PathBuf::from("custom.yaml")),
            output_dir: None,
        };

        settings.merge_with_cli(&overrides);

        assert_eq!(settings.scheduling.meetings, 7);
        assert_eq!(settings.scheduling.range_start, date(2022, 3, 1));
        assert_eq!(settings.scheduling.range_end, date(2022, 3, 14));
        assert_eq!(settings.input.constraints_file, PathBuf::from("custom.yaml"));
        assert_eq!(
            settings.output.output_directory,
            PathBuf::from("output/schedules")
        );
    }
}
