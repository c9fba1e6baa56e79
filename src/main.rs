//! Main CLI application for the calendar scheduler

use anyhow::{Context, Result};
use calendar_csp::{
    config::{CliOverrides, Settings},
    csp::{create_example_constraint_files, load_constraints_from_file},
    scheduler::{ScheduleValidator, SchedulingProblem},
    utils::{ColorOutput, ScheduleFormatter},
    Schedule,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "calendar_csp")]
#[command(about = "Calendar Satisfaction Problem Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule meetings subject to the configured constraints
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Constraints file (overrides config)
        #[arg(short = 'n', long)]
        constraints: Option<PathBuf>,

        /// Number of meetings to schedule (overrides config)
        #[arg(short, long)]
        meetings: Option<usize>,

        /// First allowable meeting date (overrides config)
        #[arg(long)]
        range_start: Option<NaiveDate>,

        /// Last allowable meeting date (overrides config)
        #[arg(long)]
        range_end: Option<NaiveDate>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and constraint files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a saved schedule against a constraint file
    Validate {
        /// Schedule JSON file
        #[arg(short, long)]
        schedule: PathBuf,

        /// Constraints file
        #[arg(short = 'n', long)]
        constraints: PathBuf,
    },

    /// Analyze a scheduling problem without solving it
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Constraints file (overrides config)
        #[arg(short = 'n', long)]
        constraints: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            constraints,
            meetings,
            range_start,
            range_end,
            output,
            verbose,
        } => solve_command(
            config,
            constraints,
            meetings,
            range_start,
            range_end,
            output,
            verbose,
        ),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Validate {
            schedule,
            constraints,
        } => validate_command(schedule, constraints),
        Commands::Analyze {
            config,
            constraints,
        } => analyze_command(config, constraints),
    }
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Ok(Settings::default())
    }
}

fn solve_command(
    config_path: PathBuf,
    constraints_file: Option<PathBuf>,
    meetings: Option<usize>,
    range_start: Option<NaiveDate>,
    range_end: Option<NaiveDate>,
    output_dir: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("📅 Starting calendar scheduler"));

    let mut settings = load_settings(&config_path)?;

    let cli_overrides = CliOverrides {
        meetings,
        range_start,
        range_end,
        constraints_file,
        output_dir,
    };
    settings.merge_with_cli(&cli_overrides);

    if verbose {
        println!("Configuration:");
        println!("  Meetings: {}", settings.scheduling.meetings);
        println!(
            "  Range: {} to {}",
            settings.scheduling.range_start, settings.scheduling.range_end
        );
        println!(
            "  Constraints file: {}",
            settings.input.constraints_file.display()
        );
        println!(
            "  Output dir: {}",
            settings.output.output_directory.display()
        );
        println!();
    }

    settings
        .validate()
        .context("Configuration validation failed")?;

    let start_time = Instant::now();
    let mut problem =
        SchedulingProblem::new(settings.clone()).context("Failed to create scheduling problem")?;

    if verbose {
        println!("{}", problem.estimate_difficulty());
    }

    println!("{}", ColorOutput::info("🧮 Filtering domains and searching..."));
    let schedule = problem.solve().context("Failed to solve scheduling problem")?;

    let total_time = start_time.elapsed();

    let Some(schedule) = schedule else {
        println!(
            "{}",
            ColorOutput::warning("❌ No schedule satisfies the constraints")
        );
        return Ok(());
    };

    println!(
        "{}",
        ColorOutput::success(&format!(
            "✅ Scheduled {} meeting(s) in {:.3}s",
            schedule.metadata.meeting_count,
            total_time.as_secs_f64()
        ))
    );

    println!("\n{}", ScheduleFormatter::format_schedule(&schedule));
    if verbose {
        println!("{}", ScheduleFormatter::format_constraints(problem.constraints()));
    }

    println!("{}", ColorOutput::info("💾 Saving schedule..."));
    ScheduleFormatter::save_schedule(
        &schedule,
        &settings.output.output_directory,
        &settings.output.format,
    )
    .context("Failed to save schedule")?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Schedule saved to {}",
            settings.output.output_directory.display()
        ))
    );

    if verbose {
        if let Some(statistics) = problem.solver_statistics() {
            println!("\n{}", statistics);
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/constraints");
    let output_dir = directory.join("output/schedules");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.input.constraints_file = input_dir.join("planning_week.yaml");
        default_settings.output.output_directory = output_dir.clone();
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_constraint_files(&input_dir)
        .context("Failed to create example constraint files")?;
    println!("Created example constraint files in: {}", input_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your constraint files to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(schedule_path: PathBuf, constraints_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Validating schedule..."));

    let schedule = Schedule::load_from_file(&schedule_path)
        .with_context(|| format!("Failed to load schedule from {}", schedule_path.display()))?;

    let constraints = load_constraints_from_file(&constraints_path).with_context(|| {
        format!(
            "Failed to load constraints from {}",
            constraints_path.display()
        )
    })?;

    // Validate within the schedule's own frame rather than whatever the
    // current config happens to say.
    let mut settings = Settings::default();
    settings.scheduling.meetings = schedule.dates.len();
    settings.scheduling.range_start = schedule.range_start;
    settings.scheduling.range_end = schedule.range_end;

    let validator = ScheduleValidator::new(settings);
    let report = validator
        .validate(&schedule.dates, &constraints)
        .context("Validation failed")?;

    println!("{}", report);

    if report.is_valid {
        println!("{}", ColorOutput::success("✅ Schedule is valid!"));
    } else {
        println!("{}", ColorOutput::error("❌ Schedule is invalid"));
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, constraints_file: Option<PathBuf>) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing scheduling problem..."));

    let mut settings = load_settings(&config_path)?;
    if let Some(constraints_file) = constraints_file {
        settings.input.constraints_file = constraints_file;
    }
    settings
        .validate()
        .context("Configuration validation failed")?;

    let problem =
        SchedulingProblem::new(settings).context("Failed to create scheduling problem")?;

    println!(
        "Problem: {} meeting(s), {} to {}",
        problem.settings().scheduling.meetings,
        problem.settings().scheduling.range_start,
        problem.settings().scheduling.range_end
    );
    println!();
    println!("{}", ScheduleFormatter::format_constraints(problem.constraints()));

    let domains = problem.filtered_domains();
    println!("Domains after filtering:");
    println!("{}", ScheduleFormatter::format_domains(&domains));

    if domains.iter().any(|domain| domain.is_empty()) {
        println!(
            "{}",
            ColorOutput::warning("A domain is already empty: no schedule exists")
        );
    }

    println!("{}", problem.estimate_difficulty());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "calendar_csp",
            "solve",
            "--config",
            "test.yaml",
            "--meetings",
            "4",
            "--range-start",
            "2022-01-01",
            "--range-end",
            "2022-01-31",
        ]);

        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let cli = Cli::try_parse_from([
            "calendar_csp",
            "solve",
            "--range-start",
            "not-a-date",
        ]);

        assert!(cli.is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir
            .path()
            .join("input/constraints/planning_week.yaml")
            .exists());
    }

    #[test]
    fn test_setup_then_solve_round_trip() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let config_path = temp_dir.path().join("config/default.yaml");
        let settings = Settings::from_file(&config_path).unwrap();
        let mut problem = SchedulingProblem::new(settings).unwrap();

        let schedule = problem.solve().unwrap();
        assert!(schedule.is_some());
    }
}
