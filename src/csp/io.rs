//! Constraint-file loading and example generation

use super::constraint::{DateConstraint, Operator};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Top-level structure of a YAML constraint file
#[derive(Debug, Deserialize)]
struct ConstraintFile {
    constraints: Vec<ConstraintEntry>,
}

/// One constraint as written in a constraint file. The operator stays a raw
/// string here so legality is checked by the constraint constructors, not by
/// the deserializer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConstraintEntry {
    Unary {
        meeting: usize,
        op: String,
        date: NaiveDate,
    },
    Binary {
        left: usize,
        op: String,
        right: usize,
    },
}

/// Load a constraint set from a YAML file
pub fn load_constraints_from_file<P: AsRef<Path>>(path: P) -> Result<HashSet<DateConstraint>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read constraint file: {}", path.as_ref().display()))?;

    parse_constraints(&content)
        .with_context(|| format!("Failed to parse constraint file: {}", path.as_ref().display()))
}

/// Parse YAML text into a validated constraint set. Constraints equal up to
/// operand reversal collapse to one set entry.
pub fn parse_constraints(content: &str) -> Result<HashSet<DateConstraint>> {
    let file: ConstraintFile =
        serde_yaml::from_str(content).context("Constraint file is not valid YAML")?;

    let mut constraints = HashSet::new();
    for entry in file.constraints {
        let constraint = match entry {
            ConstraintEntry::Unary { meeting, op, date } => {
                let op: Operator = op.parse()?;
                DateConstraint::unary(meeting, op, date)
            }
            ConstraintEntry::Binary { left, op, right } => {
                let op: Operator = op.parse()?;
                DateConstraint::binary(left, op, right)?
            }
        };
        constraints.insert(constraint);
    }

    Ok(constraints)
}

/// Create example constraint files for the setup command
pub fn create_example_constraint_files<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Kickoff before review, review before retro, retro not on a Monday
    let planning_week = "\
constraints:
  - left: 0
    op: \"<\"
    right: 1
  - left: 1
    op: \"<\"
    right: 2
  - meeting: 2
    op: \"!=\"
    date: 2022-01-03
";
    std::fs::write(dir.join("planning_week.yaml"), planning_week)
        .context("Failed to write planning_week.yaml")?;

    // Three pairwise-distinct meetings; unsatisfiable in a two-day range
    let distinct_days = "\
constraints:
  - left: 0
    op: \"!=\"
    right: 1
  - left: 0
    op: \"!=\"
    right: 2
  - left: 1
    op: \"!=\"
    right: 2
";
    std::fs::write(dir.join("distinct_days.yaml"), distinct_days)
        .context("Failed to write distinct_days.yaml")?;

    // Mixed unary and binary chain over five meetings
    let release_chain = "\
constraints:
  - meeting: 0
    op: \">\"
    date: 2022-01-01
  - left: 0
    op: \"!=\"
    right: 1
  - left: 1
    op: \"==\"
    right: 2
  - left: 2
    op: \"!=\"
    right: 3
  - left: 3
    op: \"==\"
    right: 4
  - left: 4
    op: \"<\"
    right: 0
";
    std::fs::write(dir.join("release_chain.yaml"), release_chain)
        .context("Failed to write release_chain.yaml")?;

    Ok(())
}
