//! Date constraint model: relational operators, unary and binary constraints

use chrono::NaiveDate;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when constructing a constraint from untrusted input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("invalid constraint operator '{0}' (expected one of ==, !=, <, <=, >, >=)")]
    InvalidOperator(String),

    #[error("binary constraint compares meeting {0} against itself")]
    SelfReferential(usize),
}

/// The six relational operators a date constraint may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// Evaluate `left op right` on whole calendar dates
    pub fn evaluate(self, left: NaiveDate, right: NaiveDate) -> bool {
        match self {
            Operator::Eq => left == right,
            Operator::Ne => left != right,
            Operator::Lt => left < right,
            Operator::Le => left <= right,
            Operator::Gt => left > right,
            Operator::Ge => left >= right,
        }
    }

    /// The operator that holds after swapping the two operands
    pub fn reverse(self) -> Self {
        match self {
            Operator::Lt => Operator::Gt,
            Operator::Gt => Operator::Lt,
            Operator::Le => Operator::Ge,
            Operator::Ge => Operator::Le,
            Operator::Eq => Operator::Eq,
            Operator::Ne => Operator::Ne,
        }
    }

    /// The source-text symbol for this operator
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl FromStr for Operator {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            other => Err(ConstraintError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A constraint comparing one meeting's date against a literal date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnaryDateConstraint {
    pub meeting: usize,
    pub op: Operator,
    pub date: NaiveDate,
}

impl UnaryDateConstraint {
    /// Whether `assigned op literal` holds for this constraint
    pub fn is_satisfied_by(&self, assigned: NaiveDate) -> bool {
        self.op.evaluate(assigned, self.date)
    }
}

/// A constraint comparing the dates of two distinct meetings
#[derive(Debug, Clone, Copy)]
pub struct BinaryDateConstraint {
    pub left: usize,
    pub op: Operator,
    pub right: usize,
}

impl BinaryDateConstraint {
    /// Whether `left_date op right_date` holds for this constraint. This is
    /// the support test an arc evaluates tail-to-head.
    pub fn is_satisfied_by(&self, left_date: NaiveDate, right_date: NaiveDate) -> bool {
        self.op.evaluate(left_date, right_date)
    }

    /// The equivalent constraint with operands swapped and the operator reversed.
    /// `0 < 1` becomes `1 > 0`.
    pub fn reverse(&self) -> Self {
        Self {
            left: self.right,
            op: self.op.reverse(),
            right: self.left,
        }
    }

    // Orientation with the smaller meeting index on the left, so that a
    // constraint and its reverse canonicalize identically.
    fn canonical(&self) -> (usize, Operator, usize) {
        if self.left <= self.right {
            (self.left, self.op, self.right)
        } else {
            (self.right, self.op.reverse(), self.left)
        }
    }
}

// A binary constraint denotes the same relation as its reversed form, so
// equality and hashing both go through the canonical orientation.
impl PartialEq for BinaryDateConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for BinaryDateConstraint {}

impl Hash for BinaryDateConstraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

/// A date constraint of either arity, as supplied to the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateConstraint {
    Unary(UnaryDateConstraint),
    Binary(BinaryDateConstraint),
}

impl DateConstraint {
    /// Build a unary constraint `meeting op date`
    pub fn unary(meeting: usize, op: Operator, date: NaiveDate) -> Self {
        DateConstraint::Unary(UnaryDateConstraint { meeting, op, date })
    }

    /// Build a binary constraint `left op right`, rejecting self-comparison
    pub fn binary(left: usize, op: Operator, right: usize) -> Result<Self, ConstraintError> {
        if left == right {
            return Err(ConstraintError::SelfReferential(left));
        }
        Ok(DateConstraint::Binary(BinaryDateConstraint { left, op, right }))
    }

    /// Constraint arity: 1 for unary, 2 for binary
    pub fn arity(&self) -> usize {
        match self {
            DateConstraint::Unary(_) => 1,
            DateConstraint::Binary(_) => 2,
        }
    }

    /// Evaluate this constraint against a (possibly partial) assignment,
    /// where index `i` holds the date chosen for meeting `i`. Returns `None`
    /// when a referenced meeting has no assigned date yet.
    pub fn evaluate_on(&self, assignment: &[NaiveDate]) -> Option<bool> {
        match self {
            DateConstraint::Unary(unary) => {
                let left = *assignment.get(unary.meeting)?;
                Some(unary.is_satisfied_by(left))
            }
            DateConstraint::Binary(binary) => {
                let left = *assignment.get(binary.left)?;
                let right = *assignment.get(binary.right)?;
                Some(binary.is_satisfied_by(left, right))
            }
        }
    }

    /// Largest meeting index this constraint mentions
    pub fn max_meeting_index(&self) -> usize {
        match self {
            DateConstraint::Unary(unary) => unary.meeting,
            DateConstraint::Binary(binary) => binary.left.max(binary.right),
        }
    }
}

impl fmt::Display for DateConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateConstraint::Unary(unary) => {
                write!(f, "{} {} {}", unary.meeting, unary.op, unary.date)
            }
            DateConstraint::Binary(binary) => {
                write!(f, "{} {} {}", binary.left, binary.op, binary.right)
            }
        }
    }
}
