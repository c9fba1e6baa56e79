//! Domain filtering: node consistency and the AC-3 arc-consistency engine

use super::constraint::{BinaryDateConstraint, DateConstraint};
use super::domain::MeetingDomain;
use chrono::NaiveDate;
use std::collections::HashSet;

/// A directed edge (tail -> head) derived from a binary constraint. The
/// carried constraint is oriented so that `op.evaluate(tail_value, head_value)`
/// is the support test for the tail's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Arc {
    tail: usize,
    head: usize,
    constraint: BinaryDateConstraint,
}

/// Remove every domain value violating a unary constraint on its meeting.
/// Binary constraints are ignored by this pass. Each constraint touches only
/// its own meeting's domain, so application order does not matter.
pub fn node_consistency(domains: &mut [MeetingDomain], constraints: &HashSet<DateConstraint>) {
    for constraint in constraints {
        if let DateConstraint::Unary(unary) = constraint {
            if let Some(domain) = domains.get_mut(unary.meeting) {
                domain.values.retain(|&date| unary.is_satisfied_by(date));
            }
        }
    }
}

/// Enforce arc consistency over every binary constraint using AC-3: seed a
/// worklist with both directions of every constraint, then revise arcs until
/// no revision changes a domain. Terminates because domains are finite and
/// only shrink.
pub fn arc_consistency(domains: &mut [MeetingDomain], constraints: &HashSet<DateConstraint>) {
    let binary: Vec<BinaryDateConstraint> = constraints
        .iter()
        .filter_map(|constraint| match constraint {
            DateConstraint::Binary(b) => Some(*b),
            DateConstraint::Unary(_) => None,
        })
        .collect();

    // The worklist is a set so duplicate arcs collapse.
    let mut worklist: HashSet<Arc> = HashSet::new();
    for b in &binary {
        worklist.insert(Arc {
            tail: b.left,
            head: b.right,
            constraint: *b,
        });
        worklist.insert(Arc {
            tail: b.right,
            head: b.left,
            constraint: b.reverse(),
        });
    }

    loop {
        let Some(&arc) = worklist.iter().next() else {
            break;
        };
        worklist.remove(&arc);

        if revise(domains, &arc) {
            // The tail's domain lost values, so every arc terminating at the
            // tail may have lost support and must be rechecked.
            for b in &binary {
                if b.left == arc.tail {
                    worklist.insert(Arc {
                        tail: b.right,
                        head: b.left,
                        constraint: b.reverse(),
                    });
                }
                if b.right == arc.tail {
                    worklist.insert(Arc {
                        tail: b.left,
                        head: b.right,
                        constraint: *b,
                    });
                }
            }
        }
    }
}

/// Keep only tail values with at least one supporting head value. Returns
/// true when the tail's domain changed.
fn revise(domains: &mut [MeetingDomain], arc: &Arc) -> bool {
    let supported: HashSet<NaiveDate> = domains[arc.tail]
        .values
        .iter()
        .copied()
        .filter(|&tail_value| {
            domains[arc.head]
                .values
                .iter()
                .any(|&head_value| arc.constraint.is_satisfied_by(tail_value, head_value))
        })
        .collect();

    let changed = supported.len() != domains[arc.tail].values.len();
    domains[arc.tail].values = supported;
    changed
}
