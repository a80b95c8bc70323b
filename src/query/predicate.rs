//! Composite predicate: an AND of clauses, each a condition on one target.

use crate::model::{RelationPath, Scalar};
use crate::query::filter::FilterSpec;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeOp {
    pub fn sql(&self) -> &'static str {
        match self {
            RangeOp::Eq => "=",
            RangeOp::Ne => "<>",
            RangeOp::Gt => ">",
            RangeOp::Gte => ">=",
            RangeOp::Lt => "<",
            RangeOp::Lte => "<=",
        }
    }

    fn accepts(&self, ord: Ordering) -> bool {
        match self {
            RangeOp::Eq => ord == Ordering::Equal,
            RangeOp::Ne => ord != Ordering::Equal,
            RangeOp::Gt => ord == Ordering::Greater,
            RangeOp::Gte => ord != Ordering::Less,
            RangeOp::Lt => ord == Ordering::Less,
            RangeOp::Lte => ord != Ordering::Greater,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextOp {
    Contains,
    DoesNotContain,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Range { op: RangeOp, value: Scalar },
    Text { op: TextOp, value: String },
    In(Vec<Scalar>),
    Exists { present: bool },
}

impl Condition {
    /// Evaluate against a single column value. Null only ever satisfies `specified=false`,
    /// the same outcome as SQL comparisons against NULL.
    pub fn matches(&self, value: &Scalar) -> bool {
        match self {
            Condition::Exists { present } => value.is_null() != *present,
            Condition::Range { op, value: rhs } => value.compare(rhs).map(|o| op.accepts(o)).unwrap_or(false),
            Condition::In(values) => values.iter().any(|v| value.compare(v) == Some(Ordering::Equal)),
            Condition::Text { op, value: needle } => match value.as_text() {
                Some(s) => {
                    let found = s.to_lowercase().contains(&needle.to_lowercase());
                    match op {
                        TextOp::Contains => found,
                        TextOp::DoesNotContain => !found,
                    }
                }
                None => false,
            },
        }
    }

    /// Evaluate against the identifiers of related rows: `specified` asks whether any
    /// related row exists, every other condition whether at least one row satisfies it.
    pub fn matches_any(&self, values: &[Scalar]) -> bool {
        match self {
            Condition::Exists { present } => values.is_empty() != *present,
            other => values.iter().any(|v| other.matches(v)),
        }
    }
}

/// What a clause constrains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Id,
    Column(&'static str),
    /// Identifiers of rows related through a reverse foreign key or a join table.
    Related(&'static RelationPath),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub target: Target,
    pub condition: Condition,
}

/// Logical AND of clauses. No clauses matches every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

impl Predicate {
    pub fn all() -> Self {
        Predicate::default()
    }

    pub fn is_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Folds optional filters into a predicate; absent filters add nothing.
#[derive(Default)]
pub struct PredicateBuilder {
    clauses: Vec<Clause>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        PredicateBuilder::default()
    }

    pub fn filter<F: FilterSpec>(mut self, target: Target, filter: &Option<F>) -> Self {
        if let Some(f) = filter {
            self.clauses.extend(
                f.conditions()
                    .into_iter()
                    .map(|condition| Clause { target, condition }),
            );
        }
        self
    }

    pub fn build(self) -> Predicate {
        Predicate { clauses: self.clauses }
    }
}
