//! Storage-neutral row: scalar values keyed by column plus hydrated many-to-many links.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A single column value as both stores see it.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Int(i64),
    Text(String),
    Instant(DateTime<Utc>),
}

static NULL: Scalar = Scalar::Null;

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Ordering between two values of the same kind. `None` when either side is
    /// null or the kinds differ, which makes every comparison false.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            (Scalar::Instant(a), Scalar::Instant(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Scalar::Instant(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(t: DateTime<Utc>) -> Self {
        Scalar::Instant(t)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// Related row reached through a join table, with its display column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRef {
    pub id: i64,
    pub label: Option<String>,
}

impl LinkRef {
    pub fn new(id: i64) -> Self {
        LinkRef { id, label: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub id: Option<i64>,
    pub values: BTreeMap<&'static str, Scalar>,
    pub links: BTreeMap<&'static str, Vec<LinkRef>>,
}

impl Record {
    pub fn new(id: Option<i64>) -> Self {
        Record {
            id,
            ..Default::default()
        }
    }

    pub fn with(mut self, column: &'static str, value: impl Into<Scalar>) -> Self {
        self.set(column, value);
        self
    }

    pub fn with_links(mut self, name: &'static str, links: Vec<LinkRef>) -> Self {
        self.links.insert(name, links);
        self
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<Scalar>) {
        self.values.insert(column, value.into());
    }

    /// Value of a column; `id` resolves to the identifier. Missing columns read as null.
    pub fn get(&self, column: &str) -> Scalar {
        if column == "id" {
            return self.id.into();
        }
        self.values.get(column).unwrap_or(&NULL).clone()
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.values.get(column).and_then(Scalar::as_text).map(str::to_string)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        if column == "id" {
            return self.id;
        }
        self.values.get(column).and_then(Scalar::as_int)
    }

    pub fn instant(&self, column: &str) -> Option<DateTime<Utc>> {
        self.values.get(column).and_then(Scalar::as_instant)
    }

    pub fn links(&self, name: &str) -> &[LinkRef] {
        self.links.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
