//! Typed filter specifications parsed from `field.operator=value` query parameters.

use crate::model::Scalar;
use crate::query::predicate::{Condition, RangeOp, TextOp};
use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// A value that can appear on the right-hand side of a filter.
pub trait FilterValue: Clone + Debug + Send + Sync + Sized + 'static {
    fn parse(raw: &str) -> Option<Self>;
    fn to_scalar(&self) -> Scalar;
}

impl FilterValue for i64 {
    fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int(*self)
    }
}

impl FilterValue for String {
    fn parse(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Text(self.clone())
    }
}

impl FilterValue for DateTime<Utc> {
    fn parse(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Instant(*self)
    }
}

/// Anything that turns into zero or more column conditions.
pub trait FilterSpec {
    fn conditions(&self) -> Vec<Condition>;
}

fn base_conditions<T: FilterValue>(
    equals: &Option<T>,
    not_equals: &Option<T>,
    in_: &Option<Vec<T>>,
    specified: Option<bool>,
) -> Vec<Condition> {
    let mut out = Vec::new();
    if let Some(v) = equals {
        out.push(Condition::Range { op: RangeOp::Eq, value: v.to_scalar() });
    }
    if let Some(v) = not_equals {
        out.push(Condition::Range { op: RangeOp::Ne, value: v.to_scalar() });
    }
    if let Some(vs) = in_ {
        out.push(Condition::In(vs.iter().map(FilterValue::to_scalar).collect()));
    }
    if let Some(present) = specified {
        out.push(Condition::Exists { present });
    }
    out
}

/// equals / notEquals / in / specified. Used for enums.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_: Option<Vec<T>>,
    pub specified: Option<bool>,
}

impl<T: FilterValue> Filter<T> {
    pub fn equals(value: T) -> Self {
        Filter { equals: Some(value), not_equals: None, in_: None, specified: None }
    }
}

impl<T: FilterValue> FilterSpec for Filter<T> {
    fn conditions(&self) -> Vec<Condition> {
        base_conditions(&self.equals, &self.not_equals, &self.in_, self.specified)
    }
}

/// Basic operators plus ordered comparisons. Used for ids, integers and instants.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeFilter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_: Option<Vec<T>>,
    pub specified: Option<bool>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        RangeFilter {
            equals: None,
            not_equals: None,
            in_: None,
            specified: None,
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    pub fn equals(value: T) -> Self {
        RangeFilter { equals: Some(value), ..Default::default() }
    }
}

impl<T: FilterValue> FilterSpec for RangeFilter<T> {
    fn conditions(&self) -> Vec<Condition> {
        let mut out = base_conditions(&self.equals, &self.not_equals, &self.in_, self.specified);
        for (op, v) in [
            (RangeOp::Gt, &self.greater_than),
            (RangeOp::Gte, &self.greater_than_or_equal),
            (RangeOp::Lt, &self.less_than),
            (RangeOp::Lte, &self.less_than_or_equal),
        ] {
            if let Some(v) = v {
                out.push(Condition::Range { op, value: v.to_scalar() });
            }
        }
        out
    }
}

/// Basic operators plus case-insensitive substring matching.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringFilter {
    pub equals: Option<String>,
    pub not_equals: Option<String>,
    pub in_: Option<Vec<String>>,
    pub specified: Option<bool>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn equals(value: impl Into<String>) -> Self {
        StringFilter { equals: Some(value.into()), ..Default::default() }
    }
}

impl FilterSpec for StringFilter {
    fn conditions(&self) -> Vec<Condition> {
        let mut out = base_conditions(&self.equals, &self.not_equals, &self.in_, self.specified);
        if let Some(v) = &self.contains {
            out.push(Condition::Text { op: TextOp::Contains, value: v.clone() });
        }
        if let Some(v) = &self.does_not_contain {
            out.push(Condition::Text { op: TextOp::DoesNotContain, value: v.clone() });
        }
        out
    }
}
