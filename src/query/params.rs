//! Query-string filter parameters (`field.operator=value`) consumed by criteria parsers.

use crate::error::AppError;
use crate::query::filter::{Filter, FilterValue, RangeFilter, StringFilter};
use std::collections::BTreeMap;

/// Query keys that are never filters.
pub const RESERVED_KEYS: &[&str] = &["page", "size", "sort", "query", "eagerload", "distinct"];

/// Pending filter parameters. Criteria parsers take what they understand; whatever is left
/// when [`FilterParams::finish`] runs is an unknown filter or operator.
#[derive(Debug, Default)]
pub struct FilterParams {
    entries: BTreeMap<String, String>,
}

struct Basic<T> {
    equals: Option<T>,
    not_equals: Option<T>,
    in_: Option<Vec<T>>,
    specified: Option<bool>,
}

impl<T> Basic<T> {
    fn is_empty(&self) -> bool {
        self.equals.is_none() && self.not_equals.is_none() && self.in_.is_none() && self.specified.is_none()
    }
}

impl FilterParams {
    /// Later duplicates of the same key replace earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries = pairs
            .into_iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .collect();
        FilterParams { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn range<T: FilterValue>(&mut self, field: &str) -> Result<Option<RangeFilter<T>>, AppError> {
        let basic = self.basic_parts::<T>(field)?;
        let greater_than = self.value(field, "greaterThan")?;
        let greater_than_or_equal = self.value(field, "greaterThanOrEqual")?;
        let less_than = self.value(field, "lessThan")?;
        let less_than_or_equal = self.value(field, "lessThanOrEqual")?;
        if basic.is_empty()
            && greater_than.is_none()
            && greater_than_or_equal.is_none()
            && less_than.is_none()
            && less_than_or_equal.is_none()
        {
            return Ok(None);
        }
        Ok(Some(RangeFilter {
            equals: basic.equals,
            not_equals: basic.not_equals,
            in_: basic.in_,
            specified: basic.specified,
            greater_than,
            greater_than_or_equal,
            less_than,
            less_than_or_equal,
        }))
    }

    pub fn string(&mut self, field: &str) -> Result<Option<StringFilter>, AppError> {
        let basic = self.basic_parts::<String>(field)?;
        let contains = self.take(field, "contains");
        let does_not_contain = self.take(field, "doesNotContain");
        if basic.is_empty() && contains.is_none() && does_not_contain.is_none() {
            return Ok(None);
        }
        Ok(Some(StringFilter {
            equals: basic.equals,
            not_equals: basic.not_equals,
            in_: basic.in_,
            specified: basic.specified,
            contains,
            does_not_contain,
        }))
    }

    pub fn basic<T: FilterValue>(&mut self, field: &str) -> Result<Option<Filter<T>>, AppError> {
        let basic = self.basic_parts::<T>(field)?;
        if basic.is_empty() {
            return Ok(None);
        }
        Ok(Some(Filter {
            equals: basic.equals,
            not_equals: basic.not_equals,
            in_: basic.in_,
            specified: basic.specified,
        }))
    }

    /// Fails on the first parameter no criteria field consumed.
    pub fn finish(self) -> Result<(), AppError> {
        match self.entries.into_keys().next() {
            Some(key) => Err(AppError::InvalidFilter(format!("unknown filter '{}'", key))),
            None => Ok(()),
        }
    }

    fn basic_parts<T: FilterValue>(&mut self, field: &str) -> Result<Basic<T>, AppError> {
        let equals = self.value(field, "equals")?;
        let not_equals = self.value(field, "notEquals")?;
        let in_ = match self.take(field, "in") {
            Some(raw) => Some(
                raw.split(',')
                    .map(|part| parse_value(field, "in", part))
                    .collect::<Result<Vec<T>, _>>()?,
            ),
            None => None,
        };
        let specified = match self.take(field, "specified") {
            Some(raw) => Some(match raw.trim() {
                "true" => true,
                "false" => false,
                _ => return Err(invalid_value(field, "specified", &raw)),
            }),
            None => None,
        };
        Ok(Basic { equals, not_equals, in_, specified })
    }

    fn value<T: FilterValue>(&mut self, field: &str, op: &str) -> Result<Option<T>, AppError> {
        self.take(field, op).map(|raw| parse_value(field, op, &raw)).transpose()
    }

    fn take(&mut self, field: &str, op: &str) -> Option<String> {
        self.entries.remove(&format!("{}.{}", field, op))
    }
}

fn parse_value<T: FilterValue>(field: &str, op: &str, raw: &str) -> Result<T, AppError> {
    T::parse(raw).ok_or_else(|| invalid_value(field, op, raw))
}

fn invalid_value(field: &str, op: &str, raw: &str) -> AppError {
    AppError::InvalidFilter(format!("{}.{}: invalid value '{}'", field, op, raw))
}
