//! Criteria parsing and criteria → predicate translation.

pub mod filter;
pub mod page;
pub mod params;
pub mod predicate;

pub use filter::{Filter, FilterSpec, FilterValue, RangeFilter, StringFilter};
pub use page::{Direction, Order, Page, Pageable, Sort, Window, MAX_PAGE_SIZE};
pub use params::{FilterParams, RESERVED_KEYS};
pub use predicate::{Clause, Condition, Predicate, PredicateBuilder, RangeOp, Target, TextOp};

use crate::error::AppError;
use std::fmt::Debug;

/// Per-entity bag of optional filters.
pub trait Criteria: Clone + Debug + Default + Send + Sync + 'static {
    /// Take this entity's filters out of `params`. Unknown keys are left in place.
    fn from_params(params: &mut FilterParams) -> Result<Self, AppError>;

    /// AND of one clause per present filter operator.
    fn to_predicate(&self) -> Predicate;

    /// Parse and reject anything left over.
    fn parse(mut params: FilterParams) -> Result<Self, AppError> {
        let criteria = Self::from_params(&mut params)?;
        params.finish()?;
        Ok(criteria)
    }
}
