//! Entity services: write-through persistence, criteria queries and body validation.

mod entity;
mod query;
mod validation;

pub use entity::{EntityService, MirrorStatus, WriteOutcome};
pub use query::{CriteriaOf, QueryService};
pub use validation::{body_object, RequestValidator, MAX_TEXT_LENGTH};
