//! Request extractors for entity resources.

mod body;
mod list_query;

pub use body::{JsonBody, MergePatch, MERGE_PATCH_JSON};
pub use list_query::ListQuery;
