//! SQL generation. Identifiers come only from entity metadata; values are always bound.

pub mod builder;
pub mod params;

pub use builder::{count, delete, delete_links, insert, insert_link, select, select_by_id, select_links, update, QueryBuf};
