//! HTTP handlers for entity resources.

pub mod entity;
