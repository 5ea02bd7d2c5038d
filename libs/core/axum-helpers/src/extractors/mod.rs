//! Extractors whose rejections render as [`crate::AppError`] bodies.

pub mod json;
pub mod query;

pub use json::JsonBody;
pub use query::QueryParams;
