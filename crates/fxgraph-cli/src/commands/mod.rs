//! CLI command implementations.

pub mod bank;
pub mod common;
pub mod compile;
pub mod edit;
pub mod presets;
pub mod schema;
pub mod validate;
