//! CLI command implementations

pub mod create;
pub mod fetch;
pub mod inspect;
pub mod json_output;
pub mod list;
pub mod serve;
