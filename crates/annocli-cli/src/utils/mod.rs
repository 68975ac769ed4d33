//! Utility functions for string formatting.

pub mod format;

pub use format::{capitalize, format_date, format_optional, format_value, truncate_string};
