//! Placeholder text substituted for missing data.
//!
//! These strings are part of the output contract: callers and templates match
//! on them, so they must not drift.

pub const UNKNOWN: &str = "Unknown";
pub const UNCLASSIFIED: &str = "Unclassified";
pub const NOT_AVAILABLE: &str = "N/A";

pub const NO_SUMMARY: &str = "No summary available.";
pub const NO_LABEL: &str = "No label available";
pub const NO_PRODUCTION: &str = "No production data available.";
pub const NO_CLASSIFICATION: &str = "No classification available.";
pub const NO_INFORMATION: &str = "No additional information available.";

pub const NO_RESULTS: &str = "No results found.";
