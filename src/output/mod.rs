//! Output module for batch reports and the combined payload
//!
//! This module handles:
//! - Printing the batch report to the console
//! - Writing a markdown summary of a run
//! - Exporting cached records for the planner

mod markdown;
mod payload;
pub mod stats;
mod types;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use payload::{build_payload, CoursePayload, PayloadFormat, SCRIPT_VARIABLE};
pub use stats::print_batch_report;
pub use types::{OutputError, OutputResult, RunInfo};
