//! Markdown summary generation
//!
//! This module renders a batch report as a markdown document with the run
//! parameters, the totals and a table of failed courses.

use crate::harvest::BatchReport;
use crate::output::stats::success_rate;
use crate::output::{OutputResult, RunInfo};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a batch run
///
/// # Arguments
///
/// * `report` - The batch report
/// * `info` - Run parameters shown in the header
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn write_markdown_summary(
    report: &BatchReport,
    info: &RunInfo,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(report, info);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch report as markdown
pub fn format_markdown_summary(report: &BatchReport, info: &RunInfo) -> String {
    let mut md = String::new();

    md.push_str("# HUJI-Cheese Download Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Year**: {}\n", info.template.year));
    md.push_str(&format!("- **Semester**: {}\n", info.template.semester));
    md.push_str(&format!("- **Finished**: {}\n", info.finished_at));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.elapsed.as_secs_f64()
    ));
    if let Some(hash) = &info.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Totals\n\n");
    md.push_str(&format!("- **Requested**: {}\n", info.requested));
    md.push_str(&format!("- **Skipped (cached)**: {}\n", report.skipped));
    md.push_str(&format!("- **Downloaded**: {}\n", report.successes()));
    md.push_str(&format!(
        "- **Failed**: {}\n",
        report.total() - report.successes()
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        success_rate(report)
    ));

    let failures = report.failures();
    if !failures.is_empty() {
        md.push_str("## Failed Courses\n\n");
        md.push_str("| Course | Reason |\n");
        md.push_str("|--------|--------|\n");
        for (course_id, failure) in failures {
            // Pipes would split the table cell
            let reason = failure.cause.to_string().replace('|', "\\|");
            md.push_str(&format!("| {} | {} |\n", course_id, reason));
        }
        md.push('\n');
    }

    md
}
