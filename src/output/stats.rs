//! Console report of a batch run

use crate::harvest::BatchReport;
use crate::output::RunInfo;

/// Prints the batch totals and every failed course to stdout
pub fn print_batch_report(report: &BatchReport, info: &RunInfo) {
    println!("=== Download Report ===\n");

    println!("Overview:");
    println!(
        "  Year {}, semester {}",
        info.template.year, info.template.semester
    );
    println!("  Requested courses: {}", info.requested);
    println!("  Skipped (cached): {}", report.skipped);
    println!("  Downloaded: {}", report.successes());
    println!("  Failed: {}", report.total() - report.successes());
    println!("  Success rate: {:.1}%", success_rate(report));
    println!("  Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    println!();

    let failures = report.failures();
    if !failures.is_empty() {
        println!("Failed Courses ({}):", failures.len());
        for (course_id, failure) in failures {
            println!("  {}: {}", course_id, failure.cause);
        }
        println!();
    }
}

/// Percentage of attempted courses that succeeded, 100 when nothing was attempted
pub fn success_rate(report: &BatchReport) -> f64 {
    if report.total() == 0 {
        return 100.0;
    }
    (report.successes() as f64 / report.total() as f64) * 100.0
}
