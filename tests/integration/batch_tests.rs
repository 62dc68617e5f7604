//! Integration tests for the batch orchestrator
//!
//! Most tests drive `run_batch` with an in-process aggregator so that
//! concurrency and failure isolation can be observed directly. The last test
//! runs a whole download against wiremock.

use huji_cheese::config::{BatchConfig, Config, OutputConfig, SourcesConfig};
use huji_cheese::harvest::{download_courses, run_batch, Aggregate};
use huji_cheese::model::{CourseDetails, ExamDates};
use huji_cheese::{
    AggregationFailed, CollectError, CourseIdentity, CourseRecord, FailureCause, Semester,
};
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Aggregator that fails a fixed set of courses and tracks how many run at once
#[derive(Default)]
struct FakeAggregator {
    failing: HashSet<String>,
    panicking: HashSet<String>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeAggregator {
    fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

fn sample_record(identity: &CourseIdentity) -> CourseRecord {
    let details = CourseDetails {
        credit_points: Some("2".to_string()),
        instructor: None,
        faculty: "מדעי הרוח".to_string(),
        course_name: format!("קורס {}", identity.course_id),
    };
    CourseRecord::assemble(identity, details, &ExamDates::default(), Vec::new())
}

impl Aggregate for FakeAggregator {
    fn aggregate(
        &self,
        identity: &CourseIdentity,
    ) -> impl Future<Output = Result<CourseRecord, AggregationFailed>> + Send {
        async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panicking.contains(&identity.course_id) {
                panic!("parser bug on {}", identity.course_id);
            }

            if self.failing.contains(&identity.course_id) {
                // Nothing listens on port 1
                let url = "http://127.0.0.1:1/get_course.php".to_string();
                let source = reqwest::get(&url).await.unwrap_err();
                return Err(AggregationFailed::new(
                    &identity.course_id,
                    CollectError::SourceUnreachable {
                        source_name: "timetable",
                        url,
                        source,
                    },
                ));
            }

            Ok(sample_record(identity))
        }
    }
}

fn course_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}", 67100 + i)).collect()
}

fn template() -> CourseIdentity {
    CourseIdentity::new("", 2024, Semester::B)
}

fn batch_config(max_concurrent_courses: usize) -> BatchConfig {
    BatchConfig {
        max_concurrent_courses,
        progress_interval_ms: 0,
    }
}

#[tokio::test]
async fn test_partial_failure_is_isolated() {
    let ids = course_ids(10);
    let failing = ["67102", "67105", "67109"];
    let aggregator = Arc::new(FakeAggregator::failing(&failing));

    let report = run_batch(aggregator, &ids, &template(), &batch_config(4)).await;

    assert_eq!(report.total(), 10);
    assert_eq!(report.successes(), 7);
    assert!(!report.all_succeeded());

    let failures = report.failures();
    let failed_ids: Vec<&str> = failures.iter().map(|(id, _)| *id).collect();
    assert_eq!(failed_ids, failing.to_vec());
    for (_, failure) in failures {
        assert!(matches!(
            failure.cause,
            FailureCause::Collect(CollectError::SourceUnreachable { .. })
        ));
    }

    // Outcomes keep the request order
    let reported: Vec<&str> = report
        .outcomes
        .iter()
        .map(|outcome| outcome.course_id.as_str())
        .collect();
    assert_eq!(reported, ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let aggregator = Arc::new(FakeAggregator::with_delay(Duration::from_millis(50)));

    let report = run_batch(
        Arc::clone(&aggregator),
        &course_ids(5),
        &template(),
        &batch_config(2),
    )
    .await;

    assert_eq!(report.successes(), 5);
    let max_in_flight = aggregator.max_in_flight.load(Ordering::SeqCst);
    // Capped at two, and the two slots were actually shared
    assert_eq!(max_in_flight, 2);
}

#[tokio::test]
async fn test_repeated_course_runs_once() {
    let aggregator = Arc::new(FakeAggregator::with_delay(Duration::from_millis(10)));
    let ids = vec!["67101".to_string(), "67102".to_string(), "67101".to_string()];

    let report = run_batch(Arc::clone(&aggregator), &ids, &template(), &batch_config(3)).await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.successes(), 2);
    let reported: Vec<&str> = report
        .outcomes
        .iter()
        .map(|outcome| outcome.course_id.as_str())
        .collect();
    assert_eq!(reported, vec!["67101", "67102"]);
}

#[tokio::test]
async fn test_panicking_course_is_reported_as_aborted() {
    let aggregator = Arc::new(FakeAggregator {
        panicking: ["67101".to_string()].into_iter().collect(),
        ..FakeAggregator::default()
    });

    let report = run_batch(aggregator, &course_ids(3), &template(), &batch_config(3)).await;

    assert_eq!(report.successes(), 2);
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "67101");
    assert!(matches!(failures[0].1.cause, FailureCause::Aborted(_)));
}

#[tokio::test]
async fn test_empty_batch() {
    let aggregator = Arc::new(FakeAggregator::default());
    let config = BatchConfig {
        max_concurrent_courses: 10,
        progress_interval_ms: 10,
    };

    let report = run_batch(aggregator, &[], &template(), &config).await;

    assert_eq!(report.total(), 0);
    assert!(report.all_succeeded());
}

#[tokio::test]
async fn test_progress_reporter_does_not_block_completion() {
    let aggregator = Arc::new(FakeAggregator::with_delay(Duration::from_millis(30)));
    let config = BatchConfig {
        max_concurrent_courses: 1,
        progress_interval_ms: 10,
    };

    let report = run_batch(aggregator, &course_ids(3), &template(), &config).await;

    assert_eq!(report.successes(), 3);
}

#[tokio::test]
async fn test_download_skips_cached_courses() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/get_course.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"lessons": []}"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/NewSyl/67101/1/2024/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><p>אין סילבוס</p></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(body_string_contains("peula=CourseD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<table><tr><td><table><tbody>{}</tbody></table></td></tr></table>",
            "<tr><th>h</th></tr>".repeat(4)
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(body_string_contains("peula=Simple"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><body><div class=\"courseTitle\">מדעי הרוח</div>\
             <table><tr><td><b>Linguistics</b><b>בלשנות</b><b>67101</b></td></tr></table>\
             <table><tr>{}</tr></table></body></html>",
            "<td>x</td>".repeat(6)
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = Config {
        sources: SourcesConfig {
            schedule_url: format!("{}/get_course.php", base),
            syllabus_url: format!("{}/NewSyl/{{course}}/1/{{year}}/", base),
            shnaton_url: format!("{}/index.php", base),
        },
        batch: batch_config(2),
        output: OutputConfig {
            directory: dir.path().to_string_lossy().into_owned(),
        },
        ..Config::default()
    };
    let ids = vec!["67101".to_string()];
    let template = CourseIdentity::new("", 2024, Semester::A);

    let first = download_courses(&config, &ids, &template, false).await.unwrap();
    assert_eq!(first.successes(), 1);
    assert_eq!(first.skipped, 0);
    assert!(dir.path().join("67101_2024_1.txt").is_file());

    // Second run finds the cached record and sends no requests
    let second = download_courses(&config, &ids, &template, false).await.unwrap();
    assert_eq!(second.total(), 0);
    assert_eq!(second.skipped, 1);
}
