//! Integration tests for the course aggregator
//!
//! These tests use wiremock to stand in for the timetable, syllabus and
//! shnaton services and run full aggregations against them.

use huji_cheese::config::{FetchConfig, SourcesConfig};
use huji_cheese::harvest::{Aggregate, CourseAggregator, FetchClient};
use huji_cheese::model::SessionType;
use huji_cheese::storage::record_file_name;
use huji_cheese::{
    CollectError, CourseIdentity, FailureCause, FileStore, RecordStore, Semester,
};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COURSE: &str = "67101";
const YEAR: i32 = 2024;

const SCHEDULE_BODY: &str = r#"{"lessons": [
    {"teacher": "ד\"ר כהן", "group": "1", "type": "שעור", "hours": [
        {"semester": "סמסטר א", "hour": "10:00-12:00", "place": "שפרינצק", "day": "יום ב'"},
        {"semester": "סמסטר ב", "hour": "14:00-16:00", "place": "שפרינצק", "day": "יום ג'"}
    ]},
    {"teacher": "מר לוי", "group": 11, "type": "תרג", "hours": [
        {"semester": "סמסטר א", "hour": "12:00-13:00", "place": "קפלן", "day": "יום ד'"}
    ]}
]}"#;

fn syllabus_page() -> String {
    "<html><body>\
     <span class=\"h1Syl\"> מבוא למדעי המחשב - Introduction to CS </span>\
     <div>\n<b>נקודות זכות באוניברסיטה העברית: </b>\n5</div>\
     <div>\n<b>היחידה האקדמית שאחראית על הקורס:  </b>מדעי המחשב\n</div>\
     <div>\n<b>מורה אחראי על הקורס (רכז): </b>\nפרופ' לוי\n</div>\
     </body></html>"
        .to_string()
}

const NO_SYLLABUS_PAGE: &str =
    "<html><body><div><p>אין סילבוס לקורס זה</p></div></body></html>";

fn general_info_page(faculty: &str) -> String {
    format!(
        "<html><body>\
         <div class=\"courseTitle\"> {faculty} </div>\
         <table><tr><td><b>Introduction to CS</b><b>מבוא למדעי המחשב</b><b>67101</b></td></tr></table>\
         <table><tr>{}</tr></table>\
         </body></html>",
        "<td>x</td>".repeat(6)
    )
}

fn exams_page() -> String {
    let headers = "<tr><th>h</th></tr>".repeat(4);
    let row = |date: &str, moed: &str, semester: &str| {
        format!(
            "<tr><td>{date}</td><td>09:00</td><td></td><td>אולם 1</td><td>{moed}</td><td>{semester}</td></tr>"
        )
    };
    format!(
        "<html><body><table><tr><td><table><tbody>{headers}{}{}{}</tbody></table></td></tr></table></body></html>",
        row("2024-01-20", "מועד א חלקי א 3", "סמסטר א"),
        row("2024-02-15", "מועד ב חלקי ב 3", "סמסטר א"),
        row("2024-07-01", "מועד א חלקי א 3", "סמסטר ב"),
    )
}

fn sources_for(server: &MockServer) -> SourcesConfig {
    let base = server.uri();
    SourcesConfig {
        schedule_url: format!("{}/get_course.php", base),
        syllabus_url: format!("{}/NewSyl/{{course}}/1/{{year}}/", base),
        shnaton_url: format!("{}/index.php", base),
    }
}

async fn mount_schedule(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/get_course.php"))
        .and(query_param("course", COURSE))
        .and(query_param("year", YEAR.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_syllabus(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/NewSyl/{}/1/{}/", COURSE, YEAR)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_exams(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(body_string_contains("peula=CourseD"))
        .and(body_string_contains("detail=examDates"))
        .respond_with(ResponseTemplate::new(200).set_body_string(exams_page()))
        .mount(server)
        .await;
}

async fn mount_general_info(server: &MockServer, body: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(body_string_contains("peula=Simple"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn create_aggregator(sources: SourcesConfig, dir: &TempDir) -> CourseAggregator<FileStore> {
    let fetch = FetchClient::new(&FetchConfig::default()).expect("Failed to build client");
    let store = FileStore::open(dir.path()).expect("Failed to open store");
    CourseAggregator::new(fetch, sources, store)
}

fn identity() -> CourseIdentity {
    CourseIdentity::new(COURSE, YEAR, Semester::A)
}

#[tokio::test]
async fn test_full_aggregation_from_syllabus() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    mount_syllabus(&server, &syllabus_page()).await;
    mount_exams(&server).await;
    mount_general_info(&server, &general_info_page("unused"), 0).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let record = aggregator.aggregate(&identity()).await.unwrap();

    assert_eq!(record.general.course_number, COURSE);
    assert_eq!(record.general.course_name, "מבוא למדעי המחשב");
    assert_eq!(record.general.faculty, "מדעי המחשב");
    assert_eq!(record.general.credits, "5");
    assert_eq!(record.general.responsible_person, "פרופ' לוי");
    assert_eq!(
        record.general.exam_date_a.as_deref(),
        Some("בתאריך 2024.01.20 יום ה")
    );
    assert_eq!(
        record.general.exam_date_b.as_deref(),
        Some("בתאריך 2024.02.15 יום ו")
    );

    // Semester B hour of the lecture is dropped
    assert_eq!(record.schedule.len(), 2);
    assert_eq!(record.schedule[0].session_type, SessionType::Lecture);
    assert_eq!(record.schedule[0].time_range, "12:00 - 10:00");
    assert_eq!(record.schedule[0].day_of_week, "ב");
    assert_eq!(record.schedule[0].sequence_number, 10);
    assert_eq!(record.schedule[1].session_type, SessionType::Tutorial);
    assert_eq!(record.schedule[1].group, "11");
    assert_eq!(record.schedule[1].sequence_number, 11);

    let saved = aggregator.store().load(&identity()).unwrap().unwrap();
    assert_eq!(saved.general, record.general);
    assert!(dir.path().join("67101_2024_1.txt").is_file());
}

#[tokio::test]
async fn test_fallback_to_general_info() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    mount_syllabus(&server, NO_SYLLABUS_PAGE).await;
    mount_exams(&server).await;
    mount_general_info(&server, &general_info_page("הפקולטה למדעי הטבע"), 1).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let record = aggregator.aggregate(&identity()).await.unwrap();

    assert_eq!(record.general.faculty, "הפקולטה למדעי הטבע");
    assert_eq!(record.general.course_name, "מבוא למדעי המחשב");
    assert_eq!(record.general.credits, "");
    assert_eq!(record.general.responsible_person, "");
    assert!(aggregator.store().contains(&identity()));
}

#[tokio::test]
async fn test_missing_identity_persists_nothing() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    mount_syllabus(&server, NO_SYLLABUS_PAGE).await;
    mount_exams(&server).await;
    // The general info page exists but names no faculty
    mount_general_info(&server, &general_info_page(""), 1).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let failure = aggregator.aggregate(&identity()).await.unwrap_err();

    assert_eq!(failure.course_id, COURSE);
    assert!(matches!(failure.cause, FailureCause::MissingIdentity));
    assert!(!aggregator.store().contains(&identity()));
}

#[tokio::test]
async fn test_malformed_fallback_page_fails_course() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    mount_syllabus(&server, NO_SYLLABUS_PAGE).await;
    mount_exams(&server).await;
    mount_general_info(&server, "<html><body><p>Not found</p></body></html>", 1).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let failure = aggregator.aggregate(&identity()).await.unwrap_err();

    assert!(matches!(
        failure.cause,
        FailureCause::Collect(CollectError::MalformedResponse {
            source_name: "general info",
            ..
        })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unknown_session_type_fails_course() {
    let server = MockServer::start().await;
    let schedule = r#"{"lessons": [{"teacher": "x", "group": "1", "type": "סמינר", "hours": []}]}"#;
    mount_schedule(&server, schedule).await;
    mount_syllabus(&server, &syllabus_page()).await;
    mount_exams(&server).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let failure = aggregator.aggregate(&identity()).await.unwrap_err();

    assert!(matches!(
        failure.cause,
        FailureCause::Collect(CollectError::UnknownSessionType(ref label)) if label == "סמינר"
    ));
    assert!(!aggregator.store().contains(&identity()));
}

#[tokio::test]
async fn test_unreachable_source_fails_course() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    mount_syllabus(&server, &syllabus_page()).await;

    let sources = SourcesConfig {
        // Nothing listens on port 1
        shnaton_url: "http://127.0.0.1:1/index.php".to_string(),
        ..sources_for(&server)
    };

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources, &dir);

    let failure = aggregator.aggregate(&identity()).await.unwrap_err();

    match failure.cause {
        FailureCause::Collect(CollectError::SourceUnreachable { source_name, url, .. }) => {
            assert_eq!(source_name, "exam dates");
            assert_eq!(url, "http://127.0.0.1:1/index.php");
        }
        other => panic!("expected SourceUnreachable, got {:?}", other),
    }
    assert!(!aggregator.store().contains(&identity()));
}

#[tokio::test]
async fn test_aggregation_is_idempotent() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    mount_syllabus(&server, &syllabus_page()).await;
    mount_exams(&server).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);
    let file = dir.path().join(record_file_name(&identity()));

    aggregator.aggregate(&identity()).await.unwrap();
    let first = std::fs::read(&file).unwrap();

    aggregator.aggregate(&identity()).await.unwrap();
    let second = std::fs::read(&file).unwrap();

    assert_eq!(first, second);
    // No staging file is left behind
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    let text = String::from_utf8(second).unwrap();
    assert!(text.contains("מבוא למדעי המחשב"));
}

#[tokio::test]
async fn test_error_status_body_is_parsed_not_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_course.php"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("<html><body>Internal Server Error</body></html>"),
        )
        .mount(&server)
        .await;
    mount_syllabus(&server, &syllabus_page()).await;
    mount_exams(&server).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let failure = aggregator.aggregate(&identity()).await.unwrap_err();

    assert!(matches!(
        failure.cause,
        FailureCause::Collect(CollectError::MalformedResponse {
            source_name: "timetable",
            ..
        })
    ));
    assert!(!aggregator.store().contains(&identity()));
}

#[tokio::test]
async fn test_error_status_with_valid_body_still_parses() {
    let server = MockServer::start().await;
    mount_schedule(&server, SCHEDULE_BODY).await;
    Mock::given(method("GET"))
        .and(path(format!("/NewSyl/{}/1/{}/", COURSE, YEAR)))
        .respond_with(ResponseTemplate::new(404).set_body_string(syllabus_page()))
        .mount(&server)
        .await;
    mount_exams(&server).await;

    let dir = TempDir::new().unwrap();
    let aggregator = create_aggregator(sources_for(&server), &dir);

    let record = aggregator.aggregate(&identity()).await.unwrap();

    assert_eq!(record.general.course_name, "מבוא למדעי המחשב");
    assert_eq!(record.general.credits, "5");
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_course.php"))
        .and(header("user-agent", "HujiCheeseTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SCHEDULE_BODY))
        .expect(1)
        .mount(&server)
        .await;
    mount_syllabus(&server, &syllabus_page()).await;
    mount_exams(&server).await;

    let fetch_config = FetchConfig {
        user_agent: "HujiCheeseTest/1.0".to_string(),
        ..FetchConfig::default()
    };
    let fetch = FetchClient::new(&fetch_config).unwrap();
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let aggregator = CourseAggregator::new(fetch, sources_for(&server), store);

    aggregator.aggregate(&identity()).await.unwrap();
}
