use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for HUJI-Cheese
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub sources: SourcesConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// User agent sent with every request unless a collector overrides it
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Extra default headers, overridden by per-request headers
    pub headers: BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/93.0.4577.63 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            headers: BTreeMap::new(),
        }
    }
}

/// Upstream endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourcesConfig {
    /// JSON timetable service
    pub schedule_url: String,

    /// Syllabus page template with `{course}` and `{year}` placeholders
    pub syllabus_url: String,

    /// Shnaton endpoint serving both the general info and the exam dates pages
    pub shnaton_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            schedule_url: "https://digmi.org/huji/get_course.php".to_string(),
            syllabus_url: "https://shnaton.huji.ac.il/index.php/NewSyl/{course}/1/{year}/"
                .to_string(),
            shnaton_url: "https://shnaton.huji.ac.il/index.php".to_string(),
        }
    }
}

/// Batch scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BatchConfig {
    /// Maximum number of course aggregations in flight
    pub max_concurrent_courses: usize,

    /// Interval between progress reports (milliseconds, 0 disables them)
    pub progress_interval_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_courses: 10,
            progress_interval_ms: 1000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory holding one cached record per course
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "downloaded_courses".to_string(),
        }
    }
}
