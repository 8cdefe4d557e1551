use serde::{Deserialize, Serialize};

/// Main configuration structure for rsys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Responsys account and API location
    #[serde(default)]
    pub responsys: ResponsysConfig,

    /// Try-request settings applied to every API call
    #[serde(default)]
    pub request: RequestConfig,

    /// Client-side rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Listing pagination
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Responsys account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResponsysConfig {
    /// Login host for the account's pod.
    ///
    /// Pod 2: `https://login2.responsys.net`, pod 5: `https://login5.responsys.net`.
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,

    /// REST API version used in resource paths
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Account user name for password login
    #[serde(default)]
    pub user_name: Option<String>,

    /// Account password for password login
    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Refresh the token automatically before it expires
    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// How long before expiry an automatic refresh happens, in seconds
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
}

fn default_login_base_url() -> String {
    "https://login2.responsys.net".to_string()
}

fn default_api_version() -> String {
    "v1.3".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_refresh_margin_secs() -> u64 {
    600
}

impl Default for ResponsysConfig {
    fn default() -> Self {
        Self {
            login_base_url: default_login_base_url(),
            api_version: default_api_version(),
            user_name: None,
            password: None,
            auto_refresh: default_true(),
            refresh_margin_secs: default_refresh_margin_secs(),
        }
    }
}

/// Try-request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestConfig {
    /// Number of attempts made for an API call before giving up
    #[serde(default = "default_times_to_try")]
    pub times_to_try: u32,

    /// Wait before the second attempt, in milliseconds; doubles per attempt
    #[serde(default = "default_wait_ms")]
    pub wait_before_next_attempt_ms: u64,

    /// Upper bound for the wait between attempts, in milliseconds
    #[serde(default = "default_wait_ms")]
    pub max_wait_ms: u64,

    /// Status codes accepted as success
    #[serde(default = "default_target_status_codes")]
    pub target_status_codes: Vec<u16>,

    /// Seconds to wait for an API call before timing out
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: f64,
}

const fn default_times_to_try() -> u32 {
    3
}

const fn default_wait_ms() -> u64 {
    30_000
}

fn default_target_status_codes() -> Vec<u16> {
    vec![200]
}

const fn default_request_timeout_secs() -> f64 {
    20.0
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            times_to_try: default_times_to_try(),
            wait_before_next_attempt_ms: default_wait_ms(),
            max_wait_ms: default_wait_ms(),
            target_status_codes: default_target_status_codes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const fn default_requests_per_second() -> f64 {
    5.0
}

const fn default_burst_size() -> u32 {
    5
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationConfig {
    /// Records requested per page (Responsys caps listings at 200)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Stop following `next` links after this many pages
    #[serde(default)]
    pub max_pages: Option<u32>,
}

const fn default_page_size() -> u32 {
    200
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Also log to the console when a log directory is set
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_stdout: default_true(),
            rotation: default_rotation(),
        }
    }
}
