use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use reqwest::Url;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::infrastructure::responsys::MAX_PAGE_SIZE;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".rsys";

/// Prefix of environment variable overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "RSYS_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid login_base_url: {0:?}. Must be an absolute http(s) URL")]
    InvalidLoginBaseUrl(String),

    #[error("api_version cannot be empty")]
    EmptyApiVersion,

    #[error("Invalid times_to_try: {0}. Must be at least 1")]
    InvalidTimesToTry(u32),

    #[error(
        "Invalid wait configuration: wait_before_next_attempt_ms ({0}) must not exceed max_wait_ms ({1})"
    )]
    InvalidWait(u64, u64),

    #[error("target_status_codes cannot be empty")]
    EmptyTargetStatusCodes,

    #[error("Invalid target status code: {0}. Must be between 100 and 599")]
    InvalidTargetStatusCode(u16),

    #[error("Invalid request_timeout_secs: {0}. Must be positive")]
    InvalidTimeout(f64),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error("Invalid page_size: {0}. Must be between 1 and {MAX_PAGE_SIZE}")]
    InvalidPageSize(u32),

    #[error("Invalid max_pages: 0. Must be at least 1 when set")]
    InvalidMaxPages,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .rsys/config.yaml (project config)
    /// 3. .rsys/local.yaml (local overrides, usually holding credentials)
    /// 4. Environment variables (RSYS_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override values from the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let responsys = &config.responsys;
        match Url::parse(&responsys.login_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => {
                return Err(ConfigError::InvalidLoginBaseUrl(
                    responsys.login_base_url.clone(),
                ));
            }
        }

        if responsys.api_version.trim().is_empty() {
            return Err(ConfigError::EmptyApiVersion);
        }

        let request = &config.request;
        if request.times_to_try == 0 {
            return Err(ConfigError::InvalidTimesToTry(request.times_to_try));
        }

        if request.wait_before_next_attempt_ms > request.max_wait_ms {
            return Err(ConfigError::InvalidWait(
                request.wait_before_next_attempt_ms,
                request.max_wait_ms,
            ));
        }

        if request.target_status_codes.is_empty() {
            return Err(ConfigError::EmptyTargetStatusCodes);
        }

        if let Some(&code) = request
            .target_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(ConfigError::InvalidTargetStatusCode(code));
        }

        if !request.request_timeout_secs.is_finite() || request.request_timeout_secs <= 0.0 {
            return Err(ConfigError::InvalidTimeout(request.request_timeout_secs));
        }

        let rps = config.rate_limit.requests_per_second;
        if rps.is_nan() || rps <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(rps));
        }

        if config.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(config.rate_limit.burst_size));
        }

        let page_size = config.pagination.page_size;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(page_size));
        }

        if config.pagination.max_pages == Some(0) {
            return Err(ConfigError::InvalidMaxPages);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.responsys.login_base_url, "https://login2.responsys.net");
        assert_eq!(config.responsys.api_version, "v1.3");
        assert_eq!(config.request.times_to_try, 3);
        assert_eq!(config.request.wait_before_next_attempt_ms, 30_000);
        assert_eq!(config.request.target_status_codes, vec![200]);
        assert!((config.request.request_timeout_secs - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.pagination.page_size, 200);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
responsys:
  login_base_url: https://login5.responsys.net
  user_name: jdoe
  password: hunter2
request:
  times_to_try: 5
  wait_before_next_attempt_ms: 1000
  max_wait_ms: 8000
  target_status_codes: [200, 201]
pagination:
  page_size: 50
  max_pages: 10
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.responsys.login_base_url, "https://login5.responsys.net");
        assert_eq!(config.responsys.user_name.as_deref(), Some("jdoe"));
        assert_eq!(config.responsys.password.as_deref(), Some("hunter2"));
        assert_eq!(config.request.times_to_try, 5);
        assert_eq!(config.request.max_wait_ms, 8000);
        assert_eq!(config.request.target_status_codes, vec![200, 201]);
        assert_eq!(config.pagination.page_size, 50);
        assert_eq!(config.pagination.max_pages, Some(10));
        assert_eq!(config.logging.format, "json");
        // Sections that are absent keep their defaults
        assert_eq!(config.rate_limit.burst_size, 5);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_password_is_never_serialized() {
        let mut config = Config::default();
        config.responsys.password = Some("hunter2".to_string());

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("hunter2"));
    }

    #[test]
    fn test_validate_relative_login_url() {
        let mut config = Config::default();
        config.responsys.login_base_url = "login2.responsys.net".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLoginBaseUrl(_))
        ));
    }

    #[test]
    fn test_validate_empty_api_version() {
        let mut config = Config::default();
        config.responsys.api_version = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyApiVersion)
        ));
    }

    #[test]
    fn test_validate_zero_times_to_try() {
        let mut config = Config::default();
        config.request.times_to_try = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimesToTry(0))
        ));
    }

    #[test]
    fn test_validate_invalid_wait() {
        let mut config = Config::default();
        config.request.wait_before_next_attempt_ms = 30_000;
        config.request.max_wait_ms = 10_000;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidWait(30_000, 10_000))
        ));
    }

    #[test]
    fn test_validate_target_status_codes() {
        let mut config = Config::default();
        config.request.target_status_codes = vec![];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyTargetStatusCodes)
        ));

        config.request.target_status_codes = vec![200, 700];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTargetStatusCode(700))
        ));
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = Config::default();
        config.request.request_timeout_secs = 0.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimeout(_))
        ));

        config.request.request_timeout_secs = f64::NAN;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_rate_limit() {
        let mut config = Config::default();
        config.rate_limit.requests_per_second = -5.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRateLimit(_))
        ));

        let mut config = Config::default();
        config.rate_limit.burst_size = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBurstSize(0))
        ));
    }

    #[test]
    fn test_validate_page_size() {
        let mut config = Config::default();
        config.pagination.page_size = 201;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPageSize(201))
        ));

        config.pagination.page_size = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPageSize(0))
        ));

        config.pagination.page_size = 100;
        config.pagination.max_pages = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxPages)
        ));
    }

    #[test]
    fn test_validate_logging() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));

        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogRotation(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ConfigLoader::load_from_file("/nonexistent/rsys.yaml").unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pagination:\n  page_size: 500").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "responsys:\n  user_name: from-file\nlogging:\n  level: warn\n  format: json"
        )
        .unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("RSYS_RESPONSYS__USER_NAME", Some("from-env")),
                ("RSYS_RATE_LIMIT__REQUESTS_PER_SECOND", Some("2.5")),
                ("RSYS_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.responsys.user_name.as_deref(), Some("from-env"));
                assert!((config.rate_limit.requests_per_second - 2.5).abs() < f64::EPSILON);
                assert_eq!(config.logging.level, "debug", "Env should win over file");
                assert_eq!(config.logging.format, "json", "File value should persist");
            },
        );
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "request:\n  times_to_try: 5\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(
            override_file,
            "request:\n  times_to_try: 2\nlogging:\n  level: debug"
        )
        .unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.request.times_to_try, 2, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
        assert_eq!(config.request.target_status_codes, vec![200]);
    }
}
