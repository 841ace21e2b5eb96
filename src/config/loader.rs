use std::env;

use url::Url;

use super::env::{AnalysisConfig, AppConfig, ConfigError, DirectoryConfig, LoggingConfig};

/// The analysis server the original extension shipped with; override with
/// ANALYSIS_SERVER_URL.
const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("ANALYSIS_SERVER_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        // Fail at startup rather than on the first navigation.
        Url::parse(&base_url).map_err(|_| ConfigError::Invalid {
            key: "ANALYSIS_SERVER_URL",
            value: base_url.clone(),
        })?;

        let analysis = AnalysisConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            analysis,
            directories,
            logging,
        })
    }
}
