use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the analysis server; the `/api/analyse` path is appended.
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
