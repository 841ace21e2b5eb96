pub mod env;
mod loader;

pub use env::{AnalysisConfig, AppConfig, DirectoryConfig, LoggingConfig};
pub use loader::load_config;
