pub mod client;
pub mod response;

pub use client::AnalysisClient;
pub use response::AnalysisError;
