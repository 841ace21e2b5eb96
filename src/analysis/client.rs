use reqwest::{header::CONTENT_TYPE, Client};

use crate::{config::AnalysisConfig, domain::Classification};

use super::response::{parse_body, AnalysisError, ANALYSE_PATH};

#[derive(Clone)]
pub struct AnalysisClient {
    http: Client,
    config: AnalysisConfig,
}

impl AnalysisClient {
    pub fn new(http: Client, config: AnalysisConfig) -> Self {
        Self { http, config }
    }

    /// Submits a navigated URL for analysis. Fire-and-forget from the caller's
    /// point of view: no retry, no timeout, no cancellation.
    ///
    /// The server reads the URL from the raw request body; the form content
    /// type is what its endpoint declares.
    pub async fn classify(&self, url: &str) -> Result<Classification, AnalysisError> {
        let endpoint = format!("{}{}", self.config.base_url, ANALYSE_PATH);
        let response = self
            .http
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(url.to_string())
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_body(&body)
    }
}
