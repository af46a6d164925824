use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::SummarizerConfig,
    error::{AppError, Result},
    integrations::Summarizer,
};

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

/// HTTP client for the summarization endpoint configured in
/// `summarizer.endpoint`.
pub struct HttpSummarizer {
    config: SummarizerConfig,
    client: reqwest::Client,
}

impl HttpSummarizer {
    pub fn new(config: Option<SummarizerConfig>) -> Option<Self> {
        config.and_then(|cfg| {
            if cfg.enabled {
                Some(Self {
                    config: cfg,
                    client: reqwest::Client::new(),
                })
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    fn name(&self) -> &str {
        "Summarizer"
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn health_check(&self) -> Result<()> {
        if self.config.endpoint.is_empty() {
            return Err(AppError::External(
                "Summarizer endpoint not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&SummarizeRequest { text });

        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::External(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::External(e.to_string()))?;

        let body: SummarizeResponse = response
            .json()
            .await
            .map_err(|e| AppError::External(e.to_string()))?;

        Ok(body.summary)
    }
}
