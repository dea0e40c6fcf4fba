use async_trait::async_trait;
use log::error;
use reqwest::Client;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Client for the public Google web translate endpoint
/// (`/translate_a/single` with the `gtx` client id).
///
/// The endpoint is unauthenticated and rate-limited, so requests are
/// retried with exponential backoff on server and network errors. Client
/// errors (4xx) are not retried.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Base URL of the translate endpoint
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl GoogleTranslate {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a new client with explicit retry configuration
    pub fn new_with_config(
        base_url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// One request against the endpoint, no retry handling
    async fn request_once(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/translate_a/single", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_translation(&body)
    }

    /// The endpoint answers with nested arrays: the first element is a
    /// list of `[translated_segment, source_segment, ...]` pairs which
    /// concatenate to the full translation.
    fn extract_translation(body: &serde_json::Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                ProviderError::ParseError("Missing translation segments in response".to_string())
            })?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }

        if translated.is_empty() {
            return Err(ProviderError::ParseError(
                "Response contained no translated text".to_string(),
            ));
        }

        Ok(translated)
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    async fn translate_batch(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.request_once(text, source_language, target_language).await {
                Ok(translated) => return Ok(translated),
                Err(ProviderError::ApiError { status_code, message })
                    if (400..500).contains(&status_code) =>
                {
                    // Client error - don't retry
                    error!("Google translate error ({}): {}", status_code, message);
                    return Err(ProviderError::ApiError { status_code, message });
                }
                Err(e) => {
                    error!(
                        "Google translate request failed: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(e);
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Google translate request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.request_once("hello", "en", "fr").await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "Google"
    }
}
