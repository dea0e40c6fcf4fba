use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

use crate::app_config::DownloadConfig;
use crate::errors::DownloadError;
use crate::language_utils;
use crate::sources::{SubtitleCandidate, SubtitleSource};

/// Client for the OpenSubtitles REST search endpoint.
///
/// The endpoint answers `GET /search/query-{query}/sublanguageid-{lang}`
/// with a JSON array of subtitle records. Language ids are ISO 639-2/B.
#[derive(Debug)]
pub struct OpenSubtitles {
    /// Base URL of the REST endpoint
    base_url: String,
    /// User agent the service requires on every request
    user_agent: String,
    /// HTTP client for making requests
    client: Client,
}

impl OpenSubtitles {
    /// Create a client from the download configuration
    pub fn new(config: &DownloadConfig) -> Self {
        Self {
            base_url: config.search_endpoint.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Map one JSON record to a candidate; records missing a download
    /// link are useless and dropped
    fn candidate_from_record(
        record: &serde_json::Value,
        query: &str,
        language: &str,
    ) -> Option<SubtitleCandidate> {
        let download_url = record.get("SubDownloadLink")?.as_str()?.to_string();
        if download_url.is_empty() {
            return None;
        }

        let title = match (
            record.get("MovieName").and_then(|v| v.as_str()),
            record.get("MovieYear").and_then(|v| v.as_str()),
        ) {
            (Some(name), Some(year)) => format!("{} ({})", name, year),
            (Some(name), None) => name.to_string(),
            _ => query.to_string(),
        };

        let rating = record
            .get("SubRating")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(0.0);

        let downloads = record
            .get("SubDownloadsCnt")
            .and_then(|v| v.as_str())
            .and_then(|s| s.replace(',', "").parse::<u64>().ok())
            .unwrap_or(0);

        Some(SubtitleCandidate {
            title,
            download_url,
            language: language.to_string(),
            rating,
            downloads,
            release: record
                .get("MovieReleaseName")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string(),
            uploader: record
                .get("UserNickName")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("OpenSubtitles")
                .to_string(),
            size: record
                .get("SubSize")
                .and_then(|v| v.as_str())
                .map(|s| format!("{} bytes", s))
                .unwrap_or_else(|| "unknown".to_string()),
            source: "OpenSubtitles".to_string(),
        })
    }
}

#[async_trait]
impl SubtitleSource for OpenSubtitles {
    fn name(&self) -> &'static str {
        "OpenSubtitles"
    }

    async fn search(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<SubtitleCandidate>, DownloadError> {
        let catalog_code = language_utils::to_subtitle_catalog_code(language)
            .unwrap_or_else(|_| "eng".to_string());

        let url = format!(
            "{}/search/query-{}/sublanguageid-{}",
            self.base_url,
            urlencode(query),
            catalog_code
        );
        debug!("OpenSubtitles search: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .header("X-User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("OpenSubtitles search rejected: HTTP {}", status);
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let records: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

        let candidates: Vec<SubtitleCandidate> = records
            .iter()
            .filter_map(|record| Self::candidate_from_record(record, query, language))
            .collect();

        debug!(
            "OpenSubtitles returned {} usable candidate(s) for '{}'",
            candidates.len(),
            query
        );

        Ok(candidates)
    }
}

/// Percent-encode the query path segment; spaces become %20
fn urlencode(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for byte in query.trim().bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
