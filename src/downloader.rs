use anyhow::{anyhow, Result};
use futures::future::join_all;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

use crate::app_config::DownloadConfig;
use crate::errors::DownloadError;
use crate::sources::opensubtitles::OpenSubtitles;
use crate::sources::{rank_candidates, SubtitleCandidate, SubtitleSource};

// @module: Multi-source subtitle search and download

/// Searches every registered catalog and downloads the chosen candidate
#[derive(Debug)]
pub struct SubtitleDownloader {
    // @field: Registered catalog sources
    sources: Vec<Box<dyn SubtitleSource>>,

    // @field: Client for payload downloads
    client: Client,

    // @field: User agent sent with downloads
    user_agent: String,

    // @field: Maximum ranked candidates to keep
    max_results: usize,
}

impl SubtitleDownloader {
    /// Create a downloader with the default source set
    pub fn new(config: &DownloadConfig) -> Self {
        let sources: Vec<Box<dyn SubtitleSource>> = vec![Box::new(OpenSubtitles::new(config))];
        Self::with_sources(config, sources)
    }

    /// Create a downloader over an explicit source set
    pub fn with_sources(config: &DownloadConfig, sources: Vec<Box<dyn SubtitleSource>>) -> Self {
        Self {
            sources,
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            user_agent: config.user_agent.clone(),
            max_results: config.max_results,
        }
    }

    /// Search every source concurrently and return ranked candidates.
    ///
    /// A source that errors is logged and skipped; the search only fails
    /// when no source produced anything.
    pub async fn search(&self, query: &str, language: &str) -> Result<Vec<SubtitleCandidate>> {
        let searches = self
            .sources
            .iter()
            .map(|source| async move { (source.name(), source.search(query, language).await) });

        let mut candidates = Vec::new();
        for (name, result) in join_all(searches).await {
            match result {
                Ok(found) => {
                    info!("{}: {} candidate(s) for '{}'", name, found.len(), query);
                    candidates.extend(found);
                }
                Err(e) => {
                    warn!("{} search failed, skipping source: {}", name, e);
                }
            }
        }

        if candidates.is_empty() {
            return Err(anyhow!("No subtitles found for '{}'", query));
        }

        let mut ranked = rank_candidates(candidates);
        ranked.truncate(self.max_results);
        Ok(ranked)
    }

    /// Download a candidate's payload and decode it as UTF-8 text.
    ///
    /// The payload must be non-empty, decodable text; everything else is
    /// an error so a broken download never reaches the parser silently.
    pub async fn download(&self, candidate: &SubtitleCandidate) -> Result<String, DownloadError> {
        info!("Downloading subtitle from {}", candidate.source);

        let response = self
            .client
            .get(&candidate.download_url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::RequestFailed(e.to_string()))?;

        if bytes.is_empty() {
            return Err(DownloadError::EmptyPayload);
        }

        String::from_utf8(bytes.to_vec()).map_err(|_| DownloadError::InvalidEncoding)
    }
}
