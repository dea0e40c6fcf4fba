/*!
 * Subtitle catalog sources.
 *
 * A source answers a movie-name query with ranked download candidates.
 * Site-specific matching lives behind the `SubtitleSource` trait so a
 * source can be replaced wholesale; the rest of the crate only needs a
 * candidate's download URL to yield bytes the SRT parser can consume.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::DownloadError;

/// One downloadable subtitle result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleCandidate {
    /// Movie title as the catalog lists it
    pub title: String,
    /// Direct download URL for the subtitle payload
    pub download_url: String,
    /// Subtitle language code
    pub language: String,
    /// Catalog rating, 0.0 when unrated
    pub rating: f32,
    /// Download count, popularity signal
    pub downloads: u64,
    /// Release name the subtitle was synced against
    pub release: String,
    /// Uploader name
    pub uploader: String,
    /// Payload size as the catalog reports it
    pub size: String,
    /// Which source produced this candidate
    pub source: String,
}

impl SubtitleCandidate {
    /// Quality score used to rank candidates across sources: source
    /// reliability, rating, capped download count and release-tag bonus.
    pub fn quality_score(&self) -> f32 {
        let mut score = source_reliability(&self.source) as f32;

        score += self.rating;
        score += (self.downloads as f32 / 1000.0).min(10.0);

        let release = self.release.to_lowercase();
        if release.contains("bluray") || release.contains("blu-ray") {
            score += 3.0;
        } else if release.contains("web-dl") || release.contains("webdl") {
            score += 2.0;
        } else if release.contains("hdtv") {
            score += 1.0;
        }

        score
    }
}

/// Relative trust in a source's metadata
fn source_reliability(source: &str) -> u32 {
    match source {
        "OpenSubtitles" => 10,
        "Podnapisi" => 7,
        "Subscene" => 4,
        "YIFY" => 3,
        _ => 0,
    }
}

/// Sort candidates best-first by quality score
pub fn rank_candidates(mut candidates: Vec<SubtitleCandidate>) -> Vec<SubtitleCandidate> {
    candidates.sort_by(|a, b| {
        b.quality_score()
            .partial_cmp(&a.quality_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// A queryable subtitle catalog
#[async_trait]
pub trait SubtitleSource: Send + Sync + Debug {
    /// Source name shown in candidate listings
    fn name(&self) -> &'static str;

    /// Search the catalog for subtitles matching a movie name
    ///
    /// # Arguments
    /// * `query` - Movie name, free text
    /// * `language` - ISO 639-1 subtitle language code
    async fn search(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<SubtitleCandidate>, DownloadError>;
}

pub mod opensubtitles;
