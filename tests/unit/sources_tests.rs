/*!
 * Tests for subtitle candidate ranking
 */

use subtran::sources::{rank_candidates, SubtitleCandidate};

fn candidate(source: &str, rating: f32, downloads: u64, release: &str) -> SubtitleCandidate {
    SubtitleCandidate {
        title: "Some Movie (2020)".to_string(),
        download_url: "https://example.org/sub.srt".to_string(),
        language: "en".to_string(),
        rating,
        downloads,
        release: release.to_string(),
        uploader: "tester".to_string(),
        size: "42000 bytes".to_string(),
        source: source.to_string(),
    }
}

/// Release tags add the documented bonuses
#[test]
fn test_qualityScore_shouldRewardReleaseTags() {
    let bluray = candidate("OpenSubtitles", 5.0, 0, "Movie.2020.BluRay.x264");
    let webdl = candidate("OpenSubtitles", 5.0, 0, "Movie.2020.WEB-DL.x264");
    let hdtv = candidate("OpenSubtitles", 5.0, 0, "Movie.2020.HDTV.x264");
    let plain = candidate("OpenSubtitles", 5.0, 0, "Movie.2020");

    assert_eq!(bluray.quality_score(), plain.quality_score() + 3.0);
    assert_eq!(webdl.quality_score(), plain.quality_score() + 2.0);
    assert_eq!(hdtv.quality_score(), plain.quality_score() + 1.0);
}

/// The download-count contribution is capped
#[test]
fn test_qualityScore_shouldCapDownloadContribution() {
    let popular = candidate("OpenSubtitles", 0.0, 10_000, "");
    let viral = candidate("OpenSubtitles", 0.0, 10_000_000, "");

    assert_eq!(popular.quality_score(), viral.quality_score());
}

/// Known sources outrank unknown ones on otherwise equal records
#[test]
fn test_qualityScore_shouldTrustKnownSources() {
    let known = candidate("OpenSubtitles", 0.0, 0, "");
    let unknown = candidate("RandomSite", 0.0, 0, "");

    assert!(known.quality_score() > unknown.quality_score());
}

/// Ranking sorts best-first and keeps every candidate
#[test]
fn test_rankCandidates_shouldSortBestFirst() {
    let candidates = vec![
        candidate("YIFY", 2.0, 100, ""),
        candidate("OpenSubtitles", 8.0, 50_000, "Movie.BluRay"),
        candidate("Subscene", 5.0, 2_000, "Movie.HDTV"),
    ];

    let ranked = rank_candidates(candidates);

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].source, "OpenSubtitles");
    assert_eq!(ranked[2].source, "YIFY");

    let scores: Vec<f32> = ranked.iter().map(|c| c.quality_score()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}
