/*!
 * Common test utilities for the subtran test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use subtran::subtitle_processor::SubtitleEntry;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small well-formed SRT document
pub const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nThis is a test subtitle.\n\n2\n00:00:05,000 --> 00:00:09,000\nIt contains multiple entries.\nAcross two lines.\n\n3\n00:00:10,000 --> 00:00:14,000\nFor testing purposes.\n\n";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Builds n entries with predictable text ("line 0" .. "line n-1")
pub fn make_entries(n: usize) -> Vec<SubtitleEntry> {
    (0..n)
        .map(|i| {
            SubtitleEntry::new(
                (i + 1).to_string(),
                format!("00:00:{:02},000 --> 00:00:{:02},500", i, i),
                format!("line {}", i),
            )
        })
        .collect()
}
