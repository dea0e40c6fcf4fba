/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;
use std::path::PathBuf;

use subtran::file_utils::FileManager;

use crate::common;

/// Output names follow the <stem>.<lang>.srt convention
#[test]
fn test_generateOutputPath_shouldAppendLanguageCode() {
    let path = FileManager::generate_output_path(
        PathBuf::from("/subs/movie.srt"),
        PathBuf::from("/out"),
        "tr",
    );

    assert_eq!(path, PathBuf::from("/out/movie.tr.srt"));
}

/// Movie-name outputs are filesystem safe
#[test]
fn test_generateSearchOutputPath_shouldSanitizeMovieName() {
    let path = FileManager::generate_search_output_path(
        PathBuf::from("/out"),
        "The Matrix / Reloaded",
        "es",
    );

    assert_eq!(path, PathBuf::from("/out/The_Matrix___Reloaded.es.srt"));
}

/// Directory scans find nested .srt files, case-insensitively
#[test]
fn test_findSrtFiles_shouldFindNestedFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    common::create_test_subtitle(&root, "a.srt")?;
    common::create_test_file(&root, "notes.txt", "not a subtitle")?;

    let nested = root.join("season1");
    FileManager::ensure_dir(&nested)?;
    common::create_test_subtitle(&nested, "b.SRT")?;

    let found = FileManager::find_srt_files(&root)?;
    assert_eq!(found.len(), 2);

    Ok(())
}

/// The SRT probe accepts real content and rejects prose
#[test]
fn test_looksLikeSrt_shouldDetectSrtShape() {
    assert!(FileManager::looks_like_srt(common::SAMPLE_SRT));
    assert!(FileManager::looks_like_srt(
        "1\r\n00:00:01,000 --> 00:00:02,000\r\nCRLF content\r\n"
    ));

    assert!(!FileManager::looks_like_srt("Just some text mentioning -->"));
    assert!(!FileManager::looks_like_srt("<html><body>error page</body></html>"));
}

/// Log appends carry a timestamp prefix and accumulate
#[test]
fn test_appendToLogFile_shouldAccumulateLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log_path, "first")?;
    FileManager::append_to_log_file(&log_path, "second")?;

    let content = FileManager::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("first"));
    assert!(lines[1].ends_with("second"));

    Ok(())
}

/// write_to_file creates missing parent directories
#[test]
fn test_writeToFile_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep/nested/out.srt");

    FileManager::write_to_file(&path, "content")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "content");

    Ok(())
}
