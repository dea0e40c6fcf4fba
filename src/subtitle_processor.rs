use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use log::{warn, debug};

use crate::errors::SubtitleError;

// @module: SRT document parsing and serialization

// @const: SRT timing line regex (HH:MM:SS,mmm --> HH:MM:SS,mmm)
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3} --> \d{2}:\d{2}:\d{2},\d{3}$").unwrap()
});

// @struct: Single subtitle entry
//
// The index and timing line are opaque tokens copied verbatim from the
// source file and re-emitted unchanged. No time arithmetic is ever
// performed on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Positional label from the file, preserved verbatim
    pub index: String,

    // @field: Literal timing line, preserved verbatim
    pub time_range: String,

    // @field: Subtitle body; may be empty, internal line breaks preserved
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(index: impl Into<String>, time_range: impl Into<String>, text: impl Into<String>) -> Self {
        SubtitleEntry {
            index: index.into(),
            time_range: time_range.into(),
            text: text.into(),
        }
    }

    /// Whether this entry carries any translatable text
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Copy of this entry with the text replaced, index and timing kept
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        SubtitleEntry {
            index: self.index.clone(),
            time_range: self.time_range.clone(),
            text: text.into(),
        }
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.time_range)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// An ordered SRT document
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// Where the document came from, when read from disk
    pub source_file: Option<PathBuf>,

    /// Entries in file order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Create an empty document
    pub fn new() -> Self {
        SubtitleDocument {
            source_file: None,
            entries: Vec::new(),
        }
    }

    /// Wrap an existing entry sequence
    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        SubtitleDocument {
            source_file: None,
            entries,
        }
    }

    /// Read and parse an SRT file.
    ///
    /// Reading is the only fallible step: a file that cannot be decoded
    /// as UTF-8 text surfaces `SubtitleError::UnreadableInput`.
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

        let content = String::from_utf8(bytes).map_err(|e| {
            SubtitleError::UnreadableInput(format!("{}: {}", path.display(), e))
        })?;

        let entries = Self::parse(&content);
        Ok(SubtitleDocument {
            source_file: Some(path.to_path_buf()),
            entries,
        })
    }

    /// Parse SRT text into entries.
    ///
    /// Lenient by contract: blocks that do not match the
    /// index/timing/text shape are skipped, never an error. Given a
    /// string this function cannot fail.
    pub fn parse(content: &str) -> Vec<SubtitleEntry> {
        let mut entries = Vec::new();

        // Blocks are separated by blank lines; a leading BOM on the first
        // index line would otherwise break the index match.
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let content = content.replace("\r\n", "\n");

        let mut skipped = 0usize;
        for block in content.split("\n\n") {
            // Runs of blank lines leave stray newlines on the block
            let block = block.trim_matches('\n');
            if block.trim().is_empty() {
                continue;
            }

            match Self::parse_block(block) {
                Some(entry) => entries.push(entry),
                None => {
                    skipped += 1;
                    debug!("Skipping malformed subtitle block: {:?}",
                           block.lines().next().unwrap_or(""));
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} malformed subtitle block(s)", skipped);
        }

        entries
    }

    /// Parse one blank-line-delimited block: index line, timing line,
    /// then text lines. Returns None for anything else.
    fn parse_block(block: &str) -> Option<SubtitleEntry> {
        let mut lines = block.lines();

        let index = lines.next()?.trim();
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let timing = lines.next()?.trim();
        if !TIMING_LINE_REGEX.is_match(timing) {
            return None;
        }

        // Remaining lines are the body; trim the whole body but keep the
        // internal line breaks. An empty body is a valid entry.
        let text = lines.collect::<Vec<&str>>().join("\n");
        Some(SubtitleEntry::new(index, timing, text.trim()))
    }

    /// Serialize entries back to SRT text, in input order.
    ///
    /// Left inverse of [`parse`](Self::parse) for well-formed input:
    /// parse(serialize(parse(x))) == parse(x).
    pub fn serialize(entries: &[SubtitleEntry]) -> String {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&entry.to_string());
        }
        out
    }

    /// Write this document to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, Self::serialize(&self.entries))
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }

    /// Number of entries in the document
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SubtitleDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        if let Some(source) = &self.source_file {
            writeln!(f, "Source: {}", source.display())?;
        }
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
