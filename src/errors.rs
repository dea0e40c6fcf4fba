/*!
 * Error types for the subtran application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a translation provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// Errors that can occur when reading subtitle input
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The input stream could not be read as UTF-8 text.
    /// Parsing a string never fails; only the I/O layer can.
    #[error("Input is not readable as text: {0}")]
    UnreadableInput(String),
}

/// Errors that can occur while searching for or downloading subtitles
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The search or download request could not be sent
    #[error("Download request failed: {0}")]
    RequestFailed(String),

    /// The remote host answered with a non-success status
    #[error("Download rejected with HTTP status {0}")]
    HttpStatus(u16),

    /// The response body was empty
    #[error("Downloaded subtitle payload is empty")]
    EmptyPayload,

    /// The response body is not valid UTF-8 text
    #[error("Downloaded subtitle payload is not valid UTF-8")]
    InvalidEncoding,
}

/// Errors that can occur during a translation run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The configured backend could not be constructed; no entry could
    /// possibly be translated, so the run fails before it starts
    #[error("Translation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with subtitle input
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle input
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the subtitle download path
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
