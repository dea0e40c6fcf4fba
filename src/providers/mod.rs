/*!
 * Provider implementations for translation services.
 *
 * This module contains client implementations for the supported
 * machine-translation backends:
 * - Google: the public web translate endpoint
 * - LibreTranslate: a self-hosted LibreTranslate server
 *
 * The mock backend lives here too so tests and benches can exercise the
 * pipeline without the network.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// A backend translates one opaque blob of text per call. It is treated
/// as untrusted: nothing guarantees it preserves separators or line
/// structure, so callers must verify alignment themselves.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate a text from the source language to the target language
    ///
    /// # Arguments
    /// * `text` - The text to translate (possibly several joined segments)
    /// * `source_language` - ISO 639-1 source code
    /// * `target_language` - ISO 639-1 target code
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate_batch(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the backend
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Human-readable backend name for logs
    fn name(&self) -> &'static str;
}

pub mod google;
pub mod libretranslate;
pub mod mock;
