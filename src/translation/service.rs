use async_trait::async_trait;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::google::GoogleTranslate;
use crate::providers::libretranslate::LibreTranslate;
use crate::providers::TranslationBackend;

// @module: Per-run translation service construction

// @enum: Available backend implementations
#[derive(Debug)]
enum BackendImpl {
    // @variant: Google web translate endpoint
    Google {
        // @field: Client instance
        client: GoogleTranslate,
    },

    // @variant: LibreTranslate server
    LibreTranslate {
        // @field: Client instance
        client: LibreTranslate,
    },
}

/// Translation service bound to one run.
///
/// Constructed from an immutable config per run, so concurrent runs with
/// different language pairs or providers never share mutable state.
#[derive(Debug)]
pub struct TranslationService {
    // @field: Backend implementation
    backend: BackendImpl,
}

impl TranslationService {
    /// Create a new translation service from configuration.
    ///
    /// Fails fast with `TranslationError::BackendUnavailable` when the
    /// configured endpoint cannot produce a usable client; a run without
    /// a backend could not translate a single entry.
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        let endpoint = config.get_endpoint();
        validate_endpoint(&endpoint)?;

        let backend = match config.provider {
            TranslationProvider::Google => BackendImpl::Google {
                client: GoogleTranslate::new_with_config(
                    endpoint,
                    config.timeout_secs,
                    config.max_retries,
                    config.backoff_base_ms,
                ),
            },
            TranslationProvider::LibreTranslate => BackendImpl::LibreTranslate {
                client: LibreTranslate::new(endpoint, config.api_key.clone(), config.timeout_secs),
            },
        };

        Ok(Self { backend })
    }
}

/// Endpoint must be an absolute http(s) URL with a host
fn validate_endpoint(endpoint: &str) -> Result<(), TranslationError> {
    let url = Url::parse(endpoint).map_err(|e| {
        TranslationError::BackendUnavailable(format!("invalid endpoint '{}': {}", endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(TranslationError::BackendUnavailable(format!(
            "endpoint '{}' is not an http(s) URL",
            endpoint
        )));
    }

    Ok(())
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate_batch(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        match &self.backend {
            BackendImpl::Google { client } => {
                client
                    .translate_batch(text, source_language, target_language)
                    .await
            }
            BackendImpl::LibreTranslate { client } => {
                client
                    .translate_batch(text, source_language, target_language)
                    .await
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.backend {
            BackendImpl::Google { client } => client.test_connection().await,
            BackendImpl::LibreTranslate { client } => client.test_connection().await,
        }
    }

    fn name(&self) -> &'static str {
        match &self.backend {
            BackendImpl::Google { .. } => "Google",
            BackendImpl::LibreTranslate { .. } => "LibreTranslate",
        }
    }
}
