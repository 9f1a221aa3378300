//! Generative-language provider seam.
//!
//! Provides the [`GenerationProvider`] trait (hands out per-model handles) and
//! [`GenerativeModel`] (turns a prompt into text). The only concrete provider is
//! the Gemini REST client in [`gemini`], created via [`create_provider`].

pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ZenyConfig;

/// Why a provider call produced no text.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response contained no text")]
    EmptyResponse,
}

/// A live handle to one provider model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Provider identifier of this model (e.g. `gemini-2.5-flash`).
    fn id(&self) -> &str;

    /// Generate a completion for a single prompt string.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// A model listed by the provider itself, as opposed to the static registry table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteModel {
    pub id: String,
    pub display_name: String,
    pub description: String,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Build a handle for `model_id`. Cheap; no network traffic.
    fn model(&self, model_id: &str) -> Arc<dyn GenerativeModel>;

    /// Models the provider reports as supporting text generation.
    async fn list_remote_models(&self) -> Result<Vec<RemoteModel>, ProviderError>;
}

/// Create the generation provider from config.
///
/// Returns `Ok(None)` when no API key is configured; chat then answers with
/// simulated replies.
pub fn create_provider(config: &ZenyConfig) -> anyhow::Result<Option<Arc<dyn GenerationProvider>>> {
    let Some(api_key) = config.provider_api_key() else {
        tracing::warn!("no GEMINI_API_KEY configured, chat will use simulated replies");
        return Ok(None);
    };

    let provider = gemini::GeminiProvider::new(&config.provider, api_key)?;
    tracing::info!(base_url = %config.provider.base_url, "gemini provider ready");
    Ok(Some(Arc::new(provider)))
}
