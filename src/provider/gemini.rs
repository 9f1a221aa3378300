//! Gemini `generateContent` REST client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{GenerationProvider, GenerativeModel, ProviderError, RemoteModel};
use crate::config::ProviderConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";

struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Status { status, body });
        }

        Ok(response.json::<T>().await?)
    }
}

/// Gemini provider; hands out [`GeminiModel`] handles sharing one HTTP client.
pub struct GeminiProvider {
    client: Arc<GeminiClient>,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, api_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client: Arc::new(GeminiClient {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }),
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn model(&self, model_id: &str) -> Arc<dyn GenerativeModel> {
        Arc::new(GeminiModel {
            client: Arc::clone(&self.client),
            model_id: model_id.to_string(),
        })
    }

    async fn list_remote_models(&self) -> Result<Vec<RemoteModel>, ProviderError> {
        let url = format!("{}/models?pageSize=1000", self.client.base_url);
        let listing: ListModelsResponse = self.client.send(self.client.http.get(url)).await?;
        Ok(listing.into_generation_models())
    }
}

pub struct GeminiModel {
    client: Arc<GeminiClient>,
    model_id: String,
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:{GENERATE_METHOD}",
            self.client.base_url, self.model_id
        );
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response: GenerateContentResponse =
            self.client.send(self.client.http.post(url).json(&body)).await?;
        response.text().ok_or(ProviderError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any text came back.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ListedModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl ListModelsResponse {
    fn into_generation_models(self) -> Vec<RemoteModel> {
        self.models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_METHOD))
            .map(|m| RemoteModel {
                id: m
                    .name
                    .strip_prefix("models/")
                    .unwrap_or(&m.name)
                    .to_string(),
                display_name: m.display_name,
                description: m.description,
            })
            .collect()
    }
}
