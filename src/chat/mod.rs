//! Chat service: persona prompt → provider call → history record.
//!
//! [`ChatService::respond`] never surfaces a provider failure. A failed call
//! becomes the fixed fallback reply and an unconfigured provider becomes the
//! simulated reply; both are flagged `degraded` and still recorded.

pub mod history;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::avatar::{self, Avatar};
use crate::db::{with_conn, SharedConnection};
use crate::models::ModelRegistry;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("avatar not found: {0}")]
    AvatarNotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatInput {
    pub avatar_id: String,
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub avatar_name: String,
    pub model_used: String,
    /// `true` when the reply is a fallback or simulated text rather than provider output.
    pub degraded: bool,
}

#[derive(Clone)]
pub struct ChatService {
    db: SharedConnection,
    models: Arc<ModelRegistry>,
}

impl ChatService {
    pub fn new(db: SharedConnection, models: Arc<ModelRegistry>) -> Self {
        Self { db, models }
    }

    pub async fn respond(&self, input: ChatInput) -> Result<ChatReply, ChatError> {
        let avatar_id = input.avatar_id.clone();
        let avatar = with_conn(&self.db, move |conn| avatar::store::get_avatar(conn, &avatar_id))
            .await?
            .ok_or_else(|| ChatError::AvatarNotFound(input.avatar_id.clone()))?;

        let model_used = self.models.resolve_id(input.model.as_deref()).to_string();
        let (response, degraded) = self.generate(&avatar, &input.message, &model_used).await;

        let avatar_id = avatar.id.clone();
        let message = input.message;
        let stored_response = response.clone();
        with_conn(&self.db, move |conn| {
            history::record_chat(conn, &avatar_id, &message, &stored_response)
        })
        .await?;

        tracing::info!(
            avatar_id = %avatar.id,
            model = %model_used,
            degraded,
            response_len = response.len(),
            "chat turn recorded"
        );

        Ok(ChatReply {
            response,
            avatar_name: avatar.name,
            model_used,
            degraded,
        })
    }

    /// Returns the reply text and whether it is degraded.
    async fn generate(&self, avatar: &Avatar, message: &str, model_id: &str) -> (String, bool) {
        let Some(model) = self.models.resolve(Some(model_id)) else {
            return (prompt::simulated_reply(avatar, message), true);
        };

        let persona_prompt = prompt::build_persona_prompt(avatar, message);
        match model.generate(&persona_prompt).await {
            Ok(text) => (text.trim().to_string(), false),
            Err(err) => {
                tracing::error!(model = %model.id(), error = %err, "generation provider failed");
                (prompt::fallback_reply(avatar, message), true)
            }
        }
    }
}
