//! HTTP server: shared state, the `/api` router, and the [`serve`] entry point.
//!
//! Admin routes take an [`AdminIdentity`] extractor, which rejects the request
//! with 401 unless it carries a valid `Authorization: Bearer` token.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::header::AUTHORIZATION;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{CredentialVerifier, StaticCredentials, TokenService};
use crate::avatar::{self, Avatar, AvatarUpdate, NewAvatar};
use crate::chat::history::{self, ChatRecord};
use crate::chat::{ChatInput, ChatReply, ChatService};
use crate::config::{ZenyConfig, DEFAULT_JWT_SECRET};
use crate::db::{self, with_conn, SharedConnection, MAX_LIST_RESULTS};
use crate::error::ApiError;
use crate::models::{ModelRegistry, ModelsResponse};
use crate::provider::{self, GenerationProvider};
use crate::status::{self, NewStatusCheck, StatusCheck};

pub const API_PREFIX: &str = "/api";

/// Everything a handler needs, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    db: SharedConnection,
    models: Arc<ModelRegistry>,
    chat: ChatService,
    tokens: TokenService,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(
        db: SharedConnection,
        provider: Option<Arc<dyn GenerationProvider>>,
        default_model: impl Into<String>,
        tokens: TokenService,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let models = Arc::new(ModelRegistry::new(provider, default_model));
        let chat = ChatService::new(Arc::clone(&db), Arc::clone(&models));
        Self {
            db,
            models,
            chat,
            tokens,
            credentials,
        }
    }

    /// Open the database and create the provider described by `config`.
    pub fn from_config(config: &ZenyConfig) -> Result<Self> {
        let db_path = config.resolved_db_path();
        let conn = db::open_database(&db_path)?;
        tracing::info!(db = %db_path.display(), "database ready");

        if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
            tracing::warn!("using the default JWT signing key, set JWT_SECRET_KEY to override");
        }

        let provider = provider::create_provider(config)?;
        Ok(Self::new(
            Arc::new(Mutex::new(conn)),
            provider,
            config.provider.default_model.clone(),
            TokenService::new(&config.auth.jwt_secret),
            Arc::new(StaticCredentials::from_config(&config.auth)),
        ))
    }
}

/// The verified identity behind an admin request.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub String);

impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ApiError::Unauthenticated("Not authenticated".into()))?;

        state.tokens.verify(token).map(AdminIdentity).map_err(|err| {
            tracing::debug!(error = %err, "rejected bearer token");
            ApiError::Unauthenticated("Invalid token".into())
        })
    }
}

/// Token from an `Authorization` value; the scheme matches case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(API_PREFIX, get(root))
        .route(&api("/"), get(root))
        .route(&api("/models"), get(list_models))
        .route(&api("/admin/login"), post(admin_login))
        .route(&api("/admin/avatars"), post(create_avatar).get(list_avatars_admin))
        .route(&api("/admin/avatars/{id}"), put(update_avatar).delete(delete_avatar))
        .route(&api("/admin/chat-history"), get(chat_history))
        .route(&api("/avatars"), get(list_avatars_public))
        .route(&api("/avatars/{id}"), get(get_avatar))
        .route(&api("/chat"), post(chat))
        .route(&api("/status"), post(create_status).get(list_status))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn api(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn serve(config: ZenyConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = AppState::from_config(&config)?;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Zeny API listening at http://{bind_addr}{API_PREFIX}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}

#[derive(Serialize)]
struct RootInfo {
    message: &'static str,
    gemini_available: bool,
    default_model: String,
    available_models: usize,
}

async fn root(State(state): State<AppState>) -> Json<RootInfo> {
    Json(RootInfo {
        message: "Welcome to Zeny AI - AI Avatar Communication System",
        gemini_available: state.models.is_available(),
        default_model: state.models.default_model().to_string(),
        available_models: state.models.model_count(),
    })
}

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(state.models.list_available())
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    access_token: String,
    token_type: &'static str,
}

async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(login) = payload?;
    if !state.credentials.verify(&login.username, &login.password) {
        tracing::warn!(username = %login.username, "admin login rejected");
        return Err(ApiError::Unauthenticated("Invalid credentials".into()));
    }

    tracing::info!(username = %login.username, "admin logged in");
    Ok(Json(LoginResponse {
        access_token: state.tokens.issue(&login.username),
        token_type: "bearer",
    }))
}

async fn create_avatar(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    payload: Result<Json<NewAvatar>, JsonRejection>,
) -> Result<Json<Avatar>, ApiError> {
    let Json(new) = payload?;
    let avatar = with_conn(&state.db, move |conn| avatar::store::create_avatar(conn, new)).await?;
    tracing::info!(avatar_id = %avatar.id, name = %avatar.name, "avatar created");
    Ok(Json(avatar))
}

async fn list_avatars_admin(
    State(state): State<AppState>,
    _admin: AdminIdentity,
) -> Result<Json<Vec<Avatar>>, ApiError> {
    list_avatars(&state).await
}

async fn list_avatars_public(State(state): State<AppState>) -> Result<Json<Vec<Avatar>>, ApiError> {
    list_avatars(&state).await
}

async fn list_avatars(state: &AppState) -> Result<Json<Vec<Avatar>>, ApiError> {
    let avatars = with_conn(&state.db, |conn| {
        avatar::store::list_avatars(conn, MAX_LIST_RESULTS)
    })
    .await?;
    Ok(Json(avatars))
}

async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Avatar>, ApiError> {
    with_conn(&state.db, move |conn| avatar::store::get_avatar(conn, &id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::avatar_not_found)
}

async fn update_avatar(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
    payload: Result<Json<AvatarUpdate>, JsonRejection>,
) -> Result<Json<Avatar>, ApiError> {
    let Json(update) = payload?;
    let avatar = with_conn(&state.db, move |conn| {
        avatar::store::update_avatar(conn, &id, update)
    })
    .await?
    .ok_or_else(ApiError::avatar_not_found)?;

    tracing::info!(avatar_id = %avatar.id, "avatar updated");
    Ok(Json(avatar))
}

async fn delete_avatar(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let avatar_id = id.clone();
    let deleted = with_conn(&state.db, move |conn| {
        avatar::store::delete_avatar(conn, &avatar_id)
    })
    .await?;
    if !deleted {
        return Err(ApiError::avatar_not_found());
    }

    tracing::info!(avatar_id = %id, "avatar deleted");
    Ok(Json(serde_json::json!({ "message": "Avatar deleted successfully" })))
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.chat.respond(input).await?))
}

async fn chat_history(
    State(state): State<AppState>,
    _admin: AdminIdentity,
) -> Result<Json<Vec<ChatRecord>>, ApiError> {
    let records = with_conn(&state.db, |conn| history::list_recent(conn, MAX_LIST_RESULTS)).await?;
    Ok(Json(records))
}

async fn create_status(
    State(state): State<AppState>,
    payload: Result<Json<NewStatusCheck>, JsonRejection>,
) -> Result<Json<StatusCheck>, ApiError> {
    let Json(new) = payload?;
    let check = with_conn(&state.db, move |conn| status::create_status_check(conn, new)).await?;
    Ok(Json(check))
}

async fn list_status(State(state): State<AppState>) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let checks = with_conn(&state.db, |conn| {
        status::list_status_checks(conn, MAX_LIST_RESULTS)
    })
    .await?;
    Ok(Json(checks))
}
