//! Zeny AI — an HTTP backend for AI avatar personas.
//!
//! Admins create avatars (a name plus description, personality, and
//! instructions); anyone can then chat with an avatar. Each chat message is
//! wrapped in a persona prompt, sent to the Gemini `generateContent` API, and
//! the exchange is appended to a chat log.
//!
//! # Architecture
//!
//! - **Storage**: a single SQLite connection shared behind a mutex; store
//!   calls run on the blocking pool
//! - **Generation**: [`provider::GenerationProvider`] over the Gemini REST API,
//!   with per-model handles cached by [`models::ModelRegistry`]
//! - **Auth**: one configured admin account; HS256 bearer tokens without expiry
//! - **Transport**: axum router under `/api`
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite initialization, schema, migrations, and health checks
//! - [`avatar`] — Avatar records and CRUD
//! - [`chat`] — Prompt composition, provider call with fallback, and chat history
//! - [`models`] — Static model table and handle cache
//! - [`auth`] — Credential verification and bearer tokens
//! - [`provider`] — Gemini REST client behind the provider traits
//! - [`server`] — HTTP routes and the admin extractor
//! - [`error`] — JSON error responses
//! - [`status`] — Legacy status-check records

pub mod auth;
pub mod avatar;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod server;
pub mod status;
