//! Warm Transfer Service Library
//!
//! Backend for a call-center warm transfer workflow:
//!
//! - Issues signed room access tokens for a third-party real-time media
//!   room service (LiveKit format, HS256)
//! - Plans warm transfers: a fresh room plus tokens for the caller and the
//!   receiving agent
//! - Summarizes conversation transcripts through a chat-completions API
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> crypto/mod.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `crypto` - Room token signing and verification
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Request and response types
//! - `observability` - Metrics and log-correlation helpers
//! - `routes` - Axum router setup
//! - `services` - Token issuer, transfer planning, LLM client

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
