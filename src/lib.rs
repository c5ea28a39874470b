//! API key administration service.
//!
//! A REST API for managing named API-key records stored in PostgreSQL:
//! list, create, edit and delete.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Record Store**: `store::ApiKeyStore`, the only code that touches `api_keys`
//! - **Record Service**: `services::api_key_service`, input validation and status mapping
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod state;
pub mod store;
