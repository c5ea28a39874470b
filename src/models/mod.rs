//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// API-key record model and request bodies
pub mod api_key;
