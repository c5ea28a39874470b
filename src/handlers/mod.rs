//! HTTP request handlers (route handlers).
//!
//! Each handler extracts request data, delegates to a service and
//! returns the JSON response.

/// API key record endpoints
pub mod api_keys;
/// Service health endpoint
pub mod health;
