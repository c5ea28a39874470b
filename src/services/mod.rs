//! Business logic services.
//!
//! Services contain input validation and outcome mapping separated from HTTP handlers.

pub mod api_key_service;
