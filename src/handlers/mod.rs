//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Calls the repository or a transfer service
//! 3. Returns HTTP response (JSON, status code)

/// Health check endpoint
pub mod health;
/// Member management endpoints
pub mod members;
/// Transfer endpoint
pub mod transfers;
