//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Member and transfer model
pub mod member;
