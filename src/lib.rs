//! Member balances and money transfers between them.
//!
//! The same transfer runs under three different transaction boundaries:
//! manual begin/commit/rollback on one pooled connection, a
//! [`services::TransactionManager`], and a [`services::TransactionTemplate`]
//! callback. Data access goes through [`repository`], which runs statements
//! on whatever connection or transaction the caller hands it.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
