//! Shared utilities, configuration, and error handling for the catalog backend
//!
//! This crate provides common functionality used across the catalog domains:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Repository error type shared by the persistence adapters
//! - Validating axum extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, LogFormat, StoreBackend};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedQuery;
