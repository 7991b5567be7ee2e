//! Shared types, errors, and configuration for gledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for GUID-keyed entities
//! - Application-wide error types and the numeric RPC error codes
//! - Configuration management
//! - Bearer token claims and signature verification

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorCode, PERSISTENCE_FAILURE};
pub use jwt::{JwtError, JwtSigner, JwtVerifier};
