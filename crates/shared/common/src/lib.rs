//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified application error handling
//! - Configuration structures
//! - The identity-provider management token cache (feature `cache`)

pub mod config;
pub mod error;
#[cfg(feature = "cache")]
pub mod token_cache;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
#[cfg(feature = "cache")]
pub use token_cache::{ManagementTokenCache, ManagementTokenSource};
