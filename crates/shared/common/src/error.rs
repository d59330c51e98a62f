//! Unified application error handling.
//!
//! Repositories and services return [`AppResult`]. Store failures keep the
//! underlying `DbErr` as their source so callers can log the full chain while
//! clients only ever see [`AppError::user_message`].

use domain::DomainError;
use thiserror::Error;

/// Application error types shared by every service.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Store errors
    /// A repository operation failed; names the operation and the entity involved
    #[cfg(feature = "database")]
    #[error("Failed to {operation} {entity}")]
    Persistence {
        operation: &'static str,
        entity: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // External service errors
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Persistence { .. } => "PERSISTENCE_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::IdentityProvider(_) => "IDENTITY_PROVIDER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures of the backing store rather than of the request
    pub fn is_store_failure(&self) -> bool {
        match self {
            #[cfg(feature = "database")]
            AppError::Persistence { .. } | AppError::Database(_) => true,
            _ => false,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Persistence {
                operation,
                entity,
                source,
            } => {
                tracing::error!(operation, entity = %entity, "Persistence error: {:?}", source);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::IdentityProvider(msg) => {
                tracing::error!("Identity provider error: {}", msg);
                "The identity provider is unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(entity) => AppError::NotFound(entity),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(entity.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn identity_provider(msg: impl Into<String>) -> Self {
        AppError::IdentityProvider(msg.into())
    }

    /// Wrap a store failure with the operation and entity it happened in
    #[cfg(feature = "database")]
    pub fn persistence(
        operation: &'static str,
        entity: impl Into<String>,
        source: sea_orm::DbErr,
    ) -> Self {
        AppError::Persistence {
            operation,
            entity: entity.into(),
            source,
        }
    }
}
