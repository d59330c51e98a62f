//! Establishment service - search, registration and moderation use cases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{Establishment, EstablishmentSearch, NewEstablishment, RequestStatus};

use crate::repository::{build_filter, EstablishmentProfile, EstablishmentRepository, Visibility};

/// Establishment service trait for dependency injection.
#[async_trait]
pub trait EstablishmentService: Send + Sync {
    /// Validate the criteria and return one page of matching visible establishments
    async fn search(&self, search: EstablishmentSearch, page: i32) -> AppResult<Vec<Establishment>>;

    /// Registration requests awaiting moderation
    async fn pending_requests(&self) -> AppResult<Vec<Establishment>>;

    /// Profile page; owners also see their own pending or rejected account
    async fn get_profile(&self, auth0_id: &str, as_owner: bool) -> AppResult<EstablishmentProfile>;

    /// Register a new establishment as a pending request
    async fn register(&self, new: NewEstablishment) -> AppResult<i32>;

    /// Accept or reject a pending request
    async fn review_request(&self, id: i32, accept: bool) -> AppResult<Establishment>;

    /// Remove an account in any request status
    async fn delete_account(&self, auth0_id: &str) -> AppResult<bool>;

    /// Registrations (any status) created in `[start, end]`
    async fn count_registrations(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<u64>;
}

/// Concrete implementation of EstablishmentService using repository.
pub struct EstablishmentManager {
    repo: Arc<dyn EstablishmentRepository>,
}

impl EstablishmentManager {
    /// Create new establishment service instance with repository
    pub fn new(repo: Arc<dyn EstablishmentRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl EstablishmentService for EstablishmentManager {
    async fn search(
        &self,
        search: EstablishmentSearch,
        page: i32,
    ) -> AppResult<Vec<Establishment>> {
        if let Err(e) = search.check() {
            tracing::warn!(error = %e, "Rejected establishment search");
            return Err(e.into());
        }

        self.repo
            .get_range_with_filter(build_filter(&search), page)
            .await
    }

    async fn pending_requests(&self) -> AppResult<Vec<Establishment>> {
        self.repo.get_all_pending().await
    }

    async fn get_profile(&self, auth0_id: &str, as_owner: bool) -> AppResult<EstablishmentProfile> {
        let visibility = if as_owner {
            Visibility::IncludeHidden
        } else {
            Visibility::VisibleOnly
        };
        self.repo.get_profile_by_auth0_id(auth0_id, visibility).await
    }

    async fn register(&self, new: NewEstablishment) -> AppResult<i32> {
        new.validate()?;

        if self
            .repo
            .find_by_auth0_id(&new.auth0_id, Visibility::IncludeHidden)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Establishment for this account"));
        }

        if self.repo.exists_by_name(&new.name).await? {
            return Err(AppError::conflict("Establishment name"));
        }

        self.repo.create(new).await
    }

    async fn review_request(&self, id: i32, accept: bool) -> AppResult<Establishment> {
        let establishment = self.repo.get_by_id(id, Visibility::IncludeHidden).await?;
        if !establishment.is_pending() {
            return Err(AppError::validation(format!(
                "Request was already {}",
                establishment.request_status
            )));
        }

        let status = if accept {
            RequestStatus::Accepted
        } else {
            RequestStatus::Rejected
        };
        self.repo.set_request_status(id, status).await
    }

    async fn delete_account(&self, auth0_id: &str) -> AppResult<bool> {
        self.repo.delete_by_auth0_id(auth0_id).await
    }

    async fn count_registrations(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<u64> {
        if start > end {
            return Err(AppError::validation("Start date must not be after end date"));
        }

        self.repo
            .count_created_between(start, end, Visibility::IncludeHidden)
            .await
    }
}
