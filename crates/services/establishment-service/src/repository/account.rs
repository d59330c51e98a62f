//! Repository for entities owned by an identity-provider account.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel,
    PaginatorTrait, QueryFilter,
};

use super::base::{AccountEntity, Repository, Visibility};
use super::entities::user;
use common::AppResult;

/// Account-scoped lookups layered over the generic [`Repository`].
pub struct AccountRepository<E> {
    base: Repository<E>,
}

/// Repository for application users
pub type UserRepository = AccountRepository<user::Entity>;

impl<E> Clone for AccountRepository<E> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<E> AccountRepository<E>
where
    E: AccountEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: Repository::new(db),
        }
    }

    /// Generic CRUD for the same entity
    pub fn base(&self) -> &Repository<E> {
        &self.base
    }

    /// Existence probe by external account id; absence is `None`, not an error
    pub async fn get_by_auth0_id(
        &self,
        auth0_id: &str,
        visibility: Visibility,
    ) -> AppResult<Option<E::Model>> {
        Repository::<E>::find(visibility)
            .filter(E::auth0_id_column().eq(auth0_id))
            .one(self.base.db())
            .await
            .map_err(|e| Repository::<E>::failure("fetch", e))
    }

    /// Accounts created in `[start, end]`, both bounds inclusive
    pub async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        visibility: Visibility,
    ) -> AppResult<u64> {
        Repository::<E>::find(visibility)
            .filter(E::created_at_column().between(start, end))
            .count(self.base.db())
            .await
            .map_err(|e| Repository::<E>::failure("count", e))
    }

    /// Delete regardless of visibility; `false` when no account has the id
    pub async fn delete_by_auth0_id(&self, auth0_id: &str) -> AppResult<bool> {
        let result = E::delete_many()
            .filter(E::auth0_id_column().eq(auth0_id))
            .exec(self.base.db())
            .await
            .map_err(|e| Repository::<E>::failure("delete", e))?;

        tracing::info!(
            entity = E::LABEL,
            auth0_id,
            deleted = result.rows_affected > 0,
            "Delete by account id"
        );
        Ok(result.rows_affected > 0)
    }
}
