//! Establishment repository: registration, moderation listing, profile and search.
//!
//! Default reads only see accepted establishments. Moderation paths
//! (`get_all_pending`, `delete_by_auth0_id`) and owners looking at their own
//! account pass [`Visibility::IncludeHidden`] or bypass the filter internally.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use common::{AppError, AppResult, OptionExt};
use domain::{
    Establishment, NewEstablishment, RequestStatus, DEFAULT_BACKGROUND_PICTURE,
    DEFAULT_PROFILE_PICTURE, RANGE_PAGE_SIZE,
};

use super::account::AccountRepository;
use super::base::{Repository, Visibility};
use super::entities::establishment::{self, PriceCategoryValue, RequestStatusValue};
use super::entities::{
    business_hours, establishment_category, establishment_tag, rating_statistic, social_link,
};
use super::profile::{self, EstablishmentProfile};
use super::search::EstablishmentFilter;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

type Store = Repository<establishment::Entity>;

/// Establishment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EstablishmentRepository: Send + Sync {
    /// Persist a new pending establishment with its owned rows; returns the id
    async fn create(&self, new: NewEstablishment) -> AppResult<i32>;

    async fn get_by_id(&self, id: i32, visibility: Visibility) -> AppResult<Establishment>;

    /// Existence probe; `None` when no establishment has the account id
    async fn find_by_auth0_id(
        &self,
        auth0_id: &str,
        visibility: Visibility,
    ) -> AppResult<Option<Establishment>>;

    /// Name check across every request status
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// Establishment with its whole display aggregate; `NotFound` when absent
    async fn get_profile_by_auth0_id(
        &self,
        auth0_id: &str,
        visibility: Visibility,
    ) -> AppResult<EstablishmentProfile>;

    /// Registration requests awaiting moderation, oldest first
    async fn get_all_pending(&self) -> AppResult<Vec<Establishment>>;

    /// Visible establishments matching `filter`, ordered by id.
    ///
    /// `page <= 0` returns every match; otherwise a window of
    /// [`RANGE_PAGE_SIZE`] rows starting at `(page - 1) * RANGE_PAGE_SIZE`.
    async fn get_range_with_filter(
        &self,
        filter: EstablishmentFilter,
        page: i32,
    ) -> AppResult<Vec<Establishment>>;

    /// Replace the mutable fields; the account id and creation time are kept
    async fn update(&self, establishment: Establishment) -> AppResult<Establishment>;

    async fn set_request_status(&self, id: i32, status: RequestStatus) -> AppResult<Establishment>;

    /// Establishments created in `[start, end]`
    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        visibility: Visibility,
    ) -> AppResult<u64>;

    /// Delete in any request status; `false` for an unknown account id
    async fn delete_by_auth0_id(&self, auth0_id: &str) -> AppResult<bool>;
}

/// SeaORM-backed [`EstablishmentRepository`]
#[derive(Clone)]
pub struct EstablishmentStore {
    accounts: AccountRepository<establishment::Entity>,
}

impl EstablishmentStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            accounts: AccountRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.accounts.base().db()
    }
}

#[async_trait]
impl EstablishmentRepository for EstablishmentStore {
    async fn create(&self, new: NewEstablishment) -> AppResult<i32> {
        let txn = self
            .db()
            .begin()
            .await
            .map_err(|e| Store::failure("begin create of", e))?;

        let created = establishment::ActiveModel {
            auth0_id: Set(new.auth0_id),
            name: Set(new.name),
            description: Set(new.description),
            city: Set(new.city),
            address: Set(new.address),
            latitude: Set(new.coordinates.map(|c| c.latitude)),
            longitude: Set(new.coordinates.map(|c| c.longitude)),
            price_category: Set(new.price_category.map(PriceCategoryValue::from)),
            request_status: Set(RequestStatusValue::Pending),
            profile_picture: Set(DEFAULT_PROFILE_PICTURE.to_string()),
            background_picture: Set(DEFAULT_BACKGROUND_PICTURE.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| Store::failure("create", e))?;
        let id = created.id;

        insert_owned_rows(&txn, id, new.category_ids, new.tag_ids, new.social_links)
            .await
            .map_err(|e| Store::failure("create", e))?;

        txn.commit()
            .await
            .map_err(|e| Store::failure("commit create of", e))?;

        tracing::info!(id, "Establishment created");
        Ok(id)
    }

    async fn get_by_id(&self, id: i32, visibility: Visibility) -> AppResult<Establishment> {
        self.accounts
            .base()
            .get_by_id(id, visibility)
            .await
            .map(Establishment::from)
    }

    async fn find_by_auth0_id(
        &self,
        auth0_id: &str,
        visibility: Visibility,
    ) -> AppResult<Option<Establishment>> {
        let found = self.accounts.get_by_auth0_id(auth0_id, visibility).await?;
        Ok(found.map(Establishment::from))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.accounts
            .base()
            .exists_by(establishment::Column::Name, name, Visibility::IncludeHidden)
            .await
    }

    async fn get_profile_by_auth0_id(
        &self,
        auth0_id: &str,
        visibility: Visibility,
    ) -> AppResult<EstablishmentProfile> {
        // One read transaction so the aggregate is loaded from a single snapshot
        let txn = self
            .db()
            .begin()
            .await
            .map_err(|e| Store::failure("begin profile load of", e))?;

        let model = Store::find(visibility)
            .filter(establishment::Column::Auth0Id.eq(auth0_id))
            .one(&txn)
            .await
            .map_err(|e| Store::failure("fetch", e))?
            .ok_or_not_found("Establishment")?;

        let profile = profile::load(&txn, model)
            .await
            .map_err(|e| Store::failure("load profile of", e))?;

        txn.commit()
            .await
            .map_err(|e| Store::failure("finish profile load of", e))?;

        Ok(profile)
    }

    async fn get_all_pending(&self) -> AppResult<Vec<Establishment>> {
        let models = Store::find(Visibility::IncludeHidden)
            .filter(establishment::Column::RequestStatus.eq(RequestStatusValue::Pending))
            .order_by_asc(establishment::Column::Id)
            .all(self.db())
            .await
            .map_err(|e| Store::failure("list pending", e))?;

        Ok(models.into_iter().map(Establishment::from).collect())
    }

    async fn get_range_with_filter(
        &self,
        filter: EstablishmentFilter,
        page: i32,
    ) -> AppResult<Vec<Establishment>> {
        let query = filter(Store::find(Visibility::VisibleOnly))
            .order_by_asc(establishment::Column::Id);

        let query = if page <= 0 {
            query
        } else {
            let offset = (page as u64 - 1) * RANGE_PAGE_SIZE;
            query.offset(offset).limit(RANGE_PAGE_SIZE)
        };
        tracing::debug!(page, "Fetching establishment range");

        let models = query
            .all(self.db())
            .await
            .map_err(|e| Store::failure("search", e))?;

        Ok(models.into_iter().map(Establishment::from).collect())
    }

    async fn update(&self, establishment: Establishment) -> AppResult<Establishment> {
        let coordinates = establishment.coordinates;
        let active = establishment::ActiveModel {
            id: ActiveValue::Unchanged(establishment.id),
            auth0_id: ActiveValue::NotSet,
            name: Set(establishment.name),
            description: Set(establishment.description),
            city: Set(establishment.city),
            address: Set(establishment.address),
            latitude: Set(coordinates.map(|c| c.latitude)),
            longitude: Set(coordinates.map(|c| c.longitude)),
            price_category: Set(establishment.price_category.map(PriceCategoryValue::from)),
            request_status: Set(establishment.request_status.into()),
            profile_picture: Set(establishment.profile_picture),
            background_picture: Set(establishment.background_picture),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::NotSet,
        };

        active
            .update(self.db())
            .await
            .map(Establishment::from)
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::not_found("Establishment"),
                other => Store::failure("update", other),
            })
    }

    async fn set_request_status(&self, id: i32, status: RequestStatus) -> AppResult<Establishment> {
        let base = self.accounts.base();
        let mut model = base.get_by_id(id, Visibility::IncludeHidden).await?;
        model.request_status = status.into();

        let updated = base.update(model).await?;
        tracing::info!(id, status = %status, "Establishment request status changed");
        Ok(updated.into())
    }

    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        visibility: Visibility,
    ) -> AppResult<u64> {
        self.accounts
            .count_created_between(start, end, visibility)
            .await
    }

    async fn delete_by_auth0_id(&self, auth0_id: &str) -> AppResult<bool> {
        self.accounts.delete_by_auth0_id(auth0_id).await
    }
}

/// Rows created together with an establishment and deleted with it
async fn insert_owned_rows<C>(
    conn: &C,
    establishment_id: i32,
    category_ids: Vec<i32>,
    tag_ids: Vec<i32>,
    social_links: Vec<domain::NewSocialLink>,
) -> Result<(), DbErr>
where
    C: sea_orm::ConnectionTrait,
{
    business_hours::ActiveModel {
        establishment_id: Set(establishment_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    rating_statistic::ActiveModel {
        establishment_id: Set(establishment_id),
        average_rating: Set(0.0),
        review_count: Set(0),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    if !category_ids.is_empty() {
        establishment_category::Entity::insert_many(category_ids.into_iter().map(|category_id| {
            establishment_category::ActiveModel {
                establishment_id: Set(establishment_id),
                category_id: Set(category_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    if !tag_ids.is_empty() {
        establishment_tag::Entity::insert_many(tag_ids.into_iter().map(|tag_id| {
            establishment_tag::ActiveModel {
                establishment_id: Set(establishment_id),
                tag_id: Set(tag_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    if !social_links.is_empty() {
        social_link::Entity::insert_many(social_links.into_iter().map(|link| {
            social_link::ActiveModel {
                establishment_id: Set(establishment_id),
                platform: Set(link.platform),
                url: Set(link.url),
                ..Default::default()
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    Ok(())
}
