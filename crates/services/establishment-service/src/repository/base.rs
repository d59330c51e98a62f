//! Generic repository over any entity with an integer identifier.
//!
//! Entities opt in through [`IdentifiedEntity`]; entities owned by an external
//! identity additionally implement [`AccountEntity`]. Every read takes an
//! explicit [`Visibility`] so bypassing an entity's default filter is always
//! visible at the call site.

use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Select, Value,
};

use common::{AppError, AppResult, OptionExt};

/// Which rows a read may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Apply the entity's default filter
    #[default]
    VisibleOnly,
    /// Bypass it, for moderation and self-owned access paths
    IncludeHidden,
}

/// Entity with a store-assigned integer id.
pub trait IdentifiedEntity: EntityTrait {
    /// Name used in errors and logs
    const LABEL: &'static str;

    fn id_column() -> Self::Column;

    fn model_id(model: &Self::Model) -> i32;

    /// Condition hiding rows from default reads, if the entity has one
    fn visibility_filter() -> Option<Condition> {
        None
    }
}

/// Entity owned by an identity-provider account.
pub trait AccountEntity: IdentifiedEntity {
    fn auth0_id_column() -> Self::Column;

    fn created_at_column() -> Self::Column;
}

/// Typed CRUD over a single entity.
pub struct Repository<E> {
    db: Arc<DatabaseConnection>,
    entity: PhantomData<E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            entity: PhantomData,
        }
    }
}

impl<E> Repository<E>
where
    E: IdentifiedEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    /// Get database connection reference
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Base query with the default filter applied unless bypassed
    pub fn find(visibility: Visibility) -> Select<E> {
        let select = E::find();
        match (visibility, E::visibility_filter()) {
            (Visibility::VisibleOnly, Some(condition)) => select.filter(condition),
            _ => select,
        }
    }

    /// Log a store failure and wrap it with the operation that failed
    pub fn failure(operation: &'static str, err: DbErr) -> AppError {
        tracing::error!(entity = E::LABEL, operation, error = %err, "Repository operation failed");
        AppError::persistence(operation, E::LABEL, err)
    }

    /// Insert and return the assigned id
    pub async fn create(&self, model: E::ActiveModel) -> AppResult<i32> {
        let created = model
            .insert(self.db())
            .await
            .map_err(|e| Self::failure("create", e))?;

        Ok(E::model_id(&created))
    }

    pub async fn exists_by<V>(
        &self,
        column: E::Column,
        value: V,
        visibility: Visibility,
    ) -> AppResult<bool>
    where
        V: Into<Value> + Send,
    {
        let count = Self::find(visibility)
            .filter(column.eq(value))
            .count(self.db())
            .await
            .map_err(|e| Self::failure("check existence of", e))?;

        Ok(count > 0)
    }

    /// Same as [`Self::exists_by`] for a column named at runtime
    pub async fn exists_by_property<V>(
        &self,
        property: &str,
        value: V,
        visibility: Visibility,
    ) -> AppResult<bool>
    where
        V: Into<Value> + Send,
        E::Column: FromStr,
    {
        let column = Self::column(property)?;
        self.exists_by(column, value, visibility).await
    }

    pub async fn get_by_id(&self, id: i32, visibility: Visibility) -> AppResult<E::Model> {
        self.get_by(E::id_column(), id, visibility).await
    }

    pub async fn get_by<V>(
        &self,
        column: E::Column,
        value: V,
        visibility: Visibility,
    ) -> AppResult<E::Model>
    where
        V: Into<Value> + Send,
    {
        Self::find(visibility)
            .filter(column.eq(value))
            .one(self.db())
            .await
            .map_err(|e| Self::failure("fetch", e))?
            .ok_or_not_found(E::LABEL)
    }

    pub async fn get_by_property<V>(
        &self,
        property: &str,
        value: V,
        visibility: Visibility,
    ) -> AppResult<E::Model>
    where
        V: Into<Value> + Send,
        E::Column: FromStr,
    {
        let column = Self::column(property)?;
        self.get_by(column, value, visibility).await
    }

    /// First row of a caller-shaped query (filters, ordering, joins).
    ///
    /// Missing rows are a `NotFound` error, never `None`.
    pub async fn get<F>(&self, visibility: Visibility, shape: F) -> AppResult<E::Model>
    where
        F: FnOnce(Select<E>) -> Select<E> + Send,
    {
        shape(Self::find(visibility))
            .one(self.db())
            .await
            .map_err(|e| Self::failure("fetch", e))?
            .ok_or_not_found(E::LABEL)
    }

    /// All rows ordered by id; empty when there are none
    pub async fn get_all(&self, visibility: Visibility) -> AppResult<Vec<E::Model>> {
        Self::find(visibility)
            .order_by_asc(E::id_column())
            .all(self.db())
            .await
            .map_err(|e| Self::failure("list", e))
    }

    /// Replace every column of the stored row with the given model
    pub async fn update(&self, model: E::Model) -> AppResult<E::Model> {
        model
            .into_active_model()
            .reset_all()
            .update(self.db())
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::not_found(E::LABEL),
                other => Self::failure("update", other),
            })
    }

    /// `false` when no row had the id
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(self.db())
            .await
            .map_err(|e| Self::failure("delete", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Bulk delete; an empty match is a no-op
    pub async fn delete_where(&self, condition: Condition) -> AppResult<u64> {
        let result = E::delete_many()
            .filter(condition)
            .exec(self.db())
            .await
            .map_err(|e| Self::failure("delete", e))?;

        tracing::debug!(entity = E::LABEL, rows = result.rows_affected, "Bulk delete");
        Ok(result.rows_affected)
    }

    fn column(property: &str) -> AppResult<E::Column>
    where
        E::Column: FromStr,
    {
        E::Column::from_str(property).map_err(|_| {
            AppError::validation(format!("{} has no property '{}'", E::LABEL, property))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::entities::{category, establishment};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait, Set};

    fn repo(db: MockDatabase) -> Repository<category::Entity> {
        Repository::new(Arc::new(db.into_connection()))
    }

    fn cafe() -> category::Model {
        category::Model {
            id: 7,
            name: "Cafe".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_assigned_id() {
        let repo = repo(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![cafe()]]),
        );

        let id = repo
            .create(category::ActiveModel {
                name: Set("Cafe".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn test_create_failure_is_wrapped() {
        let repo = repo(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())]),
        );

        let err = repo
            .create(category::ActiveModel {
                name: Set("Cafe".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            AppError::Persistence {
                operation, entity, ..
            } => {
                assert_eq!(operation, "create");
                assert_eq!(entity, "Category");
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_property_is_a_validation_error() {
        let repo = repo(MockDatabase::new(DatabaseBackend::Postgres));

        let err = repo
            .exists_by_property("colour", "red", Visibility::VisibleOnly)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg.contains("colour")));
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let repo = repo(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()]),
        );

        let err = repo.get_by_id(42, Visibility::VisibleOnly).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(entity) if entity == "Category"));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = repo(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()]),
        );

        let err = repo.update(cafe()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_was_removed() {
        let repo = repo(MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ]));

        assert!(repo.delete(7).await.unwrap());
        assert!(!repo.delete(7).await.unwrap());
    }

    #[test]
    fn test_visibility_filter_is_applied_by_default() {
        let visible = Repository::<establishment::Entity>::find(Visibility::VisibleOnly)
            .build(DatabaseBackend::Postgres)
            .to_string();
        let hidden = Repository::<establishment::Entity>::find(Visibility::IncludeHidden)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(visible.contains(r#""request_status" = 'accepted'"#));
        assert!(!hidden.contains("WHERE"));
    }

    #[test]
    fn test_entities_without_filter_ignore_visibility() {
        let sql = Repository::<category::Entity>::find(Visibility::VisibleOnly)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
    }
}
