//! User database entity for SeaORM.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;

use crate::repository::base::{AccountEntity, IdentifiedEntity};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub auth0_id: String,
    pub username: String,
    pub email: String,
    pub profile_picture: String,
    pub background_picture: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl IdentifiedEntity for Entity {
    const LABEL: &'static str = "User";

    fn id_column() -> Column {
        Column::Id
    }

    fn model_id(model: &Model) -> i32 {
        model.id
    }
}

impl AccountEntity for Entity {
    fn auth0_id_column() -> Column {
        Column::Auth0Id
    }

    fn created_at_column() -> Column {
        Column::CreatedAt
    }
}
