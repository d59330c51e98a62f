//! Events hosted by an establishment.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub establishment_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::establishment::Entity",
        from = "Column::EstablishmentId",
        to = "super::establishment::Column::Id",
        on_delete = "Cascade"
    )]
    Establishment,
    #[sea_orm(has_many = "super::event_interested_user::Entity")]
    InterestedUsers,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl Related<super::event_interested_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InterestedUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
