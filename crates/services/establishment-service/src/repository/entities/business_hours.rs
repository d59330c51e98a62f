//! Weekly opening hours, one row per establishment.
//!
//! Each day holds a display string such as `"08:00-22:00"`; `None` means closed.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "business_hours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub establishment_id: i32,
    pub monday: Option<String>,
    pub tuesday: Option<String>,
    pub wednesday: Option<String>,
    pub thursday: Option<String>,
    pub friday: Option<String>,
    pub saturday: Option<String>,
    pub sunday: Option<String>,
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
    #[sea_orm(has_many = "super::business_hours_exception::Entity")]
    Exceptions,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl Related<super::business_hours_exception::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exceptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
