//! Date-specific overrides of the weekly hours (holidays, events).

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "business_hours_exceptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_hours_id: i32,
    pub date: Date,
    /// `None` when closed for the whole day
    pub hours: Option<String>,
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business_hours::Entity",
        from = "Column::BusinessHoursId",
        to = "super::business_hours::Column::Id",
        on_delete = "Cascade"
    )]
    BusinessHours,
}

impl Related<super::business_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessHours.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
