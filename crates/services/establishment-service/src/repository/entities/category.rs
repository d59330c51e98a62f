//! Category lookup entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::repository::base::IdentifiedEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        super::establishment_category::Relation::Establishment.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::establishment_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl IdentifiedEntity for Entity {
    const LABEL: &'static str = "Category";

    fn id_column() -> Column {
        Column::Id
    }

    fn model_id(model: &Model) -> i32 {
        model.id
    }
}
