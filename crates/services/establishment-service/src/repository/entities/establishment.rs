//! Establishment database entity for SeaORM.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, Set};
use serde::Serialize;

use domain::{Coordinates, Establishment, PriceCategory, RequestStatus};

use crate::repository::base::{AccountEntity, IdentifiedEntity};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "establishments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub auth0_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price_category: Option<PriceCategoryValue>,
    pub request_status: RequestStatusValue,
    pub profile_picture: String,
    pub background_picture: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Stored form of [`RequestStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RequestStatusValue {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Stored form of [`PriceCategory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PriceCategoryValue {
    #[sea_orm(string_value = "cheap")]
    Cheap,
    #[sea_orm(string_value = "moderate")]
    Moderate,
    #[sea_orm(string_value = "expensive")]
    Expensive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::social_link::Entity")]
    SocialLinks,
    #[sea_orm(has_one = "super::business_hours::Entity")]
    BusinessHours,
    #[sea_orm(has_many = "super::menu::Entity")]
    Menus,
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
    #[sea_orm(has_one = "super::rating_statistic::Entity")]
    RatingStatistic,
}

impl Related<super::social_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialLinks.def()
    }
}

impl Related<super::business_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessHours.def()
    }
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menus.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::rating_statistic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RatingStatistic.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::establishment_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::establishment_category::Relation::Establishment.def().rev())
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::establishment_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::establishment_tag::Relation::Establishment.def().rev())
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
    const LABEL: &'static str = "Establishment";

    fn id_column() -> Column {
        Column::Id
    }

    fn model_id(model: &Model) -> i32 {
        model.id
    }

    /// Establishments stay hidden until their registration request is accepted
    fn visibility_filter() -> Option<Condition> {
        Some(Condition::all().add(Column::RequestStatus.eq(RequestStatusValue::Accepted)))
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

impl From<RequestStatus> for RequestStatusValue {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => RequestStatusValue::Pending,
            RequestStatus::Accepted => RequestStatusValue::Accepted,
            RequestStatus::Rejected => RequestStatusValue::Rejected,
        }
    }
}

impl From<RequestStatusValue> for RequestStatus {
    fn from(value: RequestStatusValue) -> Self {
        match value {
            RequestStatusValue::Pending => RequestStatus::Pending,
            RequestStatusValue::Accepted => RequestStatus::Accepted,
            RequestStatusValue::Rejected => RequestStatus::Rejected,
        }
    }
}

impl From<PriceCategory> for PriceCategoryValue {
    fn from(category: PriceCategory) -> Self {
        match category {
            PriceCategory::Cheap => PriceCategoryValue::Cheap,
            PriceCategory::Moderate => PriceCategoryValue::Moderate,
            PriceCategory::Expensive => PriceCategoryValue::Expensive,
        }
    }
}

impl From<PriceCategoryValue> for PriceCategory {
    fn from(value: PriceCategoryValue) -> Self {
        match value {
            PriceCategoryValue::Cheap => PriceCategory::Cheap,
            PriceCategoryValue::Moderate => PriceCategory::Moderate,
            PriceCategoryValue::Expensive => PriceCategory::Expensive,
        }
    }
}

/// Convert database model to domain entity
impl From<Model> for Establishment {
    fn from(model: Model) -> Self {
        Establishment {
            id: model.id,
            auth0_id: model.auth0_id,
            name: model.name,
            description: model.description,
            city: model.city,
            address: model.address,
            coordinates: Coordinates::from_parts(model.latitude, model.longitude),
            price_category: model.price_category.map(PriceCategory::from),
            request_status: model.request_status.into(),
            profile_picture: model.profile_picture,
            background_picture: model.background_picture,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
