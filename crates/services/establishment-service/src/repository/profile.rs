//! Full display aggregate of an establishment.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, LoaderTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::Serialize;

use domain::Establishment;

use super::entities::{
    business_hours, business_hours_exception, category, establishment, event,
    event_interested_user, menu, menu_item, post, post_like, rating_statistic, review,
    social_link, tag, user,
};

/// Establishment with every collection shown on its profile page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstablishmentProfile {
    pub establishment: Establishment,
    pub categories: Vec<category::Model>,
    pub tags: Vec<tag::Model>,
    pub social_links: Vec<social_link::Model>,
    pub business_hours: Option<BusinessHoursProfile>,
    pub menus: Vec<MenuProfile>,
    pub posts: Vec<PostProfile>,
    pub events: Vec<EventProfile>,
    pub rating: Option<RatingProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessHoursProfile {
    pub hours: business_hours::Model,
    pub exceptions: Vec<business_hours_exception::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuProfile {
    pub menu: menu::Model,
    pub items: Vec<menu_item::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostProfile {
    pub post: post::Model,
    pub likes: Vec<post_like::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventProfile {
    pub event: event::Model,
    pub interested_users: Vec<user::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingProfile {
    pub statistic: rating_statistic::Model,
    pub reviews: Vec<ReviewProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewProfile {
    pub review: review::Model,
    pub reviewer: Option<user::Model>,
}

/// Load every profile collection of `model` on one connection or transaction
pub(crate) async fn load<C>(
    conn: &C,
    model: establishment::Model,
) -> Result<EstablishmentProfile, DbErr>
where
    C: ConnectionTrait,
{
    let categories = model
        .find_related(category::Entity)
        .order_by_asc(category::Column::Name)
        .all(conn)
        .await?;
    let tags = model
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::Name)
        .all(conn)
        .await?;
    let social_links = model
        .find_related(social_link::Entity)
        .order_by_asc(social_link::Column::Id)
        .all(conn)
        .await?;

    let business_hours = match model.find_related(business_hours::Entity).one(conn).await? {
        Some(hours) => {
            let exceptions = hours
                .find_related(business_hours_exception::Entity)
                .order_by_asc(business_hours_exception::Column::Date)
                .all(conn)
                .await?;
            Some(BusinessHoursProfile { hours, exceptions })
        }
        None => None,
    };

    let menus = model
        .find_related(menu::Entity)
        .order_by_asc(menu::Column::Id)
        .all(conn)
        .await?;
    let items = menus.load_many(menu_item::Entity, conn).await?;
    let menus = menus
        .into_iter()
        .zip(items)
        .map(|(menu, items)| MenuProfile { menu, items })
        .collect();

    let posts = model
        .find_related(post::Entity)
        .order_by_desc(post::Column::CreatedAt)
        .all(conn)
        .await?;
    let likes = posts.load_many(post_like::Entity, conn).await?;
    let posts = posts
        .into_iter()
        .zip(likes)
        .map(|(post, likes)| PostProfile { post, likes })
        .collect();

    let events = model
        .find_related(event::Entity)
        .order_by_asc(event::Column::StartsAt)
        .all(conn)
        .await?;
    let events = load_interested_users(conn, events).await?;

    let rating = match model.find_related(rating_statistic::Entity).one(conn).await? {
        Some(statistic) => {
            let reviews = review::Entity::find()
                .filter(review::Column::RatingStatisticId.eq(statistic.id))
                .order_by_desc(review::Column::CreatedAt)
                .find_also_related(user::Entity)
                .all(conn)
                .await?
                .into_iter()
                .map(|(review, reviewer)| ReviewProfile { review, reviewer })
                .collect();
            Some(RatingProfile { statistic, reviews })
        }
        None => None,
    };

    Ok(EstablishmentProfile {
        establishment: model.into(),
        categories,
        tags,
        social_links,
        business_hours,
        menus,
        posts,
        events,
        rating,
    })
}

async fn load_interested_users<C>(
    conn: &C,
    events: Vec<event::Model>,
) -> Result<Vec<EventProfile>, DbErr>
where
    C: ConnectionTrait,
{
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let event_ids: Vec<i32> = events.iter().map(|e| e.id).collect();
    let mut by_event: HashMap<i32, Vec<user::Model>> = HashMap::new();
    for (link, user) in event_interested_user::Entity::find()
        .filter(event_interested_user::Column::EventId.is_in(event_ids))
        .order_by_asc(event_interested_user::Column::UserId)
        .find_also_related(user::Entity)
        .all(conn)
        .await?
    {
        if let Some(user) = user {
            by_event.entry(link.event_id).or_default().push(user);
        }
    }

    Ok(events
        .into_iter()
        .map(|event| EventProfile {
            interested_users: by_event.remove(&event.id).unwrap_or_default(),
            event,
        })
        .collect())
}
