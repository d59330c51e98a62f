//! SeaORM entities for the establishment directory schema.

pub mod business_hours;
pub mod business_hours_exception;
pub mod category;
pub mod establishment;
pub mod establishment_category;
pub mod establishment_tag;
pub mod event;
pub mod event_interested_user;
pub mod menu;
pub mod menu_item;
pub mod post;
pub mod post_like;
pub mod rating_statistic;
pub mod review;
pub mod social_link;
pub mod tag;
pub mod user;
