//! Composes establishment search criteria into a single query filter.
//!
//! Predicates are applied in a fixed order: bounding box, name, price category,
//! category, tags. Dimensions that are absent or blank add nothing.

use sea_orm::sea_query::{Expr, Query, SelectStatement, SimpleExpr};
use sea_orm::{ColumnTrait, QueryFilter, Select};

use domain::{BoundingBox, EstablishmentSearch};

use super::entities::establishment::{self, PriceCategoryValue};
use super::entities::{category, establishment_category, establishment_tag, tag};

const LIKE_ESCAPE: char = '!';

/// Query transformation produced by [`build_filter`]
pub type EstablishmentFilter =
    Box<dyn Fn(Select<establishment::Entity>) -> Select<establishment::Entity> + Send + Sync>;

/// Build the filter for a search; callers validate the search first
pub fn build_filter(search: &EstablishmentSearch) -> EstablishmentFilter {
    let mut predicates: Vec<SimpleExpr> = Vec::new();

    if let Some(bounds) = search.geo_filter() {
        predicates.extend(within(bounds));
    }

    if let Some(name) = search.name_filter() {
        predicates.push(name_contains(name));
    }

    if let Some(price) = search.price_category {
        predicates.push(establishment::Column::PriceCategory.eq(PriceCategoryValue::from(price)));
    }

    if let Some(category) = search.category_filter() {
        predicates.push(establishment::Column::Id.in_subquery(with_category(category)));
    }

    match search.tags.as_slice() {
        [] => {}
        // One tag: any establishment carrying it
        [only] => {
            predicates.push(
                establishment::Column::Id.in_subquery(with_any_tag(std::slice::from_ref(only))),
            );
        }
        // Several tags: every one of them must be present
        tags => {
            for tag_name in tags {
                predicates.push(
                    establishment::Column::Id
                        .in_subquery(with_any_tag(std::slice::from_ref(tag_name))),
                );
            }
        }
    }

    tracing::debug!(predicates = predicates.len(), "Built establishment filter");

    Box::new(move |select| {
        predicates
            .iter()
            .cloned()
            .fold(select, |select, predicate| select.filter(predicate))
    })
}

fn within(bounds: &BoundingBox) -> [SimpleExpr; 2] {
    [
        establishment::Column::Latitude
            .between(bounds.south_east.latitude, bounds.north_west.latitude),
        establishment::Column::Longitude
            .between(bounds.north_west.longitude, bounds.south_east.longitude),
    ]
}

/// Both sides are folded by the store so column and needle share one case rule
fn name_contains(needle: &str) -> SimpleExpr {
    Expr::cust_with_exprs(
        format!("LOWER($1) LIKE LOWER($2) ESCAPE '{}'", LIKE_ESCAPE),
        [
            Expr::col((establishment::Entity, establishment::Column::Name)).into(),
            Expr::val(like_pattern(needle)).into(),
        ],
    )
}

/// `%needle%` with LIKE wildcards in the needle escaped
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, LIKE_ESCAPE | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn with_category(name: &str) -> SelectStatement {
    Query::select()
        .column((
            establishment_category::Entity,
            establishment_category::Column::EstablishmentId,
        ))
        .from(establishment_category::Entity)
        .inner_join(
            category::Entity,
            Expr::col((category::Entity, category::Column::Id)).equals((
                establishment_category::Entity,
                establishment_category::Column::CategoryId,
            )),
        )
        .and_where(Expr::col((category::Entity, category::Column::Name)).eq(name))
        .to_owned()
}

fn with_any_tag(names: &[String]) -> SelectStatement {
    Query::select()
        .column((
            establishment_tag::Entity,
            establishment_tag::Column::EstablishmentId,
        ))
        .from(establishment_tag::Entity)
        .inner_join(
            tag::Entity,
            Expr::col((tag::Entity, tag::Column::Id)).equals((
                establishment_tag::Entity,
                establishment_tag::Column::TagId,
            )),
        )
        .and_where(Expr::col((tag::Entity, tag::Column::Name)).is_in(names.iter().cloned()))
        .to_owned()
}
