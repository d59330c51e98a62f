//! Establishment repository against a migrated in-memory SQLite database.

mod common;

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tokio_test::assert_ok;

use ::common::AppError;
use domain::{BoundingBox, Coordinates, EstablishmentSearch, PriceCategory, RequestStatus};
use establishment_service_lib::repository::entities::{
    business_hours, business_hours_exception, establishment, event, event_interested_user, menu,
    menu_item, post, post_like, rating_statistic, review, user,
};
use establishment_service_lib::repository::{
    build_filter, EstablishmentRepository, EstablishmentStore, Repository, UserRepository,
    Visibility,
};
use establishment_service_lib::service::{EstablishmentManager, EstablishmentService};

use crate::common::{seed_category, seed_tag, setup_db, Registration};

async fn names(store: &EstablishmentStore, search: EstablishmentSearch, page: i32) -> Vec<String> {
    store
        .get_range_with_filter(build_filter(&search), page)
        .await
        .expect("Range query failed")
        .into_iter()
        .map(|e| e.name)
        .collect()
}

#[tokio::test]
async fn test_directory_scenario_filters() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db.clone());

    let cafe = seed_category(&db, "Cafe").await;
    let restaurant = seed_category(&db, "Restaurant").await;
    let fast_food = seed_category(&db, "Fast Food").await;
    let cozy = seed_tag(&db, "Cozy").await;
    let fine_dining = seed_tag(&db, "Fine Dining").await;
    let quick = seed_tag(&db, "Quick").await;

    Registration::named("Cozy Cafe")
        .categories(&[cafe])
        .tags(&[cozy])
        .price(PriceCategory::Cheap)
        .save(&store)
        .await;
    Registration::named("Bistro Delight")
        .categories(&[restaurant])
        .tags(&[fine_dining])
        .price(PriceCategory::Moderate)
        .save(&store)
        .await;
    Registration::named("Fast Food Express")
        .categories(&[fast_food])
        .tags(&[quick])
        .price(PriceCategory::Expensive)
        .save(&store)
        .await;

    let by_name = EstablishmentSearch {
        name: Some("Cafe".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&store, by_name, 0).await, vec!["Cozy Cafe"]);

    let by_price = EstablishmentSearch {
        price_category: Some(PriceCategory::Moderate),
        ..Default::default()
    };
    assert_eq!(names(&store, by_price, 0).await, vec!["Bistro Delight"]);

    let by_category = EstablishmentSearch {
        category_name: Some("Restaurant".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&store, by_category, 0).await, vec!["Bistro Delight"]);

    let by_tag = EstablishmentSearch {
        tags: vec!["Cozy".to_string()],
        ..Default::default()
    };
    assert_eq!(names(&store, by_tag, 0).await, vec!["Cozy Cafe"]);
}

#[tokio::test]
async fn test_name_match_ignores_case_and_wildcards() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db);

    Registration::named("Cozy Cafe").save(&store).await;
    Registration::named("100% Burgers").save(&store).await;
    Registration::named("1000 Burgers").save(&store).await;
    Registration::named("Čajdžinica").save(&store).await;

    let upper = EstablishmentSearch {
        name: Some("COZY".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&store, upper, 0).await, vec!["Cozy Cafe"]);

    let percent = EstablishmentSearch {
        name: Some("100%".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&store, percent, 0).await, vec!["100% Burgers"]);

    // Both sides use the store's case folding
    let accented = EstablishmentSearch {
        name: Some("ČAJ".to_string()),
        ..Default::default()
    };
    assert_eq!(names(&store, accented, 0).await, vec!["Čajdžinica"]);
}

#[tokio::test]
async fn test_one_tag_matches_any_and_several_tags_match_all() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db.clone());

    let cozy = seed_tag(&db, "Cozy").await;
    let quiet = seed_tag(&db, "Quiet").await;

    Registration::named("Both Tags")
        .tags(&[cozy, quiet])
        .save(&store)
        .await;
    Registration::named("Only Cozy").tags(&[cozy]).save(&store).await;
    Registration::named("Only Quiet").tags(&[quiet]).save(&store).await;

    let one = EstablishmentSearch {
        tags: vec!["Cozy".to_string()],
        ..Default::default()
    };
    assert_eq!(names(&store, one, 0).await, vec!["Both Tags", "Only Cozy"]);

    let several = EstablishmentSearch {
        tags: vec!["Cozy".to_string(), "Quiet".to_string()],
        ..Default::default()
    };
    assert_eq!(names(&store, several, 0).await, vec!["Both Tags"]);
}

#[tokio::test]
async fn test_bounding_box_restricts_coordinates() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db);

    Registration::named("Center Cafe")
        .at(42.0, 21.43)
        .price(PriceCategory::Cheap)
        .save(&store)
        .await;
    Registration::named("Ohrid Cafe")
        .at(41.11, 20.80)
        .price(PriceCategory::Cheap)
        .save(&store)
        .await;
    Registration::named("Unplaced Cafe")
        .price(PriceCategory::Cheap)
        .save(&store)
        .await;

    let skopje = EstablishmentSearch {
        bounding_box: BoundingBox::new(
            Coordinates::new(42.05, 21.35),
            Coordinates::new(41.95, 21.50),
        ),
        ..Default::default()
    };
    assert_eq!(names(&store, skopje, 0).await, vec!["Center Cafe"]);

    // All-zero box is the "no box" sentinel
    let unbounded = EstablishmentSearch {
        price_category: Some(PriceCategory::Cheap),
        ..Default::default()
    };
    assert_eq!(names(&store, unbounded, 0).await.len(), 3);
}

#[tokio::test]
async fn test_range_pages_hold_five_rows() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db);

    for n in 1..=12 {
        Registration::named(&format!("Place {:02}", n))
            .price(PriceCategory::Cheap)
            .save(&store)
            .await;
    }
    let cheap = || EstablishmentSearch {
        price_category: Some(PriceCategory::Cheap),
        ..Default::default()
    };

    assert_eq!(names(&store, cheap(), 0).await.len(), 12);
    assert_eq!(names(&store, cheap(), -3).await.len(), 12);
    assert_eq!(
        names(&store, cheap(), 1).await,
        vec!["Place 01", "Place 02", "Place 03", "Place 04", "Place 05"]
    );
    assert_eq!(
        names(&store, cheap(), 2).await,
        vec!["Place 06", "Place 07", "Place 08", "Place 09", "Place 10"]
    );
    assert_eq!(names(&store, cheap(), 3).await, vec!["Place 11", "Place 12"]);
    assert!(names(&store, cheap(), 4).await.is_empty());
}

#[tokio::test]
async fn test_hidden_establishments_only_appear_on_moderation_paths() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db);

    let (accepted_id, _) = Registration::named("Accepted Place")
        .price(PriceCategory::Cheap)
        .save(&store)
        .await;
    let (pending_id, pending_auth0) = Registration::named("Pending Place")
        .price(PriceCategory::Cheap)
        .status(RequestStatus::Pending)
        .save(&store)
        .await;
    Registration::named("Rejected Place")
        .price(PriceCategory::Cheap)
        .status(RequestStatus::Rejected)
        .save(&store)
        .await;

    let cheap = EstablishmentSearch {
        price_category: Some(PriceCategory::Cheap),
        ..Default::default()
    };
    assert_eq!(names(&store, cheap, 0).await, vec!["Accepted Place"]);

    let pending = store.get_all_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, pending_id);

    assert!(store
        .find_by_auth0_id(&pending_auth0, Visibility::VisibleOnly)
        .await
        .unwrap()
        .is_none());
    assert!(store
        .find_by_auth0_id(&pending_auth0, Visibility::IncludeHidden)
        .await
        .unwrap()
        .is_some());

    let err = store
        .get_by_id(pending_id, Visibility::VisibleOnly)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_ok!(store.get_by_id(accepted_id, Visibility::VisibleOnly).await);
}

#[tokio::test]
async fn test_delete_by_auth0_id_reaches_pending_accounts() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db.clone());

    let (id, auth0_id) = Registration::named("Pending Place")
        .status(RequestStatus::Pending)
        .save(&store)
        .await;

    assert_eq!(
        business_hours::Entity::find()
            .filter(business_hours::Column::EstablishmentId.eq(id))
            .count(db.as_ref())
            .await
            .unwrap(),
        1
    );

    assert!(store.delete_by_auth0_id(&auth0_id).await.unwrap());
    assert!(!store.delete_by_auth0_id("auth0|unknown").await.unwrap());
    assert!(!store.delete_by_auth0_id(&auth0_id).await.unwrap());

    // Owned rows go with the establishment
    assert_eq!(business_hours::Entity::find().count(db.as_ref()).await.unwrap(), 0);
    assert_eq!(rating_statistic::Entity::find().count(db.as_ref()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_replaces_fields_but_keeps_account() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db);

    let (id, auth0_id) = Registration::named("Old Name").save(&store).await;
    let mut establishment = store.get_by_id(id, Visibility::VisibleOnly).await.unwrap();
    let created_at = establishment.created_at;

    establishment.name = "New Name".to_string();
    establishment.auth0_id = "auth0|someone-else".to_string();
    establishment.price_category = Some(PriceCategory::Expensive);

    let updated = store.update(establishment.clone()).await.unwrap();
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.auth0_id, auth0_id);
    assert_eq!(updated.created_at, created_at);
    assert_eq!(updated.price_category, Some(PriceCategory::Expensive));

    establishment.id = 9_999;
    let err = store.update(establishment).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_half_set_coordinates_are_rejected_by_the_store() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db.clone());
    let (id, _) = Registration::named("Center Cafe").at(42.0, 21.43).save(&store).await;

    let raw = Repository::<establishment::Entity>::new(db);
    let mut model = raw.get_by_id(id, Visibility::VisibleOnly).await.unwrap();
    model.longitude = None;

    let err = raw.update(model).await.unwrap_err();
    assert_eq!(err.code(), "PERSISTENCE_ERROR");

    let stored = store.get_by_id(id, Visibility::VisibleOnly).await.unwrap();
    assert_eq!(stored.coordinates, Some(Coordinates::new(42.0, 21.43)));
}

#[tokio::test]
async fn test_profile_loads_whole_aggregate() {
    let db = setup_db().await;
    let store = EstablishmentStore::new(db.clone());

    let cafe = seed_category(&db, "Cafe").await;
    let cozy = seed_tag(&db, "Cozy").await;
    let mut registration = Registration::named("Cozy Cafe")
        .categories(&[cafe])
        .tags(&[cozy])
        .status(RequestStatus::Pending);
    registration.new.social_links = vec![domain::NewSocialLink {
        platform: "instagram".to_string(),
        url: "https://instagram.com/cozycafe".to_string(),
    }];
    let (id, auth0_id) = registration.save(&store).await;

    let users = UserRepository::new(db.clone());
    let reviewer_id = users
        .base()
        .create(user::ActiveModel {
            auth0_id: Set("auth0|reviewer".to_string()),
            username: Set("reviewer".to_string()),
            email: Set("reviewer@example.com".to_string()),
            profile_picture: Set(domain::DEFAULT_PROFILE_PICTURE.to_string()),
            background_picture: Set(domain::DEFAULT_BACKGROUND_PICTURE.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let hours = business_hours::Entity::find()
        .filter(business_hours::Column::EstablishmentId.eq(id))
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    business_hours_exception::ActiveModel {
        business_hours_id: Set(hours.id),
        date: Set(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()),
        hours: Set(None),
        reason: Set(Some("Christmas".to_string())),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .unwrap();

    let lunch = menu::ActiveModel {
        establishment_id: Set(id),
        name: Set("Lunch".to_string()),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .unwrap();
    for (name, price_cents) in [("Soup", 350), ("Salad", 420)] {
        menu_item::ActiveModel {
            menu_id: Set(lunch.id),
            name: Set(name.to_string()),
            description: Set(None),
            price_cents: Set(price_cents),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await
        .unwrap();
    }

    let opening = post::ActiveModel {
        establishment_id: Set(id),
        content: Set("We are open!".to_string()),
        image: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .unwrap();
    post_like::Entity::insert(post_like::ActiveModel {
        post_id: Set(opening.id),
        user_id: Set(reviewer_id),
    })
    .exec_without_returning(db.as_ref())
    .await
    .unwrap();

    let jazz = event::ActiveModel {
        establishment_id: Set(id),
        title: Set("Jazz night".to_string()),
        description: Set(None),
        starts_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .unwrap();
    event_interested_user::Entity::insert(event_interested_user::ActiveModel {
        event_id: Set(jazz.id),
        user_id: Set(reviewer_id),
    })
    .exec_without_returning(db.as_ref())
    .await
    .unwrap();

    let statistic = rating_statistic::Entity::find()
        .filter(rating_statistic::Column::EstablishmentId.eq(id))
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    review::ActiveModel {
        rating_statistic_id: Set(statistic.id),
        user_id: Set(reviewer_id),
        rating: Set(5),
        comment: Set(Some("Lovely".to_string())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .unwrap();

    // Pending establishments are hidden unless the caller opts in
    let err = store
        .get_profile_by_auth0_id(&auth0_id, Visibility::VisibleOnly)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let profile = store
        .get_profile_by_auth0_id(&auth0_id, Visibility::IncludeHidden)
        .await
        .unwrap();

    assert_eq!(profile.establishment.id, id);
    assert_eq!(profile.categories.len(), 1);
    assert_eq!(profile.categories[0].name, "Cafe");
    assert_eq!(profile.tags[0].name, "Cozy");
    assert_eq!(profile.social_links[0].platform, "instagram");

    let hours = profile.business_hours.expect("business hours are created with the establishment");
    assert_eq!(hours.exceptions.len(), 1);

    assert_eq!(profile.menus.len(), 1);
    assert_eq!(profile.menus[0].items.len(), 2);
    assert_eq!(profile.posts[0].likes.len(), 1);
    assert_eq!(profile.events[0].interested_users[0].id, reviewer_id);

    let rating = profile.rating.expect("rating statistic is created with the establishment");
    assert_eq!(rating.reviews.len(), 1);
    assert_eq!(
        rating.reviews[0].reviewer.as_ref().map(|u| u.username.as_str()),
        Some("reviewer")
    );
}

#[tokio::test]
async fn test_service_registration_and_review_flow() {
    let db = setup_db().await;
    let service = EstablishmentManager::new(std::sync::Arc::new(EstablishmentStore::new(db)));

    let id = service
        .register(domain::NewEstablishment::new(
            "auth0|owner",
            "Cozy Cafe",
            "Skopje",
            "Makedonija 1",
        ))
        .await
        .unwrap();

    let duplicate = service
        .register(domain::NewEstablishment::new(
            "auth0|other",
            "Cozy Cafe",
            "Skopje",
            "Ilindenska 2",
        ))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    assert_eq!(service.pending_requests().await.unwrap().len(), 1);

    let accepted = service.review_request(id, true).await.unwrap();
    assert_eq!(accepted.request_status, RequestStatus::Accepted);
    assert!(service.pending_requests().await.unwrap().is_empty());

    let found = service
        .search(
            EstablishmentSearch {
                name: Some("cozy".to_string()),
                ..Default::default()
            },
            1,
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    assert!(service.delete_account("auth0|owner").await.unwrap());
}
