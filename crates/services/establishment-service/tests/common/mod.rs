//! Shared fixtures: an in-memory SQLite store with the real migrations applied.

#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use domain::{Coordinates, NewEstablishment, PriceCategory, RequestStatus};
use establishment_service_lib::infra::Migrator;
use establishment_service_lib::repository::entities::{category, tag};
use establishment_service_lib::repository::{
    EstablishmentRepository, EstablishmentStore, Repository,
};

/// Fresh database per test; one pooled connection keeps the in-memory schema alive
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

pub async fn seed_category(db: &Arc<DatabaseConnection>, name: &str) -> i32 {
    Repository::<category::Entity>::new(Arc::clone(db))
        .create(category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to seed category")
}

pub async fn seed_tag(db: &Arc<DatabaseConnection>, name: &str) -> i32 {
    Repository::<tag::Entity>::new(Arc::clone(db))
        .create(tag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to seed tag")
}

/// Builder for establishments registered through the repository
pub struct Registration {
    pub new: NewEstablishment,
    pub status: RequestStatus,
}

impl Registration {
    pub fn named(name: &str) -> Self {
        let auth0_id = format!("auth0|{}", uuid::Uuid::new_v4());
        Self {
            new: NewEstablishment::new(auth0_id, name, "Skopje", "Makedonija 1"),
            status: RequestStatus::Accepted,
        }
    }

    pub fn price(mut self, price: PriceCategory) -> Self {
        self.new.price_category = Some(price);
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.new.coordinates = Some(Coordinates::new(latitude, longitude));
        self
    }

    pub fn categories(mut self, ids: &[i32]) -> Self {
        self.new.category_ids = ids.to_vec();
        self
    }

    pub fn tags(mut self, ids: &[i32]) -> Self {
        self.new.tag_ids = ids.to_vec();
        self
    }

    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }

    /// Create, then move out of `Pending` unless the status says otherwise
    pub async fn save(self, store: &EstablishmentStore) -> (i32, String) {
        let auth0_id = self.new.auth0_id.clone();
        let id = store
            .create(self.new)
            .await
            .expect("Failed to create establishment");
        if self.status != RequestStatus::Pending {
            store
                .set_request_status(id, self.status)
                .await
                .expect("Failed to set request status");
        }
        (id, auth0_id)
    }
}
