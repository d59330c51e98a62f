//! Establishment Service Library
//!
//! Data access for the business directory: a generic repository, account
//! repositories, the establishment repository and the search filter builder.
//! The binary wraps migrations and a few operator commands around it.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::EstablishmentServiceConfig;
use crate::infra::Database;
use crate::repository::EstablishmentStore;
use crate::service::{EstablishmentManager, EstablishmentService};

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = EstablishmentServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Print registration requests awaiting moderation.
pub async fn print_pending_requests() -> Result<(), Box<dyn std::error::Error>> {
    let config = EstablishmentServiceConfig::from_env();
    let db = Database::connect(&config.database).await?;
    db.ping().await?;

    let store = EstablishmentStore::new(db.get_connection());
    let service = EstablishmentManager::new(Arc::new(store));
    let pending = service.pending_requests().await?;

    if pending.is_empty() {
        println!("No pending establishment requests");
    }
    for establishment in pending {
        println!(
            "{:>6}  {:<32}  {}, {}  ({})",
            establishment.id,
            establishment.name,
            establishment.address,
            establishment.city,
            establishment.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}
