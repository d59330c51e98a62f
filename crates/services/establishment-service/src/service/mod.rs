//! Service layer - business use cases over the repositories.

mod establishment_service;

pub use establishment_service::{EstablishmentManager, EstablishmentService};
