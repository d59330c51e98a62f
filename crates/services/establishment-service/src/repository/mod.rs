//! Repository layer for data access.

mod account;
pub mod base;
pub mod entities;
mod establishment_repository;
pub mod profile;
pub mod search;

pub use account::{AccountRepository, UserRepository};
pub use base::{AccountEntity, IdentifiedEntity, Repository, Visibility};
pub use establishment_repository::{EstablishmentRepository, EstablishmentStore};
#[cfg(any(test, feature = "test-utils"))]
pub use establishment_repository::MockEstablishmentRepository;
pub use profile::EstablishmentProfile;
pub use search::{build_filter, EstablishmentFilter};
