//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Persistence models in the service crates convert into these types.

pub mod constants;
pub mod error;
pub mod establishment;
pub mod search;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use establishment::{
    Coordinates, Establishment, NewEstablishment, NewSocialLink, PriceCategory, RequestStatus,
};
pub use search::{BoundingBox, EstablishmentSearch};
