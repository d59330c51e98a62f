//! Establishment domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    PRICE_CHEAP, PRICE_EXPENSIVE, PRICE_MODERATE, STATUS_ACCEPTED, STATUS_PENDING,
    STATUS_REJECTED,
};
use crate::error::DomainError;

/// Moderation state of an establishment registration request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => STATUS_PENDING,
            RequestStatus::Accepted => STATUS_ACCEPTED,
            RequestStatus::Rejected => STATUS_REJECTED,
        }
    }

    /// Only accepted establishments are shown on default reads
    pub fn is_visible(&self) -> bool {
        matches!(self, RequestStatus::Accepted)
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(RequestStatus::Pending),
            STATUS_ACCEPTED => Ok(RequestStatus::Accepted),
            STATUS_REJECTED => Ok(RequestStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "Unknown request status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price tier of an establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceCategory {
    Cheap,
    Moderate,
    Expensive,
}

impl PriceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCategory::Cheap => PRICE_CHEAP,
            PriceCategory::Moderate => PRICE_MODERATE,
            PriceCategory::Expensive => PRICE_EXPENSIVE,
        }
    }
}

impl FromStr for PriceCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PRICE_CHEAP => Ok(PriceCategory::Cheap),
            PRICE_MODERATE => Ok(PriceCategory::Moderate),
            PRICE_EXPENSIVE => Ok(PriceCategory::Expensive),
            other => Err(DomainError::validation(format!(
                "Unknown price category '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic point. Latitude and longitude only ever travel together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rebuild coordinates from two nullable columns; half-set pairs are discarded
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Establishment domain entity (account entity owned by an external identity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: i32,
    /// External identity-provider account id
    pub auth0_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub price_category: Option<PriceCategory>,
    pub request_status: RequestStatus,
    pub profile_picture: String,
    pub background_picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Establishment {
    /// Check if the establishment is shown on default reads
    pub fn is_visible(&self) -> bool {
        self.request_status.is_visible()
    }

    /// Check if the registration request still awaits moderation
    pub fn is_pending(&self) -> bool {
        self.request_status == RequestStatus::Pending
    }
}

/// Social link supplied at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
}

/// Establishment creation data.
///
/// Category and tag ids are expected to be validated upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEstablishment {
    pub auth0_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub price_category: Option<PriceCategory>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub social_links: Vec<NewSocialLink>,
}

impl NewEstablishment {
    /// Minimal registration with no classification or links
    pub fn new(
        auth0_id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            auth0_id: auth0_id.into(),
            name: name.into(),
            description: None,
            city: city.into(),
            address: address.into(),
            coordinates: None,
            price_category: None,
            category_ids: Vec::new(),
            tag_ids: Vec::new(),
            social_links: Vec::new(),
        }
    }

    /// Reject registrations missing required text fields
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.auth0_id.trim().is_empty() {
            return Err(DomainError::validation("Account id is required"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Establishment name is required"));
        }
        if self.address.trim().is_empty() || self.city.trim().is_empty() {
            return Err(DomainError::validation("City and address are required"));
        }
        Ok(())
    }
}
