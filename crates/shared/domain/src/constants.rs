//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Accounts
// =============================================================================

/// Profile picture reference used until the owner uploads one
pub const DEFAULT_PROFILE_PICTURE: &str = "default-profile-picture.png";

/// Background picture reference used until the owner uploads one
pub const DEFAULT_BACKGROUND_PICTURE: &str = "default-background-picture.png";

// =============================================================================
// Establishment search
// =============================================================================

/// Number of establishments returned per page of a filtered range query
pub const RANGE_PAGE_SIZE: u64 = 5;

// =============================================================================
// Request status values
// =============================================================================

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

// =============================================================================
// Price category values
// =============================================================================

pub const PRICE_CHEAP: &str = "cheap";
pub const PRICE_MODERATE: &str = "moderate";
pub const PRICE_EXPENSIVE: &str = "expensive";
