//! Establishment search criteria and their validation.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{DomainError, DomainResult};
use crate::establishment::{Coordinates, PriceCategory};

/// Geographic rectangle given by its north-west and south-east corners.
///
/// All four values at exactly zero means "no box supplied".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north_west: Coordinates,
    pub south_east: Coordinates,
}

impl BoundingBox {
    pub fn new(north_west: Coordinates, south_east: Coordinates) -> Self {
        Self {
            north_west,
            south_east,
        }
    }

    /// True for the all-zero sentinel
    pub fn is_unset(&self) -> bool {
        self.north_west.latitude == 0.0
            && self.north_west.longitude == 0.0
            && self.south_east.latitude == 0.0
            && self.south_east.longitude == 0.0
    }

    /// North-west corner must be strictly north and strictly west of the south-east one
    pub fn is_well_formed(&self) -> bool {
        self.north_west.latitude > self.south_east.latitude
            && self.north_west.longitude < self.south_east.longitude
    }
}

/// Optional filter dimensions for the establishment range query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_search_dimensions"))]
pub struct EstablishmentSearch {
    /// Case-insensitive substring of the establishment name
    #[validate(length(max = 100, message = "Name filter is too long"))]
    pub name: Option<String>,
    pub price_category: Option<PriceCategory>,
    /// Exact category name
    #[validate(length(max = 100, message = "Category filter is too long"))]
    pub category_name: Option<String>,
    /// One tag matches any establishment carrying it; several tags must all be present
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

impl EstablishmentSearch {
    /// Trimmed name filter, `None` when blank
    pub fn name_filter(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Trimmed category filter, `None` when blank
    pub fn category_filter(&self) -> Option<&str> {
        non_blank(self.category_name.as_deref())
    }

    /// Bounding box unless the all-zero sentinel was supplied
    pub fn geo_filter(&self) -> Option<&BoundingBox> {
        (!self.bounding_box.is_unset()).then_some(&self.bounding_box)
    }

    /// True when at least one filter dimension would narrow the result set
    pub fn has_dimension(&self) -> bool {
        self.name_filter().is_some()
            || self.price_category.is_some()
            || self.category_filter().is_some()
            || !self.tags.is_empty()
            || self.geo_filter().is_some_and(BoundingBox::is_well_formed)
    }

    /// Validate and convert failures into a domain validation error
    pub fn check(&self) -> DomainResult<()> {
        self.validate().map_err(|e| {
            let message = e
                .field_errors()
                .values()
                .next()
                .and_then(|errors| errors.first())
                .and_then(|error| error.message.as_ref())
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| "Invalid search request".to_string());
            DomainError::validation(message)
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_search_dimensions(search: &EstablishmentSearch) -> Result<(), ValidationError> {
    if search
        .geo_filter()
        .is_some_and(|bounds| !bounds.is_well_formed())
    {
        return Err(search_error(
            "invalid_bounding_box",
            "Bounding box north-west corner must lie north-west of the south-east corner",
        ));
    }

    if !search.has_dimension() {
        return Err(search_error(
            "missing_filter",
            "At least one search filter must be supplied",
        ));
    }

    Ok(())
}

fn search_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skopje_box() -> BoundingBox {
        BoundingBox::new(Coordinates::new(42.05, 21.35), Coordinates::new(41.95, 21.50))
    }

    #[test]
    fn test_empty_search_is_rejected() {
        let err = EstablishmentSearch::default().check().unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("At least one search filter must be supplied")
        );
    }

    #[test]
    fn test_blank_text_does_not_count_as_dimension() {
        let search = EstablishmentSearch {
            name: Some("   ".to_string()),
            category_name: Some(String::new()),
            ..Default::default()
        };
        assert!(!search.has_dimension());
        assert!(search.check().is_err());
    }

    #[test]
    fn test_each_dimension_alone_is_accepted() {
        let by_name = EstablishmentSearch {
            name: Some("Cafe".to_string()),
            ..Default::default()
        };
        let by_price = EstablishmentSearch {
            price_category: Some(PriceCategory::Moderate),
            ..Default::default()
        };
        let by_category = EstablishmentSearch {
            category_name: Some("Restaurant".to_string()),
            ..Default::default()
        };
        let by_tags = EstablishmentSearch {
            tags: vec!["Cozy".to_string()],
            ..Default::default()
        };
        let by_box = EstablishmentSearch {
            bounding_box: skopje_box(),
            ..Default::default()
        };

        for search in [by_name, by_price, by_category, by_tags, by_box] {
            assert!(search.check().is_ok(), "{:?} should be accepted", search);
        }
    }

    #[test]
    fn test_inverted_bounding_box_is_rejected() {
        let inverted = BoundingBox::new(
            Coordinates::new(41.95, 21.50),
            Coordinates::new(42.05, 21.35),
        );
        let search = EstablishmentSearch {
            name: Some("Cafe".to_string()),
            bounding_box: inverted,
            ..Default::default()
        };

        let err = search.check().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("Bounding box")));
    }

    #[test]
    fn test_zero_box_is_unset() {
        let search = EstablishmentSearch::default();
        assert!(search.bounding_box.is_unset());
        assert!(search.geo_filter().is_none());
        assert!(skopje_box().is_well_formed());
    }

    #[test]
    fn test_overlong_name_is_rejected() {
        let search = EstablishmentSearch {
            name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert_eq!(
            search.check(),
            Err(DomainError::validation("Name filter is too long"))
        );
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let search: EstablishmentSearch =
            serde_json::from_str(r#"{"price_category":"expensive"}"#).unwrap();
        assert_eq!(search.price_category, Some(PriceCategory::Expensive));
        assert!(search.tags.is_empty());
        assert!(search.bounding_box.is_unset());
    }
}
