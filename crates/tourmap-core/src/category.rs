//! Business category definitions.
//!
//! This module defines [`Category`], the two listing families the upstream API
//! serves, and [`business_types`], the type codes known to belong to each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TourError;

/// Listing family a business belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Hotels, homestays, resorts and other lodging.
    Accommodation,
    /// Restaurants and food businesses.
    Restaurant,
}

impl Category {
    /// All categories, in the order a search processes them.
    pub const ALL: [Self; 2] = [Self::Accommodation, Self::Restaurant];

    /// Returns the lowercase wire name of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accommodation => "accommodation",
            Self::Restaurant => "restaurant",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accommodation" => Ok(Self::Accommodation),
            "restaurant" => Ok(Self::Restaurant),
            other => Err(TourError::InvalidParameter(format!(
                "unknown business category: {other}"
            ))),
        }
    }
}

/// Business type codes understood by the upstream listing API.
pub mod business_types {
    /// Hotel.
    pub const HOTEL: &str = "500040001";
    /// Homestay.
    pub const HOMESTAY: &str = "500040002";
    /// Resort.
    pub const RESORT: &str = "500040003";
    /// Daily rental accommodation.
    pub const DAILY_RENTAL: &str = "500040004";
    /// Hostel.
    pub const HOSTEL: &str = "500040005";
    /// Mansion or dormitory.
    pub const MANSION: &str = "500040007";
    /// Restaurant.
    pub const RESTAURANT: &str = "50001";

    /// Accommodation codes selected when none are given explicitly.
    pub const DEFAULT_ACCOMMODATION: &[&str] = &[HOTEL, HOMESTAY, RESORT, DAILY_RENTAL];
}
