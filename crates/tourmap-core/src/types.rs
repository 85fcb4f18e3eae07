//! Core data types for tourism listings.
//!
//! This module defines the canonical shapes every provider normalizes into:
//!
//! - [`RecordId`] - Source-provided listing identity
//! - [`BusinessRecord`] - One normalized listing
//! - [`Address`], [`Location`], [`Contact`], [`ContactUrls`], [`Room`] - Record parts
//! - [`FetchQuery`] - The parameters of one category's upstream query

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;

/// Opaque listing identity as provided by the upstream source.
///
/// Uniqueness is the upstream's responsibility; records are never deduplicated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Structured postal address, copied verbatim from upstream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// House or unit number.
    pub no: Option<String>,
    /// Village group number (moo).
    pub moo: Option<String>,
    /// District.
    pub district: Option<String>,
    /// Sub-district.
    pub sub_district: Option<String>,
    /// Province.
    pub province: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
}

/// Geographic position of a listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Geometry type reported upstream (usually `Point`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Contact channels; each may be independently present or absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Mobile phone number.
    pub mobile: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Free-form additional channel.
    pub additional: Option<String>,
    /// Website, possibly without a scheme.
    pub website: Option<String>,
    /// Facebook handle or URL.
    pub facebook: Option<String>,
    /// Instagram handle or URL.
    pub instagram: Option<String>,
    /// LINE handle or URL.
    pub line: Option<String>,
}

/// Link targets derived once per record from its [`Contact`].
///
/// Absent channels are omitted entirely when serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUrls {
    /// Website URL, always carrying a scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Facebook link, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    /// Instagram link, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// LINE link, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

impl ContactUrls {
    /// Derives link targets from contact fields.
    ///
    /// A website without a URL scheme gets `https://` prepended. Social
    /// channels are kept verbatim. Blank values count as absent.
    #[must_use]
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            website: present(&contact.website).map(str::trim).map(|site| {
                if has_url_scheme(site) {
                    site.to_string()
                } else {
                    format!("https://{site}")
                }
            }),
            facebook: present(&contact.facebook).map(str::to_string),
            instagram: present(&contact.instagram).map(str::to_string),
            line: present(&contact.line).map(str::to_string),
        }
    }

    /// Returns true if no channel produced a link.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.facebook.is_none()
            && self.instagram.is_none()
            && self.line.is_none()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Returns true if `value` starts with `scheme://`.
fn has_url_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// A rentable unit of an accommodation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room name.
    pub name: Option<String>,
    /// Nightly price as reported upstream.
    pub price: Option<String>,
    /// Number of rooms of this kind.
    pub count: Option<i64>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Canonical normalized representation of one listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Source-provided identity.
    pub id: RecordId,
    /// Localized (Thai) name.
    pub name_th: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// Listing family this record was fetched for.
    pub category: Category,
    /// Postal address.
    #[serde(default)]
    pub address: Address,
    /// Position, absent when upstream has no geocoding for the record.
    #[serde(default)]
    pub location: Option<Location>,
    /// Raw contact channels.
    #[serde(default)]
    pub contact: Contact,
    /// Links derived from [`Self::contact`].
    #[serde(default)]
    pub contact_urls: ContactUrls,
    /// Rentable units, in upstream order.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Image URLs, in upstream order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl BusinessRecord {
    /// Creates a record with only identity and category set.
    #[must_use]
    pub fn new(id: impl Into<RecordId>, category: Category) -> Self {
        Self {
            id: id.into(),
            name_th: None,
            name_en: None,
            category,
            address: Address::default(),
            location: None,
            contact: Contact::default(),
            contact_urls: ContactUrls::default(),
            rooms: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Sets the contact channels and recomputes the derived links.
    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact_urls = ContactUrls::from_contact(&contact);
        self.contact = contact;
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(Location {
            latitude,
            longitude,
            kind: None,
        });
        self
    }

    /// Returns `(latitude, longitude)` if the record can be placed on a map.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location
            .as_ref()
            .map(|loc| (loc.latitude, loc.longitude))
    }

    /// Returns the best display name available.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name_th.as_deref().or(self.name_en.as_deref())
    }
}

/// One category's query against the upstream listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchQuery {
    /// Listing endpoint URL.
    pub endpoint: String,
    /// Category the results are attributed to.
    pub category: Category,
    /// Business type codes to filter on.
    pub business_types: Vec<String>,
    /// Province names to filter on; empty means no province filter.
    pub provinces: Vec<String>,
}

impl FetchQuery {
    /// Creates a new query.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        category: Category,
        business_types: Vec<String>,
        provinces: Vec<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            category,
            business_types,
            provinces,
        }
    }
}
