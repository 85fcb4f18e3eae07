//! Mapping from raw API listings to [`BusinessRecord`]s.

use crate::response::{RawListing, RawLocation, RawRoom};
use tourmap_core::{Address, BusinessRecord, Category, Contact, Location, Room};
use tracing::warn;

/// Normalizes one raw listing.
///
/// Returns `None` for a listing without an id.
pub(crate) fn normalize_listing(raw: RawListing, category: Category) -> Option<BusinessRecord> {
    let Some(id) = raw.id else {
        warn!(%category, "Skipping listing without an id");
        return None;
    };

    let contact = Contact {
        mobile: raw.contact_mobile_phone_no,
        email: raw.contact_email,
        additional: raw.contact_additional_channel,
        website: raw.biz_contact_website,
        facebook: raw.biz_contact_facebook,
        instagram: raw.biz_contact_instagram,
        line: raw.biz_contact_line,
    };

    let mut record = BusinessRecord::new(id, category).with_contact(contact);
    record.name_th = raw.name_th;
    record.name_en = raw.name_en;
    record.address = Address {
        no: raw.address_no,
        moo: raw.moo,
        district: raw.district,
        sub_district: raw.sub_district,
        province: raw.province,
        postal_code: raw.postal_code,
    };
    record.location = raw.location.and_then(normalize_location);
    record.rooms = raw.rooms.into_iter().map(normalize_room).collect();
    record.images = raw.images;
    Some(record)
}

/// Upstream encodes an unknown coordinate as missing, `null` or `0`.
fn normalize_location(raw: RawLocation) -> Option<Location> {
    let coordinates = raw.coordinates;
    let usable = |v: Option<f64>| v.filter(|c| c.is_finite() && *c != 0.0);
    let longitude = usable(coordinates.first().copied().flatten())?;
    let latitude = usable(coordinates.get(1).copied().flatten())?;
    Some(Location {
        latitude,
        longitude,
        kind: raw.kind,
    })
}

fn normalize_room(raw: RawRoom) -> Room {
    Room {
        name: raw.name,
        price: raw.price,
        count: raw.number_of_room,
        images: raw.images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tourmap_core::RecordId;

    fn raw(value: serde_json::Value) -> RawListing {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_listing() {
        let listing = raw(json!({
            "id": 4021,
            "nameTh": "โรงแรมริเวอร์ไซด์",
            "nameEn": "Riverside Hotel",
            "addressNo": "99/1",
            "moo": "3",
            "district": "Mueang",
            "subDistrict": "Nai Mueang",
            "province": "Khon Kaen",
            "postalCode": "40000",
            "location": {"type": "Point", "coordinates": [102.8359, 16.4322]},
            "contactMobilePhoneNo": "0812345678",
            "contactEmail": "front@riverside.example",
            "bizContactWebsite": "riverside.example",
            "bizContactLine": "@riverside",
            "rooms": [{"name": "Deluxe", "price": "1500", "numberOfRoom": 12, "images": ["r1.jpg"]}],
            "images": ["a.jpg", "b.jpg"]
        }));

        let record = normalize_listing(listing, Category::Accommodation).unwrap();
        assert_eq!(record.id, RecordId::Number(4021));
        assert_eq!(record.display_name(), Some("โรงแรมริเวอร์ไซด์"));
        assert_eq!(record.address.sub_district.as_deref(), Some("Nai Mueang"));
        assert_eq!(record.coordinates(), Some((16.4322, 102.8359)));
        assert_eq!(
            record.location.as_ref().and_then(|l| l.kind.as_deref()),
            Some("Point")
        );
        assert_eq!(
            record.contact_urls.website.as_deref(),
            Some("https://riverside.example")
        );
        assert_eq!(record.contact_urls.line.as_deref(), Some("@riverside"));
        assert!(record.contact_urls.facebook.is_none());
        assert_eq!(record.rooms.len(), 1);
        assert_eq!(record.rooms[0].count, Some(12));
        assert_eq!(record.images, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let record = normalize_listing(raw(json!({"id": "R-1"})), Category::Restaurant).unwrap();
        assert!(record.name_th.is_none());
        assert!(record.address.province.is_none());
        assert!(record.location.is_none());
        assert!(record.contact_urls.is_empty());
        assert!(record.rooms.is_empty());
    }

    #[test]
    fn test_unusable_coordinates_drop_location() {
        for location in [
            json!({"coordinates": [0, 16.4]}),
            json!({"coordinates": [102.8, null]}),
            json!({"coordinates": [102.8]}),
            json!({"coordinates": null}),
            json!({"type": "Point"}),
        ] {
            let listing = raw(json!({"id": 1, "location": location}));
            let record = normalize_listing(listing, Category::Restaurant).unwrap();
            assert!(record.location.is_none(), "{location}");
        }
    }

    #[test]
    fn test_numeric_string_coordinates_are_placeable() {
        let listing = raw(json!({"id": 2, "location": {"coordinates": ["102.8", "16.4"]}}));
        let record = normalize_listing(listing, Category::Accommodation).unwrap();
        assert_eq!(record.coordinates(), Some((16.4, 102.8)));
    }

    #[test]
    fn test_listing_without_id_is_skipped() {
        let listing = raw(json!({"nameEn": "Nameless"}));
        assert!(normalize_listing(listing, Category::Restaurant).is_none());
    }
}
