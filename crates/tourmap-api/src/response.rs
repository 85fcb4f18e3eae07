//! Wire types for the upstream listing API.
//!
//! Upstream fields are loosely typed: numbers show up where strings are
//! expected and the other way around, and any field may be `null`. The
//! deserializers here accept both and map `null`, missing or unusable values
//! to `None`, so one odd field never costs the rest of the page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tourmap_core::RecordId;
use tracing::warn;

/// Request body for one page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageRequest<'a> {
    pub(crate) limit: u32,
    pub(crate) page: u32,
    pub(crate) business_type: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) province: Option<&'a [String]>,
}

/// The `data` object of a successful response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub(crate) data: Vec<RawListing>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub(crate) total_pages: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub(crate) total_items: Option<u64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub(crate) has_next_page: Option<bool>,
}

impl PageData {
    /// Extracts page data from a response body.
    ///
    /// Returns `None` when the body is not `{success: true, data: {...}}` or
    /// the `data` object cannot be read.
    pub(crate) fn from_envelope(body: Value) -> Option<Self> {
        let Value::Object(mut envelope) = body else {
            return None;
        };
        let success = envelope
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        match envelope.remove("data") {
            Some(data @ Value::Object(_)) if success => serde_json::from_value(data)
                .inspect_err(|e| warn!(error = %e, "Unreadable page data"))
                .ok(),
            _ => None,
        }
    }
}

/// One listing as returned by the API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawListing {
    #[serde(default, deserialize_with = "lenient_id")]
    pub(crate) id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) name_th: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) name_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) address_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) moo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) district: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) sub_district: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) province: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub(crate) location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) contact_mobile_phone_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) contact_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) contact_additional_channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) biz_contact_website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) biz_contact_facebook: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) biz_contact_instagram: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) biz_contact_line: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub(crate) rooms: Vec<RawRoom>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub(crate) images: Vec<String>,
}

/// GeoJSON-style point; `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLocation {
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub(crate) coordinates: Vec<Option<f64>>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub(crate) kind: Option<String>,
}

/// A rentable unit nested in an accommodation listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRoom {
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(crate) price: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub(crate) number_of_room: Option<i64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub(crate) images: Vec<String>,
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|f: &f64| f.is_finite())
}

/// Whole, non-negative numbers only; `3.0` and `"3"` count.
fn value_to_u64(value: &Value) -> Option<u64> {
    if let Some(u) = value.as_u64() {
        return Some(u);
    }
    value_to_f64(value)
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
        .map(|f| f as u64)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_string))
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_to_u64)
        .and_then(|u| u32::try_from(u).ok()))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_to_u64))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(RecordId::Number(i)),
            None => Some(RecordId::Text(n.to_string())),
        },
        Some(Value::String(s)) if !s.is_empty() => Some(RecordId::Text(s)),
        _ => None,
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(value_to_string).collect(),
        _ => Vec::new(),
    })
}

/// Coordinate arrays: numbers or numeric strings, anything else is `None`.
fn lenient_numbers<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.iter().map(value_to_f64).collect(),
        _ => Vec::new(),
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Items that do not decode are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_data() {
        let body = json!({
            "success": true,
            "data": {"data": [{"id": 1}], "totalPages": 3, "totalItems": 41, "hasNextPage": true}
        });
        let page = PageData::from_envelope(body).unwrap();
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(page.total_items, Some(41));
        assert_eq!(page.has_next_page, Some(true));
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn test_missing_envelope_is_none() {
        for body in [
            json!({"success": false, "message": "quota exceeded"}),
            json!({"success": true}),
            json!({"success": true, "data": null}),
            json!({"data": {"data": []}}),
            json!([1, 2, 3]),
        ] {
            assert!(PageData::from_envelope(body.clone()).is_none(), "{body}");
        }
    }

    #[test]
    fn test_loosely_typed_page_fields() {
        let body = json!({
            "success": true,
            "data": {"data": "none", "totalPages": 3.0, "totalItems": "41", "hasNextPage": "false"}
        });
        let page = PageData::from_envelope(body).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(page.total_items, Some(41));
        assert_eq!(page.has_next_page, Some(false));

        let body = json!({"success": true, "data": {"totalPages": "many", "hasNextPage": 1}});
        let page = PageData::from_envelope(body).unwrap();
        assert!(page.total_pages.is_none());
        assert!(page.has_next_page.is_none());
    }

    #[test]
    fn test_bad_item_is_dropped_not_fatal() {
        let body = json!({
            "success": true,
            "data": {"data": [{"id": 1}, "garbage", 7, {"id": 2}], "totalPages": 1}
        });
        let page = PageData::from_envelope(body).unwrap();
        let ids: Vec<_> = page.data.into_iter().filter_map(|l| l.id).collect();
        assert_eq!(ids, vec![RecordId::Number(1), RecordId::Number(2)]);
    }

    #[test]
    fn test_string_coordinates() {
        let raw: RawListing = serde_json::from_value(json!({
            "id": 2,
            "location": {"type": "Point", "coordinates": ["102.8", " 16.4 ", "x"]}
        }))
        .unwrap();
        let location = raw.location.unwrap();
        assert_eq!(location.coordinates, vec![Some(102.8), Some(16.4), None]);
        assert_eq!(location.kind.as_deref(), Some("Point"));
    }

    #[test]
    fn test_unusable_location_and_rooms_become_absent() {
        let raw: RawListing = serde_json::from_value(json!({
            "id": 3,
            "location": "n/a",
            "rooms": ["Deluxe", {"name": "Suite", "numberOfRoom": 2}, null],
        }))
        .unwrap();
        assert!(raw.location.is_none());
        assert_eq!(raw.rooms.len(), 1);
        assert_eq!(raw.rooms[0].name.as_deref(), Some("Suite"));

        let raw: RawListing =
            serde_json::from_value(json!({"id": 4, "location": {"coordinates": "16,102"}}))
                .unwrap();
        assert!(raw.location.unwrap().coordinates.is_empty());
    }

    #[test]
    fn test_lenient_fields() {
        let raw: RawListing = serde_json::from_value(json!({
            "id": "S-100",
            "addressNo": 12,
            "moo": null,
            "postalCode": 30000,
            "rooms": null,
            "images": ["a.jpg", null, 5],
        }))
        .unwrap();
        assert_eq!(raw.id, Some(RecordId::Text("S-100".to_string())));
        assert_eq!(raw.address_no.as_deref(), Some("12"));
        assert!(raw.moo.is_none());
        assert_eq!(raw.postal_code.as_deref(), Some("30000"));
        assert!(raw.rooms.is_empty());
        assert_eq!(raw.images, vec!["a.jpg", "5"]);
    }

    #[test]
    fn test_room_count_accepts_numeric_strings() {
        let room: RawRoom =
            serde_json::from_value(json!({"name": "Deluxe", "price": 1200, "numberOfRoom": "4"}))
                .unwrap();
        assert_eq!(room.price.as_deref(), Some("1200"));
        assert_eq!(room.number_of_room, Some(4));
    }

    #[test]
    fn test_page_request_omits_empty_province() {
        let types = vec!["50001".to_string()];
        let body = serde_json::to_value(PageRequest {
            limit: 20,
            page: 2,
            business_type: &types,
            province: None,
        })
        .unwrap();
        assert_eq!(body, json!({"limit": 20, "page": 2, "businessType": ["50001"]}));
    }
}
