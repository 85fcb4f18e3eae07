//! Bearer credential inspection.
//!
//! The upstream API authenticates with a three-segment signed token. Before any
//! network call the pipeline checks that the middle segment decodes to a JSON
//! payload whose `exp` claim lies in the future. The signature is not verified.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{Result, TourError};

/// Seconds before expiry in which a credential is reported as expiring soon.
const EXPIRY_WARNING_SECS: i64 = 60 * 60;

/// Bearer token used to authenticate listing requests.
///
/// The token text is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

/// Claims read from a valid credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialInfo {
    /// When the credential stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// When the credential was issued, if the token says.
    pub issued_at: Option<DateTime<Utc>>,
}

impl CredentialInfo {
    /// Returns true if the credential expires within the next hour of `now`.
    #[must_use]
    pub fn expires_soon(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now + TimeDelta::seconds(EXPIRY_WARNING_SECS)
    }
}

impl Credential {
    /// Wraps a raw token; surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Returns the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Checks the token's structure and expiry against the current time.
    ///
    /// # Errors
    /// Returns [`TourError::Credential`] if the token is empty, does not have
    /// three segments, has an undecodable payload, lacks `exp`, or has expired.
    pub fn validate(&self) -> Result<CredentialInfo> {
        self.validate_at(Utc::now())
    }

    /// Checks the token's structure and expiry against `now`.
    ///
    /// # Errors
    /// See [`Self::validate`].
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<CredentialInfo> {
        let info = inspect(&self.0)?;

        if info.expires_at < now {
            return Err(TourError::Credential(format!(
                "token expired at {}; obtain a new token",
                info.expires_at.to_rfc3339()
            )));
        }

        if info.expires_soon(now) {
            warn!(expires_at = %info.expires_at, "API token expires within the hour");
        }
        debug!(expires_at = %info.expires_at, issued_at = ?info.issued_at, "API token accepted");
        Ok(info)
    }
}

impl From<&str> for Credential {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Credential {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

fn inspect(token: &str) -> Result<CredentialInfo> {
    if token.is_empty() {
        return Err(TourError::Credential("API token is required".to_string()));
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TourError::Credential(format!(
            "expected 3 token segments, found {}",
            segments.len()
        )));
    }

    let payload = decode_segment(segments[1])
        .ok_or_else(|| TourError::Credential("cannot decode token payload".to_string()))?;

    let expires_at = claim_time(&payload, "exp").ok_or_else(|| {
        TourError::Credential("token does not contain expiration information".to_string())
    })?;

    Ok(CredentialInfo {
        expires_at,
        issued_at: claim_time(&payload, "iat"),
    })
}

/// Decodes a base64url segment (standard alphabet and padding tolerated) into JSON.
fn decode_segment(segment: &str) -> Option<Value> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Reads a positive epoch-seconds claim.
fn claim_time(payload: &Value, claim: &str) -> Option<DateTime<Utc>> {
    let value = payload.get(claim)?;
    let secs = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))?;
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.signature")
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_valid_token() {
        let token = token_with_payload(r#"{"exp":1700086400,"iat":1699990000}"#);
        let info = Credential::new(token).validate_at(now()).unwrap();
        assert_eq!(info.expires_at.timestamp(), 1_700_086_400);
        assert_eq!(info.issued_at.map(|t| t.timestamp()), Some(1_699_990_000));
        assert!(!info.expires_soon(now()));
    }

    #[test]
    fn test_expired_token() {
        let token = token_with_payload(r#"{"exp":1699999999}"#);
        let err = Credential::new(token).validate_at(now()).unwrap_err();
        assert!(matches!(err, TourError::Credential(msg) if msg.contains("expired")));
    }

    #[test]
    fn test_token_expiring_soon_is_still_valid() {
        let token = token_with_payload(r#"{"exp":1700001800}"#);
        let info = Credential::new(token).validate_at(now()).unwrap();
        assert!(info.expires_soon(now()));
    }

    #[test]
    fn test_missing_exp() {
        let token = token_with_payload(r#"{"sub":"user"}"#);
        let err = Credential::new(token).validate_at(now()).unwrap_err();
        assert!(matches!(err, TourError::Credential(msg) if msg.contains("expiration")));
    }

    #[test]
    fn test_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d"] {
            let err = Credential::new(token).validate_at(now()).unwrap_err();
            assert!(matches!(err, TourError::Credential(_)), "token {token:?}");
        }
    }

    #[test]
    fn test_undecodable_payload() {
        let err = Credential::new("aaa.!!!.ccc").validate_at(now()).unwrap_err();
        assert!(matches!(err, TourError::Credential(msg) if msg.contains("decode")));

        let not_json = URL_SAFE_NO_PAD.encode(b"not json");
        let err = Credential::new(format!("a.{not_json}.c"))
            .validate_at(now())
            .unwrap_err();
        assert!(matches!(err, TourError::Credential(_)));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let padded = base64::engine::general_purpose::STANDARD.encode(br#"{"exp":1800000000 }"#);
        let token = format!("h.{padded}.s");
        assert!(Credential::new(token).validate_at(now()).is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("secret.token.value");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
