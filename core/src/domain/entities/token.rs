//! Token claims for JWT-based authentication.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims structure for the JWT payload
///
/// Field order is the serialization order: `sub`, `iat`, `exp`, `authorities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at, seconds since the epoch
    #[serde(default)]
    pub iat: i64,

    /// Expiration, seconds since the epoch
    pub exp: i64,

    /// Authorities as found in the payload. Kept untyped so a malformed
    /// value does not reject the whole token.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub authorities: Value,
}

impl Claims {
    /// Creates claims for `subject` valid from `issued_at` for `ttl_seconds`.
    ///
    /// `None` when the expiry does not fit in an `i64`.
    pub fn new(
        subject: impl Into<String>,
        authorities: &[String],
        issued_at: i64,
        ttl_seconds: i64,
    ) -> Option<Self> {
        let exp = issued_at.checked_add(ttl_seconds)?;
        Some(Self {
            sub: subject.into(),
            iat: issued_at,
            exp,
            authorities: Value::Array(
                authorities.iter().cloned().map(Value::String).collect(),
            ),
        })
    }

    /// Authorities in payload order.
    ///
    /// A missing claim or one that is not an array yields an empty list.
    /// String elements are returned as-is, any other element as its JSON text.
    pub fn authority_list(&self) -> Vec<String> {
        match &self.authorities {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the claims are expired at `now` (seconds). Expiry is exclusive:
    /// a token whose `exp` equals `now` is already expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_with(authorities: Value) -> Claims {
        Claims {
            sub: "alice".to_string(),
            iat: 0,
            exp: 10,
            authorities,
        }
    }

    #[test]
    fn test_new_sets_expiry_from_ttl() {
        let claims = Claims::new("alice", &["ROLE_USER".to_string()], 1_000, 3_600).unwrap();
        assert_eq!(claims.exp, 4_600);
        assert_eq!(claims.authority_list(), vec!["ROLE_USER"]);
    }

    #[test]
    fn test_new_refuses_overflowing_expiry() {
        assert!(Claims::new("alice", &[], 1_700_000_000, i64::MAX).is_none());
        assert!(Claims::new("alice", &[], i64::MAX - 10, 11).is_none());
        assert_eq!(Claims::new("alice", &[], i64::MAX - 10, 10).unwrap().exp, i64::MAX);
    }

    #[test]
    fn test_authority_list_is_lenient() {
        assert!(claims_with(Value::Null).authority_list().is_empty());
        assert!(claims_with(json!("ROLE_USER")).authority_list().is_empty());
        assert!(claims_with(json!({"role": "x"})).authority_list().is_empty());
        assert_eq!(
            claims_with(json!(["ROLE_A", 7, true])).authority_list(),
            vec!["ROLE_A", "7", "true"]
        );
    }

    #[test]
    fn test_missing_authorities_claim_deserializes() {
        let claims: Claims = serde_json::from_value(json!({"sub": "bob", "iat": 1, "exp": 2})).unwrap();
        assert!(claims.authority_list().is_empty());
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let claims = claims_with(Value::Null);
        assert!(!claims.is_expired_at(9));
        assert!(claims.is_expired_at(10));
        assert!(claims.is_expired_at(11));
    }

    #[test]
    fn test_payload_field_order() {
        let claims = Claims::new("alice", &["ROLE_USER".to_string()], 5, 10).unwrap();
        let payload = serde_json::to_string(&claims).unwrap();
        assert_eq!(
            payload,
            r#"{"sub":"alice","iat":5,"exp":15,"authorities":["ROLE_USER"]}"#
        );
    }
}
