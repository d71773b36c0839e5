//! Unit tests for token service

use std::sync::Arc;
use std::thread;

use af_shared::config::MAX_TOKEN_TTL_SECONDS;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Header};
use serde_json::json;

use crate::domain::entities::{Claims, Principal};
use crate::errors::{DomainError, TokenError, ValidationError};
use crate::services::token::{ManualClock, SigningKey, TokenService, TokenServiceConfig};

const T0: i64 = 1_700_000_000;

fn start() -> DateTime<Utc> {
    Utc.timestamp_opt(T0, 0).unwrap()
}

fn create_test_service() -> (TokenService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let service = TokenService::with_clock(TokenServiceConfig::default(), clock.clone())
        .expect("Failed to create token service");
    (service, clock)
}

fn alice() -> Principal {
    Principal::new(
        "alice",
        vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()],
    )
}

/// Replaces the first signature character, which always changes the decoded bytes
fn tamper_signature(token: &str) -> String {
    let (signed_part, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", signed_part, chars.into_iter().collect::<String>())
}

/// Signs an arbitrary JSON payload with the reference key
fn sign_raw(payload: serde_json::Value) -> String {
    let config = TokenServiceConfig::default();
    let key = SigningKey::from_base64(&config.secret_base64, config.algorithm).unwrap();
    encode(&Header::new(config.algorithm), &payload, key.encoding_key()).unwrap()
}

#[test]
fn test_issue_produces_three_segment_token() {
    let (service, _) = create_test_service();
    let token = service.issue(&alice()).unwrap();

    assert_eq!(token.split('.').count(), 3);
    assert!(!token.contains('='), "segments must be unpadded base64url");
}

#[test]
fn test_issued_claims() {
    let (service, _) = create_test_service();
    let token = service.issue(&alice()).unwrap();
    let claims = service.extract_all_claims(&token).unwrap();

    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.iat, T0);
    assert_eq!(claims.exp, T0 + 3600);
    assert_eq!(claims.authorities, json!(["ROLE_USER", "ROLE_ADMIN"]));
}

#[test]
fn test_issued_token_is_valid_immediately() {
    let (service, _) = create_test_service();
    let token = service.issue(&alice()).unwrap();
    assert!(service.is_valid(&token, "alice"));
}

#[test]
fn test_issue_rejects_empty_username() {
    let (service, _) = create_test_service();
    let result = service.issue(&Principal::new("", vec![]));
    assert!(matches!(
        result,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
}

#[test]
fn test_issue_is_deterministic_within_the_same_second() {
    let (service, clock) = create_test_service();
    let first = service.issue(&alice()).unwrap();
    let second = service.issue(&alice()).unwrap();
    assert_eq!(first, second);

    clock.advance(Duration::seconds(1));
    let later = service.issue(&alice()).unwrap();
    assert_ne!(first, later);
    assert!(service.is_valid(&first, "alice"));
    assert!(service.is_valid(&later, "alice"));
}

#[test]
fn test_expiry_timeline() {
    let (service, clock) = create_test_service();
    let token = service.issue(&alice()).unwrap();

    clock.set(start() + Duration::seconds(1));
    assert!(service.is_valid(&token, "alice"));

    clock.set(start() + Duration::seconds(3599));
    assert!(service.is_valid(&token, "alice"));

    // exp == now counts as expired
    clock.set(start() + Duration::seconds(3600));
    assert!(!service.is_valid(&token, "alice"));

    clock.set(start() + Duration::seconds(3601));
    assert!(!service.is_valid(&token, "alice"));
    assert!(matches!(
        service.validate(&token, "alice"),
        Err(DomainError::Token(TokenError::TokenExpired))
    ));

    assert_eq!(
        service.extract_authorities(&token).unwrap(),
        vec!["ROLE_USER", "ROLE_ADMIN"]
    );
}

#[test]
fn test_configured_ttl_is_used() {
    let clock = Arc::new(ManualClock::new(start()));
    let service = TokenService::with_clock(
        TokenServiceConfig::default().with_ttl_seconds(60),
        clock.clone(),
    )
    .unwrap();
    let token = service.issue(&alice()).unwrap();

    clock.advance(Duration::seconds(59));
    assert!(service.is_valid(&token, "alice"));
    clock.advance(Duration::seconds(1));
    assert!(!service.is_valid(&token, "alice"));
}

#[test]
fn test_oversized_ttl_is_refused_at_construction() {
    let clock = Arc::new(ManualClock::new(start()));
    let result = TokenService::with_clock(
        TokenServiceConfig::default().with_ttl_seconds(i64::MAX),
        clock.clone(),
    );
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    let service = TokenService::with_clock(
        TokenServiceConfig::default().with_ttl_seconds(MAX_TOKEN_TTL_SECONDS),
        clock,
    )
    .unwrap();
    let token = service.issue(&alice()).unwrap();
    let claims = service.extract_all_claims(&token).unwrap();
    assert_eq!(claims.exp, T0 + MAX_TOKEN_TTL_SECONDS);
    assert!(service.is_valid(&token, "alice"));
}

#[test]
fn test_authenticate_resolves_principal_until_expiry() {
    let (service, clock) = create_test_service();
    let token = service.issue(&alice()).unwrap();

    assert_eq!(service.authenticate(&token).unwrap(), alice());

    clock.advance(Duration::seconds(3600));
    assert!(matches!(
        service.authenticate(&token),
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
    assert!(matches!(
        service.authenticate(&tamper_signature(&token)),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
    assert!(matches!(
        service.authenticate("not-a-token"),
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_identity_mismatch_is_invalid() {
    let (service, _) = create_test_service();
    let token = service.issue(&Principal::new("bob", vec![])).unwrap();

    assert!(!service.is_valid(&token, "eve"));
    assert!(matches!(
        service.validate(&token, "eve"),
        Err(DomainError::Token(TokenError::IdentityMismatch))
    ));
}

#[test]
fn test_extract_username_and_authorities() {
    let (service, _) = create_test_service();
    let token = service.issue(&alice()).unwrap();

    assert_eq!(service.extract_username(&token).unwrap(), "alice");
    assert_eq!(
        service.extract_authorities(&token).unwrap(),
        vec!["ROLE_USER", "ROLE_ADMIN"]
    );
}

#[test]
fn test_authorities_keep_order_and_duplicates() {
    let (service, _) = create_test_service();
    let authorities = vec![
        "b".to_string(),
        "a".to_string(),
        "b".to_string(),
    ];
    let token = service
        .issue(&Principal::new("carol", authorities.clone()))
        .unwrap();
    assert_eq!(service.extract_authorities(&token).unwrap(), authorities);
}

#[test]
fn test_empty_authorities_round_trip() {
    let (service, _) = create_test_service();
    let token = service.issue(&Principal::new("dave", vec![])).unwrap();
    assert!(service.extract_authorities(&token).unwrap().is_empty());
}

#[test]
fn test_extract_username_is_idempotent() {
    let (service, _) = create_test_service();
    let token = service.issue(&alice()).unwrap();
    let copy = token.clone();

    let first = service.extract_username(&token).unwrap();
    let second = service.extract_username(&token).unwrap();
    assert_eq!(first, second);
    assert_eq!(token, copy);
}

#[test]
fn test_flipped_signature_fails_everywhere() {
    let (service, _) = create_test_service();
    let token = tamper_signature(&service.issue(&alice()).unwrap());

    assert!(!service.is_valid(&token, "alice"));
    assert!(matches!(
        service.extract_username(&token),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
    assert!(service.extract_authorities(&token).is_err());
}

#[test]
fn test_appended_signature_character_fails() {
    let (service, _) = create_test_service();
    let token = format!("{}A", service.issue(&alice()).unwrap());

    assert!(service.extract_username(&token).is_err());
    assert!(!service.is_valid(&token, "alice"));
}

#[test]
fn test_token_from_other_key_is_rejected() {
    let (service, _) = create_test_service();
    let other = TokenService::new(TokenServiceConfig {
        // 32 bytes of 'k'
        secret_base64: "a2tra2tra2tra2tra2tra2tra2tra2tra2tra2tra2s=".to_string(),
        ..TokenServiceConfig::default()
    })
    .unwrap();
    let token = other.issue(&alice()).unwrap();

    assert!(!service.is_valid(&token, "alice"));
    assert!(matches!(
        service.extract_username(&token),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_malformed_tokens_are_rejected() {
    let (service, _) = create_test_service();

    for token in ["", "garbage", "a.b", "a.b.c", "a.b.c.d"] {
        assert!(!service.is_valid(token, "alice"), "accepted {token:?}");
        assert!(matches!(
            service.extract_username(token),
            Err(DomainError::Token(TokenError::InvalidTokenFormat))
        ));
    }
}

#[test]
fn test_payload_without_subject_is_rejected() {
    let (service, _) = create_test_service();
    let token = sign_raw(json!({"iat": T0, "exp": T0 + 3600, "authorities": []}));

    let result = service.extract_username(&token);
    assert!(matches!(
        result,
        Err(DomainError::Token(
            TokenError::InvalidTokenFormat | TokenError::MissingClaim { .. }
        ))
    ));
    assert!(!service.is_valid(&token, "alice"));
}

#[test]
fn test_wrong_shaped_authorities_decode_to_empty() {
    let (service, _) = create_test_service();

    let scalar = sign_raw(json!({"sub": "alice", "iat": T0, "exp": T0 + 3600, "authorities": "ROLE_USER"}));
    assert!(service.extract_authorities(&scalar).unwrap().is_empty());

    let missing = sign_raw(json!({"sub": "alice", "iat": T0, "exp": T0 + 3600}));
    assert!(service.extract_authorities(&missing).unwrap().is_empty());
    assert!(service.is_valid(&missing, "alice"));

    let mixed = sign_raw(json!({"sub": "alice", "iat": T0, "exp": T0 + 3600, "authorities": ["ROLE_USER", 42]}));
    assert_eq!(
        service.extract_authorities(&mixed).unwrap(),
        vec!["ROLE_USER", "42"]
    );
}

#[test]
fn test_crate_encoder_matches_issue() {
    let (service, _) = create_test_service();
    let claims = Claims::new("alice", &alice().authorities, T0, 3600).unwrap();
    assert_eq!(
        service.encode_jwt(&claims).unwrap(),
        service.issue(&alice()).unwrap()
    );
}

#[test]
fn test_concurrent_use_without_synchronization() {
    let (service, _) = create_test_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let username = format!("user-{i}");
                let principal = Principal::new(username.clone(), vec![format!("ROLE_{i}")]);
                for _ in 0..50 {
                    let token = service.issue(&principal).unwrap();
                    assert!(service.is_valid(&token, &username));
                    assert_eq!(service.extract_username(&token).unwrap(), username);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
