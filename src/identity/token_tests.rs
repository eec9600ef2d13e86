use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::*;

const NOW: i64 = 1_700_000_000;

fn codec() -> TokenCodec { TokenCodec::new(SessionSecret::new("test-secret-0123456789")) }

fn admin() -> Identity { Identity::new(1, "admin", true) }

fn reencode_payload(token: &str, f: impl FnOnce(&mut serde_json::Value)) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    let raw = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
    let mut claims: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    f(&mut claims);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.{}", parts[0], payload, parts[2])
}

#[test]
fn issue_then_verify_roundtrips_identity() {
    let c = codec();
    let token = c.issue_at(&admin(), NOW).unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(c.verify_at(&token, NOW + 60), Some(admin()));

    let customer = Identity::new(42, "customer", false);
    let token = c.issue(&customer).unwrap();
    assert_eq!(c.verify(&token), Some(customer));
}

#[test]
fn claims_carry_expiry_seven_days_out() {
    let token = codec().issue_at(&admin(), NOW).unwrap();
    let payload = token.split('.').nth(1).unwrap();
    let claims: serde_json::Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
    assert_eq!(claims["iat"], NOW);
    assert_eq!(claims["exp"], NOW + TOKEN_TTL_SECS);
    assert_eq!(claims["userId"], 1);
    assert_eq!(claims["username"], "admin");
    assert_eq!(claims["isAdmin"], true);
}

#[test]
fn expired_token_is_rejected() {
    let c = codec();
    let token = c.issue_at(&admin(), NOW).unwrap();
    assert!(c.verify_at(&token, NOW + TOKEN_TTL_SECS - 1).is_some());
    assert!(c.verify_at(&token, NOW + TOKEN_TTL_SECS).is_none());
    assert!(c.verify_at(&token, NOW + TOKEN_TTL_SECS * 2).is_none());
}

#[test]
fn escalated_role_in_payload_fails_signature() {
    let c = codec();
    let token = c.issue_at(&Identity::new(7, "mallory", false), NOW).unwrap();
    let forged = reencode_payload(&token, |claims| claims["isAdmin"] = serde_json::json!(true));
    assert_ne!(forged, token);
    assert!(c.verify_at(&forged, NOW).is_none());

    let extended = reencode_payload(&token, |claims| claims["exp"] = serde_json::json!(NOW * 2));
    assert!(c.verify_at(&extended, NOW).is_none());
}

#[test]
fn flipped_payload_character_fails() {
    let c = codec();
    let token = c.issue_at(&admin(), NOW).unwrap();
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut payload: Vec<char> = parts[1].chars().collect();
    let mid = payload.len() / 2;
    payload[mid] = if payload[mid] == 'A' { 'B' } else { 'A' };
    parts[1] = payload.into_iter().collect();
    assert!(c.verify_at(&parts.join("."), NOW).is_none());
}

#[test]
fn token_from_another_secret_is_rejected() {
    let other = TokenCodec::new(SessionSecret::new("a-different-secret"));
    let token = other.issue_at(&admin(), NOW).unwrap();
    assert!(codec().verify_at(&token, NOW).is_none());
    assert!(other.verify_at(&token, NOW).is_some());
}

#[test]
fn malformed_tokens_are_rejected() {
    let c = codec();
    for bad in ["", ".", "..", "abc", "a.b", "a.b.c", "a.b.c.d", "!!!.???.***"] {
        assert!(c.verify_at(bad, NOW).is_none(), "accepted {bad:?}");
    }
    let token = c.issue_at(&admin(), NOW).unwrap();
    assert!(c.verify_at(&format!("{token}.extra"), NOW).is_none());
    let stripped: String = token.rsplitn(2, '.').nth(1).unwrap().to_string();
    assert!(c.verify_at(&format!("{stripped}."), NOW).is_none());
}

#[test]
fn header_is_standard_hs256_jwt() {
    let token = codec().issue_at(&admin(), NOW).unwrap();
    let header = jsonwebtoken::decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::HS256);
    assert_eq!(header.typ.as_deref(), Some("JWT"));
}

#[test]
fn other_algorithm_header_is_rejected() {
    let c = codec();
    let claims = Claims { user_id: 1, username: "admin".into(), is_admin: true, iat: NOW, exp: NOW + 10 };

    // Same secret, different HMAC variant.
    let key = EncodingKey::from_secret(b"test-secret-0123456789");
    let hs384 = jsonwebtoken::encode(&Header::new(Algorithm::HS384), &claims, &key).unwrap();
    assert!(c.verify_at(&hs384, NOW).is_none());

    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_string(&claims).unwrap());
    assert!(c.verify_at(&format!("{header}.{payload}."), NOW).is_none());
}

#[test]
fn secret_is_redacted_in_debug_output() {
    let rendered = format!("{:?}", codec());
    assert!(!rendered.contains("test-secret"));
    assert!(rendered.contains("redacted"));
}
