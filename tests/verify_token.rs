//! End-to-end behaviour of the public verification API, using PEM fixtures.

use bearer_auth::{
    AuthError, AuthErrorKind, Claims, FixedClock, KeyFamily, PublicKey, TokenVerifier,
    get_identity, is_bearer, strip_bearer, verify,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

const RSA_PRIVATE_PEM: &str = include_str!("fixtures/rsa_private.pem");
const RSA_PUBLIC_PEM: &str = include_str!("fixtures/rsa_public.pem");
const WRONG_RSA_PUBLIC_PEM: &str = include_str!("fixtures/wrong_rsa_public.pem");
const RSA_PUBLIC_N: &str = include_str!("fixtures/rsa_public.n");
const EC_PRIVATE_PEM: &str = include_str!("fixtures/ec_private.pem");
const EC_PUBLIC_PEM: &str = include_str!("fixtures/ec_public.pem");
const ED_PRIVATE_PEM: &str = include_str!("fixtures/ed_private.pem");
const ED_PUBLIC_PEM: &str = include_str!("fixtures/ed_public.pem");

struct Fixture {
    public_key: PublicKey,
    wrong_public_key: PublicKey,
    private_key: EncodingKey,
}

fn set_up() -> Fixture {
    Fixture {
        public_key: PublicKey::from_rsa_pem(RSA_PUBLIC_PEM.as_bytes()).unwrap(),
        wrong_public_key: PublicKey::from_rsa_pem(WRONG_RSA_PUBLIC_PEM.as_bytes()).unwrap(),
        private_key: EncodingKey::from_rsa_pem(RSA_PRIVATE_PEM.as_bytes()).unwrap(),
    }
}

fn create_token(key: &EncodingKey, alg: Algorithm, claims: &Value) -> String {
    jsonwebtoken::encode(&Header::new(alg), claims, key).unwrap()
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[test]
fn parse_token_success() {
    let f = set_up();
    let token = create_token(
        &f.private_key,
        Algorithm::RS256,
        &json!({ "name": "coxinha", "sub": "id1" }),
    );

    let claims = verify(&token, &f.public_key).unwrap();

    assert_eq!(claims.str("name").unwrap(), "coxinha");
    assert_eq!(claims.str("sub").unwrap(), "id1");
}

#[test]
fn parse_framed_header_value() {
    let f = set_up();
    let token = create_token(
        &f.private_key,
        Algorithm::RS256,
        &json!({ "sub": "id1", "exp": now() + 600 }),
    );
    let header_value = format!("Bearer {token}");

    assert!(is_bearer(&header_value));
    assert_eq!(strip_bearer(&header_value), token);

    let claims = verify(&header_value, &f.public_key).unwrap();
    assert_eq!(get_identity(&claims, "sub").unwrap(), "id1");
}

#[test]
fn parse_token_validates_public_key() {
    let f = set_up();
    let token = create_token(&f.private_key, Algorithm::RS256, &json!({ "name": "coxinha" }));

    let err = verify(&token, &f.wrong_public_key).unwrap_err();

    assert_eq!(err, AuthError::SignatureVerification);
    assert_eq!(err.kind(), AuthErrorKind::SignatureVerification);
}

#[test]
fn is_jwt_token() {
    assert!(is_bearer("Bearer whatever"));
}

#[test]
fn isnt_jwt_token() {
    assert!(!is_bearer("isnt Bearer whatever"));
}

#[test]
fn get_client_id_on_error() {
    let claims = Claims::from(json!({ "kmlo": "wrong" }).as_object().unwrap().clone());
    assert!(get_identity(&claims, "sub").is_err());
}

#[test]
fn get_client_id_success() {
    let expected = "1BAYHSZLIFRybNHu1ZSX7PIJeHC";
    let claims = Claims::from(json!({ "sub": expected }).as_object().unwrap().clone());
    assert_eq!(get_identity(&claims, "sub").unwrap(), expected);
}

#[test]
fn expired_token_is_rejected_with_valid_signature() {
    let f = set_up();
    let exp = now() - 3600;
    let token = create_token(
        &f.private_key,
        Algorithm::RS256,
        &json!({ "sub": "id1", "exp": exp }),
    );

    match verify(&token, &f.public_key) {
        Err(AuthError::Expired { exp: got, .. }) => assert_eq!(got, exp),
        other => panic!("expected Expired, got {other:?}"),
    }
}

#[test]
fn deterministic_with_fixed_clock() {
    let f = set_up();
    let token = create_token(
        &f.private_key,
        Algorithm::RS256,
        &json!({ "sub": "id1", "nbf": 1_000, "exp": 2_000 }),
    );

    let at = |t| TokenVerifier::new(f.public_key.clone()).with_clock(FixedClock(t));

    assert!(matches!(
        at(999).verify(&token),
        Err(AuthError::NotYetValid { nbf: 1_000, now: 999 })
    ));
    assert!(at(1_000).verify(&token).is_ok());
    assert!(at(1_500).verify(&token).is_ok());
    assert!(at(2_000).verify(&token).is_ok());
    assert!(matches!(
        at(2_001).verify(&token),
        Err(AuthError::Expired { exp: 2_000, now: 2_001 })
    ));
}

#[test]
fn none_algorithm_rejected_for_every_key_family() {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"admin"}"#);
    let token = format!("{header}.{payload}.");

    let keys = [
        PublicKey::from_rsa_pem(RSA_PUBLIC_PEM.as_bytes()).unwrap(),
        PublicKey::from_ec_pem(EC_PUBLIC_PEM.as_bytes()).unwrap(),
        PublicKey::from_ed_pem(ED_PUBLIC_PEM.as_bytes()).unwrap(),
    ];

    for key in &keys {
        assert_eq!(
            verify(&token, key).unwrap_err().kind(),
            AuthErrorKind::UnexpectedAlgorithm,
            "{:?}",
            key.family()
        );
    }

    for alg in ["None", "NONE", "nOnE", "HS256", "HS512", ""] {
        let header = URL_SAFE_NO_PAD.encode(format!(r#"{{"alg":"{alg}"}}"#));
        let token = format!("{header}.{payload}.c2ln");
        assert_eq!(
            verify(&token, &keys[0]).unwrap_err(),
            AuthError::UnexpectedAlgorithm(alg.to_string())
        );
    }
}

#[test]
fn header_key_hints_cannot_replace_the_key() {
    // A token signed by an attacker key, advertising that key in its header.
    let attacker = EncodingKey::from_ec_pem(EC_PRIVATE_PEM.as_bytes()).unwrap();
    let mut header = Header::new(Algorithm::ES256);
    header.jku = Some("https://attacker.example/jwks.json".to_string());
    header.kid = Some("attacker".to_string());
    let token = jsonwebtoken::encode(&header, &json!({ "sub": "admin" }), &attacker).unwrap();

    let rsa = PublicKey::from_rsa_pem(RSA_PUBLIC_PEM.as_bytes()).unwrap();
    assert_eq!(
        verify(&token, &rsa).unwrap_err(),
        AuthError::UnexpectedAlgorithm("ES256".to_string())
    );
}

#[test]
fn ecdsa_round_trip() {
    let private = EncodingKey::from_ec_pem(EC_PRIVATE_PEM.as_bytes()).unwrap();
    let public = PublicKey::from_pem(KeyFamily::Ec, EC_PUBLIC_PEM.as_bytes()).unwrap();
    let token = create_token(&private, Algorithm::ES256, &json!({ "sub": "ec-client" }));

    let claims = verify(&token, &public).unwrap();
    assert_eq!(claims.subject().unwrap(), "ec-client");

    let rsa_token = create_token(&set_up().private_key, Algorithm::RS256, &json!({}));
    assert_eq!(
        verify(&rsa_token, &public).unwrap_err(),
        AuthError::UnexpectedAlgorithm("RS256".to_string())
    );
}

#[test]
fn ed25519_round_trip() {
    let private = EncodingKey::from_ed_pem(ED_PRIVATE_PEM.as_bytes()).unwrap();
    let public = PublicKey::from_pem(KeyFamily::Ed, ED_PUBLIC_PEM.as_bytes()).unwrap();
    let token = create_token(&private, Algorithm::EdDSA, &json!({ "sub": "ed-client" }));

    let claims = verify(&format!("Bearer {token}"), &public).unwrap();
    assert_eq!(claims.subject().unwrap(), "ed-client");
}

#[test]
fn rsa_components_key() {
    let f = set_up();
    let key = PublicKey::from_rsa_components(RSA_PUBLIC_N.trim(), "AQAB").unwrap();
    let token = create_token(&f.private_key, Algorithm::RS256, &json!({ "sub": "id1" }));

    assert_eq!(verify(&token, &key).unwrap().subject().unwrap(), "id1");
}

#[test]
fn verifier_shared_across_threads() {
    let f = set_up();
    let verifier = std::sync::Arc::new(TokenVerifier::new(f.public_key.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let verifier = verifier.clone();
            let token = create_token(
                &f.private_key,
                Algorithm::RS256,
                &json!({ "sub": format!("client-{i}") }),
            );
            std::thread::spawn(move || {
                let claims = verifier.verify(&token).unwrap();
                get_identity(&claims, "sub").unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("client-{i}"));
    }
}

#[test]
fn rsa_pkcs1_der_key() {
    let f = set_up();
    let key = PublicKey::from_rsa_der(include_bytes!("fixtures/rsa_public.der"));
    let token = create_token(&f.private_key, Algorithm::RS256, &json!({ "sub": "id1" }));

    assert_eq!(verify(&token, &key).unwrap().subject().unwrap(), "id1");
}
