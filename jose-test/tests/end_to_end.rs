//! Issue-then-validate scenarios across the whole stack.

use std::time::Duration;

use jose_core::JoseError;
use jose_core::alg::Algorithm;
use jose_core::base64;
use jose_core::claims::{Audience, NumericDate, RegisteredClaims};
use jose_core::header::Kid;
use jose_core::jwk::JwkParams;
use jose_core::store::StaticKeys;
use jose_crypto::{MacKey, PrivateKey, bridge};
use jose_json::{Json, claims_codec, header_codec};
use jose_jwt::{AllowedAlgorithms, IssueOptions, Issuer, ValidationOptions, Validator};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug)]
struct Empty {}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Scope {
    scope: String,
}

fn kid(value: &str) -> Kid {
    Kid::new(value).unwrap()
}

fn mac_store(key_id: &str) -> StaticKeys {
    let key = MacKey::random(32).unwrap();
    let jwk = bridge::symmetric_jwk(&key, JwkParams::default()).with_kid(kid(key_id));
    StaticKeys::new([jwk])
}

fn allow(algorithms: impl IntoIterator<Item = Algorithm>) -> AllowedAlgorithms {
    AllowedAlgorithms::new(algorithms).unwrap()
}

fn hs256_issuer(store: StaticKeys, key_id: &str) -> Issuer<StaticKeys> {
    Issuer::new(
        IssueOptions::new(Algorithm::HS256).with_kid(kid(key_id)),
        store,
        header_codec(),
        claims_codec(),
    )
}

fn hs256_validator(store: StaticKeys, options: ValidationOptions) -> Validator<StaticKeys> {
    Validator::new(options, store, header_codec(), claims_codec())
}

#[tokio::test]
async fn hs256_happy_path() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let token = issuer
        .issue(
            &Empty {},
            &RegisteredClaims::new().for_subject("test"),
            &Json::<Empty>::new(),
        )
        .await
        .unwrap();

    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let jwt = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap();
    assert_eq!(jwt.header.alg, Algorithm::HS256);
    assert_eq!(jwt.header.kid, Some(kid("k1")));
    assert_eq!(jwt.registered.sub.as_deref(), Some("test"));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let mut registered = RegisteredClaims::new();
    registered.exp = Some(NumericDate::from_second(0));
    let token = issuer
        .issue(&Empty {}, &registered, &Json::<Empty>::new())
        .await
        .unwrap();

    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    match err {
        JoseError::Expired { expires_at, now } => {
            assert_eq!(expires_at.as_second(), 0);
            assert!(now.as_second() > 0);
        }
        other => panic!("expected Expired, got {other:?}"),
    }
}

#[tokio::test]
async fn clock_skew_tolerates_a_recent_expiry() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let mut registered = RegisteredClaims::new();
    registered.exp = Some(NumericDate::from_second(NumericDate::now().as_second() - 300));
    let token = issuer
        .issue(&Empty {}, &registered, &Json::<Empty>::new())
        .await
        .unwrap();

    let options = ValidationOptions::new(allow([Algorithm::HS256]))
        .with_clock_skew(Duration::from_secs(3600));
    let validator = hs256_validator(store, options);
    validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn not_yet_valid_token_is_rejected() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let not_before = NumericDate::from_second(NumericDate::now().as_second() + 3600);
    let token = issuer
        .issue(
            &Empty {},
            &RegisteredClaims::new().not_before(not_before),
            &Json::<Empty>::new(),
        )
        .await
        .unwrap();

    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::NotYetValid { .. }));
}

#[tokio::test]
async fn tampered_signature_is_rejected() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let token = issuer
        .issue(&Empty {}, &RegisteredClaims::new(), &Json::<Empty>::new())
        .await
        .unwrap();

    // Flip one bit of the signature segment, staying in the alphabet.
    let text = token.as_str();
    let flipped = if text.ends_with('A') { 'B' } else { 'A' };
    let mut tampered = text[..text.len() - 1].to_owned();
    tampered.push(flipped);

    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let err = validator
        .validate::<Empty>(&tampered, &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::InvalidSignature));
}

#[tokio::test]
async fn disallowed_algorithm_is_rejected_before_key_resolution() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let token = issuer
        .issue(&Empty {}, &RegisteredClaims::new(), &Json::<Empty>::new())
        .await
        .unwrap();

    // The validator's store is empty: admission must fail first.
    let validator = Validator::new(
        ValidationOptions::new(allow([Algorithm::RS256])),
        StaticKeys::new([]),
        header_codec(),
        claims_codec(),
    );
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::UnsupportedAlgorithm(name) if name == "HS256"));
}

#[tokio::test]
async fn alg_none_fails_header_decode() {
    let header = base64::encode(br#"{"alg":"none"}"#);
    let token = format!("{header}.e30.AA");

    let store = mac_store("k1");
    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let err = validator
        .validate::<Empty>(&token, &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::MalformedToken(cause) if cause.contains("none")));
}

#[tokio::test]
async fn required_issuer_and_audience_are_enforced() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let registered = RegisteredClaims::new()
        .from_issuer("https://issuer.example")
        .for_audience(Audience::many(["a".to_owned(), "b".to_owned()]).unwrap());
    let token = issuer
        .issue(&Empty {}, &registered, &Json::<Empty>::new())
        .await
        .unwrap();

    let options = ValidationOptions::new(allow([Algorithm::HS256]))
        .require_issuer("https://issuer.example")
        .require_audience("b");
    let validator = hs256_validator(store.clone(), options);
    validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap();

    let options = ValidationOptions::new(allow([Algorithm::HS256]))
        .require_issuer("https://issuer.example")
        .require_audience("c");
    let validator = hs256_validator(store.clone(), options);
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::InvalidAudience { expected, .. } if expected == "c"));

    let options =
        ValidationOptions::new(allow([Algorithm::HS256])).require_issuer("https://other.example");
    let validator = hs256_validator(store, options);
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::InvalidIssuer { .. }));
}

#[tokio::test]
async fn required_typ_mismatch_is_malformed() {
    let store = mac_store("k1");
    let issuer = Issuer::new(
        IssueOptions::new(Algorithm::HS256)
            .with_kid(kid("k1"))
            .with_typ("JWT"),
        store.clone(),
        header_codec(),
        claims_codec(),
    );
    let token = issuer
        .issue(&Empty {}, &RegisteredClaims::new(), &Json::<Empty>::new())
        .await
        .unwrap();

    let options = ValidationOptions::new(allow([Algorithm::HS256])).require_typ("JWT");
    let validator = hs256_validator(store.clone(), options);
    validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap();

    let options = ValidationOptions::new(allow([Algorithm::HS256])).require_typ("at+jwt");
    let validator = hs256_validator(store, options);
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::MalformedToken(cause) if cause.contains("typ")));
}

#[tokio::test]
async fn issue_then_validate_preserves_registered_claims() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let registered = RegisteredClaims::new()
        .from_issuer("iss")
        .for_subject("sub")
        .for_audience(Audience::single("aud"))
        .expires_in(Duration::from_secs(3600))
        .not_before(NumericDate::from_second(NumericDate::now().as_second() - 10))
        .with_token_id("jti-1");
    let token = issuer
        .issue(
            &Scope {
                scope: "read".to_owned(),
            },
            &registered,
            &Json::<Scope>::new(),
        )
        .await
        .unwrap();

    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let jwt = validator
        .validate::<Scope>(token.as_str(), &Json::<Scope>::new())
        .await
        .unwrap();
    assert_eq!(jwt.registered, registered);
    assert_eq!(jwt.claims.scope, "read");
}

#[tokio::test]
async fn registered_claims_win_on_name_collision() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let custom = serde_json::json!({"sub": "from-custom", "scope": "read"});
    let token = issuer
        .issue(
            &custom,
            &RegisteredClaims::new().for_subject("from-registered"),
            &Json::<serde_json::Value>::new(),
        )
        .await
        .unwrap();

    let validator = hs256_validator(store, ValidationOptions::new(allow([Algorithm::HS256])));
    let jwt = validator
        .validate::<serde_json::Value>(token.as_str(), &Json::<serde_json::Value>::new())
        .await
        .unwrap();
    assert_eq!(jwt.registered.sub.as_deref(), Some("from-registered"));
    assert_eq!(jwt.claims["sub"], "from-registered");
    assert_eq!(jwt.claims["scope"], "read");
}

#[tokio::test]
async fn non_object_custom_claims_are_refused_at_issuance() {
    let store = mac_store("k1");
    let issuer = hs256_issuer(store.clone(), "k1");
    let err = issuer
        .issue(
            &serde_json::json!(["not", "an", "object"]),
            &RegisteredClaims::new(),
            &Json::<serde_json::Value>::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::MalformedToken(cause) if cause.contains("object")));
}

#[tokio::test]
async fn ambiguous_kid_fails_resolution() {
    let key = MacKey::random(32).unwrap();
    let jwk = bridge::symmetric_jwk(&key, JwkParams::default()).with_kid(kid("k1"));
    let single = StaticKeys::new([jwk.clone()]);
    let ambiguous = StaticKeys::new([jwk.clone(), jwk]);

    let issuer = hs256_issuer(single, "k1");
    let token = issuer
        .issue(&Empty {}, &RegisteredClaims::new(), &Json::<Empty>::new())
        .await
        .unwrap();

    let validator = hs256_validator(ambiguous, ValidationOptions::new(allow([Algorithm::HS256])));
    let err = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, JoseError::KeyNotFound(Some(k)) if k == kid("k1")));
}

#[tokio::test]
async fn es256_issue_and_validate() {
    use jose_core::alg::EcCurve;

    let key = PrivateKey::random_ec(EcCurve::P256).unwrap();
    let jwk = bridge::private_jwk(&key, JwkParams::default())
        .unwrap()
        .with_kid(kid("ec-1"));
    let store = StaticKeys::new([jwk]);

    let issuer = Issuer::new(
        IssueOptions::new(Algorithm::ES256).with_kid(kid("ec-1")),
        store.clone(),
        header_codec(),
        claims_codec(),
    );
    let token = issuer
        .issue(
            &Empty {},
            &RegisteredClaims::new().for_subject("ec"),
            &Json::<Empty>::new(),
        )
        .await
        .unwrap();

    let validator = Validator::new(
        ValidationOptions::new(allow([Algorithm::ES256])),
        store,
        header_codec(),
        claims_codec(),
    );
    let jwt = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap();
    assert_eq!(jwt.registered.sub.as_deref(), Some("ec"));
}

#[tokio::test]
async fn rs256_validates_against_the_published_public_key() {
    let key = PrivateKey::random_rsa().unwrap();
    let private_jwk = bridge::private_jwk(&key, JwkParams::default())
        .unwrap()
        .with_kid(kid("rsa-1"));
    let public_jwk = bridge::public_jwk(&key.public_key(), JwkParams::default())
        .unwrap()
        .with_kid(kid("rsa-1"));

    let issuer = Issuer::new(
        IssueOptions::new(Algorithm::RS256).with_kid(kid("rsa-1")),
        StaticKeys::new([private_jwk]),
        header_codec(),
        claims_codec(),
    );
    let token = issuer
        .issue(
            &Empty {},
            &RegisteredClaims::new().for_subject("rsa"),
            &Json::<Empty>::new(),
        )
        .await
        .unwrap();

    // The validator only ever sees the public half.
    let validator = Validator::new(
        ValidationOptions::new(allow([Algorithm::RS256])),
        StaticKeys::new([public_jwk]),
        header_codec(),
        claims_codec(),
    );
    let jwt = validator
        .validate::<Empty>(token.as_str(), &Json::<Empty>::new())
        .await
        .unwrap();
    assert_eq!(jwt.registered.sub.as_deref(), Some("rsa"));
}
