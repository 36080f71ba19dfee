//! Smoke test to verify the integration test harness itself works,
//! independent of a running Postgres instance.

mod common;

#[tokio::test]
async fn test_basic_infrastructure() {
    assert_eq!(2 + 2, 4);
    tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
}

#[test]
fn test_jwt_roundtrips_claims() {
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use uuid::Uuid;

    let user_id = Uuid::new_v4();
    let token = common::create_test_jwt(user_id, "person@example.com");

    let mut validation = Validation::default();
    validation.validate_aud = false;
    let decoded = decode::<serde_json::Value>(
        &token,
        &DecodingKey::from_secret(common::TEST_JWT_SECRET.as_ref()),
        &validation,
    )
    .unwrap();

    assert_eq!(decoded.claims["sub"], user_id.to_string());
    assert_eq!(decoded.claims["email"], "person@example.com");
}
