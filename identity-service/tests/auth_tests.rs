mod common;

use auth::Claims;
use common::TestApp;

#[tokio::test]
async fn register_then_duplicate_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&serde_json::json!({ "email": "alice@example.com", "password": "Abcd1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"]["user"]["id"].is_string());
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["isAdmin"], false);
    // Sanitized payload never leaks hash material
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());

    let duplicate = app
        .post("/auth/register")
        .json(&serde_json::json!({ "email": "alice@example.com", "password": "Other999" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 400);
}

#[tokio::test]
async fn register_validation_errors_are_a_field_map() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&serde_json::json!({ "email": "not-an-email", "password": "abc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["error"], "Validation error");
    assert!(body["data"]["fields"]["email"].is_string());
    assert!(body["data"]["fields"]["password"].is_string());
}

#[tokio::test]
async fn login_returns_token_with_user_id_subject() {
    let app = TestApp::spawn().await;

    let user_id = app.register("alice@example.com", "Abcd1234").await;
    let (access_token, refresh_token) = app.login("alice@example.com", "Abcd1234").await;

    let claims: Claims = app.access_jwt.decode(&access_token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert!(!refresh_token.is_empty());
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", "Abcd1234").await;

    let wrong_password = app
        .post("/auth/login")
        .json(&serde_json::json!({ "email": "alice@example.com", "password": "nope1234" }))
        .send()
        .await
        .unwrap();
    let unknown_email = app
        .post("/auth/login")
        .json(&serde_json::json!({ "email": "nobody@example.com", "password": "Abcd1234" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status().as_u16(), 400);
    assert_eq!(unknown_email.status().as_u16(), 400);

    let body_a: serde_json::Value = wrong_password.json().await.unwrap();
    let body_b: serde_json::Value = unknown_email.json().await.unwrap();
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn refresh_mints_access_token_for_same_subject() {
    let app = TestApp::spawn().await;

    let user_id = app.register("alice@example.com", "Abcd1234").await;
    let (original_access, refresh_token) = app.login("alice@example.com", "Abcd1234").await;

    let response = app
        .post("/auth/refreshToken")
        .json(&serde_json::json!({ "token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let new_access = body["data"]["accessToken"].as_str().unwrap();

    let original: Claims = app.access_jwt.decode(&original_access).unwrap();
    let refreshed: Claims = app.access_jwt.decode(new_access).unwrap();
    assert_eq!(refreshed.sub, user_id);
    assert_eq!(refreshed.sub, original.sub);
}

#[tokio::test]
async fn refresh_without_token_is_forbidden() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/refreshToken")
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn refresh_with_tampered_token_is_forbidden() {
    let app = TestApp::spawn().await;

    app.register("alice@example.com", "Abcd1234").await;
    let (_, refresh_token) = app.login("alice@example.com", "Abcd1234").await;

    let mut tampered = refresh_token.clone();
    tampered.pop();
    tampered.push('x');

    let response = app
        .post("/auth/refreshToken")
        .json(&serde_json::json!({ "token": tampered }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn access_token_is_rejected_as_refresh_token() {
    let app = TestApp::spawn().await;

    app.register("alice@example.com", "Abcd1234").await;
    let (access_token, _) = app.login("alice@example.com", "Abcd1234").await;

    // Signed with the other secret, so it must not refresh
    let response = app
        .post("/auth/refreshToken")
        .json(&serde_json::json!({ "token": access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn reset_mail_response_does_not_reveal_account_existence() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", "Abcd1234").await;

    let known = app
        .post("/auth/sendResetMail")
        .json(&serde_json::json!({ "email": "alice@example.com" }))
        .send()
        .await
        .unwrap();
    let unknown = app
        .post("/auth/sendResetMail")
        .json(&serde_json::json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(known.status().as_u16(), 200);
    assert_eq!(unknown.status().as_u16(), 200);

    let body_known: serde_json::Value = known.json().await.unwrap();
    let body_unknown: serde_json::Value = unknown.json().await.unwrap();
    assert_eq!(body_known, body_unknown);

    // But only the real account got a mail
    assert_eq!(app.mailer.sent().len(), 1);
    assert_eq!(app.mailer.sent()[0].0, "alice@example.com");
}

#[tokio::test]
async fn password_reset_flow_end_to_end() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", "Abcd1234").await;

    app.post("/auth/sendResetMail")
        .json(&serde_json::json!({ "email": "alice@example.com" }))
        .send()
        .await
        .unwrap();

    let token = app.mailer.last_reset_token().expect("No reset mail sent");

    let response = app
        .post("/auth/resetPassword")
        .json(&serde_json::json!({ "password": "NewPass99", "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // New password works, old one no longer does
    app.login("alice@example.com", "NewPass99").await;
    let old = app
        .post("/auth/login")
        .json(&serde_json::json!({ "email": "alice@example.com", "password": "Abcd1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(old.status().as_u16(), 400);

    // Token was consumed: replay fails
    let replay = app
        .post("/auth/resetPassword")
        .json(&serde_json::json!({ "password": "Replay99", "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(replay.status().as_u16(), 400);
}

#[tokio::test]
async fn reset_with_invalid_password_is_a_bad_request() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", "Abcd1234").await;

    app.post("/auth/sendResetMail")
        .json(&serde_json::json!({ "email": "alice@example.com" }))
        .send()
        .await
        .unwrap();
    let token = app.mailer.last_reset_token().expect("No reset mail sent");

    let response = app
        .post("/auth/resetPassword")
        .json(&serde_json::json!({ "password": "abc", "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // The token was not consumed by the rejected attempt
    let retry = app
        .post("/auth/resetPassword")
        .json(&serde_json::json!({ "password": "NewPass99", "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(retry.status().as_u16(), 200);
}

#[tokio::test]
async fn reset_with_unknown_token_fails() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/resetPassword")
        .json(&serde_json::json!({ "password": "NewPass99", "token": "bogus" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_login_refresh_scenario() {
    let app = TestApp::spawn().await;

    let user_id = app.register("alice@example.com", "Abcd1234").await;
    let (access_token, refresh_token) = app.login("alice@example.com", "Abcd1234").await;

    let original: Claims = app.access_jwt.decode(&access_token).unwrap();
    assert_eq!(original.sub, user_id);

    let response = app
        .post("/auth/refreshToken")
        .json(&serde_json::json!({ "token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let refreshed: Claims = app
        .access_jwt
        .decode(body["data"]["accessToken"].as_str().unwrap())
        .unwrap();
    assert_eq!(refreshed.sub, user_id);
}
