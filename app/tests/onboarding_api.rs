mod common;

use autogift::{
    models::user::Model as User, repos::addresses::AddressesRepo,
};
use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use common::{json_body, post_json, session_cookie, set_cookie, TestApp};

const VALID: &str = r#"{"birthday":"1990-05-01","line1":"123 Main St","city":"Maple Valley","state":"wa","postalCode":"98038"}"#;

#[tokio::test]
async fn onboarding_without_session_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.send(post_json("/api/onboarding", None, VALID)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn onboarding_with_forged_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .send(post_json(
            "/api/onboarding",
            Some("session_token=not.a.jwt"),
            VALID,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_is_checked_before_the_body() {
    let app = TestApp::new().await;

    let response = app.send(post_json("/api/onboarding", None, "{not json")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;

    let response = app
        .send(post_json(
            "/api/onboarding",
            Some(&session_cookie(&user)),
            "{not json",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid JSON body");
}

#[tokio::test]
async fn missing_fields_report_the_first_in_order() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;
    let cookie = session_cookie(&user);

    let cases = [
        (r#"{}"#, "Birthday is required"),
        (
            r#"{"birthday":"1990-05-01","city":"Maple Valley"}"#,
            "Address line 1 is required",
        ),
        (
            r#"{"birthday":"1990-05-01","line1":"123 Main St","state":"wa"}"#,
            "City is required",
        ),
        (
            r#"{"birthday":"1990-05-01","line1":"123 Main St","city":"Maple Valley","state":"","postalCode":"98038"}"#,
            "State is required",
        ),
        (
            r#"{"birthday":"1990-05-01","line1":"123 Main St","city":"Maple Valley","state":"wa"}"#,
            "Postal code is required",
        ),
    ];

    for (payload, message) in cases {
        let response = app
            .send(post_json("/api/onboarding", Some(&cookie), payload))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");

        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], message, "{payload}");
    }

    let stored = app.users().find_by_id(&user.id).await.unwrap().unwrap();
    assert!(!stored.onboarded);
}

#[tokio::test]
async fn unparseable_birthday_is_a_bad_request() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;

    for birthday in ["01/05/1990", "1990-5-1"] {
        let payload = format!(
            r#"{{"birthday":"{birthday}","line1":"123 Main St","city":"Maple Valley","state":"wa","postalCode":"98038"}}"#
        );
        let response = app
            .send(post_json(
                "/api/onboarding",
                Some(&session_cookie(&user)),
                &payload,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{birthday}");
        assert_eq!(
            json_body(response).await["error"],
            "Birthday must be a valid date"
        );
    }

    let stored = app.users().find_by_id(&user.id).await.unwrap().unwrap();
    assert!(!stored.onboarded);
}

#[tokio::test]
async fn session_for_unknown_email_is_not_found() {
    let app = TestApp::new().await;
    let ghost = User {
        id: "ghost".to_string(),
        email: "ghost@example.com".to_string(),
        name: None,
        image: None,
        birthday: None,
        onboarded: false,
        created_at: Utc::now().naive_utc(),
        updated_at: None,
    };

    let response = app
        .send(post_json(
            "/api/onboarding",
            Some(&session_cookie(&ghost)),
            VALID,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "User not found");
}

#[tokio::test]
async fn valid_submission_stores_normalized_address_and_onboards_user() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;

    let response = app
        .send(post_json(
            "/api/onboarding",
            Some(&session_cookie(&user)),
            VALID,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "session_token").is_some());
    assert_eq!(json_body(response).await, serde_json::json!({ "ok": true }));

    let stored = app.users().find_by_id(&user.id).await.unwrap().unwrap();
    assert!(stored.onboarded);
    assert_eq!(stored.birthday, NaiveDate::from_ymd_opt(1990, 5, 1));
    assert_eq!(stored.name, None);

    let address = AddressesRepo::new(app.db.clone())
        .get_by_user(&user.id)
        .await
        .unwrap()
        .expect("address stored");
    assert_eq!(address.line1, "123 Main St");
    assert_eq!(address.line2, None);
    assert_eq!(address.city, "Maple Valley");
    assert_eq!(address.state, "WA");
    assert_eq!(address.postal_code, "98038");
    assert_eq!(address.country, "US");
}

#[tokio::test]
async fn resubmitting_replaces_the_single_address() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;
    let cookie = session_cookie(&user);

    for _ in 0..2 {
        let response = app
            .send(post_json("/api/onboarding", Some(&cookie), VALID))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let moved = r#"{"name":" Ada Lovelace ","birthday":"1990-05-01","line1":"9 Elm St","line2":" Apt 4 ","city":"Tacoma","state":"wa","postalCode":"98402","country":"us"}"#;
    let response = app
        .send(post_json("/api/onboarding", Some(&cookie), moved))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let addresses = AddressesRepo::new(app.db.clone());
    assert_eq!(addresses.count_for_user(&user.id).await.unwrap(), 1);

    let address = addresses.get_by_user(&user.id).await.unwrap().unwrap();
    assert_eq!(address.line1, "9 Elm St");
    assert_eq!(address.line2.as_deref(), Some("Apt 4"));
    assert_eq!(address.city, "Tacoma");
    assert_eq!(address.country, "US");

    let stored = app.users().find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Ada Lovelace"));
}
