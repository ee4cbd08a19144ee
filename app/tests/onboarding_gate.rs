mod common;

use autogift::{repos::addresses::NewAddress, utils::jwt::verify_session_token};
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{get, location, session_cookie, set_cookie, text_body, TestApp, SECRET};

fn address() -> NewAddress {
    NewAddress {
        line1: "123 Main St".to_string(),
        line2: None,
        city: "Maple Valley".to_string(),
        state: "WA".to_string(),
        postal_code: "98038".to_string(),
        country: "US".to_string(),
    }
}

async fn onboard(app: &TestApp, user_id: &str) {
    app.users()
        .complete_onboarding(
            user_id,
            None,
            NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            address(),
        )
        .await
        .expect("complete onboarding");
}

#[tokio::test]
async fn not_onboarded_user_is_redirected_to_onboarding() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;
    let cookie = session_cookie(&user);

    let response = app.send(get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/onboarding");

    let response = app.send(get("/groups/42?tab=wishlist", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/onboarding?tab=wishlist");

    let response = app.send(get("/onboarding", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "<h1>onboarding</h1>");
}

#[tokio::test]
async fn onboarded_user_is_redirected_home_from_onboarding() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;
    onboard(&app, &user.id).await;
    let user = app.users().find_by_id(&user.id).await.unwrap().unwrap();
    let cookie = session_cookie(&user);

    let response = app.send(get("/onboarding", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");

    let response = app.send(get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "<h1>index</h1>");

    let response = app.send(get("/groups", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn gate_reads_onboarded_from_the_store_and_refreshes_the_token() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;
    // Token minted before onboarding still says onboarded=false.
    let stale_cookie = session_cookie(&user);
    onboard(&app, &user.id).await;

    let response = app.send(get("/onboarding", Some(&stale_cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");

    let refreshed = set_cookie(&response, "session_token").expect("refreshed cookie");
    let token = refreshed.trim_start_matches("session_token=");
    let claims = verify_session_token(token, SECRET).unwrap();
    assert!(claims.onboarded);
    assert_eq!(claims.id, user.id);
}

#[tokio::test]
async fn anonymous_request_is_sent_to_sign_in() {
    let app = TestApp::new().await;

    let response = app.send(get("/groups/7", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/signin?callbackUrl=%2Fgroups%2F7");

    let response = app.send(get("/", Some("session_token=garbage"))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).starts_with("/signin"));
}

#[tokio::test]
async fn token_for_deleted_user_counts_as_signed_out() {
    let app = TestApp::new().await;
    let user = app.create_user("ada@example.com").await;
    let cookie = session_cookie(&user);

    use sea_orm::EntityTrait;
    autogift::models::user::Entity::delete_by_id(user.id.clone())
        .exec(&app.db)
        .await
        .unwrap();

    let response = app.send(get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).starts_with("/signin"));
}

#[tokio::test]
async fn sign_in_page_is_not_gated() {
    let app = TestApp::new().await;

    let response = app.send(get("/signin", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "<h1>signin</h1>");
}
