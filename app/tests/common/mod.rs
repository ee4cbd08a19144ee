#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use autogift::{
    config::config::Config,
    core::state::AppState,
    database::connect::run_migrations,
    models::user::Model as User,
    repos::users::UsersRepo,
    routes::create_routers,
    services::google::{
        IdentityProvider, OAuthError, ProviderIdentity, ProviderTokens, GOOGLE_PROVIDER,
    },
    utils::jwt::create_session_token,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const GOOD_CODE: &str = "good-code";

#[derive(Debug)]
pub struct FakeGoogle;

#[async_trait]
impl IdentityProvider for FakeGoogle {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://accounts.example.test/auth?state={}", state)
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, OAuthError> {
        if code != GOOD_CODE {
            return Err(OAuthError::TokenExchange("unknown code".to_string()));
        }

        Ok(ProviderIdentity {
            provider: GOOGLE_PROVIDER.to_string(),
            provider_account_id: "google-sub-1".to_string(),
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            image: Some("https://example.test/ada.png".to_string()),
            tokens: ProviderTokens {
                access_token: Some("ya29.access".to_string()),
                refresh_token: Some("1//refresh".to_string()),
                expires_at: Some(1_900_000_000),
                scope: Some("openid email profile".to_string()),
            },
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub state: Arc<AppState>,
    _static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.expect("connect sqlite");
        run_migrations(&db).await.expect("run migrations");

        let static_dir = tempfile::tempdir().expect("tempdir");
        for page in ["index", "groups", "onboarding", "signin"] {
            std::fs::write(
                static_dir.path().join(format!("{page}.html")),
                format!("<h1>{page}</h1>"),
            )
            .expect("write page");
        }

        let config: Config = envy::from_iter([
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
            ("GOOGLE_CLIENT_ID".to_string(), "client-id".to_string()),
            ("GOOGLE_CLIENT_SECRET".to_string(), "client-secret".to_string()),
            ("SESSION_SECRET".to_string(), SECRET.to_string()),
            (
                "STATIC_DIR".to_string(),
                static_dir.path().to_string_lossy().into_owned(),
            ),
        ])
        .expect("config");

        let state = Arc::new(
            AppState::new(db.clone(), config, Arc::new(FakeGoogle)).expect("app state"),
        );

        Self {
            router: create_routers(state.clone()),
            db,
            state,
            _static_dir: static_dir,
        }
    }

    pub fn users(&self) -> UsersRepo {
        UsersRepo::new(self.db.clone())
    }

    pub async fn create_user(&self, email: &str) -> User {
        self.users()
            .create(email.to_string(), None, None)
            .await
            .expect("create user")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }
}

pub fn token_for(user: &User) -> String {
    create_session_token(user, SECRET, 30).expect("session token")
}

pub fn session_cookie(user: &User) -> String {
    format!("session_token={}", token_for(user))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_json(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn text_body(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` for the first `Set-Cookie` with the given name.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or_default().trim().to_string())
        .find(|pair| pair.starts_with(&format!("{name}=")))
}
