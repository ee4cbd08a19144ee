use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_server_ip")]
    pub server_ip: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    pub google_client_id: String,
    pub google_client_secret: String,

    /// Public base URL of the app, used to build the OAuth redirect URI.
    #[serde(default = "default_app_url", alias = "nextauth_url")]
    pub app_url: String,

    #[serde(alias = "nextauth_secret")]
    pub session_secret: String,
    #[serde(default = "default_session_max_age_days")]
    pub session_max_age_days: i64,
    #[serde(default)]
    pub cookie_secure: bool,

    /// Key for OAuth tokens at rest. Falls back to the session secret.
    pub encryption_key: Option<String>,

    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    pub cors_origin: Option<String>,

    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

fn default_port() -> u16 {
    8000
}
fn default_server_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    2
}
fn default_app_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_session_max_age_days() -> i64 {
    30
}
fn default_static_dir() -> String {
    "static".to_string()
}

impl Config {
    pub fn load_envs() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn google_redirect_uri(&self) -> String {
        format!(
            "{}/api/auth/callback/google",
            self.app_url.trim_end_matches('/')
        )
    }

    pub fn encryption_key(&self) -> &str {
        self.encryption_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(&self.session_secret)
    }
}
