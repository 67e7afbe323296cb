use credence_core::config::Config;
use serde::Deserialize;

/// Auth service configuration loaded from environment variables.
///
/// Loaded once at startup and injected into [`crate::state::AppState`];
/// nothing reads the environment after boot.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `AUTH_PORT`.
    #[serde(default = "default_port")]
    pub auth_port: u16,
    /// Deployment environment, `production` enables strict cookies.
    /// Env var: `APP_ENV`.
    #[serde(default = "default_env")]
    pub app_env: String,
    /// Public origin used in email links (e.g. "https://app.example.com").
    /// Env var: `APP_ORIGIN`.
    pub app_origin: String,
    /// HMAC secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Access-token lifetime, `<n><m|h|d>` form (default "15m").
    /// Env var: `JWT_EXPIRES_IN`.
    #[serde(default = "default_access_expires_in")]
    pub jwt_expires_in: String,
    /// HMAC secret for refresh tokens, distinct from `jwt_secret`.
    /// Env var: `JWT_REFRESH_SECRET`.
    pub jwt_refresh_secret: String,
    /// Refresh-token and session lifetime (default "30d").
    /// Env var: `JWT_REFRESH_EXPIRES_IN`.
    #[serde(default = "default_refresh_expires_in")]
    pub jwt_refresh_expires_in: String,
    /// From-address for outbound mail. Env var: `MAILER_SENDER`.
    pub mailer_sender: String,
    /// Resend API key. When unset, mail is logged instead of delivered.
    /// Env var: `RESEND_API_KEY`.
    #[serde(default)]
    pub resend_api_key: Option<String>,
    /// Issuer shown in authenticator apps for TOTP enrollment.
    /// Env var: `MFA_ISSUER`.
    #[serde(default = "default_mfa_issuer")]
    pub mfa_issuer: String,
}

fn default_port() -> u16 {
    3114
}

fn default_env() -> String {
    "development".to_owned()
}

fn default_access_expires_in() -> String {
    "15m".to_owned()
}

fn default_refresh_expires_in() -> String {
    "30d".to_owned()
}

fn default_mfa_issuer() -> String {
    "Credence".to_owned()
}

impl Config for AuthConfig {}

impl AuthConfig {
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
