use sea_orm::Database;
use tracing::info;

use credence_auth::config::AuthConfig;
use credence_auth::expiry::parse_expires_in;
use credence_auth::infra::mailer::{AppMailer, LogMailer, ResendMailer};
use credence_auth::router::build_router;
use credence_auth::state::AppState;
use credence_auth::usecase::TokenConfig;
use credence_core::config::Config;

#[tokio::main]
async fn main() {
    credence_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let access_lifetime = parse_expires_in(&config.jwt_expires_in).expect("invalid JWT_EXPIRES_IN");
    let refresh_lifetime =
        parse_expires_in(&config.jwt_refresh_expires_in).expect("invalid JWT_REFRESH_EXPIRES_IN");

    let mailer = match config.resend_api_key.clone() {
        Some(api_key) => AppMailer::Resend(ResendMailer::new(api_key, config.mailer_sender.clone())),
        None => {
            info!("RESEND_API_KEY not set, outbound mail will be logged");
            AppMailer::Log(LogMailer)
        }
    };

    let state = AppState {
        db,
        mailer,
        tokens: TokenConfig {
            access_secret: config.jwt_secret.clone(),
            access_lifetime_secs: access_lifetime.num_seconds() as u64,
            refresh_secret: config.jwt_refresh_secret.clone(),
            refresh_lifetime_secs: refresh_lifetime.num_seconds() as u64,
        },
        production: config.is_production(),
        app_origin: config.app_origin.clone(),
        mfa_issuer: config.mfa_issuer.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
