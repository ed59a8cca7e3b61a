//! Entry point: load config, prepare the database, wire dependencies, and run the server.

use axum::http::{header, HeaderValue, Method};
use jobboard::auth::{PasswordService, TokenService};
use jobboard::config::Config;
use jobboard::{create_app_with_timeout, db, AppState};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::ensure_schema(&db_pool).await?;

    let passwords = PasswordService::new(config.hashing)?;
    let tokens = TokenService::new(&config.jwt_secret);
    let state = AppState::new(db_pool, tokens, passwords);

    if let Some(admin) = &config.seed_admin {
        state.credentials().seed_admin(admin).await?;
        tracing::info!(username = %admin.username, "admin account ready");
    }

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60));

    let app = create_app_with_timeout(state, config.request_timeout).layer(cors);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
