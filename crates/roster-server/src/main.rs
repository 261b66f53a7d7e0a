use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Local};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use roster_api::auth::MAX_TOKEN_DAYS;
use roster_api::members::bootstrap_admin;
use roster_api::{AppState, AppStateInner};
use roster_core::{LockPolicy, season_for_month};

const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "roster=debug,roster_api=debug,roster_db=info,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let jwt_secret = std::env::var("ROSTER_JWT_SECRET").unwrap_or_default();
    if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
        eprintln!("FATAL: ROSTER_JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    let db_path = std::env::var("ROSTER_DB_PATH").unwrap_or_else(|_| "roster.db".into());
    let host = std::env::var("ROSTER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("ROSTER_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let token_days: i64 = std::env::var("ROSTER_TOKEN_DAYS")
        .unwrap_or_else(|_| "30".into())
        .parse()?;
    if !(1..=MAX_TOKEN_DAYS).contains(&token_days) {
        anyhow::bail!("ROSTER_TOKEN_DAYS must be between 1 and {}, got {}", MAX_TOKEN_DAYS, token_days);
    }
    let admin_exempt = std::env::var("ROSTER_ADMIN_LOCK_EXEMPT")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let lock_policy = LockPolicy::from_admin_exempt(admin_exempt);

    // Init database
    let db = roster_db::Database::open(&PathBuf::from(&db_path))?;
    info!("Database ready at {}", db_path);

    // The calendar only picks the season for a fresh store
    let initial = season_for_month(Local::now().month());
    if db.seed_season(initial)? {
        info!("Seeded season: {}", initial);
    }

    if let Ok(email) = std::env::var("ROSTER_ADMIN_EMAIL") {
        let nickname = std::env::var("ROSTER_ADMIN_NICKNAME").unwrap_or_else(|_| "Admin".into());
        if let Some(password) = bootstrap_admin(&db, &email, &nickname)? {
            warn!(
                "Created admin {} with temporary password: {} (change it at first login)",
                email, password
            );
        }
    }

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        token_days,
        lock_policy,
    });

    let app = roster_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Roster server listening on {} (lock policy: {:?})", addr, lock_policy);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
