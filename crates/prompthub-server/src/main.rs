use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use prompthub_api::auth::{self, AppState, AppStateInner};
use prompthub_api::middleware::require_auth;
use prompthub_api::{admob, ads, categories, favourites, likes, prompts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompthub=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("PROMPTHUB_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    if jwt_secret == "dev-secret-change-me" {
        warn!("PROMPTHUB_JWT_SECRET is unset; using the dev secret");
    }
    let db_path = std::env::var("PROMPTHUB_DB_PATH").unwrap_or_else(|_| "prompthub.db".into());
    let host = std::env::var("PROMPTHUB_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PROMPTHUB_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = prompthub_db::Database::open(&PathBuf::from(&db_path))?;

    // Bootstrap admin from deployment config; there is no registration
    // endpoint.
    match (
        std::env::var("PROMPTHUB_ADMIN_USERNAME"),
        std::env::var("PROMPTHUB_ADMIN_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
            auth::seed_admin(&db, &username, &password)?;
        }
        _ => warn!("No admin credentials configured; admin endpoints will be unreachable"),
    }

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    // Routes
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/prompts", get(prompts::list_prompts))
        .route("/api/prompts/{id}", get(prompts::get_prompt))
        .route("/api/prompts/{id}/like", post(likes::toggle_like))
        .route(
            "/api/favourites",
            get(favourites::list_favourites).post(favourites::add_favourite),
        )
        .route("/api/favourites/{prompt_id}", delete(favourites::remove_favourite))
        .route("/api/ads", get(ads::list_active_ads))
        .route("/api/config/admob", get(admob::get_config))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/api/admin/categories", post(categories::create_category))
        .route(
            "/api/admin/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/api/admin/prompts", post(prompts::create_prompt))
        .route(
            "/api/admin/prompts/{id}",
            put(prompts::update_prompt).delete(prompts::delete_prompt),
        )
        .route("/api/admin/ads", get(ads::list_all_ads).post(ads::create_ad))
        .route("/api/admin/ads/{id}", delete(ads::delete_ad))
        .route("/api/admin/ads/{id}/activate", post(ads::activate_ad))
        .route(
            "/api/admin/placements/{placement}/deactivate",
            post(ads::deactivate_placement),
        )
        .route("/api/admin/config/admob", put(admob::put_config))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Prompt hub server listening on {}", addr);

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
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
