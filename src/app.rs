/*
 * Responsibility
 * - tracing + panic hook
 * - Config -> stores / services -> AppState -> Router
 * - transport middleware (request id, trace, limits, CORS, security headers)
 * - axum::serve() with connect info (the location tagger needs the peer address)
 */
use std::{net::SocketAddr, panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{Config, GeoConfig},
    middleware,
    repos::{PgPostRepo, PgUserRepo, PostStore, UserStore},
    services::{
        auth::build_access_gate,
        geo::{LocationTagger, RangeTable},
        id_codec::IdCodec,
        password::PasswordHasher,
    },
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,geo_blog=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly; production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn build_tagger(config: &GeoConfig) -> Result<LocationTagger> {
    let table = match &config.table_path {
        Some(path) => RangeTable::load(path)
            .with_context(|| format!("loading geo table {}", path.display()))?,
        None => {
            tracing::warn!("GEOIP_TABLE_PATH not set; every request will be tagged Unknown");
            RangeTable::empty()
        }
    };
    tracing::info!(ranges = table.len(), "geo table loaded");

    Ok(LocationTagger::new(
        Arc::new(table),
        config.trust_forwarded_for,
    ))
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connecting to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("running migrations")?;

    let users: Arc<dyn UserStore> = Arc::new(PgUserRepo::new(pool.clone()));
    let posts: Arc<dyn PostStore> = Arc::new(PgPostRepo::new(pool));

    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)?;
    let hasher = PasswordHasher::new(config.password_hash_cost);
    let gate = build_access_gate(&config.auth, users.clone());
    let tagger = Arc::new(build_tagger(&config.geo)?);

    Ok(AppState::new(users, posts, id_codec, hasher, gate, tagger))
}

/// Routes only, no transport layers. Tests drive this directly.
pub fn build_api(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    middleware::http::apply(build_api(state), &config.http, config.app_env)
}
