use anyhow::Context;
use axum::http::{self, HeaderValue, Method};
use dotenvy::dotenv;
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use mafia_server::{app, state::AppState, utils::config::CONFIG};

// RUST_LOG overrides the defaults below
fn init_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("tower_http", LevelFilter::Debug)
        .filter_module("axum", LevelFilter::Debug)
        .parse_default_env()
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    init_logger();
    if let Err(e) = env_loaded {
        warn!("no .env file loaded: {}", e);
    }

    let state = AppState::from_env().context("failed to load the secret word list")?;
    info!(
        "reveal delay {:?}, word list {:?}",
        state.config.reveal_delay, state.config.secret_words_path
    );

    let origin = CONFIG
        .client_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CLIENT_ORIGIN {}", CONFIG.client_origin))?;
    let cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]);

    let app = app::create_app(state).layer(cors).layer(
        TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    );

    let addr = CONFIG.server_addr;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
