//! Questionnaire API
//!
//! A small HTTP service that issues scoped access tokens, authenticates
//! requests against those tokens, and serves randomized quiz
//! questionnaires from an append-only question store. Registered users can
//! list test types and subjects and generate questionnaires; the admin
//! account can append new questions.

mod auth;
mod config;
mod credentials;
mod error;
mod questions;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenCodec;
use crate::config::Settings;
use crate::credentials::StaticCredentialStore;
use crate::questions::JsonlQuestionStore;
use crate::routes::create_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("Starting Questionnaire API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded successfully");

    // Build the token codec; an unsupported algorithm aborts startup here
    let tokens = TokenCodec::new(&settings.auth)?;

    // Load the question table; the file must exist and decode cleanly
    let questions = JsonlQuestionStore::load(&settings.store.questions_path).await?;
    info!(
        questions = questions.len().await,
        path = %settings.store.questions_path.display(),
        "question store loaded"
    );

    let credentials = StaticCredentialStore::seeded();

    let state = Arc::new(AppState::new(
        Arc::new(credentials),
        Arc::new(questions),
        tokens,
    ));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("Server listening on http://{}", addr);
    info!("");
    info!("API Endpoints:");
    info!("   GET  /home       - Status of the API");
    info!("   POST /token      - Login, returns a bearer token");
    info!("   GET  /uses       - List test types (token required)");
    info!("   GET  /subjects   - List subjects for a test type (token required)");
    info!("   GET  /questions  - Generate a questionnaire (token required)");
    info!("   POST /admin      - Add a question (admin only)");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,questionnaire_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
