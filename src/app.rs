/*
 * Responsibility
 * - Load Config -> build shared state -> assemble Router
 * - Apply middleware (admission gate, error normalization, transport, CORS)
 * - Start with axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, error::AppError, middleware, state::AppState};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,eshop_api=debug,tower_http=debug
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
        // stderr may be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash so the panic gets noticed. Production: keep serving.
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
        env = ?config.app_env,
        addr = %config.addr,
        api_prefix = %config.api_prefix,
        "starting API"
    );

    let state = AppState::from_config(&config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

async fn route_not_found() -> AppError {
    AppError::not_found("route")
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest(&config.api_prefix, api::v1::routes())
        .fallback(route_not_found)
        .with_state(state.clone());

    apply_layers(router, state, config)
}

/// Layer order, inner to outer: gate, panic catcher, transport, normalizer,
/// security headers, CORS. The gate is innermost so nothing it rejects reaches a
/// handler; the normalizer sits outside everything that can emit a bare status.
fn apply_layers(router: Router, state: AppState, config: &Config) -> Router {
    let router = middleware::auth::access::apply(router, state);
    let router = middleware::errors::catch_panics(router);
    let router = middleware::http::apply(router);
    let router = middleware::errors::apply(router);
    let router = middleware::security_headers::apply(router);
    middleware::cors::apply(router, config)
}

#[cfg(test)]
mod tests;
