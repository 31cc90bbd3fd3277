use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::info;

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::upstream::Upstream;

const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug)]
struct AppState {
    upstream: Upstream,
}

type SharedState = Arc<AppState>;

pub fn build_router(upstream: Upstream) -> Router {
    let state = Arc::new(AppState { upstream });
    Router::new()
        .route("/sec-link1", get(sec_link))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

pub async fn serve(config: ProxyConfig) -> Result<()> {
    let upstream = Upstream::new(&config)?;
    info!(addr = %config.bind, upstream = %upstream.url(), "binding HTTP listener");

    let listener = TcpListener::bind(config.bind).await?;
    axum::serve(listener, build_router(upstream))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

async fn sec_link(State(state): State<SharedState>) -> Result<Response> {
    let fetched = state.upstream.fetch().await?;
    let content_type = fetched
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    Ok(([(CONTENT_TYPE, content_type)], fetched.body).into_response())
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
