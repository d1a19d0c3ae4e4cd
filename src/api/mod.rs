use crate::{
    api::handlers::{health, login, view, AppState},
    session,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod handlers;
mod openapi;

pub use openapi::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router around the shared state.
///
/// `POST /`, `POST /login` and `POST /logout` all run the same body-driven
/// submission handler.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(view::view).post(login::login))
        .route("/login", post(login::login))
        .route("/logout", post(login::logout))
        .route("/health", get(health::health).options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    listen: IpAddr,
    port: u16,
    state: Arc<AppState>,
    sweep_interval: Duration,
) -> Result<()> {
    let sweeper = session::spawn_sweeper(state.store_handle(), sweep_interval);

    let listener = TcpListener::bind(SocketAddr::new(listen, port))
        .await
        .with_context(|| format!("Failed to bind {listen}:{port}"))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}
