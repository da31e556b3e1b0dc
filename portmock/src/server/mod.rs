//! The HTTP front end.
//!
//! Routes map one-to-one onto registry and supervisor operations:
//!
//! | route | renews idle deadline |
//! |---|---|
//! | `/test/{port}` | yes |
//! | `/list` | yes |
//! | `/status` | yes |
//! | `/reset` | yes |
//! | `/timeout/{seconds}` | yes |
//! | `/ping` | no |
//! | `/stop` | no |
//!
//! `/test/` and `/timeout/` with an empty segment answer `format` rather
//! than 404.

pub mod handlers;
pub mod response;
pub mod state;

use std::net::{Ipv4Addr, SocketAddr};

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::{Error, Result};
use crate::port::Port;

pub use response::{ActionResponse, ListResponse, TestResponse};
pub use state::AppState;

/// Builds the router with every endpoint.
pub fn router(state: AppState) -> Router {
    let server = HeaderValue::from_str(state.server_name())
        .unwrap_or_else(|_| HeaderValue::from_static(env!("CARGO_PKG_NAME")));

    Router::new()
        .route("/test/", get(handlers::test_port))
        .route("/test/{port}", get(handlers::test_port))
        .route("/list", get(handlers::list))
        .route("/status", get(handlers::status))
        .route("/reset", get(handlers::reset))
        .route("/ping", get(handlers::ping))
        .route("/timeout/", get(handlers::set_timeout))
        .route("/timeout/{seconds}", get(handlers::set_timeout))
        .route("/stop", get(handlers::stop))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(header::SERVER, server))
}

/// Binds the daemon's listening socket on all interfaces.
///
/// # Errors
///
/// Returns [`Error::Server`] if the port cannot be bound.
pub async fn bind(port: Port) -> Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port.value()));
    TcpListener::bind(addr).await.map_err(|e| Error::Server {
        reason: format!("cannot listen on {addr}: {e}"),
    })
}

/// Serves requests until `state.shutdown` is cancelled.
///
/// In-flight requests are allowed to finish.
///
/// # Errors
///
/// Returns [`Error::Server`] if the server fails.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let token = state.shutdown.clone();
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await
        .map_err(|e| Error::Server {
            reason: e.to_string(),
        })
}
