//! Request handlers.
//!
//! Each handler logs one `REQ{"url":...} RES{...}` line with the exact body
//! it returns.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::server::response::{ActionResponse, ListResponse, TestResponse, STATE_OK};
use crate::server::state::AppState;
use crate::validation::{validate_port, validate_timeout};

/// Delay between answering `/stop` and shutting down, so the reply gets out.
pub const STOP_DELAY: Duration = Duration::from_millis(500);

fn respond<T: Serialize>(uri: &Uri, body: &T) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => {
            log::info!("REQ{{\"url\":\"{}\"}} RES{json}", uri.path());
            ([(header::CONTENT_TYPE, "application/json")], json).into_response()
        }
        Err(e) => {
            log::error!("REQ{{\"url\":\"{}\"}} failed to encode response: {e}", uri.path());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn action(state: &AppState, name: &str, outcome: &str, note: &str) -> ActionResponse {
    ActionResponse {
        action: name.into(),
        state: outcome.into(),
        note: note.into(),
        timeout: state.supervisor.remaining_seconds(),
        inuse: state.registry.reserved_count(),
    }
}

/// `GET /test/{port}`: reserve the port, or suggest the first free one.
///
/// Also mounted on `/test/`, where the empty segment answers `format`.
pub async fn test_port(
    State(state): State<AppState>,
    requested: Option<Path<String>>,
    uri: Uri,
) -> Response {
    state.supervisor.touch();
    let requested = requested.map(|Path(text)| text).unwrap_or_default();

    let body = match validate_port(&requested, &state.ports()) {
        Ok(port) => {
            let allocation = state.registry.allocate_or_query(port);
            TestResponse::from_allocation(&requested, &allocation)
        }
        Err(err) => TestResponse::rejected(&requested, &err),
    };
    respond(&uri, &body)
}

/// `GET /list`: every reserved port.
pub async fn list(State(state): State<AppState>, uri: Uri) -> Response {
    state.supervisor.touch();
    let reserved = state.registry.list_reserved();
    respond(&uri, &ListResponse::from(&reserved))
}

/// `GET /status`
pub async fn status(State(state): State<AppState>, uri: Uri) -> Response {
    state.supervisor.touch();
    respond(&uri, &action(&state, "STATUS", STATE_OK, ""))
}

/// `GET /reset`: release every port except the daemon's own.
pub async fn reset(State(state): State<AppState>, uri: Uri) -> Response {
    state.registry.reset();
    state.supervisor.touch();
    respond(&uri, &action(&state, "RESET", STATE_OK, ""))
}

/// `GET /ping`: liveness probe. Leaves the idle deadline alone.
pub async fn ping(State(state): State<AppState>, uri: Uri) -> Response {
    respond(&uri, &action(&state, "PING", STATE_OK, ""))
}

/// `GET /timeout/{seconds}`: change the idle timeout. `/timeout/` answers
/// `format`.
pub async fn set_timeout(
    State(state): State<AppState>,
    seconds: Option<Path<String>>,
    uri: Uri,
) -> Response {
    state.supervisor.touch();
    let seconds = seconds.map(|Path(text)| text).unwrap_or_default();

    let outcome = validate_timeout(&seconds, &state.timeouts())
        .and_then(|seconds| state.supervisor.set_timeout(seconds));
    let body = match outcome {
        Ok(()) => action(&state, "TIMEOUT", STATE_OK, ""),
        Err(err) => action(&state, "TIMEOUT", err.reason(), &err.note),
    };
    respond(&uri, &body)
}

/// `GET /stop`: answer, then shut the server down after [`STOP_DELAY`].
pub async fn stop(State(state): State<AppState>, uri: Uri) -> Response {
    let token = state.shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(STOP_DELAY).await;
        log::info!("Stop requested, shutting down");
        token.cancel();
    });
    respond(&uri, &action(&state, "STOP", STATE_OK, ""))
}

/// Anything else.
pub async fn not_found(uri: Uri) -> StatusCode {
    log::debug!("REQ{{\"url\":\"{}\"}} no such route", uri.path());
    StatusCode::NOT_FOUND
}
