//! Request handler — the one place that branches on a policy decision.
//!
//! Per-request flow is linear with no way back: derive the authorization
//! query, await the authority, then either reject with a uniform 403 or
//! hand the request to the forwarder. There is no partial-forward path;
//! the backend sees either the whole request or nothing.
//!
//! The 403 body is fixed. Authority status codes, transport errors, and
//! decode failures are logged here but never shown to the caller.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use pgw_core::PgwResult;
use std::sync::Arc;
use tracing::{debug, warn};

use super::authority::AuthorityClient;
use super::forwarder::Forwarder;
use crate::config::{CommandMode, GatewayConfig};

/// Inbound header naming the authenticated subject, set by the edge layer
/// in front of this gateway.
const SUBJECT_HEADER: &str = "x-subject-id";
/// Subject used when the edge supplies none.
const FALLBACK_SUBJECT: &str = "user-123";
/// The single command value used in [`CommandMode::Fixed`].
const FIXED_COMMAND: &str = "INIT_SECURE_LIVE";

/// Fixed rejection body. Deliberately says nothing about why.
const POLICY_DENIED_BODY: &str = "Forbidden: policy denied";
/// Fixed body for backend failures after approval.
const BAD_GATEWAY_BODY: &str = "Bad gateway";

/// Shared per-process state: immutable config plus the two upstream
/// clients. Built once at startup; request handling only reads it.
pub struct GatewayState {
    pub config: GatewayConfig,
    pub authority: AuthorityClient,
    pub forwarder: Forwarder,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig) -> PgwResult<Self> {
        Ok(Self {
            authority: AuthorityClient::new(&config.authority_url, config.authority_timeout)?,
            forwarder: Forwarder::new(&config.backend_url)?,
            config: config.clone(),
        })
    }
}

/// Build the gateway router: a single catch-all over every path and method.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new().fallback(handle).with_state(state)
}

/// Handle one inbound request: authorize, then relay or reject.
async fn handle(State(state): State<Arc<GatewayState>>, req: Request) -> Response {
    let subject = subject_of(req.headers());
    let command = command_of(state.config.command_mode, req.method(), req.uri());
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let decision = match state.authority.check_policy(&subject, &command).await {
        Ok(decision) => decision,
        Err(e) => {
            // Fail closed: unreachable, denied, and malformed all collapse
            // into the same caller-visible rejection.
            warn!(%method, %path, subject = %subject, error = %e, "request rejected");
            return reject();
        }
    };

    // The credential travels in a header, so it must be header-safe. An
    // authority that issues anything else gets treated as malformed.
    let token = match HeaderValue::from_str(&decision.token) {
        Ok(token) => token,
        Err(_) => {
            warn!(%method, %path, "authority issued a non-header-safe credential");
            return reject();
        }
    };

    debug!(%method, %path, subject = %subject, "approved, relaying");
    match state.forwarder.relay(req, token).await {
        Ok(response) => response,
        Err(e) => {
            warn!(%method, %path, error = %e, "backend relay failed");
            (StatusCode::BAD_GATEWAY, BAD_GATEWAY_BODY).into_response()
        }
    }
}

fn reject() -> Response {
    (StatusCode::FORBIDDEN, POLICY_DENIED_BODY).into_response()
}

/// Subject identity for the authorization query: the edge-supplied header
/// when present and readable, otherwise the placeholder subject.
fn subject_of(headers: &HeaderMap) -> String {
    headers
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_SUBJECT)
        .to_string()
}

/// Command for the authorization query, per the configured mode.
fn command_of(mode: CommandMode, method: &Method, uri: &Uri) -> String {
    match mode {
        CommandMode::Derived => format!("{} {}", method, uri.path()),
        CommandMode::Fixed => FIXED_COMMAND.to_string(),
    }
}
