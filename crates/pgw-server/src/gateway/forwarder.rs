//! Backend relay — reproduces an approved request against the backend and
//! streams the response back to the original caller.
//!
//! The forwarder performs no authorization logic: by the time [`relay`]
//! runs, the policy authority has already approved and the credential is
//! in hand. Method, path, query string, body, and headers pass through
//! untouched except for what correct routing requires (the Host header is
//! rewritten to the backend's host by virtue of re-targeting the URL, and
//! hop-by-hop headers are dropped).
//!
//! [`relay`]: Forwarder::relay

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Response};
use pgw_core::{PgwError, PgwResult};
use tracing::debug;

/// Header carrying the authority-issued credential to the backend.
pub const POLICY_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-policy-token");

/// Relays approved, credential-bearing requests to the backend base URL.
pub struct Forwarder {
    /// Backend base URL, no trailing slash.
    backend_url: String,
    client: reqwest::Client,
}

impl Forwarder {
    /// Create a forwarder for the backend at `backend_url`.
    ///
    /// The relay client carries no overall timeout: response streaming is
    /// allowed to run as long as the backend keeps sending.
    pub fn new(backend_url: &str) -> PgwResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PgwError::Config(format!("backend http client: {e}")))?;
        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Reproduce `req` against the backend with `token` attached, and
    /// return the backend's response with its body streaming through.
    ///
    /// # Errors
    ///
    /// [`PgwError::BackendUnavailable`] if the backend cannot be reached.
    /// This is the one failure the handler reports distinctly (502), since
    /// it can only occur after authorization succeeded.
    pub async fn relay(&self, req: Request, token: HeaderValue) -> PgwResult<Response<Body>> {
        let (parts, body) = req.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", self.backend_url, path_and_query);
        debug!(method = %parts.method, url = %url, "relaying to backend");

        // Copy headers; Host is set by the client from the target URL,
        // and the body is re-framed as a stream.
        let mut headers = HeaderMap::new();
        for (name, value) in parts.headers.iter() {
            if skip_request_header(name) {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        headers.insert(POLICY_TOKEN_HEADER, token);

        let response = self
            .client
            .request(parts.method.clone(), &url)
            .headers(headers)
            .body(reqwest::Body::wrap_stream(body.into_data_stream()))
            .send()
            .await
            .map_err(|e| PgwError::BackendUnavailable(e.to_string()))?;

        let mut builder = Response::builder().status(response.status());
        for (name, value) in response.headers().iter() {
            if skip_response_header(name) {
                continue;
            }
            builder = builder.header(name, value);
        }

        builder
            .body(Body::from_stream(response.bytes_stream()))
            .map_err(|e| PgwError::Other(format!("assembling relayed response: {e}")))
    }
}

/// Headers not copied onto the outgoing backend request: Host (re-set from
/// the backend URL), framing headers (the body is re-framed), and
/// hop-by-hop headers that describe the inbound connection.
fn skip_request_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "host"
            | "content-length"
            | "connection"
            | "transfer-encoding"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "upgrade"
    )
}

/// Headers not copied from the backend response: connection framing belongs
/// to each hop, not to the relayed message.
fn skip_response_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection" | "transfer-encoding" | "keep-alive" | "trailer" | "upgrade"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_framing_headers_are_skipped() {
        assert!(skip_request_header(&HeaderName::from_static("host")));
        assert!(skip_request_header(&HeaderName::from_static("connection")));
        assert!(skip_request_header(&HeaderName::from_static(
            "transfer-encoding"
        )));
        assert!(skip_request_header(&HeaderName::from_static(
            "content-length"
        )));
    }

    #[test]
    fn ordinary_headers_pass_through() {
        assert!(!skip_request_header(&HeaderName::from_static("accept")));
        assert!(!skip_request_header(&HeaderName::from_static(
            "content-type"
        )));
        assert!(!skip_request_header(&HeaderName::from_static(
            "x-request-id"
        )));
        assert!(!skip_response_header(&HeaderName::from_static(
            "content-type"
        )));
    }

    #[test]
    fn forwarder_normalizes_backend_url() {
        let forwarder = Forwarder::new("http://backend:5000/").unwrap();
        assert_eq!(forwarder.backend_url, "http://backend:5000");
    }
}
