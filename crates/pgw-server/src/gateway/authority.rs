//! Policy authority client — asks the external authority whether a
//! request may proceed.
//!
//! One POST per inbound request, no caching of decisions, no retries: a
//! single failed or denied call permanently rejects that request. Every
//! failure mode (transport, non-200, undecodable body) maps to an error,
//! never to an approval — the gate fails closed.

use pgw_core::{AuthorizationDecision, AuthorizationQuery, PgwError, PgwResult};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Client for the policy authority's check endpoint.
///
/// Holds a reusable HTTP client with the configured per-call deadline.
/// Stateless between calls beyond the connection pool.
pub struct AuthorityClient {
    url: String,
    client: reqwest::Client,
}

impl AuthorityClient {
    /// Create a client for the authority at `url` with the given per-call
    /// timeout.
    pub fn new(url: &str, timeout: Duration) -> PgwResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PgwError::Config(format!("authority http client: {e}")))?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Ask the authority whether `subject_id` may perform `command`.
    ///
    /// Blocks (awaits) until the authority answers, the transport fails,
    /// or the configured deadline expires.
    ///
    /// # Errors
    ///
    /// - [`PgwError::AuthorityUnreachable`] — connect failure, DNS
    ///   failure, or timeout.
    /// - [`PgwError::AuthorityDenied`] — non-200 response, or a 200 whose
    ///   decision status is not approval.
    /// - [`PgwError::AuthorityResponseMalformed`] — 200 with a body that
    ///   does not decode as a decision.
    pub async fn check_policy(
        &self,
        subject_id: &str,
        command: &str,
    ) -> PgwResult<AuthorizationDecision> {
        let query = AuthorizationQuery {
            subject_id: subject_id.to_string(),
            command: command.to_string(),
        };
        debug!(subject = %query.subject_id, command = %query.command, "querying policy authority");

        let response = self
            .client
            .post(&self.url)
            .json(&query)
            .send()
            .await
            .map_err(|e| PgwError::AuthorityUnreachable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PgwError::AuthorityDenied {
                status: status.as_u16(),
            });
        }

        let decision: AuthorizationDecision = response
            .json()
            .await
            .map_err(|e| PgwError::AuthorityResponseMalformed(e.to_string()))?;

        if !decision.is_approved() {
            return Err(PgwError::AuthorityDenied {
                status: status.as_u16(),
            });
        }

        debug!(subject = %query.subject_id, "policy authority approved");
        Ok(decision)
    }
}
