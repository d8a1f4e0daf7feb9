use thiserror::Error;

/// Errors produced by the policy gate and the backend relay.
///
/// The three `Authority*` variants are deliberately collapsed by the
/// request handler into a single uniform 403 — the distinction exists
/// for logs, never for the caller.
#[derive(Debug, Error)]
pub enum PgwError {
    #[error("policy authority unreachable: {0}")]
    AuthorityUnreachable(String),

    #[error("policy authority denied (status {status})")]
    AuthorityDenied { status: u16 },

    #[error("policy authority response malformed: {0}")]
    AuthorityResponseMalformed(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl PgwError {
    /// True for every failure of the authorization step, regardless of
    /// root cause. All of these must fail closed.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            PgwError::AuthorityUnreachable(_)
                | PgwError::AuthorityDenied { .. }
                | PgwError::AuthorityResponseMalformed(_)
        )
    }
}

pub type PgwResult<T> = Result<T, PgwError>;
