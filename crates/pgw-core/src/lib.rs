//! pgw-core: Shared library for the pgw policy gateway.
//!
//! Provides the authorization query/decision wire types exchanged with the
//! policy authority and the gateway-wide error taxonomy.

pub mod error;
pub mod types;

// Re-export commonly used items at crate root.
pub use error::{PgwError, PgwResult};
pub use types::{AuthorizationDecision, AuthorizationQuery, APPROVED_STATUS};
