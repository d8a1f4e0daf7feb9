//! Gateway module — policy-gated request forwarding.
//!
//! Every inbound request passes through one mandatory checkpoint: the
//! external policy authority. Only approved requests reach the backend.
//!
//! # Submodule Architecture
//!
//! The gateway is composed of three cooperating submodules:
//!
//! - **[`authority`]** — The [`AuthorityClient`] turns request context into
//!   an authorization query, POSTs it to the policy authority, and maps the
//!   outcome (approval, denial, transport failure, undecodable body) onto
//!   the gateway error taxonomy. Every failure mode is "not approved".
//!
//! - **[`handler`]** — The axum catch-all handler. Derives the query,
//!   awaits the authority, and either rejects with a uniform 403 or hands
//!   the request plus credential to the forwarder. The only place that
//!   branches on the decision.
//!
//! - **[`forwarder`]** — The [`Forwarder`] relays an already-approved
//!   request to the backend, attaching the credential header and streaming
//!   the response back verbatim. Performs no authorization logic of its own.
//!
//! # Data Flow
//!
//! ```text
//! inbound request
//!   → handler::handle
//!       → AuthorityClient::check_policy
//!           → Err(_)        → 403, fixed body, no forwarding
//!           → Ok(decision)  → Forwarder::relay (X-Policy-Token attached)
//!                               → backend response streamed to caller
//!                               → relay failure → 502
//! ```

pub mod authority;
pub mod forwarder;
pub mod handler;

pub use authority::AuthorityClient;
pub use forwarder::Forwarder;
pub use handler::{router, GatewayState};
