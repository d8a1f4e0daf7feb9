//! pgw-server: policy-gated HTTP forwarding gateway.
//!
//! Sits in front of a backend service and refuses to relay any request
//! that the external policy authority has not approved. Exposed as a
//! library so the integration tests can assemble a gateway against mock
//! upstreams; the binary lives in `main.rs`.

pub mod config;
pub mod gateway;
