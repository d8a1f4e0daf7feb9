//! Wire types exchanged with the policy authority.
//!
//! Field names on the wire (`userId`, `cmd`, `status`, `token`) are fixed
//! by the authority's protocol; the Rust names follow gateway vocabulary.

use serde::{Deserialize, Serialize};

/// Status value the authority uses to signal approval.
pub const APPROVED_STATUS: &str = "OK";

/// One authorization question: "may this subject perform this command?".
///
/// Constructed per inbound request and consumed by a single authority
/// call; nothing retains it afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationQuery {
    /// Identity of the caller on whose behalf the request is made.
    #[serde(rename = "userId")]
    pub subject_id: String,
    /// The action being requested, e.g. `"GET /vault"`.
    #[serde(rename = "cmd")]
    pub command: String,
}

/// The authority's answer, parsed from its JSON response body.
///
/// Both fields default to the empty string so a response that omits them
/// deserializes cleanly — and can never read as approval, since the empty
/// string is not [`APPROVED_STATUS`].
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationDecision {
    #[serde(default)]
    pub status: String,
    /// Opaque credential for the backend. Meaningless to the gateway;
    /// forwarded only on approval.
    #[serde(default)]
    pub token: String,
}

impl AuthorizationDecision {
    /// Whether this decision grants access. Exact match on
    /// [`APPROVED_STATUS`]; anything else is denial.
    pub fn is_approved(&self) -> bool {
        self.status == APPROVED_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_serializes_to_authority_field_names() {
        let query = AuthorizationQuery {
            subject_id: "user-123".to_string(),
            command: "GET /vault".to_string(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["userId"], "user-123");
        assert_eq!(json["cmd"], "GET /vault");
    }

    #[test]
    fn approved_decision_parses() {
        let decision: AuthorizationDecision =
            serde_json::from_str(r#"{"status":"OK","token":"abc123"}"#).unwrap();
        assert!(decision.is_approved());
        assert_eq!(decision.token, "abc123");
    }

    #[test]
    fn non_ok_status_is_denial() {
        let decision: AuthorizationDecision =
            serde_json::from_str(r#"{"status":"DENIED","token":""}"#).unwrap();
        assert!(!decision.is_approved());
    }

    #[test]
    fn lowercase_ok_is_denial() {
        let decision: AuthorizationDecision =
            serde_json::from_str(r#"{"status":"ok","token":"abc123"}"#).unwrap();
        assert!(!decision.is_approved());
    }

    #[test]
    fn missing_fields_default_empty_and_deny() {
        let decision: AuthorizationDecision = serde_json::from_str("{}").unwrap();
        assert!(!decision.is_approved());
        assert!(decision.token.is_empty());
    }
}
