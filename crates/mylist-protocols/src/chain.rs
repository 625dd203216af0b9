//! Chain continuation wire format.
//!
//! The same payload shape is accepted at the boundary and produced for the
//! next invocation, so a chain can be driven by the service calling itself.

use serde::{Deserialize, Serialize};

/// Action name used for chain requests.
pub const CHAIN_ACTION: &str = "chain_register";

/// A chain registration request.
///
/// The password always travels encrypted; every invocation decrypts its own
/// copy right before it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuationRequest {
    #[serde(default = "default_action")]
    pub action: String,

    pub email: String,

    /// Encrypted password payload.
    #[serde(rename = "password")]
    pub encrypted_password: String,

    /// Full identifier list (first and setup requests).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_list: Vec<String>,

    /// Identifiers still to register (batch continuations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_ids: Option<Vec<String>>,

    /// Identifiers that failed in earlier steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_ids: Vec<String>,

    /// Opaque push subscription, forwarded to the notifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default = "default_true")]
    pub is_first_request: bool,

    #[serde(default)]
    pub is_delete_and_create_request: bool,
}

fn default_action() -> String {
    CHAIN_ACTION.to_string()
}

fn default_true() -> bool {
    true
}

impl ContinuationRequest {
    /// A fresh chain request for a full identifier list.
    pub fn first(
        email: impl Into<String>,
        encrypted_password: impl Into<String>,
        id_list: Vec<String>,
    ) -> Self {
        Self {
            action: default_action(),
            email: email.into(),
            encrypted_password: encrypted_password.into(),
            id_list,
            remaining_ids: None,
            failed_ids: Vec::new(),
            subscription: None,
            title: String::new(),
            is_first_request: true,
            is_delete_and_create_request: false,
        }
    }

    pub fn with_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.subscription = Some(subscription.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The setup request that follows a first request.
    pub fn setup_step(&self) -> Self {
        Self {
            action: default_action(),
            email: self.email.clone(),
            encrypted_password: self.encrypted_password.clone(),
            id_list: self.id_list.clone(),
            remaining_ids: None,
            failed_ids: Vec::new(),
            subscription: self.subscription.clone(),
            title: self.title.clone(),
            is_first_request: false,
            is_delete_and_create_request: true,
        }
    }

    /// A batch continuation carrying the chain state forward.
    pub fn batch_step(&self, title: &str, remaining: Vec<String>, failed: Vec<String>) -> Self {
        Self {
            action: default_action(),
            email: self.email.clone(),
            encrypted_password: self.encrypted_password.clone(),
            id_list: Vec::new(),
            remaining_ids: Some(remaining),
            failed_ids: failed,
            subscription: self.subscription.clone(),
            title: title.to_string(),
            is_first_request: false,
            is_delete_and_create_request: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_request_defaults() {
        let req = ContinuationRequest::first("a@example.com", "cipher", ids(&["sm1"]));
        assert!(req.is_first_request);
        assert!(!req.is_delete_and_create_request);
        assert_eq!(req.action, CHAIN_ACTION);
    }

    #[test]
    fn test_setup_step_keeps_full_list() {
        let req = ContinuationRequest::first("a@example.com", "cipher", ids(&["sm1", "sm2"]))
            .with_subscription("{}")
            .with_title("Mine");
        let setup = req.setup_step();
        assert!(!setup.is_first_request);
        assert!(setup.is_delete_and_create_request);
        assert_eq!(setup.id_list, ids(&["sm1", "sm2"]));
        assert_eq!(setup.encrypted_password, "cipher");
        assert_eq!(setup.subscription.as_deref(), Some("{}"));
        assert_eq!(setup.title, "Mine");
    }

    #[test]
    fn test_batch_step_wire_shape() {
        let req = ContinuationRequest::first("a@example.com", "cipher", ids(&["sm1", "sm2"]));
        let next = req.batch_step("MyList_1", ids(&["sm2"]), ids(&["sm1"]));
        let json = serde_json::to_value(&next).unwrap();

        assert_eq!(json["action"], "chain_register");
        assert_eq!(json["password"], "cipher");
        assert_eq!(json["remaining_ids"], serde_json::json!(["sm2"]));
        assert_eq!(json["failed_ids"], serde_json::json!(["sm1"]));
        assert_eq!(json["is_first_request"], false);
        assert!(json.get("id_list").is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"email": "a@example.com", "password": "x", "id_list": ["sm9"]}"#;
        let req: ContinuationRequest = serde_json::from_str(json).unwrap();
        assert!(req.is_first_request);
        assert_eq!(req.id_list, ids(&["sm9"]));
        assert!(req.remaining_ids.is_none());
        assert!(req.title.is_empty());
    }
}
