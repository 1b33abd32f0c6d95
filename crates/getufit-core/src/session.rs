use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Result of a successful onboarding submission, persisted whole.
///
/// The coach service echoes the submitted profile back alongside derived
/// identifiers. Only `user_data.user_id` is read by this client; everything
/// else is carried opaquely so a record written by one version of the
/// service round-trips unchanged through the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub user_data: UserData,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// The `user_data` object inside an onboarding response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserData {
    pub user_id: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl SessionRecord {
    /// Identifier every data-dependent request is keyed by
    pub fn user_id(&self) -> &str {
        &self.user_data.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = serde_json::json!({
            "message": "User onboarded successfully",
            "user_data": {
                "user_id": "u-42",
                "name": "Sam",
                "age": 29,
                "goal": "muscle gain"
            }
        });

        let record: SessionRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.user_id(), "u-42");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_missing_user_data_is_an_error() {
        let raw = serde_json::json!({ "message": "ok" });
        assert!(serde_json::from_value::<SessionRecord>(raw).is_err());
    }
}
