use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A stored user. Serialises with the same attribute names in DynamoDB and in
/// HTTP responses.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub email: String,
    // Always serialised, stored as NULL when absent
    #[serde(default)]
    pub age: Option<Number>,
    // Empty on an item recreated by an update after a concurrent delete
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Attribute assignments written by an update. Every mutable field is set;
/// `user_id` and `created_at` are never touched.
#[derive(Clone, Debug, PartialEq)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub age: Option<Number>,
    pub updated_at: String,
}

/// Opaque continuation token: the last evaluated key of a scan, in plain JSON form.
pub type ScanCursor = HashMap<String, Value>;

/// One page of a table scan.
#[derive(Clone, Debug, Default)]
pub struct ScanPage {
    pub items: Vec<UserRecord>,
    pub scanned_count: usize,
    pub next_cursor: Option<ScanCursor>,
}

// Response DTOs for general use across services
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g. `2024-05-01T12:00:00.123Z`.
///
/// The fixed width keeps lexical and chronological order identical.
pub fn now_str() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_serializes_null_age() {
        let user = UserRecord {
            user_id: "u1".into(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            age: None,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "u1",
                "name": "Ann",
                "email": "a@x.com",
                "age": null,
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn test_now_str_format() {
        let now = now_str();
        assert_eq!(now.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
