use serde::Deserialize;
use serde_json::Number;
use std::fmt;

// Request DTOs
//
// Required fields are still `Option` so that a missing field is reported as a
// validation failure instead of a deserialisation failure.
#[derive(Deserialize, Debug, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<Number>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub age: NullableField<Number>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ListUsersQuery {
    pub limit: Option<String>,
    #[serde(rename = "lastKey")]
    pub last_key: Option<String>,
}

// Helper for null vs. not-present in JSON
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum NullableField<T> {
    Null,
    Value(T),
    #[serde(skip_deserializing)]
    NotPresent,
}

impl<T> Default for NullableField<T> {
    fn default() -> Self {
        NullableField::NotPresent
    }
}

impl<T> NullableField<T> {
    /// Resolves the field against the currently stored value: absent keeps it,
    /// `null` clears it, anything else replaces it.
    pub fn merge(self, current: Option<T>) -> Option<T> {
        match self {
            NullableField::NotPresent => current,
            NullableField::Null => None,
            NullableField::Value(v) => Some(v),
        }
    }

    pub fn was_present(&self) -> bool {
        !matches!(self, NullableField::NotPresent)
    }
}

impl<T: fmt::Debug> fmt::Display for NullableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NullableField::Null => write!(f, "null"),
            NullableField::Value(v) => write!(f, "{:?}", v),
            NullableField::NotPresent => write!(f, "[not present]"),
        }
    }
}
