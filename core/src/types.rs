//! Domain DTOs for the pet-store `user` resource.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Every field of `User` is optional on the wire; absent fields are left out
//! of the serialized JSON instead of being sent as `null`.

use serde::{Deserialize, Serialize};

/// A pet-store user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// User status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<i32>,
}

impl User {
    /// A user with only `username` set.
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_uses_camel_case_keys() {
        let user = User {
            first_name: Some("Ada".to_string()),
            user_status: Some(1),
            ..User::named("ada")
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "ada");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["userStatus"], 1);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let json = serde_json::to_value(User::named("bob")).unwrap();
        assert_eq!(json, serde_json::json!({ "username": "bob" }));
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let user: User = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(user.id, Some(7));
        assert!(user.username.is_none());
        assert!(user.phone.is_none());
    }
}
