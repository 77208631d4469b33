use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authenticated user as reported by the session provider.
///
/// The provider owns the record; anything holding a `User` holds a copy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Free-form profile data kept by the auth service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<Value>,
}

impl User {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        User {
            id: id.into(),
            email,
            created_at: None,
            user_metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ignores_unknown_service_fields() {
        let body = r#"{
            "id": "8d0fd2b3-9ca7-4c5c-a1d4-1f0d5a9a3f1e",
            "aud": "authenticated",
            "role": "authenticated",
            "email": "writer@example.com",
            "created_at": "2024-05-01T10:00:00Z",
            "user_metadata": {"display_name": "Writer"},
            "identities": []
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, "8d0fd2b3-9ca7-4c5c-a1d4-1f0d5a9a3f1e");
        assert_eq!(user.email.as_deref(), Some("writer@example.com"));
        assert_eq!(
            user.user_metadata.unwrap()["display_name"],
            Value::from("Writer")
        );
    }

    #[test]
    fn test_user_without_email() {
        let user: User = serde_json::from_str(r#"{"id": "abc", "email": null}"#).unwrap();
        assert_eq!(user, User::new("abc", None));
    }
}
