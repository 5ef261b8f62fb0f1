//! Accounts and authentication payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{string_or_number, EntityId};

/// A registry account as returned by the backend.
///
/// The password is never part of this record; it only travels in
/// [`RegisterRequest`] and [`LoginRequest`]. Fields the client does not model
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to show, preferring `full_name`.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("anonymous")
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("admin"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Body returned by the auth endpoints.
///
/// Known fields are typed; everything else is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_has_no_extra_fields() {
        let req = LoginRequest {
            email: "demo@enugu.gov.ng".into(),
            password: "demo123".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"email": "demo@enugu.gov.ng", "password": "demo123"}));
    }

    #[test]
    fn test_user_accepts_camel_case_and_numeric_phone() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "fullName": "Ada Obi", "email": "ada@example.com", "phone": 2348012345678, "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "Ada Obi");
        assert_eq!(user.phone.as_deref(), Some("2348012345678"));
        assert!(user.is_admin());
        assert!(user.extra.is_empty());
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let body = serde_json::json!({
            "id": 1,
            "full_name": "Demo User",
            "email": "demo@enugu.gov.ng",
            "verified": true,
            "lga": "Enugu North"
        });
        let user: User = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(user.extra.get("verified"), Some(&Value::Bool(true)));
        assert_eq!(serde_json::to_value(&user).unwrap(), body);
    }

    #[test]
    fn test_auth_response_keeps_unknown_fields() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"token": "abc", "expires_in": 3600}"#).unwrap();
        assert_eq!(resp.token.as_deref(), Some("abc"));
        assert_eq!(resp.extra.get("expires_in"), Some(&Value::from(3600)));
    }
}
