// ABOUTME: Request and response bodies for the portal HTTP contract

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST REGISTRATION.SUBMIT`
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub first_name: String,
    pub last_name: String,
    pub year: String,
    pub nationality: String,
    pub city: String,
    pub school: String,
    pub session: String,
    pub is_retaker: bool,
    pub email: String,
    pub contact_number: String,
    pub parent_number: String,
    pub tech_knowledge: i64,
    pub other_subjects: String,
    pub password: String,
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("email", &self.email)
            .field("year", &self.year)
            .field("session", &self.session)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Body of `POST AUTH.LOGIN`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: SessionUser,
}

/// The signed-in user as returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

fn default_dashboard_url() -> String {
    "/dashboard".to_string()
}

impl SessionUser {
    /// Name to greet the user with
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.email.clone().unwrap_or_else(|| "Portal user".to_string()),
        }
    }
}

/// Body of `POST ATTENDANCE.CHECK_IN`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInRequest {
    pub token: String,
}

/// Success body carrying an optional message (check-in, upload)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_payload_wire_names() {
        let payload = RegistrationPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            year: "2025".to_string(),
            nationality: "British".to_string(),
            city: "London".to_string(),
            school: "Analytical Academy".to_string(),
            session: "May/June".to_string(),
            is_retaker: false,
            email: "ada@example.com".to_string(),
            contact_number: "0123".to_string(),
            parent_number: "0456".to_string(),
            tech_knowledge: 3,
            other_subjects: String::new(),
            password: "secret1".to_string(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["parentNumber"], "0456");
        assert_eq!(json["isRetaker"], false);
        assert_eq!(json["techKnowledge"], 3);
        assert!(json.get("confirmPassword").is_none());

        // Never leak the password through logs
        assert!(!format!("{payload:?}").contains("secret1"));
    }

    #[test]
    fn test_login_response_parsing() {
        let body = r#"{"data": {"token": "a.b.c", "user": {"email": "t@example.com", "role": "teacher", "dashboardUrl": "/teacher"}}}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.token, "a.b.c");
        assert_eq!(response.data.user.dashboard_url, "/teacher");
        assert_eq!(response.data.user.display_name(), "t@example.com");
    }
}
