use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Proof of authenticated identity returned by the auth service.
///
/// Either fully present (logged in) or fully absent (logged out); the UI
/// layer never holds a partially authenticated state.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedSession {
    pub session_token: String,
    pub user: UserIdentity,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Profile attributes attached to a session.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    #[serde(default)]
    pub name: UserName,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneEntry>,
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

impl UserName {
    /// Non-empty name parts joined by `", "`, or `None` when every part is
    /// missing or empty.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.first, &self.middle, &self.last]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailEntry {
    pub id: String,
    #[serde(alias = "email")]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneEntry {
    pub id: String,
    #[serde(alias = "phone_number")]
    pub number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEntry {
    pub provider_type: String,
    pub provider_subject: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_non_empty_parts() {
        let name = UserName {
            first: Some("Ada".into()),
            middle: Some(String::new()),
            last: Some("Lovelace".into()),
        };
        assert_eq!(name.full_name().as_deref(), Some("Ada, Lovelace"));
    }

    #[test]
    fn full_name_absent_when_all_parts_empty() {
        assert!(UserName::default().full_name().is_none());
        let blank = UserName {
            first: Some(String::new()),
            middle: None,
            last: Some(String::new()),
        };
        assert!(blank.full_name().is_none());
    }

    #[test]
    fn session_deserializes_from_wire_shape() {
        let session: AuthenticatedSession = serde_json::from_str(
            r#"{
                "session_token": "tok-1",
                "user": {
                    "user_id": "user-1",
                    "name": {"first": "Ada"},
                    "emails": [{"id": "email-1", "email": "ada@example.com"}],
                    "phone_numbers": [{"id": "phone-1", "phone_number": "+14155550100"}],
                    "providers": [{"provider_type": "Google", "provider_subject": "sub-1"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(session.user.user_id, "user-1");
        assert_eq!(session.user.emails[0].address, "ada@example.com");
        assert_eq!(session.user.phone_numbers[0].number, "+14155550100");
    }
}
