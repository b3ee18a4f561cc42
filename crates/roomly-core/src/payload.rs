//! Request payloads for account and listing mutations.

use serde::Serialize;

use crate::types::Gender;

/// New-account payload for the registration endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Desired handle; must be unique server-side.
    pub username: String,
    /// Contact email; must be unique server-side.
    pub email: String,
    /// Plaintext password; hashed by the backend.
    pub password: String,
    /// Optional contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Preferred area to live in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    /// Monthly budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Roommate gender preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<Gender>,
}

/// Sparse profile update; only populated fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// New preferred area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    /// New monthly budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// New roommate gender preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<Gender>,
}

/// Payload for creating a listing. The backend assigns `id` and stamps the
/// owner from the session credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    /// Short headline.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Neighborhood or address text.
    pub location: String,
    /// Monthly rent.
    pub budget: f64,
    /// Roommate gender preference for this listing.
    pub preferred_gender: Gender,
}

/// Sparse listing update; only populated fields are sent. The owner
/// (`userId`) is not part of the payload and cannot be changed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    /// New headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New location text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New monthly rent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// New roommate gender preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<Gender>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_omits_absent_fields() {
        let payload = Registration {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
            phone_number: None,
            preferred_location: None,
            budget: None,
            preferred_gender: None,
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"username\""));
        assert!(!json.contains("phoneNumber"));
        assert!(!json.contains("budget"));
    }

    #[test]
    fn profile_update_sends_only_populated_fields() {
        let payload = ProfileUpdate {
            budget: Some(650.0),
            ..ProfileUpdate::default()
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, "{\"budget\":650.0}");
    }

    #[test]
    fn property_update_keys_are_camel_case() {
        let payload = PropertyUpdate {
            preferred_gender: Some(Gender::Male),
            ..PropertyUpdate::default()
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, "{\"preferredGender\":\"male\"}");
    }
}
