//! Account and listing records as the backend serves them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an enum from user input fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed (e.g. "role", "gender").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Account role assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account; manages only its own listings.
    #[default]
    User,
    /// Administrator; manages all users and listings.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Roommate gender preference on a listing or profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male roommates only.
    Male,
    /// Female roommates only.
    Female,
    /// No preference.
    #[default]
    Any,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "any" => Ok(Self::Any),
            _ => Err(ParseEnumError {
                kind: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// An account record as the backend returns it.
///
/// `username` is the immutable primary handle; `id` is server-assigned and
/// may be empty on records seeded client-side before the first profile fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Primary handle; never changes after registration.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
    /// Optional contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Preferred area to live in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    /// Monthly budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Roommate gender preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<Gender>,
}

/// A property listing.
///
/// `user_id` holds the owning user's username and never changes after the
/// listing is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Server-assigned identifier.
    pub id: String,
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
    /// Username of the owning account.
    pub user_id: String,
}
