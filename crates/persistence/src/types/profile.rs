//! User profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::non_blank;
use crate::actor::Role;
use crate::error::ValidationError;

/// A back-office user (사용자).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub team_name: Option<String>,
    pub role: Role,
    pub is_approved: bool,
    /// Client group ids this profile may see. Empty means every group.
    pub allowed_groups: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Best available human-readable name: display name, username, then email.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.email)
    }
}

/// Sign-up input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProfile {
    /// Identifier issued by the upstream auth provider. Generated when absent.
    pub id: Option<String>,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub team_name: Option<String>,
}

impl NewProfile {
    /// Creates sign-up input for an email address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the upstream identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Trims fields, lowercases the email and checks its shape.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "email".to_string(),
            });
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidValue {
                field: "email".to_string(),
                message: format!("'{email}' is not an email address"),
            });
        }
        Ok(Self {
            id: non_blank(self.id),
            email,
            username: non_blank(self.username),
            display_name: non_blank(self.display_name),
            phone: non_blank(self.phone),
            team_name: non_blank(self.team_name),
        })
    }
}

/// Editable profile fields. Absent fields are left unchanged; blank fields
/// are cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub team_name: Option<String>,
}

impl ProfileUpdate {
    /// Returns `true` when no field is present.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.display_name.is_none()
            && self.phone.is_none()
            && self.team_name.is_none()
    }
}
