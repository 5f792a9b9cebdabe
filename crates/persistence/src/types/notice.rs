//! Notice board types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::Role;
use crate::error::ValidationError;

/// A notice (공지사항).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Roles that can see this notice. Administrators always can.
    pub allowed_roles: Vec<Role>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notice {
    /// Returns `true` if a profile with `role` can see this notice.
    pub fn is_visible_to(&self, role: Role) -> bool {
        role.is_administrator() || self.allowed_roles.contains(&role)
    }
}

/// Fields accepted when creating or updating a notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeInput {
    pub title: String,
    pub content: String,
    pub allowed_roles: Vec<Role>,
    pub is_pinned: bool,
}

impl Default for NoticeInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            allowed_roles: Role::ALL.to_vec(),
            is_pinned: false,
        }
    }
}

impl NoticeInput {
    /// Creates a notice visible to every role.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Restricts the audience.
    pub fn for_roles(mut self, roles: Vec<Role>) -> Self {
        self.allowed_roles = roles;
        self
    }

    /// Pins the notice.
    pub fn pinned(mut self) -> Self {
        self.is_pinned = true;
        self
    }

    /// Validates the input and normalizes the audience.
    ///
    /// The audience must name at least one role. An audience that includes
    /// `operator` is widened to every role; duplicates are dropped.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "title".to_string(),
            });
        }
        if self.allowed_roles.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "allowed_roles".to_string(),
                message: "at least one role must be selected".to_string(),
            });
        }
        let allowed_roles = if self.allowed_roles.contains(&Role::Operator) {
            Role::ALL.to_vec()
        } else {
            let mut roles = Vec::with_capacity(self.allowed_roles.len());
            for role in self.allowed_roles {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
            roles
        };
        Ok(Self {
            title,
            content: self.content,
            allowed_roles,
            is_pinned: self.is_pinned,
        })
    }
}
