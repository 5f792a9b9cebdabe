//! Actor context for storage operations.
//!
//! This module defines [`ActorContext`], the signed-in profile on whose behalf
//! a storage operation runs. Every operation takes one; it decides what the
//! caller may see and change, and it is what the activity log records.

use std::sync::Arc;

use super::role::Role;
use crate::error::PermissionError;
use crate::types::Profile;

/// The profile performing a storage operation.
///
/// Built from a stored [`Profile`] once per request. Cloning is cheap.
///
/// # Examples
///
/// ```
/// use fixlog_persistence::actor::{ActorContext, Role};
///
/// let ctx = ActorContext::new("u-1", "kim@fixlog.kr", Role::Admin, true);
/// assert!(ctx.is_administrator());
/// assert!(ctx.require_administrator().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ActorContext {
    user_id: String,
    email: String,
    display_name: Option<String>,
    role: Role,
    is_approved: bool,
    allowed_groups: Arc<Vec<String>>,
}

impl ActorContext {
    /// Creates a context with no display name and no group restriction.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        is_approved: bool,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            display_name: None,
            role,
            is_approved,
            allowed_groups: Arc::new(Vec::new()),
        }
    }

    /// Creates a context for a stored profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_id: profile.id.clone(),
            email: profile.email.clone(),
            display_name: Some(profile.name().to_string()),
            role: profile.role,
            is_approved: profile.is_approved,
            allowed_groups: Arc::new(profile.allowed_groups.clone()),
        }
    }

    /// Sets the display name recorded in the activity log.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Restricts the visible client groups.
    pub fn with_allowed_groups(mut self, groups: Vec<String>) -> Self {
        self.allowed_groups = Arc::new(groups);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_approved(&self) -> bool {
        self.is_approved
    }

    /// Returns `true` for operators and admins.
    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }

    /// Fails unless the profile has been approved.
    pub fn require_approved(&self) -> Result<(), PermissionError> {
        if self.is_approved {
            Ok(())
        } else {
            Err(PermissionError::NotApproved {
                user_id: self.user_id.clone(),
            })
        }
    }

    /// Fails unless the profile is an approved administrator.
    pub fn require_administrator(&self) -> Result<(), PermissionError> {
        self.require_approved()?;
        if self.is_administrator() {
            Ok(())
        } else {
            Err(PermissionError::AdministratorRequired {
                user_id: self.user_id.clone(),
            })
        }
    }

    /// Client groups this actor is limited to.
    ///
    /// `None` means unrestricted: administrators, and anyone whose allowed
    /// group list is empty.
    pub fn group_scope(&self) -> Option<&[String]> {
        if self.is_administrator() || self.allowed_groups.is_empty() {
            None
        } else {
            Some(self.allowed_groups.as_slice())
        }
    }

    /// Returns `true` if a client in `group_id` is visible to this actor.
    ///
    /// Ungrouped clients are hidden from group-restricted actors.
    pub fn can_see_group(&self, group_id: Option<&str>) -> bool {
        match (self.group_scope(), group_id) {
            (None, _) => true,
            (Some(scope), Some(group)) => scope.iter().any(|g| g == group),
            (Some(_), None) => false,
        }
    }
}
