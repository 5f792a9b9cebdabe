//! Profile storage: sign-up, self-service edits and user administration.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;
use tracing::{info, warn};

use crate::actor::{ActorContext, Role};
use crate::core::ProfileStorage;
use crate::error::{ResourceError, StorageError, StorageResult, ValidationError};
use crate::types::{
    ActivityAction, NewActivity, NewProfile, Page, Pagination, Profile, ProfileUpdate, TargetType,
};

use super::SqliteBackend;
use super::activity::log_activity;
use super::backend::internal_error;
use super::query_builder::{SqlFragment, SqlParam, contains, query_all, query_count};
use super::rows::{PROFILE_COLUMNS, format_timestamp, now, profile_from_row};

fn fetch_profile(conn: &Connection, id: &str) -> StorageResult<Option<Profile>> {
    conn.query_row(
        &format!("SELECT {} FROM profiles WHERE id = ?1", PROFILE_COLUMNS),
        params![id],
        profile_from_row,
    )
    .optional()
    .map_err(|e| internal_error(format!("Failed to read profile: {}", e)))
}

fn require_profile(conn: &Connection, id: &str) -> StorageResult<Profile> {
    fetch_profile(conn, id)?.ok_or_else(|| StorageError::not_found("profile", id))
}

/// Merges an update into a stored profile. Blank values clear a field.
fn apply_update(profile: &Profile, update: &ProfileUpdate) -> Profile {
    let merge = |new: &Option<String>, old: &Option<String>| match new {
        Some(v) if v.trim().is_empty() => None,
        Some(v) => Some(v.trim().to_string()),
        None => old.clone(),
    };
    Profile {
        username: merge(&update.username, &profile.username),
        display_name: merge(&update.display_name, &profile.display_name),
        phone: merge(&update.phone, &profile.phone),
        team_name: merge(&update.team_name, &profile.team_name),
        ..profile.clone()
    }
}

fn write_profile_fields(conn: &Connection, profile: &Profile) -> StorageResult<()> {
    conn.execute(
        "UPDATE profiles SET username = ?2, display_name = ?3, phone = ?4, team_name = ?5 \
         WHERE id = ?1",
        params![
            profile.id,
            profile.username,
            profile.display_name,
            profile.phone,
            profile.team_name
        ],
    )
    .map_err(|e| internal_error(format!("Failed to update profile: {}", e)))?;
    Ok(())
}

fn refuse(actor: &ActorContext, target: &str, message: &str) -> StorageError {
    warn!(
        user_id = %actor.user_id(),
        target = %target,
        reason = %message,
        "Refused profile change"
    );
    StorageError::forbidden(message)
}

#[async_trait]
impl ProfileStorage for SqliteBackend {
    async fn register(&self, input: NewProfile) -> StorageResult<Profile> {
        let input = input.normalize()?;

        let profile = self.with_transaction(|tx| {
            let email_taken = query_count(
                tx,
                "SELECT COUNT(*) FROM profiles WHERE email = ?",
                &[SqlParam::string(&input.email)],
            )? > 0;
            if email_taken {
                return Err(ResourceError::AlreadyExists {
                    kind: "profile".to_string(),
                    value: input.email.clone(),
                }
                .into());
            }

            let id = input
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            if fetch_profile(tx, &id)?.is_some() {
                return Err(ResourceError::AlreadyExists {
                    kind: "profile".to_string(),
                    value: id,
                }
                .into());
            }

            let first = query_count(tx, "SELECT COUNT(*) FROM profiles", &[])? == 0;
            let (role, approved) = if first {
                (Role::Operator, true)
            } else {
                (Role::Field, false)
            };

            tx.execute(
                "INSERT INTO profiles (id, email, username, display_name, phone, team_name, role, \
                 is_approved, allowed_groups, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, '[]', ?9)",
                params![
                    id,
                    input.email,
                    input.username,
                    input.display_name,
                    input.phone,
                    input.team_name,
                    role,
                    approved,
                    format_timestamp(&now()),
                ],
            )
            .map_err(|e| internal_error(format!("Failed to insert profile: {}", e)))?;

            let profile = require_profile(tx, &id)?;
            log_activity(
                tx,
                &ActorContext::from_profile(&profile),
                NewActivity::new(ActivityAction::Signup, TargetType::Auth, &id)
                    .with_details(json!({ "email": profile.email, "role": profile.role })),
            )?;
            Ok(profile)
        })?;

        info!(
            profile_id = %profile.id,
            role = %profile.role,
            approved = profile.is_approved,
            "Registered profile"
        );
        Ok(profile)
    }

    async fn find_profile(&self, id: &str) -> StorageResult<Option<Profile>> {
        let conn = self.get_connection()?;
        fetch_profile(&conn, id)
    }

    async fn get_profile(&self, actor: &ActorContext, id: &str) -> StorageResult<Profile> {
        if actor.user_id() != id {
            actor.require_administrator()?;
        }
        let conn = self.get_connection()?;
        require_profile(&conn, id)
    }

    async fn update_own_profile(
        &self,
        actor: &ActorContext,
        update: ProfileUpdate,
    ) -> StorageResult<Profile> {
        actor.require_approved()?;

        self.with_transaction(|tx| {
            let existing = require_profile(tx, actor.user_id())?;
            let updated = apply_update(&existing, &update);
            write_profile_fields(tx, &updated)?;
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::UpdateProfile, TargetType::Profile, &updated.id)
                    .with_details(json!({ "name": updated.name(), "self": true })),
            )?;
            Ok(updated)
        })
    }

    async fn list_profiles(
        &self,
        actor: &ActorContext,
        search: Option<&str>,
        pagination: Pagination,
    ) -> StorageResult<Page<Profile>> {
        actor.require_administrator()?;
        let conn = self.get_connection()?;

        let mut condition = SqlFragment::default();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            condition = ["display_name", "username", "email", "role"]
                .iter()
                .fold(SqlFragment::default(), |acc, column| {
                    acc.or(contains(column, term))
                });
            if let Ok(role) = Role::parse(term) {
                condition = condition.or(SqlFragment::with_params(
                    "role = ?",
                    vec![SqlParam::string(role.as_str())],
                ));
            }
        }

        let total = query_count(
            &conn,
            &format!("SELECT COUNT(*) FROM profiles{}", condition.where_clause()),
            &condition.params,
        )?;

        let mut params = condition.params.clone();
        params.push(SqlParam::integer(pagination.limit()));
        params.push(SqlParam::integer(pagination.sql_offset()));
        let items = query_all(
            &conn,
            &format!(
                "SELECT {} FROM profiles{} ORDER BY \
                 CASE role WHEN 'operator' THEN 0 WHEN 'admin' THEN 1 ELSE 2 END, \
                 created_at DESC, rowid DESC LIMIT ? OFFSET ?",
                PROFILE_COLUMNS,
                condition.where_clause()
            ),
            &params,
            profile_from_row,
        )?;

        Ok(Page::new(items, total, pagination))
    }

    async fn update_profile(
        &self,
        actor: &ActorContext,
        id: &str,
        update: ProfileUpdate,
    ) -> StorageResult<Profile> {
        actor.require_administrator()?;

        self.with_transaction(|tx| {
            let existing = require_profile(tx, id)?;
            if existing.role == Role::Operator
                && actor.role() != Role::Operator
                && actor.user_id() != id
            {
                return Err(refuse(actor, id, "only an operator may edit an operator"));
            }
            let updated = apply_update(&existing, &update);
            write_profile_fields(tx, &updated)?;
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::UpdateProfile, TargetType::Profile, id)
                    .with_details(json!({ "name": updated.name() })),
            )?;
            Ok(updated)
        })
    }

    async fn change_role(
        &self,
        actor: &ActorContext,
        id: &str,
        role: Role,
    ) -> StorageResult<Profile> {
        actor.require_administrator()?;
        if actor.user_id() == id {
            return Err(refuse(actor, id, "you cannot change your own role"));
        }
        if role == Role::Operator && actor.role() != Role::Operator {
            return Err(refuse(actor, id, "only an operator may grant the operator role"));
        }

        let profile = self.with_transaction(|tx| {
            let existing = require_profile(tx, id)?;
            if existing.role == Role::Operator {
                return Err(refuse(actor, id, "an operator's role cannot be changed"));
            }

            tx.execute(
                "UPDATE profiles SET role = ?2 WHERE id = ?1",
                params![id, role],
            )
            .map_err(|e| internal_error(format!("Failed to change role: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::RoleChange, TargetType::Profile, id).with_details(
                    json!({
                        "name": existing.name(),
                        "old_role": existing.role,
                        "new_role": role,
                    }),
                ),
            )?;
            Ok(Profile { role, ..existing })
        })?;

        info!(profile_id = %id, role = %role, "Changed profile role");
        Ok(profile)
    }

    async fn approve_profile(&self, actor: &ActorContext, id: &str) -> StorageResult<Profile> {
        actor.require_administrator()?;

        let profile = self.with_transaction(|tx| {
            let existing = require_profile(tx, id)?;
            if existing.is_approved {
                return Ok(existing);
            }

            tx.execute(
                "UPDATE profiles SET is_approved = 1 WHERE id = ?1",
                params![id],
            )
            .map_err(|e| internal_error(format!("Failed to approve profile: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::ApproveUser, TargetType::Profile, id)
                    .with_details(json!({ "name": existing.name(), "email": existing.email })),
            )?;
            Ok(Profile {
                is_approved: true,
                ..existing
            })
        })?;

        info!(profile_id = %id, "Approved profile");
        Ok(profile)
    }

    async fn set_allowed_groups(
        &self,
        actor: &ActorContext,
        id: &str,
        groups: Vec<String>,
    ) -> StorageResult<Profile> {
        actor.require_administrator()?;

        let mut unique: Vec<String> = Vec::with_capacity(groups.len());
        for group in groups {
            let group = group.trim().to_string();
            if !group.is_empty() && !unique.contains(&group) {
                unique.push(group);
            }
        }

        self.with_transaction(|tx| {
            let existing = require_profile(tx, id)?;

            for group in &unique {
                let known = query_count(
                    tx,
                    "SELECT COUNT(*) FROM client_groups WHERE id = ?",
                    &[SqlParam::string(group)],
                )? > 0;
                if !known {
                    return Err(ValidationError::InvalidValue {
                        field: "allowed_groups".to_string(),
                        message: format!("unknown client group '{group}'"),
                    }
                    .into());
                }
            }

            tx.execute(
                "UPDATE profiles SET allowed_groups = ?2 WHERE id = ?1",
                params![id, serde_json::to_string(&unique)?],
            )
            .map_err(|e| internal_error(format!("Failed to update allowed groups: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::UpdatePermission, TargetType::Profile, id)
                    .with_details(json!({ "name": existing.name(), "allowed_groups": unique })),
            )?;
            Ok(Profile {
                allowed_groups: unique.clone(),
                ..existing
            })
        })
    }

    async fn delete_profile(&self, actor: &ActorContext, id: &str) -> StorageResult<()> {
        actor.require_administrator()?;
        if actor.user_id() == id {
            return Err(refuse(actor, id, "you cannot delete your own account"));
        }

        self.with_transaction(|tx| {
            let existing = require_profile(tx, id)?;
            if existing.role == Role::Operator {
                return Err(refuse(actor, id, "an operator cannot be deleted"));
            }

            tx.execute("DELETE FROM profiles WHERE id = ?1", params![id])
                .map_err(|e| internal_error(format!("Failed to delete profile: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::DeleteUser, TargetType::Profile, id)
                    .with_details(json!({ "name": existing.name(), "email": existing.email })),
            )
        })?;

        info!(profile_id = %id, "Deleted profile");
        Ok(())
    }
}
