//! Notice board storage.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;
use tracing::info;

use crate::actor::ActorContext;
use crate::core::NoticeStorage;
use crate::error::{StorageError, StorageResult};
use crate::types::{
    ActivityAction, NewActivity, Notice, NoticeInput, Page, Pagination, TargetType,
};

use super::SqliteBackend;
use super::activity::log_activity;
use super::backend::internal_error;
use super::query_builder::{SqlFragment, SqlParam, query_all, query_count};
use super::rows::{NOTICE_SELECT, format_timestamp, notice_from_row, now};

fn fetch_notice(conn: &Connection, id: &str) -> StorageResult<Option<Notice>> {
    conn.query_row(
        &format!("{} WHERE n.id = ?1", NOTICE_SELECT),
        params![id],
        notice_from_row,
    )
    .optional()
    .map_err(|e| internal_error(format!("Failed to read notice: {}", e)))
}

/// Restricts notices to those whose audience includes the actor's role.
fn audience(actor: &ActorContext) -> SqlFragment {
    if actor.is_administrator() {
        SqlFragment::default()
    } else {
        SqlFragment::with_params(
            "EXISTS (SELECT 1 FROM json_each(n.allowed_roles) WHERE json_each.value = ?)",
            vec![SqlParam::string(actor.role().as_str())],
        )
    }
}

#[async_trait]
impl NoticeStorage for SqliteBackend {
    async fn list_notices(
        &self,
        actor: &ActorContext,
        pagination: Pagination,
    ) -> StorageResult<Page<Notice>> {
        actor.require_approved()?;
        let conn = self.get_connection()?;
        let condition = audience(actor);

        let total = query_count(
            &conn,
            &format!("SELECT COUNT(*) FROM notices n{}", condition.where_clause()),
            &condition.params,
        )?;

        let mut params = condition.params.clone();
        params.push(SqlParam::integer(pagination.limit()));
        params.push(SqlParam::integer(pagination.sql_offset()));
        let items = query_all(
            &conn,
            &format!(
                "{}{} ORDER BY n.is_pinned DESC, n.created_at DESC, n.rowid DESC LIMIT ? OFFSET ?",
                NOTICE_SELECT,
                condition.where_clause()
            ),
            &params,
            notice_from_row,
        )?;

        Ok(Page::new(items, total, pagination))
    }

    async fn get_notice(&self, actor: &ActorContext, id: &str) -> StorageResult<Notice> {
        actor.require_approved()?;
        let conn = self.get_connection()?;
        match fetch_notice(&conn, id)? {
            Some(notice) if notice.is_visible_to(actor.role()) => Ok(notice),
            _ => Err(StorageError::not_found("notice", id)),
        }
    }

    async fn create_notice(
        &self,
        actor: &ActorContext,
        input: NoticeInput,
    ) -> StorageResult<Notice> {
        actor.require_administrator()?;
        let input = input.normalize()?;

        let notice = self.with_transaction(|tx| {
            let id = uuid::Uuid::new_v4().to_string();
            let timestamp = format_timestamp(&now());
            tx.execute(
                "INSERT INTO notices (id, title, content, allowed_roles, author_id, is_pinned, \
                 created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    id,
                    input.title,
                    input.content,
                    serde_json::to_string(&input.allowed_roles)?,
                    actor.user_id(),
                    input.is_pinned,
                    timestamp,
                ],
            )
            .map_err(|e| internal_error(format!("Failed to insert notice: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::CreateNotice, TargetType::Notice, &id)
                    .with_details(json!({ "title": input.title })),
            )?;

            fetch_notice(tx, &id)?.ok_or_else(|| StorageError::not_found("notice", &id))
        })?;

        info!(notice_id = %notice.id, "Posted notice");
        Ok(notice)
    }

    async fn update_notice(
        &self,
        actor: &ActorContext,
        id: &str,
        input: NoticeInput,
    ) -> StorageResult<Notice> {
        actor.require_administrator()?;
        let input = input.normalize()?;

        self.with_transaction(|tx| {
            if fetch_notice(tx, id)?.is_none() {
                return Err(StorageError::not_found("notice", id));
            }

            tx.execute(
                "UPDATE notices SET title = ?2, content = ?3, allowed_roles = ?4, is_pinned = ?5, \
                 updated_at = ?6 WHERE id = ?1",
                params![
                    id,
                    input.title,
                    input.content,
                    serde_json::to_string(&input.allowed_roles)?,
                    input.is_pinned,
                    format_timestamp(&now()),
                ],
            )
            .map_err(|e| internal_error(format!("Failed to update notice: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::UpdateNotice, TargetType::Notice, id)
                    .with_details(json!({ "title": input.title })),
            )?;

            fetch_notice(tx, id)?.ok_or_else(|| StorageError::not_found("notice", id))
        })
    }

    async fn delete_notice(&self, actor: &ActorContext, id: &str) -> StorageResult<()> {
        actor.require_administrator()?;

        self.with_transaction(|tx| {
            let existing =
                fetch_notice(tx, id)?.ok_or_else(|| StorageError::not_found("notice", id))?;

            tx.execute("DELETE FROM notices WHERE id = ?1", params![id])
                .map_err(|e| internal_error(format!("Failed to delete notice: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::DeleteNotice, TargetType::Notice, id)
                    .with_details(json!({ "title": existing.title })),
            )
        })?;

        info!(notice_id = %id, "Deleted notice");
        Ok(())
    }
}
