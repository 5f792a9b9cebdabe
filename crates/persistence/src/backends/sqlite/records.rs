//! Service record storage.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;
use tracing::{debug, info};

use crate::actor::ActorContext;
use crate::core::RecordStorage;
use crate::error::{StorageError, StorageResult, ValidationError};
use crate::types::{
    ActivityAction, NewActivity, NewRecord, Page, Pagination, RecordStatus, RecordUpdate,
    ServiceRecord, TargetType,
};

use super::SqliteBackend;
use super::activity::log_activity;
use super::backend::internal_error;
use super::clients::visible_client;
use super::query_builder::{
    SqlFragment, SqlParam, filter_fragment, group_scope, query_all, query_count,
};
use super::rows::{RECORD_COLUMNS, RECORD_FROM, format_timestamp, now, record_from_row};

fn fetch_record(conn: &Connection, id: &str) -> StorageResult<Option<ServiceRecord>> {
    conn.query_row(
        &format!("{} {} WHERE r.id = ?1", RECORD_COLUMNS, RECORD_FROM),
        params![id],
        record_from_row,
    )
    .optional()
    .map_err(|e| internal_error(format!("Failed to read service record: {}", e)))
}

/// Reads a record whose client the actor is allowed to see.
fn visible_record(
    conn: &Connection,
    actor: &ActorContext,
    id: &str,
) -> StorageResult<ServiceRecord> {
    let record = fetch_record(conn, id)?.ok_or_else(|| StorageError::not_found("record", id))?;
    if actor.group_scope().is_some() {
        visible_client(conn, actor, &record.client_id)
            .map_err(|_| StorageError::not_found("record", id))?;
    }
    Ok(record)
}

fn profile_exists(conn: &Connection, id: &str) -> StorageResult<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM profiles WHERE id = ?1", params![id], |_| Ok(()))
        .optional()
        .map_err(|e| internal_error(format!("Failed to read profile: {}", e)))?
        .is_some())
}

fn record_details(record: &ServiceRecord) -> serde_json::Value {
    json!({
        "client_name": record.client_name,
        "type": record.record_type,
    })
}

#[async_trait]
impl RecordStorage for SqliteBackend {
    async fn list_records(
        &self,
        actor: &ActorContext,
        query: &str,
        status: Option<RecordStatus>,
        pagination: Pagination,
    ) -> StorageResult<Page<ServiceRecord>> {
        actor.require_approved()?;
        let conn = self.get_connection()?;

        let filter = self.record_search().filter(query);
        debug!(
            query = %query,
            status = ?status,
            predicates = filter.predicates.len(),
            general = ?filter.general,
            "Searching service records"
        );

        let mut condition = filter_fragment(&filter);
        if let Some(status) = status {
            condition = condition.and(SqlFragment::with_params(
                "r.status = ?",
                vec![SqlParam::string(status.as_str())],
            ));
        }
        let condition = condition.and(group_scope(actor.group_scope()));

        let total = query_count(
            &conn,
            &format!("SELECT COUNT(*) {}{}", RECORD_FROM, condition.where_clause()),
            &condition.params,
        )?;

        let mut params = condition.params.clone();
        params.push(SqlParam::integer(pagination.limit()));
        params.push(SqlParam::integer(pagination.sql_offset()));
        let items = query_all(
            &conn,
            &format!(
                "{} {}{} ORDER BY r.reception_at DESC, r.rowid DESC LIMIT ? OFFSET ?",
                RECORD_COLUMNS,
                RECORD_FROM,
                condition.where_clause()
            ),
            &params,
            record_from_row,
        )?;

        Ok(Page::new(items, total, pagination))
    }

    async fn get_record(&self, actor: &ActorContext, id: &str) -> StorageResult<ServiceRecord> {
        actor.require_approved()?;
        let conn = self.get_connection()?;
        visible_record(&conn, actor, id)
    }

    async fn create_record(
        &self,
        actor: &ActorContext,
        input: NewRecord,
    ) -> StorageResult<ServiceRecord> {
        actor.require_approved()?;
        let input = input.normalize()?;

        let record = self.with_transaction(|tx| {
            visible_client(tx, actor, &input.client_id).map_err(|e| {
                if e.is_not_found() {
                    ValidationError::InvalidValue {
                        field: "client_id".to_string(),
                        message: format!("unknown client '{}'", input.client_id),
                    }
                    .into()
                } else {
                    e
                }
            })?;

            let receiver_id = input
                .receiver_id
                .clone()
                .unwrap_or_else(|| actor.user_id().to_string());
            if !profile_exists(tx, &receiver_id)? {
                return Err(ValidationError::InvalidValue {
                    field: "receiver_id".to_string(),
                    message: format!("unknown profile '{receiver_id}'"),
                }
                .into());
            }

            let id = uuid::Uuid::new_v4().to_string();
            let timestamp = now();
            let reception_at = input.reception_at.unwrap_or(timestamp);
            tx.execute(
                "INSERT INTO service_records (id, client_id, type, details, status, receiver_id, \
                 reception_at, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    id,
                    input.client_id,
                    input.record_type,
                    input.details,
                    RecordStatus::Pending,
                    receiver_id,
                    format_timestamp(&reception_at),
                    format_timestamp(&timestamp),
                ],
            )
            .map_err(|e| internal_error(format!("Failed to insert service record: {}", e)))?;

            let record =
                fetch_record(tx, &id)?.ok_or_else(|| StorageError::not_found("record", &id))?;
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::CreateRecord, TargetType::Record, &id)
                    .with_details(record_details(&record)),
            )?;
            Ok(record)
        })?;

        info!(record_id = %record.id, client_id = %record.client_id, "Registered service record");
        Ok(record)
    }

    async fn update_record(
        &self,
        actor: &ActorContext,
        id: &str,
        update: RecordUpdate,
    ) -> StorageResult<ServiceRecord> {
        actor.require_approved()?;
        update.validate()?;

        let record = self.with_transaction(|tx| {
            let existing = visible_record(tx, actor, id)?;

            let record_type = update
                .record_type
                .as_deref()
                .map(|t| t.trim().to_string())
                .unwrap_or(existing.record_type);
            let details = match update.details {
                Some(ref d) if d.trim().is_empty() => None,
                Some(ref d) => Some(d.trim().to_string()),
                None => existing.details,
            };

            tx.execute(
                "UPDATE service_records SET type = ?2, details = ?3, updated_at = ?4 WHERE id = ?1",
                params![id, record_type, details, format_timestamp(&now())],
            )
            .map_err(|e| internal_error(format!("Failed to update service record: {}", e)))?;

            let record =
                fetch_record(tx, id)?.ok_or_else(|| StorageError::not_found("record", id))?;
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::UpdateRecord, TargetType::Record, id)
                    .with_details(record_details(&record)),
            )?;
            Ok(record)
        })?;

        info!(record_id = %id, "Updated service record");
        Ok(record)
    }

    async fn change_status(
        &self,
        actor: &ActorContext,
        id: &str,
        status: RecordStatus,
    ) -> StorageResult<ServiceRecord> {
        actor.require_approved()?;

        let (old_status, record) = self.with_transaction(|tx| {
            let existing = visible_record(tx, actor, id)?;
            let timestamp = now();

            let (processor_id, processed_at) = match status {
                RecordStatus::Pending => (None, None),
                RecordStatus::Processing => (Some(actor.user_id()), None),
                RecordStatus::Completed => {
                    (Some(actor.user_id()), Some(format_timestamp(&timestamp)))
                }
            };

            tx.execute(
                "UPDATE service_records SET status = ?2, processor_id = ?3, processed_at = ?4, \
                 updated_at = ?5 WHERE id = ?1",
                params![
                    id,
                    status,
                    processor_id,
                    processed_at,
                    format_timestamp(&timestamp)
                ],
            )
            .map_err(|e| internal_error(format!("Failed to change record status: {}", e)))?;

            let record =
                fetch_record(tx, id)?.ok_or_else(|| StorageError::not_found("record", id))?;
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::StatusChange, TargetType::Record, id).with_details(
                    json!({
                        "client_name": record.client_name,
                        "old_status": existing.status,
                        "new_status": status,
                    }),
                ),
            )?;
            Ok((existing.status, record))
        })?;

        info!(record_id = %id, from = %old_status, to = %status, "Changed record status");
        Ok(record)
    }

    async fn delete_record(&self, actor: &ActorContext, id: &str) -> StorageResult<()> {
        actor.require_approved()?;

        self.with_transaction(|tx| {
            let existing = visible_record(tx, actor, id)?;
            tx.execute("DELETE FROM service_records WHERE id = ?1", params![id])
                .map_err(|e| internal_error(format!("Failed to delete service record: {}", e)))?;
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::DeleteRecord, TargetType::Record, id)
                    .with_details(record_details(&existing)),
            )
        })?;

        info!(record_id = %id, "Deleted service record");
        Ok(())
    }
}
