//! Client directory storage.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::actor::ActorContext;
use crate::core::ClientStorage;
use crate::error::{ResourceError, StorageError, StorageResult, ValidationError};
use crate::types::{ActivityAction, Client, ClientInput, NewActivity, Page, Pagination, TargetType};

use super::SqliteBackend;
use super::activity::log_activity;
use super::backend::internal_error;
use super::query_builder::{SqlParam, filter_fragment, group_scope, query_all, query_count};
use super::rows::{CLIENT_SELECT, client_from_row, format_timestamp, now};

pub(crate) fn fetch_client(conn: &Connection, id: &str) -> StorageResult<Option<Client>> {
    conn.query_row(
        &format!("{} WHERE c.id = ?1", CLIENT_SELECT),
        params![id],
        client_from_row,
    )
    .optional()
    .map_err(|e| internal_error(format!("Failed to read client: {}", e)))
}

/// Reads a client the actor is allowed to see.
pub(crate) fn visible_client(
    conn: &Connection,
    actor: &ActorContext,
    id: &str,
) -> StorageResult<Client> {
    match fetch_client(conn, id)? {
        Some(client) if actor.can_see_group(client.group_id.as_deref()) => Ok(client),
        _ => Err(StorageError::not_found("client", id)),
    }
}

fn check_group(conn: &Connection, actor: &ActorContext, input: &ClientInput) -> StorageResult<()> {
    if let Some(group_id) = &input.group_id {
        let exists = conn
            .query_row(
                "SELECT 1 FROM client_groups WHERE id = ?1",
                params![group_id],
                |_| Ok(()),
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to read client group: {}", e)))?
            .is_some();
        if !exists {
            return Err(ValidationError::InvalidValue {
                field: "group_id".to_string(),
                message: format!("unknown client group '{group_id}'"),
            }
            .into());
        }
    }
    if !actor.can_see_group(input.group_id.as_deref()) {
        warn!(user_id = %actor.user_id(), "Refused client outside the actor's groups");
        return Err(StorageError::forbidden(
            "clients must be assigned to one of your groups",
        ));
    }
    Ok(())
}

#[async_trait]
impl ClientStorage for SqliteBackend {
    async fn list_clients(
        &self,
        actor: &ActorContext,
        query: &str,
        pagination: Pagination,
    ) -> StorageResult<Page<Client>> {
        actor.require_approved()?;
        let conn = self.get_connection()?;

        let filter = self.client_search().filter(query);
        debug!(
            query = %query,
            predicates = filter.predicates.len(),
            general = ?filter.general,
            "Searching clients"
        );
        let condition = filter_fragment(&filter).and(group_scope(actor.group_scope()));

        let total = query_count(
            &conn,
            &format!(
                "SELECT COUNT(*) FROM clients c LEFT JOIN client_groups g ON g.id = c.group_id{}",
                condition.where_clause()
            ),
            &condition.params,
        )?;

        let mut params = condition.params.clone();
        params.push(SqlParam::integer(pagination.limit()));
        params.push(SqlParam::integer(pagination.sql_offset()));
        let items = query_all(
            &conn,
            &format!(
                "{}{} ORDER BY c.name ASC, c.rowid ASC LIMIT ? OFFSET ?",
                CLIENT_SELECT,
                condition.where_clause()
            ),
            &params,
            client_from_row,
        )?;

        Ok(Page::new(items, total, pagination))
    }

    async fn get_client(&self, actor: &ActorContext, id: &str) -> StorageResult<Client> {
        actor.require_approved()?;
        let conn = self.get_connection()?;
        visible_client(&conn, actor, id)
    }

    async fn create_client(
        &self,
        actor: &ActorContext,
        input: ClientInput,
    ) -> StorageResult<Client> {
        actor.require_approved()?;
        let input = input.normalize()?;

        let client = self.with_transaction(|tx| {
            check_group(tx, actor, &input)?;

            let id = uuid::Uuid::new_v4().to_string();
            let timestamp = format_timestamp(&now());
            tx.execute(
                "INSERT INTO clients (id, name, biz_reg_no, phone, address, manager, van_company, \
                 equipment, group_id, memo, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                params![
                    id,
                    input.name,
                    input.biz_reg_no,
                    input.phone,
                    input.address,
                    input.manager,
                    input.van_company,
                    input.equipment,
                    input.group_id,
                    input.memo,
                    timestamp,
                ],
            )
            .map_err(|e| internal_error(format!("Failed to insert client: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::CreateClient, TargetType::Client, &id)
                    .with_details(json!({ "name": input.name })),
            )?;

            fetch_client(tx, &id)?.ok_or_else(|| StorageError::not_found("client", &id))
        })?;

        info!(client_id = %client.id, name = %client.name, "Created client");
        Ok(client)
    }

    async fn update_client(
        &self,
        actor: &ActorContext,
        id: &str,
        input: ClientInput,
    ) -> StorageResult<Client> {
        actor.require_approved()?;
        let input = input.normalize()?;

        let client = self.with_transaction(|tx| {
            let existing = visible_client(tx, actor, id)?;
            check_group(tx, actor, &input)?;

            tx.execute(
                "UPDATE clients SET name = ?2, biz_reg_no = ?3, phone = ?4, address = ?5, \
                 manager = ?6, van_company = ?7, equipment = ?8, group_id = ?9, memo = ?10, \
                 updated_at = ?11 WHERE id = ?1",
                params![
                    id,
                    input.name,
                    input.biz_reg_no,
                    input.phone,
                    input.address,
                    input.manager,
                    input.van_company,
                    input.equipment,
                    input.group_id,
                    input.memo,
                    format_timestamp(&now()),
                ],
            )
            .map_err(|e| internal_error(format!("Failed to update client: {}", e)))?;

            let mut details = json!({ "name": input.name });
            if existing.name != input.name {
                details["old_name"] = json!(existing.name);
            }
            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::UpdateClient, TargetType::Client, id)
                    .with_details(details),
            )?;

            fetch_client(tx, id)?.ok_or_else(|| StorageError::not_found("client", id))
        })?;

        info!(client_id = %id, "Updated client");
        Ok(client)
    }

    async fn delete_client(&self, actor: &ActorContext, id: &str) -> StorageResult<()> {
        actor.require_approved()?;

        self.with_transaction(|tx| {
            let existing = visible_client(tx, actor, id)?;

            let records = query_count(
                tx,
                "SELECT COUNT(*) FROM service_records WHERE client_id = ?",
                &[SqlParam::string(id)],
            )?;
            if records > 0 {
                warn!(client_id = %id, records, "Refused to delete client with service records");
                return Err(ResourceError::InUse {
                    kind: "client".to_string(),
                    id: id.to_string(),
                    dependent: "service records".to_string(),
                    count: records as usize,
                }
                .into());
            }

            tx.execute("DELETE FROM clients WHERE id = ?1", params![id])
                .map_err(|e| internal_error(format!("Failed to delete client: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::DeleteClient, TargetType::Client, id)
                    .with_details(json!({ "name": existing.name })),
            )
        })?;

        info!(client_id = %id, "Deleted client");
        Ok(())
    }
}
