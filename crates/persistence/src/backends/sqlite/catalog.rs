//! Client groups and reference catalogs.

use async_trait::async_trait;
use rusqlite::{Connection, params};
use serde_json::json;
use tracing::info;

use crate::actor::ActorContext;
use crate::core::CatalogStorage;
use crate::error::{ResourceError, StorageError, StorageResult, ValidationError};
use crate::types::{
    ActivityAction, CatalogEntry, CatalogInput, CatalogKind, ClientGroup, NewActivity, TargetType,
};

use super::SqliteBackend;
use super::activity::log_activity;
use super::backend::internal_error;
use super::query_builder::{SqlFragment, SqlParam, in_list, query_all, query_count};
use super::rows::{
    CATALOG_COLUMNS, GROUP_COLUMNS, catalog_from_row, format_timestamp, group_from_row, now,
};

fn required_name(input: &CatalogInput) -> StorageResult<String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingRequiredField {
            field: "name".to_string(),
        }
        .into());
    }
    Ok(name.to_string())
}

fn ensure_unique_name(conn: &Connection, table: &str, kind: &str, name: &str) -> StorageResult<()> {
    let taken = query_count(
        conn,
        &format!("SELECT COUNT(*) FROM {table} WHERE name = ?"),
        &[SqlParam::string(name)],
    )? > 0;
    if taken {
        return Err(ResourceError::AlreadyExists {
            kind: kind.to_string(),
            value: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn fetch_entry(conn: &Connection, kind: CatalogKind, id: &str) -> StorageResult<CatalogEntry> {
    query_all(
        conn,
        &format!("SELECT {} FROM {} WHERE id = ?", CATALOG_COLUMNS, kind.table()),
        &[SqlParam::string(id)],
        catalog_from_row,
    )?
    .into_iter()
    .next()
    .ok_or_else(|| StorageError::not_found(kind.target_type().as_str(), id))
}

fn fetch_group(conn: &Connection, id: &str) -> StorageResult<ClientGroup> {
    query_all(
        conn,
        &format!("SELECT {} FROM client_groups WHERE id = ?", GROUP_COLUMNS),
        &[SqlParam::string(id)],
        group_from_row,
    )?
    .into_iter()
    .next()
    .ok_or_else(|| StorageError::not_found("group", id))
}

#[async_trait]
impl CatalogStorage for SqliteBackend {
    async fn list_groups(&self, actor: &ActorContext) -> StorageResult<Vec<ClientGroup>> {
        actor.require_approved()?;
        let conn = self.get_connection()?;

        let condition = match actor.group_scope() {
            Some(groups) => in_list("id", groups),
            None => SqlFragment::default(),
        };
        query_all(
            &conn,
            &format!(
                "SELECT {} FROM client_groups{} ORDER BY name ASC",
                GROUP_COLUMNS,
                condition.where_clause()
            ),
            &condition.params,
            group_from_row,
        )
    }

    async fn create_group(
        &self,
        actor: &ActorContext,
        input: CatalogInput,
    ) -> StorageResult<ClientGroup> {
        actor.require_administrator()?;
        let name = required_name(&input)?;

        let group = self.with_transaction(|tx| {
            ensure_unique_name(tx, "client_groups", "group", &name)?;

            let id = uuid::Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO client_groups (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![id, name, format_timestamp(&now())],
            )
            .map_err(|e| internal_error(format!("Failed to insert client group: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::CreateGroup, TargetType::Group, &id)
                    .with_details(json!({ "name": name })),
            )?;
            fetch_group(tx, &id)
        })?;

        info!(group_id = %group.id, name = %group.name, "Created client group");
        Ok(group)
    }

    async fn delete_group(&self, actor: &ActorContext, id: &str) -> StorageResult<()> {
        actor.require_administrator()?;

        self.with_transaction(|tx| {
            let existing = fetch_group(tx, id)?;

            let detached = tx
                .execute(
                    "UPDATE clients SET group_id = NULL WHERE group_id = ?1",
                    params![id],
                )
                .map_err(|e| internal_error(format!("Failed to detach clients: {}", e)))?;

            // Profiles keep the stale id; an emptied list would mean every group.
            tx.execute("DELETE FROM client_groups WHERE id = ?1", params![id])
                .map_err(|e| internal_error(format!("Failed to delete client group: {}", e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(ActivityAction::DeleteGroup, TargetType::Group, id)
                    .with_details(json!({ "name": existing.name, "detached_clients": detached })),
            )
        })?;

        info!(group_id = %id, "Deleted client group");
        Ok(())
    }

    async fn list_catalog(
        &self,
        actor: &ActorContext,
        kind: CatalogKind,
    ) -> StorageResult<Vec<CatalogEntry>> {
        actor.require_approved()?;
        let conn = self.get_connection()?;
        query_all(
            &conn,
            &format!(
                "SELECT {} FROM {} ORDER BY sort_order ASC, name ASC",
                CATALOG_COLUMNS,
                kind.table()
            ),
            &[],
            catalog_from_row,
        )
    }

    async fn create_catalog_entry(
        &self,
        actor: &ActorContext,
        kind: CatalogKind,
        input: CatalogInput,
    ) -> StorageResult<CatalogEntry> {
        actor.require_administrator()?;
        let name = required_name(&input)?;

        let entry = self.with_transaction(|tx| {
            ensure_unique_name(tx, kind.table(), kind.target_type().as_str(), &name)?;

            let sort_order = match input.sort_order {
                Some(order) => order,
                None => query_count(tx, &format!("SELECT COUNT(*) FROM {}", kind.table()), &[])?
                    as i64,
            };

            let id = uuid::Uuid::new_v4().to_string();
            tx.execute(
                &format!(
                    "INSERT INTO {} (id, name, sort_order, created_at) VALUES (?1, ?2, ?3, ?4)",
                    kind.table()
                ),
                params![id, name, sort_order, format_timestamp(&now())],
            )
            .map_err(|e| internal_error(format!("Failed to insert {}: {}", kind, e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(kind.create_action(), kind.target_type(), &id)
                    .with_details(json!({ "name": name })),
            )?;
            fetch_entry(tx, kind, &id)
        })?;

        info!(kind = %kind, entry_id = %entry.id, name = %entry.name, "Created catalog entry");
        Ok(entry)
    }

    async fn delete_catalog_entry(
        &self,
        actor: &ActorContext,
        kind: CatalogKind,
        id: &str,
    ) -> StorageResult<()> {
        actor.require_administrator()?;

        self.with_transaction(|tx| {
            let existing = fetch_entry(tx, kind, id)?;

            tx.execute(
                &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
                params![id],
            )
            .map_err(|e| internal_error(format!("Failed to delete {}: {}", kind, e)))?;

            log_activity(
                tx,
                actor,
                NewActivity::new(kind.delete_action(), kind.target_type(), id)
                    .with_details(json!({ "name": existing.name })),
            )
        })?;

        info!(kind = %kind, entry_id = %id, "Deleted catalog entry");
        Ok(())
    }
}
