//! Activity log writes and reads, plus dashboard summaries.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::actor::ActorContext;
use crate::core::ActivityStorage;
use crate::error::StorageResult;
use crate::types::{
    ActivityLog, DashboardStats, LogCategory, NewActivity, Page, Pagination, RECENT_RECORD_LIMIT,
    RecordStatus, ServiceRecord,
};

use super::SqliteBackend;
use super::backend::internal_error;
use super::query_builder::{SqlFragment, SqlParam, group_scope, in_list, query_all, query_count};
use super::rows::{
    ACTIVITY_COLUMNS, RECORD_COLUMNS, RECORD_FROM, activity_from_row, format_timestamp, now,
    record_from_row,
};

/// Appends an activity log entry for `actor`.
///
/// Call inside the same transaction as the mutation it describes.
pub(crate) fn log_activity(
    conn: &Connection,
    actor: &ActorContext,
    activity: NewActivity,
) -> StorageResult<()> {
    let details = serde_json::to_string(&activity.details)?;
    conn.execute(
        "INSERT INTO activity_logs (id, user_id, user_email, user_display_name, action, \
         target_type, target_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            uuid::Uuid::new_v4().to_string(),
            actor.user_id(),
            actor.email(),
            actor.display_name(),
            activity.action,
            activity.target_type,
            activity.target_id,
            details,
            format_timestamp(&now()),
        ],
    )
    .map_err(|e| internal_error(format!("Failed to write activity log: {}", e)))?;

    debug!(
        user_id = %actor.user_id(),
        action = %activity.action,
        target_type = %activity.target_type,
        "Recorded activity"
    );
    Ok(())
}

fn count_records(
    conn: &Connection,
    scope: &SqlFragment,
    condition: SqlFragment,
) -> StorageResult<u64> {
    let filter = condition.and(scope.clone());
    query_count(
        conn,
        &format!("SELECT COUNT(*) {}{}", RECORD_FROM, filter.where_clause()),
        &filter.params,
    )
}

#[async_trait]
impl ActivityStorage for SqliteBackend {
    async fn list_activity(
        &self,
        actor: &ActorContext,
        category: LogCategory,
        pagination: Pagination,
    ) -> StorageResult<Page<ActivityLog>> {
        actor.require_administrator()?;
        let conn = self.get_connection()?;

        let targets: Vec<String> = category
            .target_types()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        let filter = if targets.is_empty() {
            SqlFragment::default()
        } else {
            in_list("target_type", &targets)
        };

        let total = query_count(
            &conn,
            &format!("SELECT COUNT(*) FROM activity_logs{}", filter.where_clause()),
            &filter.params,
        )?;

        let mut params = filter.params.clone();
        params.push(SqlParam::integer(pagination.limit()));
        params.push(SqlParam::integer(pagination.sql_offset()));
        let items = query_all(
            &conn,
            &format!(
                "SELECT {} FROM activity_logs{} ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
                ACTIVITY_COLUMNS,
                filter.where_clause()
            ),
            &params,
            activity_from_row,
        )?;

        Ok(Page::new(items, total, pagination))
    }

    async fn dashboard_stats(&self, actor: &ActorContext) -> StorageResult<DashboardStats> {
        actor.require_approved()?;
        let conn = self.get_connection()?;
        let scope = group_scope(actor.group_scope());

        let total_clients = query_count(
            &conn,
            &format!("SELECT COUNT(*) FROM clients c{}", scope.where_clause()),
            &scope.params,
        )?;

        let status_is = |status: RecordStatus| {
            SqlFragment::with_params("r.status = ?", vec![SqlParam::string(status.as_str())])
        };
        let pending_records = count_records(&conn, &scope, status_is(RecordStatus::Pending))?;
        let processing_records =
            count_records(&conn, &scope, status_is(RecordStatus::Processing))?;

        let today = Utc::now().date_naive();
        let (start, end) = match today.and_hms_opt(0, 0, 0) {
            Some(midnight) => {
                let start = midnight.and_utc();
                (start, start + Duration::days(1))
            }
            None => return Err(internal_error("Failed to compute start of day".to_string())),
        };
        let completed_today = count_records(
            &conn,
            &scope,
            status_is(RecordStatus::Completed).and(SqlFragment::with_params(
                "r.processed_at >= ? AND r.processed_at < ?",
                vec![
                    SqlParam::string(format_timestamp(&start)),
                    SqlParam::string(format_timestamp(&end)),
                ],
            )),
        )?;

        let mut params = scope.params.clone();
        params.push(SqlParam::integer(i64::from(RECENT_RECORD_LIMIT)));
        let recent_records: Vec<ServiceRecord> = query_all(
            &conn,
            &format!(
                "{} {}{} ORDER BY r.reception_at DESC, r.rowid DESC LIMIT ?",
                RECORD_COLUMNS,
                RECORD_FROM,
                scope.where_clause()
            ),
            &params,
            record_from_row,
        )?;

        Ok(DashboardStats {
            total_clients,
            pending_records,
            processing_records,
            completed_today,
            recent_records,
        })
    }
}
