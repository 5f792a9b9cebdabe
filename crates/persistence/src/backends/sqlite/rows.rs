//! Row mapping between SQLite and the domain types.
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision and a
//! `Z` suffix so that lexical order equals chronological order. List columns
//! are stored as JSON arrays.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{Row, ToSql};
use serde::de::DeserializeOwned;

use crate::actor::Role;
use crate::types::{
    ActivityAction, ActivityLog, CatalogEntry, Client, ClientGroup, Notice, Profile,
    RecordStatus, ServiceRecord, TargetType,
};

/// Formats a timestamp for storage.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The current time, truncated to stored precision.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::parse_from_rfc3339(&format_timestamp(&now))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

fn conversion_error(
    row: &Row<'_>,
    column: &str,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or(0);
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(row, column, e))
}

fn optional_timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(row, column, e))
    })
    .transpose()
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, column: &str) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(row, column, e))
}

fn text_enum<T>(value: ValueRef<'_>, parse: impl FnOnce(&str) -> Option<T>) -> FromSqlResult<T> {
    let text = value.as_str()?;
    parse(text).ok_or_else(|| FromSqlError::Other(format!("unrecognised value '{text}'").into()))
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum(value, |s| Role::parse(s).ok())
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum(value, RecordStatus::from_code)
    }
}

impl ToSql for RecordStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ActivityAction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum(value, ActivityAction::from_code)
    }
}

impl ToSql for ActivityAction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TargetType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum(value, TargetType::from_code)
    }
}

impl ToSql for TargetType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

pub const GROUP_COLUMNS: &str = "id, name, created_at";

pub fn group_from_row(row: &Row<'_>) -> rusqlite::Result<ClientGroup> {
    Ok(ClientGroup {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: timestamp(row, "created_at")?,
    })
}

/// Client projection; expects `clients c LEFT JOIN client_groups g`.
pub const CLIENT_SELECT: &str = "SELECT c.id, c.name, c.biz_reg_no, c.phone, c.address, \
     c.manager, c.van_company, c.equipment, c.group_id, g.name AS group_name, c.memo, \
     c.created_at, c.updated_at \
     FROM clients c LEFT JOIN client_groups g ON g.id = c.group_id";

pub fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        name: row.get("name")?,
        biz_reg_no: row.get("biz_reg_no")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
        manager: row.get("manager")?,
        van_company: row.get("van_company")?,
        equipment: row.get("equipment")?,
        group_id: row.get("group_id")?,
        group_name: row.get("group_name")?,
        memo: row.get("memo")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

/// Joins shared by the record projection and record counts.
pub const RECORD_FROM: &str = "FROM service_records r \
     JOIN clients c ON c.id = r.client_id \
     LEFT JOIN profiles rp ON rp.id = r.receiver_id \
     LEFT JOIN profiles pp ON pp.id = r.processor_id";

/// Record projection; follow with [`RECORD_FROM`].
pub const RECORD_COLUMNS: &str = "SELECT r.id, r.client_id, c.name AS client_name, r.type, \
     r.details, r.status, r.receiver_id, \
     COALESCE(rp.display_name, rp.username, rp.email) AS receiver_name, \
     r.processor_id, COALESCE(pp.display_name, pp.username, pp.email) AS processor_name, \
     r.reception_at, r.processed_at, r.created_at, r.updated_at";

pub fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ServiceRecord> {
    Ok(ServiceRecord {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        client_name: row.get("client_name")?,
        record_type: row.get("type")?,
        details: row.get("details")?,
        status: row.get("status")?,
        receiver_id: row.get("receiver_id")?,
        receiver_name: row.get("receiver_name")?,
        processor_id: row.get("processor_id")?,
        processor_name: row.get("processor_name")?,
        reception_at: timestamp(row, "reception_at")?,
        processed_at: optional_timestamp(row, "processed_at")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

pub const PROFILE_COLUMNS: &str = "id, email, username, display_name, phone, team_name, role, \
     is_approved, allowed_groups, created_at";

pub fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get("id")?,
        email: row.get("email")?,
        username: row.get("username")?,
        display_name: row.get("display_name")?,
        phone: row.get("phone")?,
        team_name: row.get("team_name")?,
        role: row.get("role")?,
        is_approved: row.get("is_approved")?,
        allowed_groups: json_column(row, "allowed_groups")?,
        created_at: timestamp(row, "created_at")?,
    })
}

/// Notice projection with the author's name.
pub const NOTICE_SELECT: &str = "SELECT n.id, n.title, n.content, n.allowed_roles, n.author_id, \
     COALESCE(p.display_name, p.username, p.email) AS author_name, n.is_pinned, \
     n.created_at, n.updated_at \
     FROM notices n LEFT JOIN profiles p ON p.id = n.author_id";

pub fn notice_from_row(row: &Row<'_>) -> rusqlite::Result<Notice> {
    Ok(Notice {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        allowed_roles: json_column(row, "allowed_roles")?,
        author_id: row.get("author_id")?,
        author_name: row.get("author_name")?,
        is_pinned: row.get("is_pinned")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

pub const ACTIVITY_COLUMNS: &str = "id, user_id, user_email, user_display_name, action, \
     target_type, target_id, details, created_at";

pub fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<ActivityLog> {
    Ok(ActivityLog {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        user_email: row.get("user_email")?,
        user_display_name: row.get("user_display_name")?,
        action: row.get("action")?,
        target_type: row.get("target_type")?,
        target_id: row.get("target_id")?,
        details: json_column(row, "details")?,
        created_at: timestamp(row, "created_at")?,
    })
}

pub const CATALOG_COLUMNS: &str = "id, name, sort_order, created_at";

pub fn catalog_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        id: row.get("id")?,
        name: row.get("name")?,
        sort_order: row.get("sort_order")?,
        created_at: timestamp(row, "created_at")?,
    })
}
