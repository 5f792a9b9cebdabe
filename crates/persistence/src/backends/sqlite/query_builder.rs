//! SQL generation for list searches.
//!
//! Translates a [`SearchFilter`] into a parameterized `WHERE` clause. Every
//! fragment uses anonymous `?` placeholders so fragments can be combined
//! freely as long as their parameters are kept in order.

use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, Row, ToSql, params_from_iter};

use crate::error::StorageResult;
use crate::search::{
    ClientField, FieldPredicate, Predicate, RecordField, SearchField, SearchFilter,
};

use super::backend::internal_error;
use super::rows::format_timestamp;

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => Ok(ToSqlOutput::from(s.as_str())),
            SqlParam::Integer(i) => Ok(ToSqlOutput::from(*i)),
            SqlParam::Null => Ok(ToSqlOutput::from(rusqlite::types::Null)),
        }
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Combines with another fragment using AND.
    pub fn and(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) AND ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Combines with another fragment using OR.
    pub fn or(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) OR ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Returns true if this fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Renders as a `WHERE` clause, or nothing when empty.
    pub fn where_clause(&self) -> String {
        if self.sql.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql)
        }
    }
}

/// Maps a search field onto the SQL expression it filters.
pub trait SqlColumn: SearchField {
    /// Column expression, qualified with the list query's table aliases.
    fn column(&self) -> &'static str;
}

/// Client list aliases: `c` clients, `g` client_groups.
impl SqlColumn for ClientField {
    fn column(&self) -> &'static str {
        match self {
            ClientField::Name => "c.name",
            ClientField::BizRegNo => "c.biz_reg_no",
            ClientField::Phone => "c.phone",
            ClientField::Manager => "c.manager",
            ClientField::Address => "c.address",
            ClientField::VanCompany => "c.van_company",
            ClientField::Equipment => "c.equipment",
            ClientField::GroupName => "g.name",
        }
    }
}

/// Record list aliases: `r` service_records, `c` clients, `rp` receiver and
/// `pp` processor profiles.
impl SqlColumn for RecordField {
    fn column(&self) -> &'static str {
        match self {
            RecordField::ClientName => "c.name",
            RecordField::Details => "r.details",
            RecordField::Type => "r.type",
            RecordField::Status => "r.status",
            RecordField::ReceiverName => "COALESCE(rp.display_name, rp.username, rp.email)",
            RecordField::ProcessorName => "COALESCE(pp.display_name, pp.username, pp.email)",
            RecordField::ReceptionAt => "r.reception_at",
            RecordField::ProcessedAt => "r.processed_at",
        }
    }
}

/// Escapes `%`, `_` and `\` and wraps the value for a substring `LIKE`.
pub fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Substring match on one column.
pub fn contains(column: &str, value: &str) -> SqlFragment {
    SqlFragment::with_params(
        format!("{column} LIKE ? ESCAPE '\\'"),
        vec![SqlParam::string(like_pattern(value))],
    )
}

fn predicate_fragment<F: SqlColumn>(predicate: &FieldPredicate<F>) -> SqlFragment {
    let column = predicate.field.column();
    match &predicate.predicate {
        Predicate::Contains(value) => contains(column, value),
        Predicate::Equals(value) => {
            SqlFragment::with_params(format!("{column} = ?"), vec![SqlParam::string(value)])
        }
        Predicate::Between { start, end } => SqlFragment::with_params(
            format!("{column} >= ? AND {column} < ?"),
            vec![
                SqlParam::string(format_timestamp(start)),
                SqlParam::string(format_timestamp(end)),
            ],
        ),
    }
}

/// Builds the condition for a parsed search.
///
/// Field predicates are ANDed; the general term must match at least one of
/// the field set's general columns.
pub fn filter_fragment<F: SqlColumn>(filter: &SearchFilter<F>) -> SqlFragment {
    let mut fragment = filter
        .predicates
        .iter()
        .fold(SqlFragment::default(), |acc, p| acc.and(predicate_fragment(p)));

    if let Some(term) = &filter.general {
        let general = filter
            .general_fields()
            .iter()
            .fold(SqlFragment::default(), |acc, field| {
                acc.or(contains(field.column(), term))
            });
        fragment = fragment.and(general);
    }

    fragment
}

/// Restricts `column` to a set of values.
///
/// An empty set matches nothing.
pub fn in_list(column: &str, values: &[String]) -> SqlFragment {
    if values.is_empty() {
        return SqlFragment::new("0");
    }
    let placeholders = vec!["?"; values.len()].join(", ");
    SqlFragment::with_params(
        format!("{column} IN ({placeholders})"),
        values.iter().map(SqlParam::string).collect(),
    )
}

/// Limits a client-joined query to an actor's client groups.
///
/// `None` leaves the query unrestricted.
pub fn group_scope(scope: Option<&[String]>) -> SqlFragment {
    match scope {
        Some(groups) => in_list("c.group_id", groups),
        None => SqlFragment::default(),
    }
}

/// Runs a `SELECT COUNT(*)` style query.
pub fn query_count(conn: &Connection, sql: &str, params: &[SqlParam]) -> StorageResult<u64> {
    let count: i64 = conn
        .query_row(sql, params_from_iter(params.iter()), |row| row.get(0))
        .map_err(|e| internal_error(format!("Failed to count rows: {}", e)))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Runs a query and maps every row.
pub fn query_all<T>(
    conn: &Connection,
    sql: &str,
    params: &[SqlParam],
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> StorageResult<Vec<T>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), map)
        .map_err(|e| internal_error(format!("Failed to run query: {}", e)))?;
    rows.collect::<rusqlite::Result<Vec<T>>>()
        .map_err(|e| internal_error(format!("Failed to read row: {}", e)))
}
