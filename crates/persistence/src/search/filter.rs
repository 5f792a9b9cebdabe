//! Translation of parsed search input into backend-neutral filters.

use std::marker::PhantomData;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::debug;

use super::keywords::{ClientField, RecordField, SearchField};
use super::query_string::{ParsedQuery, QueryParser};
use crate::error::SearchResult;

/// A condition on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Substring match.
    Contains(String),
    /// Exact match.
    Equals(String),
    /// Half-open time range `[start, end)`.
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A predicate bound to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate<F> {
    pub field: F,
    pub predicate: Predicate,
}

/// Every condition derived from one search input.
///
/// Field predicates are ANDed. The general term, when present, must appear
/// in at least one of [`SearchField::GENERAL_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter<F> {
    pub predicates: Vec<FieldPredicate<F>>,
    pub general: Option<String>,
}

impl<F> Default for SearchFilter<F> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            general: None,
        }
    }
}

impl<F: SearchField> SearchFilter<F> {
    /// Builds a filter from parser output.
    ///
    /// Keywords are visited in whitelist order so the predicate order is
    /// stable. Values a field cannot interpret are dropped.
    pub fn from_parsed(parsed: &ParsedQuery) -> Self {
        let mut predicates = Vec::new();
        for keyword in F::KEYWORDS {
            let Some(value) = parsed.get(keyword) else {
                continue;
            };
            let Some(field) = F::from_keyword(keyword) else {
                continue;
            };
            match field.predicate(value) {
                Some(predicate) => predicates.push(FieldPredicate { field, predicate }),
                None => {
                    debug!(keyword = %keyword, value = %value, "Ignoring unusable search value")
                }
            }
        }

        let general = Some(parsed.general_search.clone()).filter(|g| !g.is_empty());
        Self {
            predicates,
            general,
        }
    }

    /// Returns `true` when nothing restricts the result.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.general.is_none()
    }

    /// Fields the general term is matched against.
    pub fn general_fields(&self) -> &'static [F] {
        F::GENERAL_FIELDS
    }
}

/// A compiled parser plus translation for one kind of list.
#[derive(Debug, Clone)]
pub struct FieldSearch<F> {
    parser: QueryParser,
    _field: PhantomData<F>,
}

/// Search over the client list.
pub type ClientSearch = FieldSearch<ClientField>;

/// Search over the service record list.
pub type RecordSearch = FieldSearch<RecordField>;

impl<F: SearchField> FieldSearch<F> {
    /// Compiles the parser for this field set's whitelist.
    pub fn new() -> SearchResult<Self> {
        Ok(Self {
            parser: QueryParser::new(F::KEYWORDS)?,
            _field: PhantomData,
        })
    }

    /// Parses and translates `input`.
    pub fn filter(&self, input: &str) -> SearchFilter<F> {
        SearchFilter::from_parsed(&self.parser.parse(input))
    }

    /// Parses `input` without translating it.
    pub fn parse(&self, input: &str) -> ParsedQuery {
        self.parser.parse(input)
    }
}

/// Interprets a date search value as a half-open UTC range.
///
/// Accepts a day (`YYYY-MM-DD`, `YYYY.MM.DD`, `YYYYMMDD`), a month
/// (`YYYY-MM`, `YYYY.MM`) or a year (`YYYY`).
pub fn parse_date_range(value: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let value = value.trim();
    let digits_only = value.chars().all(|c| c.is_ascii_digit());

    let (start, end) = if digits_only && value.len() == 4 {
        let year: i32 = value.parse().ok()?;
        (
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        )
    } else if digits_only && value.len() == 8 {
        let day = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        (day, day.succ_opt()?)
    } else {
        let normalized = value.replace('.', "-");
        let parts: Vec<&str> = normalized.split('-').collect();
        match parts.as_slice() {
            [year, month] => {
                let first = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
                (first, next_month(first)?)
            }
            [_, _, _] => {
                let day = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()?;
                (day, day.succ_opt()?)
            }
            _ => return None,
        }
    };

    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

fn next_month(first: NaiveDate) -> Option<NaiveDate> {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
}
