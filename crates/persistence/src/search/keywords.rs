//! Search keyword whitelists and the fields they address.
//!
//! The parser keys its output by the literal keyword the user typed. Folding
//! synonyms (`상호` and `상호명`, or `접수`, `접수일` and `접수일시`) onto
//! one field happens here, after parsing.

use std::fmt;

use super::filter::{Predicate, parse_date_range};
use crate::types::RecordStatus;

/// Keywords recognised by the client list search.
pub const CLIENT_KEYWORDS: [&str; 11] = [
    "상호",
    "상호명",
    "사업자",
    "사업자번호",
    "전화",
    "전화번호",
    "담당자",
    "주소",
    "밴사",
    "장비",
    "그룹",
];

/// Keywords recognised by the service record search.
pub const RECORD_KEYWORDS: [&str; 11] = [
    "거래처",
    "상호",
    "내용",
    "유형",
    "상태",
    "접수자",
    "처리자",
    "접수",
    "접수일",
    "접수일시",
    "처리일",
];

/// A field a search keyword can address.
pub trait SearchField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The keyword whitelist, in the order filters are applied.
    const KEYWORDS: &'static [&'static str];

    /// Fields covered by a general search term.
    const GENERAL_FIELDS: &'static [Self];

    /// Maps a whitelisted keyword to its field.
    fn from_keyword(keyword: &str) -> Option<Self>;

    /// Builds the predicate for a keyword value. `None` drops the filter.
    fn predicate(&self, value: &str) -> Option<Predicate>;
}

/// Searchable client columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientField {
    Name,
    BizRegNo,
    Phone,
    Manager,
    Address,
    VanCompany,
    Equipment,
    GroupName,
}

impl SearchField for ClientField {
    const KEYWORDS: &'static [&'static str] = &CLIENT_KEYWORDS;

    const GENERAL_FIELDS: &'static [Self] = &[
        ClientField::Name,
        ClientField::BizRegNo,
        ClientField::Phone,
        ClientField::Address,
        ClientField::Manager,
    ];

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "상호" | "상호명" => Some(ClientField::Name),
            "사업자" | "사업자번호" => Some(ClientField::BizRegNo),
            "전화" | "전화번호" => Some(ClientField::Phone),
            "담당자" => Some(ClientField::Manager),
            "주소" => Some(ClientField::Address),
            "밴사" => Some(ClientField::VanCompany),
            "장비" => Some(ClientField::Equipment),
            "그룹" => Some(ClientField::GroupName),
            _ => None,
        }
    }

    fn predicate(&self, value: &str) -> Option<Predicate> {
        Some(Predicate::Contains(value.to_string()))
    }
}

/// Searchable service record columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    ClientName,
    Details,
    Type,
    Status,
    ReceiverName,
    ProcessorName,
    ReceptionAt,
    ProcessedAt,
}

impl SearchField for RecordField {
    const KEYWORDS: &'static [&'static str] = &RECORD_KEYWORDS;

    const GENERAL_FIELDS: &'static [Self] = &[
        RecordField::ClientName,
        RecordField::Details,
        RecordField::Type,
    ];

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "거래처" | "상호" => Some(RecordField::ClientName),
            "내용" => Some(RecordField::Details),
            "유형" => Some(RecordField::Type),
            "상태" => Some(RecordField::Status),
            "접수자" => Some(RecordField::ReceiverName),
            "처리자" => Some(RecordField::ProcessorName),
            "접수" | "접수일" | "접수일시" => Some(RecordField::ReceptionAt),
            "처리일" => Some(RecordField::ProcessedAt),
            _ => None,
        }
    }

    fn predicate(&self, value: &str) -> Option<Predicate> {
        match self {
            RecordField::Status => Some(Predicate::Equals(status_code(value))),
            RecordField::ReceptionAt | RecordField::ProcessedAt => {
                parse_date_range(value).map(|(start, end)| Predicate::Between { start, end })
            }
            _ => Some(Predicate::Contains(value.to_string())),
        }
    }
}

/// Translates a status search value into a stored status code.
///
/// Korean labels map to their codes (`대기` to `pending`, `처리중` to
/// `processing`, `완료` to `completed`). Anything else is used as given, so
/// an English code matches and an unknown word matches nothing.
pub fn status_code(value: &str) -> String {
    RecordStatus::from_label(value)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|| value.to_string())
}
