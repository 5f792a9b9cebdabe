//! Service record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::non_blank;
use crate::error::ValidationError;

/// Lifecycle state of a service record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// 대기
    Pending,
    /// 처리중
    Processing,
    /// 완료
    Completed,
}

impl RecordStatus {
    /// Every status.
    pub const ALL: [RecordStatus; 3] = [
        RecordStatus::Pending,
        RecordStatus::Processing,
        RecordStatus::Completed,
    ];

    /// Returns the storage code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Processing => "processing",
            RecordStatus::Completed => "completed",
        }
    }

    /// Returns the Korean display label.
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "대기",
            RecordStatus::Processing => "처리중",
            RecordStatus::Completed => "완료",
        }
    }

    /// Looks up a status by its Korean label only.
    pub fn from_label(label: &str) -> Option<Self> {
        RecordStatus::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Looks up a status by its storage code only.
    pub fn from_code(code: &str) -> Option<Self> {
        RecordStatus::ALL.into_iter().find(|s| s.as_str() == code)
    }

    /// Parses a status from its code or label.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        Self::from_code(&trimmed.to_ascii_lowercase())
            .or_else(|| Self::from_label(trimmed))
            .ok_or_else(|| ValidationError::UnknownStatus {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordStatus::parse(s)
    }
}

/// A service intake record (접수).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub client_id: String,
    /// Client business name, resolved on read.
    pub client_name: Option<String>,
    /// Service type (유형), e.g. 장애, 설치.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Free-form description (내용).
    pub details: Option<String>,
    pub status: RecordStatus,
    /// Profile who took the request (접수자).
    pub receiver_id: Option<String>,
    pub receiver_name: Option<String>,
    /// Profile handling the request (처리자).
    pub processor_id: Option<String>,
    pub processor_name: Option<String>,
    /// When the request was received (접수일시).
    pub reception_at: DateTime<Utc>,
    /// When the request was completed (처리일시).
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when registering a service record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewRecord {
    pub client_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub details: Option<String>,
    /// Defaults to the acting profile.
    pub receiver_id: Option<String>,
    /// Defaults to now.
    pub reception_at: Option<DateTime<Utc>>,
}

impl NewRecord {
    /// Creates a record input for a client and service type.
    pub fn new(client_id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            record_type: record_type.into(),
            ..Default::default()
        }
    }

    /// Sets the details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Trims fields and checks that a client and a type are present.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let client_id = self.client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "client_id".to_string(),
            });
        }
        let record_type = self.record_type.trim().to_string();
        if record_type.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "type".to_string(),
            });
        }
        Ok(Self {
            client_id,
            record_type,
            details: non_blank(self.details),
            receiver_id: non_blank(self.receiver_id),
            reception_at: self.reception_at,
        })
    }
}

/// Editable fields of an existing record. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordUpdate {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub details: Option<String>,
}

impl RecordUpdate {
    /// Rejects a type that is present but blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.record_type {
            Some(t) if t.trim().is_empty() => Err(ValidationError::MissingRequiredField {
                field: "type".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
