//! Client directory types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A management group clients can be assigned to (관리 그룹).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientGroup {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A client business (거래처).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    /// Business name (상호).
    pub name: String,
    /// Business registration number (사업자번호).
    pub biz_reg_no: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Contact person (담당자).
    pub manager: Option<String>,
    /// Card-terminal VAN company (밴사).
    pub van_company: Option<String>,
    /// Installed equipment (장비).
    pub equipment: Option<String>,
    pub group_id: Option<String>,
    /// Name of the assigned group, resolved on read.
    pub group_name: Option<String>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInput {
    pub name: String,
    pub biz_reg_no: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub manager: Option<String>,
    pub van_company: Option<String>,
    pub equipment: Option<String>,
    pub group_id: Option<String>,
    pub memo: Option<String>,
}

impl ClientInput {
    /// Creates input with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Trims every field, turning blank optionals into `None`, and checks
    /// that a name is present.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "name".to_string(),
            });
        }
        Ok(Self {
            name,
            biz_reg_no: non_blank(self.biz_reg_no),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            manager: non_blank(self.manager),
            van_company: non_blank(self.van_company),
            equipment: non_blank(self.equipment),
            group_id: non_blank(self.group_id),
            memo: non_blank(self.memo),
        })
    }
}

/// Trims an optional string, mapping blank values to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
