//! Reference catalog types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityAction, TargetType};

/// The ordered reference lists administrators maintain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// 서비스 유형
    ServiceType,
    /// 밴사
    VanCompany,
    /// 장비
    EquipmentType,
}

impl CatalogKind {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            CatalogKind::ServiceType => "service_types",
            CatalogKind::VanCompany => "van_companies",
            CatalogKind::EquipmentType => "equipment_types",
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            CatalogKind::ServiceType => TargetType::ServiceType,
            CatalogKind::VanCompany => TargetType::VanCompany,
            CatalogKind::EquipmentType => TargetType::EquipmentType,
        }
    }

    pub fn create_action(&self) -> ActivityAction {
        match self {
            CatalogKind::ServiceType => ActivityAction::CreateServiceType,
            CatalogKind::VanCompany => ActivityAction::CreateVanCompany,
            CatalogKind::EquipmentType => ActivityAction::CreateEquipmentType,
        }
    }

    pub fn delete_action(&self) -> ActivityAction {
        match self {
            CatalogKind::ServiceType => ActivityAction::DeleteServiceType,
            CatalogKind::VanCompany => ActivityAction::DeleteVanCompany,
            CatalogKind::EquipmentType => ActivityAction::DeleteEquipmentType,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target_type().as_str())
    }
}

/// One entry of a reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for a new catalog entry or client group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogInput {
    pub name: String,
    /// Position in the list. Appended to the end when absent.
    pub sort_order: Option<i64>,
}

impl CatalogInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sort_order: None,
        }
    }
}
