//! Activity log types.
//!
//! Every mutation performed through the storage layer appends one
//! [`ActivityLog`] entry naming the actor, the action, and the target.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// What was done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    CreateClient,
    UpdateClient,
    DeleteClient,
    CreateRecord,
    UpdateRecord,
    StatusChange,
    DeleteRecord,
    Signup,
    UpdateProfile,
    RoleChange,
    ApproveUser,
    UpdatePermission,
    DeleteUser,
    CreateNotice,
    UpdateNotice,
    DeleteNotice,
    CreateGroup,
    DeleteGroup,
    CreateServiceType,
    DeleteServiceType,
    CreateVanCompany,
    DeleteVanCompany,
    CreateEquipmentType,
    DeleteEquipmentType,
}

impl ActivityAction {
    const ALL: [ActivityAction; 24] = [
        ActivityAction::CreateClient,
        ActivityAction::UpdateClient,
        ActivityAction::DeleteClient,
        ActivityAction::CreateRecord,
        ActivityAction::UpdateRecord,
        ActivityAction::StatusChange,
        ActivityAction::DeleteRecord,
        ActivityAction::Signup,
        ActivityAction::UpdateProfile,
        ActivityAction::RoleChange,
        ActivityAction::ApproveUser,
        ActivityAction::UpdatePermission,
        ActivityAction::DeleteUser,
        ActivityAction::CreateNotice,
        ActivityAction::UpdateNotice,
        ActivityAction::DeleteNotice,
        ActivityAction::CreateGroup,
        ActivityAction::DeleteGroup,
        ActivityAction::CreateServiceType,
        ActivityAction::DeleteServiceType,
        ActivityAction::CreateVanCompany,
        ActivityAction::DeleteVanCompany,
        ActivityAction::CreateEquipmentType,
        ActivityAction::DeleteEquipmentType,
    ];

    /// Returns the stored action code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::CreateClient => "CREATE_CLIENT",
            ActivityAction::UpdateClient => "UPDATE_CLIENT",
            ActivityAction::DeleteClient => "DELETE_CLIENT",
            ActivityAction::CreateRecord => "CREATE_RECORD",
            ActivityAction::UpdateRecord => "UPDATE_RECORD",
            ActivityAction::StatusChange => "STATUS_CHANGE",
            ActivityAction::DeleteRecord => "DELETE_RECORD",
            ActivityAction::Signup => "SIGNUP",
            ActivityAction::UpdateProfile => "UPDATE_PROFILE",
            ActivityAction::RoleChange => "ROLE_CHANGE",
            ActivityAction::ApproveUser => "APPROVE_USER",
            ActivityAction::UpdatePermission => "UPDATE_PERMISSION",
            ActivityAction::DeleteUser => "DELETE_USER",
            ActivityAction::CreateNotice => "CREATE_NOTICE",
            ActivityAction::UpdateNotice => "UPDATE_NOTICE",
            ActivityAction::DeleteNotice => "DELETE_NOTICE",
            ActivityAction::CreateGroup => "CREATE_GROUP",
            ActivityAction::DeleteGroup => "DELETE_GROUP",
            ActivityAction::CreateServiceType => "CREATE_SERVICE_TYPE",
            ActivityAction::DeleteServiceType => "DELETE_SERVICE_TYPE",
            ActivityAction::CreateVanCompany => "CREATE_VAN_COMPANY",
            ActivityAction::DeleteVanCompany => "DELETE_VAN_COMPANY",
            ActivityAction::CreateEquipmentType => "CREATE_EQUIPMENT_TYPE",
            ActivityAction::DeleteEquipmentType => "DELETE_EQUIPMENT_TYPE",
        }
    }

    /// Returns the Korean display label.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityAction::CreateClient => "거래처 등록",
            ActivityAction::UpdateClient => "거래처 수정",
            ActivityAction::DeleteClient => "거래처 삭제",
            ActivityAction::CreateRecord => "접수 등록",
            ActivityAction::UpdateRecord => "내역 수정",
            ActivityAction::StatusChange => "상태 변경",
            ActivityAction::DeleteRecord => "접수 삭제",
            ActivityAction::Signup => "회원 가입",
            ActivityAction::UpdateProfile => "정보 수정",
            ActivityAction::RoleChange => "역할 변경",
            ActivityAction::ApproveUser => "사용자 승인",
            ActivityAction::UpdatePermission => "권한 변경",
            ActivityAction::DeleteUser => "계정 삭제",
            ActivityAction::CreateNotice => "공지 등록",
            ActivityAction::UpdateNotice => "공지 수정",
            ActivityAction::DeleteNotice => "공지 삭제",
            ActivityAction::CreateGroup => "그룹 추가",
            ActivityAction::DeleteGroup => "그룹 삭제",
            ActivityAction::CreateServiceType => "유형 추가",
            ActivityAction::DeleteServiceType => "유형 삭제",
            ActivityAction::CreateVanCompany => "밴사 추가",
            ActivityAction::DeleteVanCompany => "밴사 삭제",
            ActivityAction::CreateEquipmentType => "장비 추가",
            ActivityAction::DeleteEquipmentType => "장비 삭제",
        }
    }

    /// Looks up an action by its stored code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == code)
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of entity an action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Client,
    Record,
    Profile,
    Notice,
    Group,
    ServiceType,
    VanCompany,
    EquipmentType,
    Auth,
}

impl TargetType {
    const ALL: [TargetType; 9] = [
        TargetType::Client,
        TargetType::Record,
        TargetType::Profile,
        TargetType::Notice,
        TargetType::Group,
        TargetType::ServiceType,
        TargetType::VanCompany,
        TargetType::EquipmentType,
        TargetType::Auth,
    ];

    /// Returns the stored code.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Client => "client",
            TargetType::Record => "record",
            TargetType::Profile => "profile",
            TargetType::Notice => "notice",
            TargetType::Group => "group",
            TargetType::ServiceType => "service_type",
            TargetType::VanCompany => "van_company",
            TargetType::EquipmentType => "equipment_type",
            TargetType::Auth => "auth",
        }
    }

    /// Returns the Korean display label.
    pub fn label(&self) -> &'static str {
        match self {
            TargetType::Client => "거래처",
            TargetType::Record => "접수 내역",
            TargetType::Profile => "사용자",
            TargetType::Notice => "공지사항",
            TargetType::Group => "그룹",
            TargetType::ServiceType => "서비스 유형",
            TargetType::VanCompany => "밴사",
            TargetType::EquipmentType => "장비",
            TargetType::Auth => "인증",
        }
    }

    /// Looks up a target type by its stored code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == code)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filter categories for the activity log view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    #[default]
    All,
    Client,
    Record,
    Profile,
    Notice,
    /// Reference catalogs and client groups (시스템 설정).
    System,
    Auth,
}

impl LogCategory {
    /// Parses a category code. Blank input means [`LogCategory::All`].
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "" | "all" => Ok(LogCategory::All),
            "client" => Ok(LogCategory::Client),
            "record" => Ok(LogCategory::Record),
            "profile" => Ok(LogCategory::Profile),
            "notice" => Ok(LogCategory::Notice),
            "system" => Ok(LogCategory::System),
            "auth" => Ok(LogCategory::Auth),
            other => Err(ValidationError::InvalidValue {
                field: "category".to_string(),
                message: format!("unknown log category '{other}'"),
            }),
        }
    }

    /// Target types in this category. Empty for [`LogCategory::All`].
    pub fn target_types(&self) -> &'static [TargetType] {
        match self {
            LogCategory::All => &[],
            LogCategory::Client => &[TargetType::Client],
            LogCategory::Record => &[TargetType::Record],
            LogCategory::Profile => &[TargetType::Profile],
            LogCategory::Notice => &[TargetType::Notice],
            LogCategory::System => &[
                TargetType::Group,
                TargetType::ServiceType,
                TargetType::VanCompany,
                TargetType::EquipmentType,
            ],
            LogCategory::Auth => &[TargetType::Auth],
        }
    }
}

/// A stored activity log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_display_name: Option<String>,
    pub action: ActivityAction,
    pub target_type: TargetType,
    pub target_id: Option<String>,
    /// Action-specific details, always a JSON object.
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

/// An activity about to be recorded. The actor is supplied separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub action: ActivityAction,
    pub target_type: TargetType,
    pub target_id: Option<String>,
    pub details: Value,
}

impl NewActivity {
    /// Creates an activity with empty details.
    pub fn new(
        action: ActivityAction,
        target_type: TargetType,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            action,
            target_type,
            target_id: Some(target_id.into()),
            details: Value::Object(Default::default()),
        }
    }

    /// Replaces the details object.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}
