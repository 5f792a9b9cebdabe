//! Dashboard summary.

use serde::{Deserialize, Serialize};

use super::record::ServiceRecord;

/// Number of recent records shown on the dashboard.
pub const RECENT_RECORD_LIMIT: u32 = 5;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clients: u64,
    pub pending_records: u64,
    pub processing_records: u64,
    /// Records completed since the start of the current UTC day.
    pub completed_today: u64,
    pub recent_records: Vec<ServiceRecord>,
}
