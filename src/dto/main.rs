use serde::Serialize;

use crate::analytics::summary::AnalyticsSummary;
use crate::dto::calls::CallRow;

/// Data required to render the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    /// Traffic of the last 30 days.
    pub summary: AnalyticsSummary,
    pub recent_calls: Vec<CallRow>,
    pub new_calls: usize,
    pub active_listings: usize,
}
