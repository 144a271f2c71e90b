use serde::Serialize;

use crate::analytics::campaigns::CampaignAnalytics;
use crate::analytics::period::{DateRange, PeriodPreset};
use crate::analytics::report::WebLogReport;
use crate::analytics::summary::AnalyticsSummary;
use crate::domain::listing::Listing;
use crate::domain::web_log::WebLogEvent;
use crate::pagination::Paginated;

/// Period selector state echoed back to every report screen.
#[derive(Debug, Serialize)]
pub struct PeriodSelection {
    pub key: &'static str,
    pub range: DateRange,
    /// Inclusive dates for the custom range inputs.
    pub from: String,
    pub to: String,
    pub presets: &'static [PeriodPreset],
}

#[derive(Debug, Serialize)]
pub struct SummaryPageData {
    pub period: PeriodSelection,
    pub summary: AnalyticsSummary,
    pub listings: Vec<Listing>,
    pub selected_listing: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct EventRow {
    pub event: WebLogEvent,
    pub listing_title: String,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct WebLogPageData {
    pub period: PeriodSelection,
    pub report: WebLogReport,
    pub events: Paginated<EventRow>,
    pub listings: Vec<Listing>,
    pub selected_listing: Option<i32>,
    pub selected_event_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CampaignAnalyticsPageData {
    pub period: PeriodSelection,
    pub analytics: CampaignAnalytics,
}
