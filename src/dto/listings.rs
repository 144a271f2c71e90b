use serde::Serialize;

use crate::analytics::summary::AnalyticsSummary;
use crate::domain::call::Call;
use crate::domain::campaign::Campaign;
use crate::domain::listing::{Listing, PropertyType, TransactionType};
use crate::pagination::Paginated;

/// Data required to render the listings table.
#[derive(Debug, Serialize)]
pub struct ListingsPageData {
    pub listings: Paginated<Listing>,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    pub archived: bool,
    pub property_types: &'static [PropertyType],
    pub transaction_types: &'static [TransactionType],
}

/// Data required to render one listing with its campaigns and inquiries.
#[derive(Debug, Serialize)]
pub struct ListingDetailPageData {
    pub listing: Listing,
    pub price_per_m2: Option<f64>,
    pub public_url: String,
    pub campaigns: Vec<Campaign>,
    pub recent_calls: Vec<Call>,
    pub summary: AnalyticsSummary,
    pub property_types: &'static [PropertyType],
    pub transaction_types: &'static [TransactionType],
}
