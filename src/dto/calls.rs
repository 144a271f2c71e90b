use serde::Serialize;

use crate::domain::call::{Call, CallSource, CallStatus};
use crate::domain::listing::Listing;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct CallRow {
    pub call: Call,
    pub listing_title: Option<String>,
}

/// Data required to render the calls table and the manual entry form.
#[derive(Debug, Serialize)]
pub struct CallsPageData {
    pub calls: Paginated<CallRow>,
    pub listings: Vec<Listing>,
    pub status_filter: Option<CallStatus>,
    pub listing_filter: Option<i32>,
    pub statuses: &'static [CallStatus],
    pub sources: Vec<CallSource>,
}
