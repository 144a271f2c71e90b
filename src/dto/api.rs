use serde::Serialize;

use crate::domain::listing::Listing;

/// Body of `GET /api/v1/listings`.
#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    /// Total number of listings matching the filter.
    pub total: usize,
    pub page: usize,
    pub listings: Vec<Listing>,
}

/// Body of every failed API call.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
