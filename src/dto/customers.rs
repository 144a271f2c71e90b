use serde::Serialize;

use crate::domain::customer::Customer;
use crate::pagination::Paginated;

#[derive(Debug, Serialize)]
pub struct CustomersPageData {
    pub customers: Paginated<Customer>,
    pub search_query: Option<String>,
}

/// Outcome of a CSV upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub import_batch: String,
    pub imported: usize,
    /// Rows without a first name plus duplicates.
    pub skipped: usize,
}
