use serde::Serialize;

use crate::domain::listing::Listing;
use crate::domain::web_log::UtmParams;

/// Data required to render the public property page.
#[derive(Debug, Serialize)]
pub struct PublicListingPageData {
    pub listing: Listing,
    pub price_per_m2: Option<f64>,
    /// Tracking parameters carried into the inquiry form.
    pub utm: UtmParams,
}
