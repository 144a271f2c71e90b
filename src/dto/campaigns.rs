use serde::Serialize;

use crate::analytics::campaigns::CampaignFunnel;
use crate::domain::campaign::{Campaign, CampaignChannel, ContactStatus, CustomerCampaign};
use crate::domain::customer::Customer;
use crate::domain::listing::Listing;

#[derive(Debug, Serialize)]
pub struct CampaignRow {
    pub campaign: Campaign,
    pub listing_title: String,
    pub is_running: bool,
}

/// Data required to render the campaigns table and the add form.
#[derive(Debug, Serialize)]
pub struct CampaignsPageData {
    pub campaigns: Vec<CampaignRow>,
    pub listings: Vec<Listing>,
    pub selected_listing: Option<i32>,
    pub channels: &'static [CampaignChannel],
}

#[derive(Debug, Serialize)]
pub struct ContactRow {
    pub customer: Customer,
    pub contact: CustomerCampaign,
}

/// Data required to render one campaign with its funnel and contacts.
#[derive(Debug, Serialize)]
pub struct CampaignDetailPageData {
    pub campaign: Campaign,
    pub listing: Listing,
    pub tracking_url: String,
    pub funnel: Option<CampaignFunnel>,
    pub contacts: Vec<ContactRow>,
    /// Customers not yet assigned to this campaign.
    pub available_customers: Vec<Customer>,
    pub listings: Vec<Listing>,
    pub channels: &'static [CampaignChannel],
    pub statuses: &'static [ContactStatus],
}
