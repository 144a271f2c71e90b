use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::campaign::{CampaignDetails, CampaignSchedule, ContactStatus};
use crate::domain::types::{
    Amount, CampaignId, CampaignName, CustomerId, ListingId, SanitizedText, UtmCode,
};
use crate::forms::{FormError, optional_text, parse_optional};

#[derive(Deserialize, Validate)]
/// Create/edit form of a campaign.
pub struct CampaignForm {
    pub listing_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub channel: String,
    /// Tracking code; derived from the name when left blank.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub utm_campaign: String,
    #[serde(default)]
    pub budget: String,
    pub starts_on: String,
    #[serde(default)]
    pub ends_on: String,
}

impl TryFrom<&CampaignForm> for CampaignDetails {
    type Error = FormError;

    fn try_from(form: &CampaignForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = CampaignName::new(form.name.as_str()).map_err(FormError::for_field("naziv"))?;
        let utm_source = optional_text(&form.utm_campaign).unwrap_or(name.as_str());
        let utm_campaign = UtmCode::new(utm_source).map_err(FormError::for_field("UTM kod"))?;

        let budget = parse_optional::<f64>(&form.budget.replace(',', "."), "budžet")?
            .unwrap_or_default();
        let starts_on = parse_optional::<NaiveDate>(&form.starts_on, "početak")?
            .ok_or(FormError::Required("početak"))?;
        let ends_on = parse_optional::<NaiveDate>(&form.ends_on, "završetak")?;

        Ok(CampaignDetails {
            listing_id: ListingId::new(form.listing_id).map_err(FormError::for_field("ponuda"))?,
            name,
            channel: form.channel.parse().map_err(FormError::for_field("kanal"))?,
            utm_campaign,
            budget: Amount::new(budget).map_err(FormError::for_field("budžet"))?,
            schedule: CampaignSchedule::new(starts_on, ends_on)
                .map_err(|_| FormError::InvalidSchedule)?,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Customers ticked in the assignment table. Parsed with `serde_html_form`
/// because the checkbox name repeats.
pub struct AssignCustomersForm {
    #[serde(default)]
    pub customer_ids: Vec<i32>,
}

impl AssignCustomersForm {
    pub fn customer_ids(&self) -> Result<Vec<CustomerId>, FormError> {
        let mut ids = self
            .customer_ids
            .iter()
            .map(|id| CustomerId::new(*id).map_err(|_| FormError::InvalidField("kupac")))
            .collect::<Result<Vec<_>, _>>()?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

#[derive(Deserialize, Validate)]
/// Contact progress of one customer within a campaign.
pub struct ContactStatusForm {
    pub customer_id: i32,
    pub status: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub note: String,
}

/// Validated [`ContactStatusForm`].
pub struct ContactStatusPayload {
    pub customer_id: CustomerId,
    pub status: ContactStatus,
    pub note: Option<SanitizedText>,
}

impl TryFrom<ContactStatusForm> for ContactStatusPayload {
    type Error = FormError;

    fn try_from(form: ContactStatusForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            customer_id: CustomerId::new(form.customer_id)
                .map_err(|_| FormError::InvalidField("kupac"))?,
            status: form.status.parse().map_err(FormError::for_field("status"))?,
            note: SanitizedText::non_empty(form.note),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CampaignsQuery {
    pub listing_id: Option<i32>,
}

impl CampaignsQuery {
    pub fn listing_id(&self) -> Option<ListingId> {
        self.listing_id.and_then(|id| ListingId::new(id).ok())
    }
}

/// Campaign id taken from the URL path.
pub fn campaign_id(raw: i32) -> Result<CampaignId, FormError> {
    CampaignId::new(raw).map_err(|_| FormError::InvalidField("kampanja"))
}
