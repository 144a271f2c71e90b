use serde::Deserialize;
use validator::Validate;

use crate::domain::call::{CallSource, CallStatus};
use crate::domain::types::{
    CampaignId, EmailAddress, ListingId, PersonName, PhoneNumber, SanitizedText,
};
use crate::forms::{FormError, optional_text, parse_optional};

#[derive(Deserialize, Validate)]
/// Call or inquiry entered manually by a dashboard user.
pub struct AddCallForm {
    #[serde(default)]
    pub listing_id: String,
    #[serde(default)]
    pub campaign_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,
    pub source: String,
}

/// Validated [`AddCallForm`].
pub struct AddCallPayload {
    pub listing_id: Option<ListingId>,
    pub campaign_id: Option<CampaignId>,
    pub name: PersonName,
    pub phone: PhoneNumber,
    pub email: Option<EmailAddress>,
    pub message: Option<SanitizedText>,
    pub source: CallSource,
}

impl TryFrom<AddCallForm> for AddCallPayload {
    type Error = FormError;

    fn try_from(form: AddCallForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let source: CallSource = form.source.parse().map_err(FormError::for_field("izvor"))?;
        if source == CallSource::Web {
            // Web inquiries only come from the public listing page.
            return Err(FormError::InvalidField("izvor"));
        }

        Ok(Self {
            listing_id: parse_optional::<i32>(&form.listing_id, "ponuda")?
                .map(ListingId::new)
                .transpose()
                .map_err(FormError::for_field("ponuda"))?,
            campaign_id: parse_optional::<i32>(&form.campaign_id, "kampanja")?
                .map(CampaignId::new)
                .transpose()
                .map_err(FormError::for_field("kampanja"))?,
            name: PersonName::new(form.name).map_err(FormError::for_field("ime"))?,
            phone: PhoneNumber::new(form.phone).map_err(FormError::for_field("telefon"))?,
            email: optional_text(&form.email)
                .map(EmailAddress::new)
                .transpose()
                .map_err(FormError::for_field("email"))?,
            message: SanitizedText::non_empty(form.message),
            source,
        })
    }
}

#[derive(Deserialize)]
pub struct CallStatusForm {
    pub status: String,
}

impl TryFrom<&CallStatusForm> for CallStatus {
    type Error = FormError;

    fn try_from(form: &CallStatusForm) -> Result<Self, Self::Error> {
        form.status.parse().map_err(FormError::for_field("status"))
    }
}

#[derive(Debug, Default, Deserialize)]
/// Filters of the calls table.
pub struct CallsQuery {
    pub status: Option<String>,
    pub listing_id: Option<i32>,
    pub page: Option<usize>,
}
