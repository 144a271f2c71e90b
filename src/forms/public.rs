use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{EmailAddress, PersonName, PhoneNumber, SanitizedText};
use crate::domain::web_log::{UtmParams, clean_text};
use crate::forms::{FormError, optional_text};

#[derive(Deserialize, Validate)]
/// Inquiry form on the public listing page.
pub struct InquiryForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,
    /// Tracking parameters carried over from the page URL as hidden inputs.
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
}

/// Validated [`InquiryForm`].
pub struct InquiryPayload {
    pub name: PersonName,
    pub phone: PhoneNumber,
    pub email: Option<EmailAddress>,
    pub message: Option<SanitizedText>,
    pub utm: UtmParams,
}

impl TryFrom<InquiryForm> for InquiryPayload {
    type Error = FormError;

    fn try_from(form: InquiryForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: PersonName::new(form.name).map_err(FormError::for_field("ime"))?,
            phone: PhoneNumber::new(form.phone).map_err(FormError::for_field("telefon"))?,
            email: optional_text(&form.email)
                .map(EmailAddress::new)
                .transpose()
                .map_err(FormError::for_field("email"))?,
            message: SanitizedText::non_empty(form.message),
            utm: UtmParams {
                utm_source: form.utm_source,
                utm_medium: form.utm_medium,
                utm_campaign: form.utm_campaign,
            }
            .normalized(),
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
/// Query string of the public listing page.
pub struct PublicPageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    /// Set on the redirect back from an inquiry; such views are not logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poslano: Option<String>,
}

impl PublicPageQuery {
    /// Query that brings the visitor back to the page after an inquiry,
    /// keeping the tracking parameters they arrived with.
    pub fn after_inquiry(form: &InquiryForm) -> Self {
        let utm = UtmParams {
            utm_source: form.utm_source.clone(),
            utm_medium: form.utm_medium.clone(),
            utm_campaign: form.utm_campaign.clone(),
        }
        .normalized();
        Self {
            utm_source: utm.utm_source,
            utm_medium: utm.utm_medium,
            utm_campaign: utm.utm_campaign,
            poslano: Some("1".to_string()),
        }
    }

    pub fn is_after_inquiry(&self) -> bool {
        self.poslano.is_some()
    }

    /// Page path with this query attached.
    pub fn page_path(&self, slug: &str) -> String {
        match serde_html_form::to_string(self) {
            Ok(query) if !query.is_empty() => format!("/ponuda/{slug}?{query}"),
            _ => format!("/ponuda/{slug}"),
        }
    }
}

impl From<PublicPageQuery> for UtmParams {
    fn from(query: PublicPageQuery) -> Self {
        UtmParams {
            utm_source: query.utm_source,
            utm_medium: query.utm_medium,
            utm_campaign: query.utm_campaign,
        }
        .normalized()
    }
}

#[derive(Debug, Deserialize)]
/// JSON body of `POST /api/v1/track`.
pub struct TrackEventRequest {
    pub slug: String,
    pub event_type: String,
    pub visitor_id: Option<String>,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl TrackEventRequest {
    pub fn utm(&self) -> UtmParams {
        UtmParams {
            utm_source: self.utm_source.clone(),
            utm_medium: self.utm_medium.clone(),
            utm_campaign: self.utm_campaign.clone(),
        }
        .normalized()
    }

    /// Event name trimmed and cut to the tracked text limit.
    pub fn event_type(&self) -> Option<String> {
        clean_text(Some(self.event_type.clone())).map(|e| e.to_lowercase())
    }
}
