//! Public property page: visit tracking and inquiries.
//!
//! Nothing here requires a session; only published, non-archived listings
//! are reachable.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::call::{Call, CallSource, NewCall};
use crate::domain::listing::Listing;
use crate::domain::types::{CampaignId, ListingSlug};
use crate::domain::web_log::{NewWebLogEvent, UtmParams, WebEventType, WebLogEvent, clean_text};
use crate::dto::public::PublicListingPageData;
use crate::forms::public::{InquiryForm, InquiryPayload, TrackEventRequest};
use crate::repository::{CallWriter, CampaignReader, ListingReader, WebLogWriter};
use crate::services::{ServiceError, ServiceResult};

/// Request metadata stored with every tracked event.
#[derive(Clone, Debug, Default)]
pub struct Visit {
    /// Value of the visitor cookie, if the browser sent one.
    pub visitor_id: Option<String>,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub utm: UtmParams,
}

impl Visit {
    /// Cookie visitor id, or a fresh one for first-time visitors.
    pub fn visitor_id(&self) -> String {
        clean_text(self.visitor_id.clone()).unwrap_or_else(new_visitor_id)
    }
}

pub fn new_visitor_id() -> String {
    Uuid::new_v4().to_string()
}

/// Published listing behind `slug`; everything else is not found.
pub fn load_public_listing<R>(repo: &R, slug: &str) -> ServiceResult<Listing>
where
    R: ListingReader + ?Sized,
{
    let slug = ListingSlug::new(slug).map_err(|_| ServiceError::NotFound)?;
    repo.get_listing_by_slug(slug.as_str())?
        .filter(Listing::is_public)
        .ok_or(ServiceError::NotFound)
}

/// Campaign of `listing` whose tracking code is `utm.utm_campaign`.
pub fn resolve_campaign<R>(repo: &R, listing: &Listing, utm: &UtmParams) -> ServiceResult<Option<CampaignId>>
where
    R: CampaignReader + ?Sized,
{
    let Some(code) = utm.utm_campaign.as_deref() else {
        return Ok(None);
    };
    Ok(repo
        .get_campaign_by_utm(code)?
        .filter(|campaign| campaign.listing_id == listing.id)
        .map(|campaign| campaign.id))
}

fn record<R>(
    repo: &R,
    listing: &Listing,
    event_type: WebEventType,
    visitor_id: String,
    visit: &Visit,
    utm: UtmParams,
) -> ServiceResult<WebLogEvent>
where
    R: CampaignReader + WebLogWriter + ?Sized,
{
    let campaign_id = resolve_campaign(repo, listing, &utm)?;
    let event = NewWebLogEvent {
        listing_id: listing.id,
        campaign_id,
        event_type,
        visitor_id,
        path: clean_text(visit.path.clone()),
        referrer: clean_text(visit.referrer.clone()),
        utm,
        user_agent: clean_text(visit.user_agent.clone()),
        created_at: Utc::now().naive_utc(),
    };

    Ok(repo.create_web_log_event(&event)?)
}

/// Loads the page without logging anything.
pub fn listing_page<R>(repo: &R, slug: &str, visit: &Visit) -> ServiceResult<PublicListingPageData>
where
    R: ListingReader + ?Sized,
{
    let listing = load_public_listing(repo, slug)?;
    Ok(PublicListingPageData {
        price_per_m2: listing.price_per_m2(),
        listing,
        utm: visit.utm.clone().normalized(),
    })
}

/// Loads the page and records a `page_view` for `visitor_id`.
pub fn view_listing<R>(
    repo: &R,
    slug: &str,
    visitor_id: &str,
    visit: &Visit,
) -> ServiceResult<PublicListingPageData>
where
    R: ListingReader + CampaignReader + WebLogWriter + ?Sized,
{
    let data = listing_page(repo, slug, visit)?;

    record(
        repo,
        &data.listing,
        WebEventType::PageView,
        visitor_id.to_string(),
        visit,
        data.utm.clone(),
    )?;

    Ok(data)
}

/// Stores a web inquiry as a new call and logs a `form_submit` event.
///
/// Tracking parameters posted with the form win over those of the visit.
pub fn submit_inquiry<R>(
    repo: &R,
    slug: &str,
    form: InquiryForm,
    visitor_id: &str,
    visit: &Visit,
) -> ServiceResult<Call>
where
    R: ListingReader + CampaignReader + CallWriter + WebLogWriter + ?Sized,
{
    let listing = load_public_listing(repo, slug)?;
    let payload = InquiryPayload::try_from(form)?;

    let utm = if payload.utm.utm_campaign.is_some() || payload.utm.utm_source.is_some() {
        payload.utm
    } else {
        visit.utm.clone().normalized()
    };
    let campaign_id = resolve_campaign(repo, &listing, &utm)?;

    let new_call = NewCall {
        listing_id: Some(listing.id),
        campaign_id,
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        message: payload.message,
        source: CallSource::Web,
        created_by: None,
        created_at: Utc::now().naive_utc(),
    };
    let call = repo.create_call(&new_call)?;
    log::info!("Web inquiry {} for listing {}", call.id, listing.slug);

    record(
        repo,
        &listing,
        WebEventType::FormSubmit,
        visitor_id.to_string(),
        visit,
        utm,
    )?;

    Ok(call)
}

/// Records an event sent by the page script.
pub fn track_event<R>(repo: &R, request: TrackEventRequest, visit: &Visit) -> ServiceResult<WebLogEvent>
where
    R: ListingReader + CampaignReader + WebLogWriter + ?Sized,
{
    let listing = load_public_listing(repo, &request.slug)?;
    let event_type = request
        .event_type()
        .ok_or_else(|| ServiceError::Form("event_type is required".to_string()))?;

    let visitor_id = clean_text(request.visitor_id.clone()).unwrap_or_else(|| visit.visitor_id());
    let visit = Visit {
        path: request.path.clone().or_else(|| visit.path.clone()),
        referrer: request.referrer.clone().or_else(|| visit.referrer.clone()),
        ..visit.clone()
    };

    record(repo, &listing, event_type.into(), visitor_id, &visit, request.utm().normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CallId, WebLogId};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{call, campaign, listing, ts};

    fn stored_event(event: &NewWebLogEvent) -> WebLogEvent {
        WebLogEvent {
            id: WebLogId::new(1).unwrap(),
            listing_id: event.listing_id,
            campaign_id: event.campaign_id,
            event_type: event.event_type.clone(),
            visitor_id: event.visitor_id.clone(),
            path: event.path.clone(),
            referrer: event.referrer.clone(),
            utm: event.utm.clone(),
            user_agent: event.user_agent.clone(),
            created_at: ts(3, 12),
        }
    }

    fn visit_with_campaign(code: &str) -> Visit {
        Visit {
            visitor_id: Some("v-1".to_string()),
            path: Some("/ponuda/stan".to_string()),
            referrer: Some("https://l.facebook.com/".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            utm: UtmParams {
                utm_source: Some("facebook".to_string()),
                utm_medium: None,
                utm_campaign: Some(code.to_string()),
            },
        }
    }

    #[test]
    fn unpublished_listing_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug().returning(|slug| {
            Ok(Some(Listing {
                is_published: false,
                ..listing(1, slug)
            }))
        });
        repo.expect_create_web_log_event().times(0);

        let result = view_listing(&repo, "stan", "v-1", &Visit::default());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn listing_page_logs_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_create_web_log_event().times(0);

        let page = listing_page(&repo, "stan", &visit_with_campaign("ljeto")).unwrap();

        assert_eq!(page.utm.utm_campaign.as_deref(), Some("ljeto"));
    }

    #[test]
    fn malformed_slug_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug().times(0);

        assert!(matches!(
            load_public_listing(&repo, "Stan Centar!"),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn page_view_is_attributed_to_campaign_of_same_listing() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_get_campaign_by_utm()
            .returning(|code| Ok(Some(campaign(4, 1, code))));
        repo.expect_create_web_log_event()
            .withf(|event| {
                event.event_type == WebEventType::PageView
                    && event.campaign_id.map(CampaignId::get) == Some(4)
                    && event.visitor_id == "v-1"
                    && event.user_agent.as_deref() == Some("Mozilla/5.0")
            })
            .times(1)
            .returning(|event| Ok(stored_event(event)));

        let page = view_listing(&repo, "stan", "v-1", &visit_with_campaign("ljeto")).unwrap();

        assert_eq!(page.utm.utm_campaign.as_deref(), Some("ljeto"));
    }

    #[test]
    fn campaign_of_another_listing_is_ignored() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_get_campaign_by_utm()
            .returning(|code| Ok(Some(campaign(4, 2, code))));
        repo.expect_create_web_log_event()
            .withf(|event| event.campaign_id.is_none() && event.utm.utm_campaign.is_some())
            .times(1)
            .returning(|event| Ok(stored_event(event)));

        assert!(view_listing(&repo, "stan", "v-1", &visit_with_campaign("ljeto")).is_ok());
    }

    #[test]
    fn inquiry_creates_web_call_and_form_submit_event() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_get_campaign_by_utm()
            .returning(|code| Ok(Some(campaign(4, 1, code))));
        repo.expect_create_call()
            .withf(|new_call| {
                new_call.source == CallSource::Web
                    && new_call.created_by.is_none()
                    && new_call.campaign_id.map(CampaignId::get) == Some(4)
            })
            .times(1)
            .returning(|new_call| {
                Ok(Call {
                    id: CallId::new(8).unwrap(),
                    source: new_call.source,
                    campaign_id: new_call.campaign_id,
                    ..call(8, Some(1))
                })
            });
        repo.expect_create_web_log_event()
            .withf(|event| event.event_type == WebEventType::FormSubmit)
            .times(1)
            .returning(|event| Ok(stored_event(event)));

        let form = InquiryForm {
            name: "Lana".to_string(),
            phone: "091 555 0000".to_string(),
            email: String::new(),
            message: "Zanima me razgledavanje.".to_string(),
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
        };

        let call = submit_inquiry(&repo, "stan", form, "v-1", &visit_with_campaign("ljeto")).unwrap();

        assert_eq!(call.source, CallSource::Web);
    }

    #[test]
    fn invalid_inquiry_stores_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_create_call().times(0);
        repo.expect_create_web_log_event().times(0);

        let form = InquiryForm {
            name: "Lana".to_string(),
            phone: "nije broj".to_string(),
            email: String::new(),
            message: String::new(),
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
        };

        assert!(matches!(
            submit_inquiry(&repo, "stan", form, "v-1", &Visit::default()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn tracked_event_keeps_custom_type_and_falls_back_to_cookie_visitor() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_create_web_log_event()
            .withf(|event| {
                event.event_type == WebEventType::Other("map_open".to_string())
                    && event.visitor_id == "cookie-visitor"
                    && event.campaign_id.is_none()
            })
            .times(1)
            .returning(|event| Ok(stored_event(event)));

        let request = TrackEventRequest {
            slug: "stan".to_string(),
            event_type: " Map_Open ".to_string(),
            visitor_id: None,
            path: None,
            referrer: None,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
        };
        let visit = Visit {
            visitor_id: Some("cookie-visitor".to_string()),
            ..Visit::default()
        };

        assert!(track_event(&repo, request, &visit).is_ok());
    }

    #[test]
    fn blank_event_type_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_slug()
            .returning(|slug| Ok(Some(listing(1, slug))));
        repo.expect_create_web_log_event().times(0);

        let request = TrackEventRequest {
            slug: "stan".to_string(),
            event_type: "   ".to_string(),
            visitor_id: None,
            path: None,
            referrer: None,
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
        };

        assert!(matches!(
            track_event(&repo, request, &Visit::default()),
            Err(ServiceError::Form(_))
        ));
    }
}
