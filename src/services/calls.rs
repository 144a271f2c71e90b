//! Calls and inquiries recorded by agents.

use chrono::Utc;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::call::{Call, CallSource, CallStatus, NewCall};
use crate::domain::listing::Listing;
use crate::domain::types::{CallId, ListingId};
use crate::dto::calls::{CallRow, CallsPageData};
use crate::forms::calls::{AddCallForm, AddCallPayload, CallStatusForm, CallsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CallListQuery, CallReader, CallWriter, CampaignReader, ListingReader};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Attaches listing titles for the calls table.
pub fn call_rows(calls: Vec<Call>, listings: &[Listing]) -> Vec<CallRow> {
    calls
        .into_iter()
        .map(|call| CallRow {
            listing_title: call.listing_id.and_then(|id| {
                listings
                    .iter()
                    .find(|l| l.id == id)
                    .map(|l| l.title.to_string())
            }),
            call,
        })
        .collect()
}

pub fn list_calls<R>(repo: &R, user: &AuthenticatedUser, query: CallsQuery) -> ServiceResult<CallsPageData>
where
    R: CallReader + ListingReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let status_filter = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<CallStatus>().ok());
    let listing_filter = query.listing_id.and_then(|id| ListingId::new(id).ok());

    let mut list_query = CallListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(status) = status_filter {
        list_query = list_query.status(status);
    }
    if let Some(listing_id) = listing_filter {
        list_query = list_query.listing(listing_id);
    }

    let (total, calls) = repo.list_calls(list_query)?;
    let listings = repo.list_all_listings()?;
    let rows = call_rows(calls, &listings);

    Ok(CallsPageData {
        calls: Paginated::new(rows, page, total, DEFAULT_ITEMS_PER_PAGE),
        listings,
        status_filter,
        listing_filter: listing_filter.map(ListingId::get),
        statuses: CallStatus::ALL,
        sources: CallSource::ALL
            .iter()
            .copied()
            .filter(|s| *s != CallSource::Web)
            .collect(),
    })
}

/// Stores a manually entered call. A campaign implies its listing.
pub fn add_call<R>(repo: &R, user: &AuthenticatedUser, form: AddCallForm) -> ServiceResult<Call>
where
    R: CallWriter + ListingReader + CampaignReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let payload = AddCallPayload::try_from(form)?;

    let mut listing_id = payload.listing_id;
    if let Some(id) = listing_id {
        if repo.get_listing_by_id(id)?.is_none() {
            return Err(ServiceError::Form("Odabrana ponuda ne postoji.".to_string()));
        }
    }
    if let Some(campaign_id) = payload.campaign_id {
        let campaign = repo
            .get_campaign_by_id(campaign_id)?
            .ok_or_else(|| ServiceError::Form("Odabrana kampanja ne postoji.".to_string()))?;
        if listing_id.is_some_and(|id| id != campaign.listing_id) {
            return Err(ServiceError::Form(
                "Kampanja ne pripada odabranoj ponudi.".to_string(),
            ));
        }
        listing_id = Some(campaign.listing_id);
    }

    let new_call = NewCall {
        listing_id,
        campaign_id: payload.campaign_id,
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        message: payload.message,
        source: payload.source,
        created_by: Some(user.user_id()?),
        created_at: Utc::now().naive_utc(),
    };

    Ok(repo.create_call(&new_call)?)
}

pub fn update_call_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    call_id: i32,
    form: CallStatusForm,
) -> ServiceResult<Call>
where
    R: CallWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let status = CallStatus::try_from(&form)?;

    Ok(repo.update_call_status(CallId::new(call_id)?, status)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{agent_user, call, campaign, listing};

    fn form(listing_id: &str, campaign_id: &str) -> AddCallForm {
        AddCallForm {
            listing_id: listing_id.to_string(),
            campaign_id: campaign_id.to_string(),
            name: "Petra".to_string(),
            phone: "091 000 1111".to_string(),
            email: String::new(),
            message: String::new(),
            source: "telefon".to_string(),
        }
    }

    fn stored(new_call: &NewCall) -> Call {
        Call {
            listing_id: new_call.listing_id,
            campaign_id: new_call.campaign_id,
            created_by: new_call.created_by,
            ..call(9, None)
        }
    }

    #[test]
    fn campaign_fills_in_listing_and_author() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id()
            .returning(|id| Ok(Some(campaign(id.get(), 3, "ljeto"))));
        repo.expect_create_call()
            .withf(|new_call| {
                new_call.listing_id.map(ListingId::get) == Some(3)
                    && new_call.created_by.map(|id| id.get()) == Some(2)
                    && new_call.source == CallSource::Phone
            })
            .times(1)
            .returning(|new_call| Ok(stored(new_call)));

        let call = add_call(&repo, &agent_user(), form("", "6")).unwrap();

        assert_eq!(call.listing_id.map(ListingId::get), Some(3));
    }

    #[test]
    fn campaign_of_another_listing_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_id()
            .returning(|id| Ok(Some(listing(id.get(), "stan"))));
        repo.expect_get_campaign_by_id()
            .returning(|id| Ok(Some(campaign(id.get(), 3, "ljeto"))));
        repo.expect_create_call().times(0);

        assert!(matches!(
            add_call(&repo, &agent_user(), form("1", "6")),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn list_filters_and_titles_rows() {
        let mut repo = MockRepository::new();
        repo.expect_list_calls()
            .withf(|query| {
                query.status == Some(CallStatus::New) && query.listing_id.is_none()
            })
            .returning(|_| Ok((2, vec![call(1, Some(1)), call(2, None)])));
        repo.expect_list_all_listings()
            .returning(|| Ok(vec![listing(1, "stan")]));

        let query = CallsQuery {
            status: Some("novi".to_string()),
            listing_id: None,
            page: None,
        };
        let data = list_calls(&repo, &agent_user(), query).unwrap();

        assert_eq!(data.calls.items[0].listing_title.as_deref(), Some("Stan 1"));
        assert_eq!(data.calls.items[1].listing_title, None);
        assert!(!data.sources.contains(&CallSource::Web));
    }

    #[test]
    fn unknown_status_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_update_call_status().times(0);

        let form = CallStatusForm {
            status: "obrisan".to_string(),
        };

        assert!(matches!(
            update_call_status(&repo, &agent_user(), 1, form),
            Err(ServiceError::Form(_))
        ));
    }
}
