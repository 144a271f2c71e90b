//! Listing CRUD and the per-listing overview.

use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use crate::analytics::period::{Granularity, Period};
use crate::analytics::summary::summarize;
use crate::domain::listing::{Listing, ListingDetails, NewListing, PropertyType, TransactionType};
use crate::domain::types::{ListingId, ListingSlug};
use crate::dto::listings::{ListingDetailPageData, ListingsPageData};
use crate::forms::listings::{ListingForm, ListingsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CallListQuery, CallReader, CampaignReader, ListingListQuery, ListingReader, ListingWriter,
    WebLogQuery, WebLogReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const SLUG_ATTEMPTS: usize = 5;
const RECENT_CALLS: usize = 10;

/// Public address of a listing page.
pub fn public_url(domain: &str, slug: &ListingSlug) -> String {
    format!("https://{domain}/ponuda/{slug}")
}

pub fn list_listings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ListingsQuery,
) -> ServiceResult<ListingsPageData>
where
    R: ListingReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let archived = query.show_archived();
    let search_query = query
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let mut list_query = ListingListQuery::default()
        .archived(archived)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(search) = &search_query {
        list_query = list_query.search(search.as_str());
    }

    let (total, listings) = repo.list_listings(list_query)?;

    Ok(ListingsPageData {
        listings: Paginated::new(listings, page, total, DEFAULT_ITEMS_PER_PAGE),
        search_query,
        archived,
        property_types: PropertyType::ALL,
        transaction_types: TransactionType::ALL,
    })
}

/// Loads a listing with its campaigns, latest inquiries and 30-day traffic.
pub fn show_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    listing_id: i32,
    domain: &str,
) -> ServiceResult<ListingDetailPageData>
where
    R: ListingReader + CampaignReader + CallReader + WebLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let listing_id = ListingId::new(listing_id)?;
    let listing = repo
        .get_listing_by_id(listing_id)?
        .ok_or(ServiceError::NotFound)?;

    let campaigns = repo.list_campaigns(Some(listing_id))?;
    let (_, recent_calls) =
        repo.list_calls(CallListQuery::default().listing(listing_id).paginate(1, RECENT_CALLS))?;

    let range = Period::default().range(Utc::now().date_naive());
    let (_, events) = repo.list_web_log_events(WebLogQuery::new(range).listing(listing_id))?;
    let (_, calls) = repo.list_calls(CallListQuery::default().listing(listing_id).range(range))?;
    let summary = summarize(
        &range,
        Granularity::for_range(&range),
        &events,
        &calls,
        std::slice::from_ref(&listing),
    );

    Ok(ListingDetailPageData {
        price_per_m2: listing.price_per_m2(),
        public_url: public_url(domain, &listing.slug),
        listing,
        campaigns,
        recent_calls,
        summary,
        property_types: PropertyType::ALL,
        transaction_types: TransactionType::ALL,
    })
}

/// Persists a new listing owned by the current user under a fresh slug.
pub fn create_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ListingForm,
) -> ServiceResult<Listing>
where
    R: ListingReader + ListingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let details = ListingDetails::try_from(&form)?;
    let agent_id = user.user_id()?;

    for _ in 0..SLUG_ATTEMPTS {
        let suffix = Uuid::new_v4().simple().to_string();
        let slug = ListingSlug::from_title(details.title.as_str(), &suffix[..8]);
        if repo.get_listing_by_slug(slug.as_str())?.is_some() {
            continue;
        }

        let new_listing = NewListing::new(
            Some(agent_id),
            slug,
            details.clone(),
            form.publish_requested(),
        );
        match repo.create_listing(&new_listing) {
            Ok(listing) => {
                log::info!("Listing {} created by {}", listing.slug, user.email);
                return Ok(listing);
            }
            Err(err) if err.is_constraint_violation() => {
                log::warn!("Slug {} taken concurrently, retrying", new_listing.slug);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(ServiceError::Internal(
        "could not allocate a unique listing slug".to_string(),
    ))
}

/// Replaces the editable fields. The slug stays unchanged.
pub fn update_listing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    listing_id: i32,
    form: ListingForm,
) -> ServiceResult<Listing>
where
    R: ListingReader + ListingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let listing_id = ListingId::new(listing_id)?;
    let details = ListingDetails::try_from(&form)?;
    repo.get_listing_by_id(listing_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(repo.update_listing(listing_id, &details, now())?)
}

/// Moves a listing into or out of the archive. Archived listings are never
/// published.
pub fn toggle_archive<R>(repo: &R, user: &AuthenticatedUser, listing_id: i32) -> ServiceResult<Listing>
where
    R: ListingReader + ListingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let listing = load(repo, listing_id)?;
    let is_archived = !listing.is_archived;
    let is_published = listing.is_published && !is_archived;

    Ok(repo.set_listing_flags(listing.id, is_published, is_archived, now())?)
}

pub fn toggle_publish<R>(repo: &R, user: &AuthenticatedUser, listing_id: i32) -> ServiceResult<Listing>
where
    R: ListingReader + ListingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let listing = load(repo, listing_id)?;
    if listing.is_archived {
        return Err(ServiceError::Form(
            "Arhivirana ponuda ne može biti objavljena.".to_string(),
        ));
    }

    Ok(repo.set_listing_flags(listing.id, !listing.is_published, false, now())?)
}

/// Removes a listing together with its campaigns and tracked events.
pub fn delete_listing<R>(repo: &R, user: &AuthenticatedUser, listing_id: i32) -> ServiceResult<()>
where
    R: ListingWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let listing_id = ListingId::new(listing_id)?;
    repo.delete_listing(listing_id)?;
    log::info!("Listing {listing_id} deleted by {}", user.email);

    Ok(())
}

fn load<R>(repo: &R, listing_id: i32) -> ServiceResult<Listing>
where
    R: ListingReader + ?Sized,
{
    repo.get_listing_by_id(ListingId::new(listing_id)?)?
        .ok_or(ServiceError::NotFound)
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
