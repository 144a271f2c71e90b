use chrono::Utc;

use crate::SERVICE_ACCESS_ROLE;
use crate::analytics::summary::AnalyticsSummary;
use crate::dto::api::ListingsResponse;
use crate::forms::analytics::ReportQuery;
use crate::forms::listings::ListingsQuery;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{CallReader, ListingListQuery, ListingReader, WebLogReader};
use crate::services::analytics::summary_for_range;
use crate::services::{ServiceError, ServiceResult, check_role};

/// Listing search behind `GET /api/v1/listings`.
pub fn list_listings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ListingsQuery,
) -> ServiceResult<ListingsResponse>
where
    R: ListingReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = params.page.unwrap_or(1);
    let mut query = ListingListQuery::default()
        .archived(params.show_archived())
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search = params
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = search {
        query = query.search(term);
    }

    let (total, listings) = repo.list_listings(query)?;

    Ok(ListingsResponse {
        total,
        page,
        listings,
    })
}

/// Traffic summary behind `GET /api/v1/analytics/summary`.
pub fn summary<R>(repo: &R, user: &AuthenticatedUser, params: &ReportQuery) -> ServiceResult<AnalyticsSummary>
where
    R: ListingReader + CallReader + WebLogReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let range = params.period()?.range(Utc::now().date_naive());
    let listings = repo.list_all_listings()?;

    summary_for_range(repo, range, params.listing_id(), &listings)
}
