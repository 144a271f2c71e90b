//! Dashboard landing page.

use chrono::Utc;

use crate::SERVICE_ACCESS_ROLE;
use crate::analytics::period::Period;
use crate::domain::call::CallStatus;
use crate::dto::main::DashboardPageData;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CallListQuery, CallReader, ListingReader, WebLogReader};
use crate::services::analytics::summary_for_range;
use crate::services::calls::call_rows;
use crate::services::{ServiceResult, ensure_role};

const RECENT_CALLS: usize = 5;

/// Thirty-day summary, the latest inquiries and headline counters.
pub fn show_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardPageData>
where
    R: ListingReader + CallReader + WebLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let listings = repo.list_all_listings()?;
    let range = Period::default().range(Utc::now().date_naive());
    let summary = summary_for_range(repo, range, None, &listings)?;

    let (_, recent) = repo.list_calls(CallListQuery::default().paginate(1, RECENT_CALLS))?;
    let (new_calls, _) =
        repo.list_calls(CallListQuery::default().status(CallStatus::New).paginate(1, 1))?;
    let active_listings = listings.iter().filter(|l| !l.is_archived).count();

    Ok(DashboardPageData {
        summary,
        recent_calls: call_rows(recent, &listings),
        new_calls,
        active_listings,
    })
}
