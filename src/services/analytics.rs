//! Report screens: traffic summary, web log and campaign funnels.

use chrono::{NaiveDate, Utc};

use crate::SERVICE_ACCESS_ROLE;
use crate::analytics::campaigns::campaign_analytics;
use crate::analytics::period::{DateRange, Granularity, Period, PeriodPreset};
use crate::analytics::report::web_log_report;
use crate::analytics::summary::{AnalyticsSummary, summarize};
use crate::domain::listing::Listing;
use crate::domain::types::ListingId;
use crate::dto::analytics::{
    CampaignAnalyticsPageData, EventRow, PeriodSelection, SummaryPageData, WebLogPageData,
};
use crate::forms::analytics::ReportQuery;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CallListQuery, CallReader, CampaignReader, ListingReader, WebLogQuery, WebLogReader,
};
use crate::services::{ServiceResult, ensure_role};

/// Resolves a period against `today` into what the selector shows.
pub fn period_selection(period: Period, today: NaiveDate) -> PeriodSelection {
    let range = period.range(today);
    PeriodSelection {
        key: period.key(),
        from: range.first_day().format("%Y-%m-%d").to_string(),
        to: range.last_day().format("%Y-%m-%d").to_string(),
        range,
        presets: PeriodPreset::ALL,
    }
}

/// Aggregated traffic and inquiries inside `range`, optionally for one listing.
pub fn summary_for_range<R>(
    repo: &R,
    range: DateRange,
    listing_id: Option<ListingId>,
    listings: &[Listing],
) -> ServiceResult<AnalyticsSummary>
where
    R: CallReader + WebLogReader + ?Sized,
{
    let mut events_query = WebLogQuery::new(range);
    let mut calls_query = CallListQuery::default().range(range);
    if let Some(id) = listing_id {
        events_query = events_query.listing(id);
        calls_query = calls_query.listing(id);
    }

    let (_, events) = repo.list_web_log_events(events_query)?;
    let (_, calls) = repo.list_calls(calls_query)?;

    Ok(summarize(
        &range,
        Granularity::for_range(&range),
        &events,
        &calls,
        listings,
    ))
}

pub fn summary<R>(repo: &R, user: &AuthenticatedUser, query: &ReportQuery) -> ServiceResult<SummaryPageData>
where
    R: ListingReader + CallReader + WebLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let period = period_selection(query.period()?, Utc::now().date_naive());
    let listing_id = query.listing_id();
    let listings = repo.list_all_listings()?;
    let summary = summary_for_range(repo, period.range, listing_id, &listings)?;

    Ok(SummaryPageData {
        period,
        summary,
        listings,
        selected_listing: listing_id.map(ListingId::get),
    })
}

/// Web log report over the whole period plus one page of the raw events,
/// filtered by listing and event type.
pub fn web_log<R>(repo: &R, user: &AuthenticatedUser, query: &ReportQuery) -> ServiceResult<WebLogPageData>
where
    R: ListingReader + WebLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let period = period_selection(query.period()?, Utc::now().date_naive());
    let listing_id = query.listing_id();
    let event_type = query.event_type().map(str::to_string);
    let page = query.page.unwrap_or(1);
    let listings = repo.list_all_listings()?;

    let mut report_query = WebLogQuery::new(period.range);
    if let Some(id) = listing_id {
        report_query = report_query.listing(id);
    }
    let mut table_query = report_query.clone().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(event_type) = &event_type {
        table_query = table_query.event_type(event_type.as_str());
    }

    let (_, events) = repo.list_web_log_events(report_query)?;
    let report = web_log_report(&period.range, &events, &listings);

    let (total, page_events) = repo.list_web_log_events(table_query)?;
    let rows = page_events
        .into_iter()
        .map(|event| EventRow {
            listing_title: listings
                .iter()
                .find(|l| l.id == event.listing_id)
                .map_or_else(|| format!("#{}", event.listing_id), |l| l.title.to_string()),
            source: event.source(),
            event,
        })
        .collect();

    Ok(WebLogPageData {
        period,
        report,
        events: Paginated::new(rows, page, total, DEFAULT_ITEMS_PER_PAGE),
        listings,
        selected_listing: listing_id.map(ListingId::get),
        selected_event_type: event_type,
    })
}

pub fn campaigns<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
) -> ServiceResult<CampaignAnalyticsPageData>
where
    R: ListingReader + CampaignReader + CallReader + WebLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let period = period_selection(query.period()?, Utc::now().date_naive());
    let campaigns = repo.list_campaigns(query.listing_id())?;
    let listings = repo.list_all_listings()?;
    let (_, events) = repo.list_web_log_events(WebLogQuery::new(period.range))?;
    let (_, calls) = repo.list_calls(CallListQuery::default().range(period.range))?;
    let contacts = repo.list_all_contacts()?;

    let analytics = campaign_analytics(
        &period.range,
        &campaigns,
        &listings,
        &events,
        &calls,
        &contacts,
    );

    Ok(CampaignAnalyticsPageData { period, analytics })
}
