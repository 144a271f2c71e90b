//! Dashboard headline numbers.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::analytics::period::{DateRange, Granularity};
use crate::analytics::{CountRow, percent, ranked};
use crate::domain::call::Call;
use crate::domain::listing::Listing;
use crate::domain::types::ListingId;
use crate::domain::web_log::{WebEventType, WebLogEvent};

const TOP_LISTINGS: usize = 5;
const TOP_SOURCES: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub label: String,
    pub page_views: usize,
    pub unique_visitors: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingViews {
    pub listing_id: i32,
    pub title: String,
    pub page_views: usize,
    pub unique_visitors: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub range: DateRange,
    pub granularity: Granularity,
    pub page_views: usize,
    pub unique_visitors: usize,
    pub interactions: usize,
    pub phone_clicks: usize,
    pub form_submits: usize,
    pub inquiries: usize,
    /// Inquiries per unique visitor, in percent.
    pub conversion_rate: f64,
    pub timeline: Vec<TimelinePoint>,
    pub top_listings: Vec<ListingViews>,
    pub events_by_type: Vec<CountRow>,
    pub top_sources: Vec<CountRow>,
}

/// Aggregates the events and calls that fall inside `range`.
///
/// `listings` supplies titles for the top-listings table; listings missing
/// from it are shown by id.
pub fn summarize(
    range: &DateRange,
    granularity: Granularity,
    events: &[WebLogEvent],
    calls: &[Call],
    listings: &[Listing],
) -> AnalyticsSummary {
    let events = events
        .iter()
        .filter(|e| range.contains(e.created_at))
        .collect::<Vec<_>>();
    let page_views = events
        .iter()
        .filter(|e| e.event_type == WebEventType::PageView)
        .collect::<Vec<_>>();

    let unique_visitors = page_views
        .iter()
        .map(|e| e.visitor_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let interactions = events.iter().filter(|e| e.event_type.is_interaction()).count();
    let phone_clicks = events
        .iter()
        .filter(|e| e.event_type == WebEventType::PhoneClick)
        .count();
    let form_submits = events
        .iter()
        .filter(|e| e.event_type == WebEventType::FormSubmit)
        .count();
    let inquiries = calls.iter().filter(|c| range.contains(c.created_at)).count();

    let mut timeline_index: HashMap<String, (usize, HashSet<&str>)> = HashMap::new();
    for event in &page_views {
        let entry = timeline_index
            .entry(granularity.label(event.created_at.date()))
            .or_default();
        entry.0 += 1;
        entry.1.insert(event.visitor_id.as_str());
    }
    let timeline = granularity
        .labels(range)
        .into_iter()
        .map(|label| {
            let (views, visitors) = timeline_index
                .get(&label)
                .map(|(views, visitors)| (*views, visitors.len()))
                .unwrap_or_default();
            TimelinePoint {
                label,
                page_views: views,
                unique_visitors: visitors,
            }
        })
        .collect();

    let mut per_listing: HashMap<ListingId, (usize, HashSet<&str>)> = HashMap::new();
    for event in &page_views {
        let entry = per_listing.entry(event.listing_id).or_default();
        entry.0 += 1;
        entry.1.insert(event.visitor_id.as_str());
    }
    let titles = listings
        .iter()
        .map(|l| (l.id, l.title.as_str()))
        .collect::<HashMap<_, _>>();
    let mut top_listings = per_listing
        .into_iter()
        .map(|(listing_id, (views, visitors))| ListingViews {
            listing_id: listing_id.get(),
            title: titles
                .get(&listing_id)
                .map_or_else(|| format!("#{listing_id}"), |t| t.to_string()),
            page_views: views,
            unique_visitors: visitors.len(),
        })
        .collect::<Vec<_>>();
    top_listings.sort_by(|a, b| {
        b.page_views
            .cmp(&a.page_views)
            .then_with(|| a.listing_id.cmp(&b.listing_id))
    });
    top_listings.truncate(TOP_LISTINGS);

    let mut by_type: HashMap<String, usize> = HashMap::new();
    for event in &events {
        *by_type.entry(event.event_type.to_string()).or_default() += 1;
    }

    let mut by_source: HashMap<String, usize> = HashMap::new();
    for event in &page_views {
        *by_source.entry(event.source()).or_default() += 1;
    }

    AnalyticsSummary {
        range: *range,
        granularity,
        page_views: page_views.len(),
        unique_visitors,
        interactions,
        phone_clicks,
        form_submits,
        inquiries,
        conversion_rate: percent(inquiries, unique_visitors),
        timeline,
        top_listings,
        events_by_type: ranked(by_type, None),
        top_sources: ranked(by_source, Some(TOP_SOURCES)),
    }
}
