//! Web-log traffic report grouped by listing, source and event type.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::analytics::period::DateRange;
use crate::analytics::{CountRow, percent, ranked};
use crate::domain::listing::Listing;
use crate::domain::types::ListingId;
use crate::domain::web_log::{WebEventType, WebLogEvent};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingTraffic {
    pub listing_id: i32,
    pub title: String,
    pub slug: Option<String>,
    pub page_views: usize,
    pub unique_visitors: usize,
    pub interactions: usize,
    pub form_submits: usize,
    /// Interactions per page view, in percent.
    pub interaction_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceTraffic {
    pub source: String,
    pub page_views: usize,
    pub unique_visitors: usize,
    pub interactions: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WebLogReport {
    pub range: DateRange,
    pub total_events: usize,
    pub listings: Vec<ListingTraffic>,
    pub sources: Vec<SourceTraffic>,
    pub event_types: Vec<CountRow>,
}

#[derive(Default)]
struct Tally<'a> {
    page_views: usize,
    visitors: HashSet<&'a str>,
    interactions: usize,
    form_submits: usize,
}

impl<'a> Tally<'a> {
    fn add(&mut self, event: &'a WebLogEvent) {
        match event.event_type {
            WebEventType::PageView => {
                self.page_views += 1;
                self.visitors.insert(event.visitor_id.as_str());
            }
            WebEventType::FormSubmit => {
                self.form_submits += 1;
                self.interactions += 1;
            }
            _ => self.interactions += 1,
        }
    }
}

/// Groups the events inside `range`.
///
/// Listing rows are ordered by page views (desc), sources likewise.
/// Listings with no traffic are left out.
pub fn web_log_report(range: &DateRange, events: &[WebLogEvent], listings: &[Listing]) -> WebLogReport {
    let events = events
        .iter()
        .filter(|e| range.contains(e.created_at))
        .collect::<Vec<_>>();

    let mut per_listing: HashMap<ListingId, Tally> = HashMap::new();
    let mut per_source: HashMap<String, Tally> = HashMap::new();
    let mut per_type: HashMap<String, usize> = HashMap::new();

    for event in &events {
        per_listing.entry(event.listing_id).or_default().add(*event);
        per_source.entry(event.source()).or_default().add(*event);
        *per_type.entry(event.event_type.to_string()).or_default() += 1;
    }

    let by_id = listings.iter().map(|l| (l.id, l)).collect::<HashMap<_, _>>();

    let mut listing_rows = per_listing
        .into_iter()
        .map(|(listing_id, tally)| {
            let listing = by_id.get(&listing_id);
            ListingTraffic {
                listing_id: listing_id.get(),
                title: listing.map_or_else(|| format!("#{listing_id}"), |l| l.title.to_string()),
                slug: listing.map(|l| l.slug.to_string()),
                page_views: tally.page_views,
                unique_visitors: tally.visitors.len(),
                interactions: tally.interactions,
                form_submits: tally.form_submits,
                interaction_rate: percent(tally.interactions, tally.page_views),
            }
        })
        .collect::<Vec<_>>();
    listing_rows.sort_by(|a, b| {
        b.page_views
            .cmp(&a.page_views)
            .then_with(|| a.listing_id.cmp(&b.listing_id))
    });

    let mut source_rows = per_source
        .into_iter()
        .map(|(source, tally)| SourceTraffic {
            source,
            page_views: tally.page_views,
            unique_visitors: tally.visitors.len(),
            interactions: tally.interactions,
        })
        .collect::<Vec<_>>();
    source_rows.sort_by(|a, b| {
        b.page_views
            .cmp(&a.page_views)
            .then_with(|| a.source.cmp(&b.source))
    });

    WebLogReport {
        range: *range,
        total_events: events.len(),
        listings: listing_rows,
        sources: source_rows,
        event_types: ranked(per_type, None),
    }
}
