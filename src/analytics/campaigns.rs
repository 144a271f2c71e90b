//! Campaign funnel: traffic → interactions → inquiries, plus the
//! outbound contact progress of customers assigned to each campaign.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::analytics::percent;
use crate::analytics::period::DateRange;
use crate::domain::call::Call;
use crate::domain::campaign::{Campaign, CampaignChannel, ContactStatus, CustomerCampaign};
use crate::domain::listing::Listing;
use crate::domain::types::CampaignId;
use crate::domain::web_log::{WebEventType, WebLogEvent};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FunnelCounts {
    pub budget: f64,
    pub page_views: usize,
    pub unique_visitors: usize,
    pub clicks: usize,
    pub inquiries: usize,
    pub customers_assigned: usize,
    pub customers_contacted: usize,
    pub customers_interested: usize,
    /// Clicks per page view, in percent.
    pub click_through_rate: f64,
    /// Inquiries per unique visitor, in percent.
    pub conversion_rate: f64,
    /// Contacted per assigned customer, in percent.
    pub contact_rate: f64,
    /// Budget divided by inquiries; `None` without inquiries.
    pub cost_per_inquiry: Option<f64>,
}

impl FunnelCounts {
    fn finish(mut self) -> Self {
        self.click_through_rate = percent(self.clicks, self.page_views);
        self.conversion_rate = percent(self.inquiries, self.unique_visitors);
        self.contact_rate = percent(self.customers_contacted, self.customers_assigned);
        self.cost_per_inquiry = (self.inquiries > 0)
            .then(|| (self.budget / self.inquiries as f64 * 100.0).round() / 100.0);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignFunnel {
    pub campaign_id: i32,
    pub name: String,
    pub channel: CampaignChannel,
    pub utm_campaign: String,
    pub listing_id: i32,
    pub listing_title: String,
    pub is_active: bool,
    #[serde(flatten)]
    pub counts: FunnelCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignAnalytics {
    pub range: DateRange,
    pub campaigns: Vec<CampaignFunnel>,
    pub totals: FunnelCounts,
}

/// Resolves the campaign an event belongs to.
///
/// Events recorded with a campaign id keep it; older events without one are
/// matched by their `utm_campaign` code against campaigns of the same listing.
fn attribute(event: &WebLogEvent, campaigns: &[Campaign]) -> Option<CampaignId> {
    if event.campaign_id.is_some() {
        return event.campaign_id;
    }
    let code = event.utm.utm_campaign.as_deref()?;
    campaigns
        .iter()
        .find(|c| c.listing_id == event.listing_id && c.utm_campaign.as_str() == code)
        .map(|c| c.id)
}

/// Builds one funnel per campaign, in the order given, and a totals row.
///
/// Traffic and inquiries are limited to `range`; contact progress reflects
/// the current state of every assignment regardless of the window.
pub fn campaign_analytics(
    range: &DateRange,
    campaigns: &[Campaign],
    listings: &[Listing],
    events: &[WebLogEvent],
    calls: &[Call],
    contacts: &[CustomerCampaign],
) -> CampaignAnalytics {
    let mut views: HashMap<CampaignId, usize> = HashMap::new();
    let mut visitors: HashMap<CampaignId, HashSet<&str>> = HashMap::new();
    let mut clicks: HashMap<CampaignId, usize> = HashMap::new();
    for event in events.iter().filter(|e| range.contains(e.created_at)) {
        let Some(campaign_id) = attribute(event, campaigns) else {
            continue;
        };
        match event.event_type {
            WebEventType::PageView => {
                *views.entry(campaign_id).or_default() += 1;
                visitors
                    .entry(campaign_id)
                    .or_default()
                    .insert(event.visitor_id.as_str());
            }
            // Inquiries are counted from calls.
            WebEventType::FormSubmit => {}
            _ => *clicks.entry(campaign_id).or_default() += 1,
        }
    }

    let mut inquiries: HashMap<CampaignId, usize> = HashMap::new();
    for call in calls.iter().filter(|c| range.contains(c.created_at)) {
        if let Some(campaign_id) = call.campaign_id {
            *inquiries.entry(campaign_id).or_default() += 1;
        }
    }

    let mut assigned: HashMap<CampaignId, (usize, usize, usize)> = HashMap::new();
    for contact in contacts {
        let entry = assigned.entry(contact.campaign_id).or_default();
        entry.0 += 1;
        if contact.status.is_contacted() {
            entry.1 += 1;
        }
        if contact.status == ContactStatus::Interested {
            entry.2 += 1;
        }
    }

    let titles = listings
        .iter()
        .map(|l| (l.id, l.title.as_str()))
        .collect::<HashMap<_, _>>();

    let mut totals = FunnelCounts::default();
    let rows = campaigns
        .iter()
        .map(|campaign| {
            let (customers_assigned, customers_contacted, customers_interested) =
                assigned.get(&campaign.id).copied().unwrap_or_default();
            let counts = FunnelCounts {
                budget: campaign.budget.get(),
                page_views: views.get(&campaign.id).copied().unwrap_or_default(),
                unique_visitors: visitors.get(&campaign.id).map_or(0, HashSet::len),
                clicks: clicks.get(&campaign.id).copied().unwrap_or_default(),
                inquiries: inquiries.get(&campaign.id).copied().unwrap_or_default(),
                customers_assigned,
                customers_contacted,
                customers_interested,
                ..FunnelCounts::default()
            }
            .finish();

            totals.budget += counts.budget;
            totals.page_views += counts.page_views;
            totals.unique_visitors += counts.unique_visitors;
            totals.clicks += counts.clicks;
            totals.inquiries += counts.inquiries;
            totals.customers_assigned += counts.customers_assigned;
            totals.customers_contacted += counts.customers_contacted;
            totals.customers_interested += counts.customers_interested;

            CampaignFunnel {
                campaign_id: campaign.id.get(),
                name: campaign.name.to_string(),
                channel: campaign.channel,
                utm_campaign: campaign.utm_campaign.to_string(),
                listing_id: campaign.listing_id.get(),
                listing_title: titles
                    .get(&campaign.listing_id)
                    .map_or_else(|| format!("#{}", campaign.listing_id), |t| t.to_string()),
                is_active: campaign.is_active,
                counts,
            }
        })
        .collect();

    CampaignAnalytics {
        range: *range,
        campaigns: rows,
        totals: totals.finish(),
    }
}
