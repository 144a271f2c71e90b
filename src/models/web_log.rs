//! Diesel models for web analytics events.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{CampaignId, ListingId, TypeConstraintError, WebLogId};
use crate::domain::web_log::{
    NewWebLogEvent as DomainNewWebLogEvent, UtmParams, WebLogEvent as DomainWebLogEvent,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::webstrana_log)]
pub struct WebLogEvent {
    pub id: i32,
    pub listing_id: i32,
    pub campaign_id: Option<i32>,
    pub event_type: String,
    pub visitor_id: String,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::webstrana_log)]
pub struct NewWebLogEvent<'a> {
    pub listing_id: i32,
    pub campaign_id: Option<i32>,
    pub event_type: &'a str,
    pub visitor_id: &'a str,
    pub path: Option<&'a str>,
    pub referrer: Option<&'a str>,
    pub utm_source: Option<&'a str>,
    pub utm_medium: Option<&'a str>,
    pub utm_campaign: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<WebLogEvent> for DomainWebLogEvent {
    type Error = TypeConstraintError;

    fn try_from(event: WebLogEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: WebLogId::try_from(event.id)?,
            listing_id: ListingId::try_from(event.listing_id)?,
            campaign_id: event.campaign_id.map(CampaignId::try_from).transpose()?,
            event_type: event.event_type.into(),
            visitor_id: event.visitor_id,
            path: event.path,
            referrer: event.referrer,
            utm: UtmParams {
                utm_source: event.utm_source,
                utm_medium: event.utm_medium,
                utm_campaign: event.utm_campaign,
            },
            user_agent: event.user_agent,
            created_at: event.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewWebLogEvent> for NewWebLogEvent<'a> {
    fn from(event: &'a DomainNewWebLogEvent) -> Self {
        Self {
            listing_id: event.listing_id.get(),
            campaign_id: event.campaign_id.map(CampaignId::get),
            event_type: event.event_type.as_str(),
            visitor_id: event.visitor_id.as_str(),
            path: event.path.as_deref(),
            referrer: event.referrer.as_deref(),
            utm_source: event.utm.utm_source.as_deref(),
            utm_medium: event.utm.utm_medium.as_deref(),
            utm_campaign: event.utm.utm_campaign.as_deref(),
            user_agent: event.user_agent.as_deref(),
            created_at: event.created_at,
        }
    }
}
