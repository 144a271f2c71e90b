//! Web analytics events recorded for public listing pages (`webstrana_log`).

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CampaignId, ListingId, WebLogId};

/// Longest free-form text kept from request headers and query parameters.
pub const MAX_TRACKED_TEXT: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WebEventType {
    PageView,
    Click,
    PhoneClick,
    EmailClick,
    GalleryOpen,
    FormSubmit,
    Other(String),
}

impl WebEventType {
    pub fn as_str(&self) -> &str {
        match self {
            WebEventType::PageView => "page_view",
            WebEventType::Click => "click",
            WebEventType::PhoneClick => "phone_click",
            WebEventType::EmailClick => "email_click",
            WebEventType::GalleryOpen => "gallery_open",
            WebEventType::FormSubmit => "form_submit",
            WebEventType::Other(s) => s,
        }
    }

    /// Everything except a page view counts as an interaction.
    pub fn is_interaction(&self) -> bool {
        !matches!(self, WebEventType::PageView)
    }
}

impl Display for WebEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for WebEventType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "page_view" | "pageview" => WebEventType::PageView,
            "click" => WebEventType::Click,
            "phone_click" => WebEventType::PhoneClick,
            "email_click" => WebEventType::EmailClick,
            "gallery_open" => WebEventType::GalleryOpen,
            "form_submit" => WebEventType::FormSubmit,
            other => WebEventType::Other(other.to_string()),
        }
    }
}

impl From<String> for WebEventType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl Serialize for WebEventType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WebEventType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}

/// Campaign attribution parameters carried by a tracked request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UtmParams {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl UtmParams {
    /// Drops blank values and truncates oversized ones.
    pub fn normalized(self) -> Self {
        Self {
            utm_source: clean_text(self.utm_source),
            utm_medium: clean_text(self.utm_medium),
            utm_campaign: clean_text(self.utm_campaign),
        }
    }
}

/// Trims a tracked value, returning `None` for blanks and cutting it to
/// [`MAX_TRACKED_TEXT`] characters.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().chars().take(MAX_TRACKED_TEXT).collect::<String>())
        .filter(|v| !v.is_empty())
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WebLogEvent {
    pub id: WebLogId,
    pub listing_id: ListingId,
    pub campaign_id: Option<CampaignId>,
    pub event_type: WebEventType,
    pub visitor_id: String,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub utm: UtmParams,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

impl WebLogEvent {
    /// Traffic source: `utm_source`, else the referrer host, else `direct`.
    pub fn source(&self) -> String {
        if let Some(source) = &self.utm.utm_source {
            return source.to_lowercase();
        }
        self.referrer
            .as_deref()
            .and_then(referrer_host)
            .unwrap_or_else(|| "direct".to_string())
    }
}

/// Host part of a referrer URL without a leading `www.`.
pub fn referrer_host(referrer: &str) -> Option<String> {
    let without_scheme = referrer
        .split_once("://")
        .map_or(referrer, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() { None } else { Some(host) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewWebLogEvent {
    pub listing_id: ListingId,
    pub campaign_id: Option<CampaignId>,
    pub event_type: WebEventType,
    pub visitor_id: String,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub utm: UtmParams,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_known_and_custom_values() {
        assert_eq!(WebEventType::from("page_view"), WebEventType::PageView);
        assert_eq!(WebEventType::from("pageview"), WebEventType::PageView);
        assert_eq!(
            WebEventType::from("map_open"),
            WebEventType::Other("map_open".to_string())
        );
        assert_eq!(WebEventType::PhoneClick.to_string(), "phone_click");
        assert!(!WebEventType::PageView.is_interaction());
        assert!(WebEventType::Other("x".into()).is_interaction());
    }

    #[test]
    fn referrer_host_strips_scheme_path_and_www() {
        assert_eq!(
            referrer_host("https://www.Google.com/search?q=stan"),
            Some("google.com".to_string())
        );
        assert_eq!(
            referrer_host("http://user@m.facebook.com:443/x"),
            Some("m.facebook.com".to_string())
        );
        assert_eq!(referrer_host(""), None);
    }

    #[test]
    fn clean_text_drops_blank_and_truncates() {
        assert_eq!(clean_text(Some("   ".into())), None);
        assert_eq!(clean_text(Some(" fb ".into())), Some("fb".to_string()));
        let long = "x".repeat(MAX_TRACKED_TEXT + 10);
        assert_eq!(clean_text(Some(long)).map(|v| v.len()), Some(MAX_TRACKED_TEXT));
    }
}
