//! Marketing campaigns (`kampanja`) and their customer contact tracking
//! (`kupackampanja`).

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::types::{
    Amount, CampaignId, CampaignName, CustomerId, ListingId, SanitizedText, TypeConstraintError,
    UtmCode, string_enum,
};

string_enum! {
    /// Advertising channel a campaign runs on.
    CampaignChannel {
        Facebook => "facebook",
        Instagram => "instagram",
        Google => "google",
        Email => "email",
        Portal => "portal",
        Other => "ostalo",
    }
}

string_enum! {
    /// Progress of contacting an imported customer within a campaign.
    ContactStatus {
        New => "novi",
        Contacted => "kontaktiran",
        Interested => "zainteresiran",
        NotInterested => "nezainteresiran",
        Unreachable => "nedostupan",
    }
}

impl ContactStatus {
    /// Any status past `novi` means somebody reached out.
    pub fn is_contacted(self) -> bool {
        !matches!(self, ContactStatus::New)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub listing_id: ListingId,
    pub name: CampaignName,
    pub channel: CampaignChannel,
    pub utm_campaign: UtmCode,
    pub budget: Amount,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Campaign {
    /// Campaign is active and `day` falls within its schedule.
    pub fn is_running_on(&self, day: NaiveDate) -> bool {
        self.is_active && self.starts_on <= day && self.ends_on.is_none_or(|end| day <= end)
    }
}

/// Validated date window of a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampaignSchedule {
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
}

impl CampaignSchedule {
    pub fn new(starts_on: NaiveDate, ends_on: Option<NaiveDate>) -> Result<Self, TypeConstraintError> {
        if matches!(ends_on, Some(end) if end < starts_on) {
            return Err(TypeConstraintError::InvalidValue(
                "campaign ends before it starts".to_string(),
            ));
        }
        Ok(Self { starts_on, ends_on })
    }

    pub fn starts_on(&self) -> NaiveDate {
        self.starts_on
    }

    pub fn ends_on(&self) -> Option<NaiveDate> {
        self.ends_on
    }
}

/// Editable campaign attributes shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignDetails {
    pub listing_id: ListingId,
    pub name: CampaignName,
    pub channel: CampaignChannel,
    pub utm_campaign: UtmCode,
    pub budget: Amount,
    pub schedule: CampaignSchedule,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CustomerCampaign {
    pub customer_id: CustomerId,
    pub campaign_id: CampaignId,
    pub status: ContactStatus,
    pub note: Option<SanitizedText>,
    pub contacted_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

/// Status change recorded for a customer within a campaign.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactUpdate {
    pub status: ContactStatus,
    pub note: Option<SanitizedText>,
    pub contacted_at: Option<NaiveDateTime>,
}

impl ContactUpdate {
    /// Stamps `contacted_at` with `now` unless the status is still `novi`.
    pub fn new(status: ContactStatus, note: Option<SanitizedText>, now: NaiveDateTime) -> Self {
        Self {
            status,
            note,
            contacted_at: status.is_contacted().then_some(now),
        }
    }
}
