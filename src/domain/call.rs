//! Recorded calls and contact inquiries (`pozivi`).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    CallId, CampaignId, EmailAddress, ListingId, PersonName, PhoneNumber, SanitizedText, UserId,
    string_enum,
};

string_enum! {
    /// Channel through which the inquiry arrived.
    CallSource {
        Phone => "telefon",
        Web => "web",
        Email => "email",
        Other => "ostalo",
    }
}

string_enum! {
    /// Handling progress of an inquiry.
    CallStatus {
        New => "novi",
        InProgress => "u_obradi",
        Done => "zavrsen",
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Call {
    pub id: CallId,
    pub listing_id: Option<ListingId>,
    pub campaign_id: Option<CampaignId>,
    pub name: PersonName,
    pub phone: PhoneNumber,
    pub email: Option<EmailAddress>,
    pub message: Option<SanitizedText>,
    pub source: CallSource,
    pub status: CallStatus,
    pub created_by: Option<UserId>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCall {
    pub listing_id: Option<ListingId>,
    pub campaign_id: Option<CampaignId>,
    pub name: PersonName,
    pub phone: PhoneNumber,
    pub email: Option<EmailAddress>,
    pub message: Option<SanitizedText>,
    pub source: CallSource,
    pub created_by: Option<UserId>,
    pub created_at: NaiveDateTime,
}
