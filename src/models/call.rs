//! Diesel models for calls and inquiries.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::call::{Call as DomainCall, NewCall as DomainNewCall};
use crate::domain::types::{
    CallId, CampaignId, EmailAddress, ListingId, PersonName, PhoneNumber, SanitizedText,
    TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::pozivi)]
/// Diesel model for [`crate::domain::call::Call`].
pub struct Call {
    pub id: i32,
    pub listing_id: Option<i32>,
    pub campaign_id: Option<i32>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: Option<String>,
    pub source: String,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pozivi)]
pub struct NewCall<'a> {
    pub listing_id: Option<i32>,
    pub campaign_id: Option<i32>,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub message: Option<&'a str>,
    pub source: &'a str,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Call> for DomainCall {
    type Error = TypeConstraintError;

    fn try_from(call: Call) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CallId::try_from(call.id)?,
            listing_id: call.listing_id.map(ListingId::try_from).transpose()?,
            campaign_id: call.campaign_id.map(CampaignId::try_from).transpose()?,
            name: PersonName::new(call.name)?,
            phone: PhoneNumber::new(call.phone)?,
            email: call.email.map(EmailAddress::new).transpose()?,
            message: call.message.and_then(SanitizedText::non_empty),
            source: call.source.parse()?,
            status: call.status.parse()?,
            created_by: call.created_by.map(UserId::try_from).transpose()?,
            created_at: call.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCall> for NewCall<'a> {
    fn from(call: &'a DomainNewCall) -> Self {
        Self {
            listing_id: call.listing_id.map(ListingId::get),
            campaign_id: call.campaign_id.map(CampaignId::get),
            name: call.name.as_str(),
            phone: call.phone.as_str(),
            email: call.email.as_ref().map(EmailAddress::as_str),
            message: call.message.as_ref().map(SanitizedText::as_str),
            source: call.source.as_str(),
            created_by: call.created_by.map(UserId::get),
            created_at: call.created_at,
        }
    }
}
