//! Diesel models for campaigns and customer assignments.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::campaign::{
    Campaign as DomainCampaign, CampaignDetails, ContactUpdate,
    CustomerCampaign as DomainCustomerCampaign,
};
use crate::domain::types::{
    Amount, CampaignId, CampaignName, CustomerId, ListingId, SanitizedText, TypeConstraintError,
    UtmCode,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::kampanja)]
/// Diesel model for [`crate::domain::campaign::Campaign`].
pub struct Campaign {
    pub id: i32,
    pub listing_id: i32,
    pub name: String,
    pub channel: String,
    pub utm_campaign: String,
    pub budget: f64,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::kampanja)]
#[diesel(treat_none_as_null = true)]
/// Insertable and update form of [`Campaign`].
pub struct CampaignChanges<'a> {
    pub listing_id: i32,
    pub name: &'a str,
    pub channel: &'a str,
    pub utm_campaign: &'a str,
    pub budget: f64,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::kupackampanja)]
#[diesel(primary_key(customer_id, campaign_id))]
/// Contact tracking row linking an imported customer to a campaign.
pub struct CustomerCampaign {
    pub customer_id: i32,
    pub campaign_id: i32,
    pub status: String,
    pub note: Option<String>,
    pub contacted_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::kupackampanja)]
pub struct NewCustomerCampaign {
    pub customer_id: i32,
    pub campaign_id: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::kupackampanja)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCustomerCampaign<'a> {
    pub status: &'a str,
    pub note: Option<&'a str>,
    pub contacted_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Campaign> for DomainCampaign {
    type Error = TypeConstraintError;

    fn try_from(campaign: Campaign) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CampaignId::try_from(campaign.id)?,
            listing_id: ListingId::try_from(campaign.listing_id)?,
            name: CampaignName::new(campaign.name)?,
            channel: campaign.channel.parse()?,
            utm_campaign: UtmCode::new(campaign.utm_campaign)?,
            budget: Amount::new(campaign.budget)?,
            starts_on: campaign.starts_on,
            ends_on: campaign.ends_on,
            is_active: campaign.is_active,
            created_at: campaign.created_at,
        })
    }
}

impl<'a> From<&'a CampaignDetails> for CampaignChanges<'a> {
    fn from(details: &'a CampaignDetails) -> Self {
        Self {
            listing_id: details.listing_id.get(),
            name: details.name.as_str(),
            channel: details.channel.as_str(),
            utm_campaign: details.utm_campaign.as_str(),
            budget: details.budget.get(),
            starts_on: details.schedule.starts_on(),
            ends_on: details.schedule.ends_on(),
        }
    }
}

impl TryFrom<CustomerCampaign> for DomainCustomerCampaign {
    type Error = TypeConstraintError;

    fn try_from(row: CustomerCampaign) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_id: CustomerId::try_from(row.customer_id)?,
            campaign_id: CampaignId::try_from(row.campaign_id)?,
            status: row.status.parse()?,
            note: row.note.and_then(SanitizedText::non_empty),
            contacted_at: row.contacted_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> UpdateCustomerCampaign<'a> {
    pub fn new(update: &'a ContactUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            status: update.status.as_str(),
            note: update.note.as_ref().map(SanitizedText::as_str),
            contacted_at: update.contacted_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::campaign::{CampaignChannel, CampaignSchedule, ContactStatus};

    #[test]
    fn campaign_into_domain() {
        let db = Campaign {
            id: 4,
            listing_id: 9,
            name: "Proljeće".into(),
            channel: "instagram".into(),
            utm_campaign: "proljece".into(),
            budget: 250.0,
            starts_on: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            ends_on: None,
            is_active: true,
            created_at: Utc::now().naive_utc(),
        };
        let domain = DomainCampaign::try_from(db).expect("valid campaign");
        assert_eq!(domain.channel, CampaignChannel::Instagram);
        assert_eq!(domain.listing_id.get(), 9);
    }

    #[test]
    fn details_into_changes() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let details = CampaignDetails {
            listing_id: ListingId::new(2).unwrap(),
            name: CampaignName::new("Ljeto").unwrap(),
            channel: CampaignChannel::Google,
            utm_campaign: UtmCode::new("ljeto").unwrap(),
            budget: Amount::new(99.5).unwrap(),
            schedule: CampaignSchedule::new(start, None).unwrap(),
        };
        let changes: CampaignChanges = (&details).into();
        assert_eq!(changes.channel, "google");
        assert_eq!(changes.starts_on, start);
        assert_eq!(changes.ends_on, None);
    }

    #[test]
    fn contact_row_into_domain() {
        let row = CustomerCampaign {
            customer_id: 1,
            campaign_id: 2,
            status: "zainteresiran".into(),
            note: Some("  ".into()),
            contacted_at: None,
            updated_at: Utc::now().naive_utc(),
        };
        let domain = DomainCustomerCampaign::try_from(row).unwrap();
        assert_eq!(domain.status, ContactStatus::Interested);
        assert_eq!(domain.note, None);
    }
}
