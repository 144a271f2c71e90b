//! Repository implementation for campaigns and customer contact tracking.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{
    domain::{
        campaign::{Campaign, CampaignDetails, ContactUpdate, CustomerCampaign},
        customer::Customer,
        types::{CampaignId, CustomerId, ListingId},
    },
    models::{
        campaign::{
            Campaign as DbCampaign, CampaignChanges as DbCampaignChanges,
            CustomerCampaign as DbCustomerCampaign, NewCustomerCampaign as DbNewCustomerCampaign,
            UpdateCustomerCampaign as DbUpdateCustomerCampaign,
        },
        customer::Customer as DbCustomer,
    },
    repository::{
        CampaignReader, CampaignWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
        into_domain,
    },
};

impl CampaignReader for DieselRepository {
    fn get_campaign_by_id(&self, id: CampaignId) -> RepositoryResult<Option<Campaign>> {
        use crate::schema::kampanja;

        let mut conn = self.conn()?;
        let db_campaign = kampanja::table
            .find(id.get())
            .first::<DbCampaign>(&mut conn)
            .optional()?;

        db_campaign
            .map(|campaign| Campaign::try_from(campaign).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_campaign_by_utm(&self, utm_campaign: &str) -> RepositoryResult<Option<Campaign>> {
        use crate::schema::kampanja;

        let mut conn = self.conn()?;
        let db_campaign = kampanja::table
            .filter(kampanja::utm_campaign.eq(utm_campaign))
            .first::<DbCampaign>(&mut conn)
            .optional()?;

        db_campaign
            .map(|campaign| Campaign::try_from(campaign).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_campaigns(&self, listing_id: Option<ListingId>) -> RepositoryResult<Vec<Campaign>> {
        use crate::schema::kampanja;

        let mut conn = self.conn()?;
        let mut items = kampanja::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(listing_id) = listing_id {
            items = items.filter(kampanja::listing_id.eq(listing_id.get()));
        }
        let campaigns = items
            .order((kampanja::starts_on.desc(), kampanja::id.desc()))
            .load::<DbCampaign>(&mut conn)?;

        into_domain(campaigns)
    }

    fn list_campaign_contacts(
        &self,
        campaign_id: CampaignId,
    ) -> RepositoryResult<Vec<(CustomerCampaign, Customer)>> {
        use crate::schema::{kupacimport, kupackampanja};

        let mut conn = self.conn()?;
        let rows = kupackampanja::table
            .inner_join(kupacimport::table)
            .filter(kupackampanja::campaign_id.eq(campaign_id.get()))
            .order((kupacimport::first_name.asc(), kupacimport::last_name.asc()))
            .select((DbCustomerCampaign::as_select(), DbCustomer::as_select()))
            .load::<(DbCustomerCampaign, DbCustomer)>(&mut conn)?;

        rows.into_iter()
            .map(|(contact, customer)| -> RepositoryResult<_> {
                Ok((
                    CustomerCampaign::try_from(contact)?,
                    Customer::try_from(customer)?,
                ))
            })
            .collect()
    }

    fn list_all_contacts(&self) -> RepositoryResult<Vec<CustomerCampaign>> {
        use crate::schema::kupackampanja;

        let mut conn = self.conn()?;
        let contacts = kupackampanja::table.load::<DbCustomerCampaign>(&mut conn)?;

        into_domain(contacts)
    }
}

impl CampaignWriter for DieselRepository {
    fn create_campaign(&self, details: &CampaignDetails) -> RepositoryResult<Campaign> {
        use crate::schema::kampanja;

        let mut conn = self.conn()?;
        let insertable: DbCampaignChanges = details.into();
        let db_campaign = diesel::insert_into(kampanja::table)
            .values(&insertable)
            .get_result::<DbCampaign>(&mut conn)?;

        Ok(Campaign::try_from(db_campaign)?)
    }

    fn update_campaign(
        &self,
        id: CampaignId,
        details: &CampaignDetails,
    ) -> RepositoryResult<Campaign> {
        use crate::schema::kampanja;

        let mut conn = self.conn()?;
        let changes: DbCampaignChanges = details.into();
        let db_campaign = diesel::update(kampanja::table.find(id.get()))
            .set(&changes)
            .get_result::<DbCampaign>(&mut conn)?;

        Ok(Campaign::try_from(db_campaign)?)
    }

    fn set_campaign_active(&self, id: CampaignId, is_active: bool) -> RepositoryResult<Campaign> {
        use crate::schema::kampanja;

        let mut conn = self.conn()?;
        let db_campaign = diesel::update(kampanja::table.find(id.get()))
            .set(kampanja::is_active.eq(is_active))
            .get_result::<DbCampaign>(&mut conn)?;

        Ok(Campaign::try_from(db_campaign)?)
    }

    fn delete_campaign(&self, id: CampaignId) -> RepositoryResult<()> {
        use crate::schema::{kampanja, kupackampanja, pozivi, webstrana_log};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::delete(kupackampanja::table.filter(kupackampanja::campaign_id.eq(id.get())))
                .execute(conn)?;
            diesel::update(webstrana_log::table.filter(webstrana_log::campaign_id.eq(id.get())))
                .set(webstrana_log::campaign_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::update(pozivi::table.filter(pozivi::campaign_id.eq(id.get())))
                .set(pozivi::campaign_id.eq(None::<i32>))
                .execute(conn)?;

            let deleted = diesel::delete(kampanja::table.find(id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }

    fn assign_customers(
        &self,
        campaign_id: CampaignId,
        customer_ids: &[CustomerId],
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::kupackampanja;

        if customer_ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let rows = customer_ids
            .iter()
            .map(|customer_id| DbNewCustomerCampaign {
                customer_id: customer_id.get(),
                campaign_id: campaign_id.get(),
                updated_at: now,
            })
            .collect::<Vec<_>>();

        let inserted = diesel::insert_or_ignore_into(kupackampanja::table)
            .values(&rows)
            .execute(&mut conn)?;

        Ok(inserted)
    }

    fn update_contact(
        &self,
        campaign_id: CampaignId,
        customer_id: CustomerId,
        update: &ContactUpdate,
        now: NaiveDateTime,
    ) -> RepositoryResult<CustomerCampaign> {
        use crate::schema::kupackampanja;

        let mut conn = self.conn()?;
        let changes = DbUpdateCustomerCampaign::new(update, now);
        let row = diesel::update(
            kupackampanja::table.find((customer_id.get(), campaign_id.get())),
        )
        .set(&changes)
        .get_result::<DbCustomerCampaign>(&mut conn)?;

        Ok(CustomerCampaign::try_from(row)?)
    }
}
