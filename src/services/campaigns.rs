//! Campaign management and customer contact tracking.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};

use crate::analytics::campaigns::campaign_analytics;
use crate::analytics::period::DateRange;
use crate::domain::campaign::{
    Campaign, CampaignChannel, CampaignDetails, ContactStatus, ContactUpdate, CustomerCampaign,
};
use crate::domain::listing::Listing;
use crate::domain::types::{CampaignId, ListingId};
use crate::dto::campaigns::{CampaignDetailPageData, CampaignRow, CampaignsPageData, ContactRow};
use crate::forms::campaigns::{
    AssignCustomersForm, CampaignForm, CampaignsQuery, ContactStatusForm, ContactStatusPayload,
    campaign_id,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    CallListQuery, CallReader, CampaignReader, CampaignWriter, CustomerListQuery, CustomerReader,
    ListingReader, WebLogQuery, WebLogReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const DUPLICATE_CODE: &str = "Kampanja s tim UTM kodom već postoji.";

/// Link to share in the campaign channel.
pub fn tracking_url(domain: &str, listing: &Listing, campaign: &Campaign) -> String {
    format!(
        "https://{domain}/ponuda/{}?utm_source={}&utm_campaign={}",
        listing.slug, campaign.channel, campaign.utm_campaign
    )
}

pub fn list_campaigns<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CampaignsQuery,
) -> ServiceResult<CampaignsPageData>
where
    R: CampaignReader + ListingReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let selected = query.listing_id();
    let listings = repo.list_all_listings()?;
    let today = Utc::now().date_naive();

    let campaigns = repo
        .list_campaigns(selected)?
        .into_iter()
        .map(|campaign| CampaignRow {
            listing_title: listing_title(&listings, campaign.listing_id),
            is_running: campaign.is_running_on(today),
            campaign,
        })
        .collect();

    Ok(CampaignsPageData {
        campaigns,
        listings,
        selected_listing: selected.map(ListingId::get),
        channels: CampaignChannel::ALL,
    })
}

/// Loads a campaign with its funnel since launch, its contacts and the
/// customers that can still be assigned.
pub fn show_campaign<R>(
    repo: &R,
    user: &AuthenticatedUser,
    campaign_id_raw: i32,
    domain: &str,
) -> ServiceResult<CampaignDetailPageData>
where
    R: CampaignReader + ListingReader + CustomerReader + CallReader + WebLogReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let campaign = load(repo, campaign_id(campaign_id_raw)?)?;
    let listing = repo
        .get_listing_by_id(campaign.listing_id)?
        .ok_or(ServiceError::NotFound)?;

    let contacts = repo.list_campaign_contacts(campaign.id)?;
    let assigned = contacts
        .iter()
        .map(|(contact, _)| contact.customer_id)
        .collect::<HashSet<_>>();
    let (_, customers) = repo.list_customers(CustomerListQuery::default())?;
    let available_customers = customers
        .into_iter()
        .filter(|customer| !assigned.contains(&customer.id))
        .collect();

    let range = lifetime_range(&campaign, Utc::now().date_naive());
    let (_, events) = repo.list_web_log_events(WebLogQuery::new(range).listing(listing.id))?;
    let (_, calls) = repo.list_calls(CallListQuery::default().range(range))?;
    let contact_rows: Vec<CustomerCampaign> = contacts.iter().map(|(c, _)| c.clone()).collect();
    let funnel = campaign_analytics(
        &range,
        std::slice::from_ref(&campaign),
        std::slice::from_ref(&listing),
        &events,
        &calls,
        &contact_rows,
    )
    .campaigns
    .into_iter()
    .next();

    Ok(CampaignDetailPageData {
        tracking_url: tracking_url(domain, &listing, &campaign),
        contacts: contacts
            .into_iter()
            .map(|(contact, customer)| ContactRow { customer, contact })
            .collect(),
        listings: repo.list_all_listings()?,
        campaign,
        listing,
        funnel,
        available_customers,
        channels: CampaignChannel::ALL,
        statuses: ContactStatus::ALL,
    })
}

pub fn create_campaign<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CampaignForm,
) -> ServiceResult<Campaign>
where
    R: CampaignReader + CampaignWriter + ListingReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let details = CampaignDetails::try_from(&form)?;
    check_details(repo, &details, None)?;

    let campaign = repo.create_campaign(&details).map_err(|err| {
        if err.is_constraint_violation() {
            ServiceError::Form(DUPLICATE_CODE.to_string())
        } else {
            err.into()
        }
    })?;
    log::info!("Campaign {} created by {}", campaign.utm_campaign, user.email);

    Ok(campaign)
}

pub fn update_campaign<R>(
    repo: &R,
    user: &AuthenticatedUser,
    campaign_id_raw: i32,
    form: CampaignForm,
) -> ServiceResult<Campaign>
where
    R: CampaignReader + CampaignWriter + ListingReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = campaign_id(campaign_id_raw)?;
    load(repo, id)?;
    let details = CampaignDetails::try_from(&form)?;
    check_details(repo, &details, Some(id))?;

    Ok(repo.update_campaign(id, &details)?)
}

pub fn toggle_campaign_active<R>(
    repo: &R,
    user: &AuthenticatedUser,
    campaign_id_raw: i32,
) -> ServiceResult<Campaign>
where
    R: CampaignReader + CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let campaign = load(repo, campaign_id(campaign_id_raw)?)?;

    Ok(repo.set_campaign_active(campaign.id, !campaign.is_active)?)
}

pub fn delete_campaign<R>(
    repo: &R,
    user: &AuthenticatedUser,
    campaign_id_raw: i32,
) -> ServiceResult<()>
where
    R: CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let id = campaign_id(campaign_id_raw)?;
    repo.delete_campaign(id)?;
    log::info!("Campaign {id} deleted by {}", user.email);

    Ok(())
}

/// Adds the ticked customers with status `novi`. Returns how many were new.
pub fn assign_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    campaign_id_raw: i32,
    form: AssignCustomersForm,
) -> ServiceResult<usize>
where
    R: CampaignReader + CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let campaign = load(repo, campaign_id(campaign_id_raw)?)?;
    let customer_ids = form.customer_ids()?;
    if customer_ids.is_empty() {
        return Err(ServiceError::Form("Odaberite barem jednog kupca.".to_string()));
    }

    Ok(repo.assign_customers(campaign.id, &customer_ids, Utc::now().naive_utc())?)
}

pub fn update_contact_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    campaign_id_raw: i32,
    form: ContactStatusForm,
) -> ServiceResult<CustomerCampaign>
where
    R: CampaignWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = campaign_id(campaign_id_raw)?;
    let payload = ContactStatusPayload::try_from(form)?;
    let now = Utc::now().naive_utc();
    let update = ContactUpdate::new(payload.status, payload.note, now);

    Ok(repo.update_contact(id, payload.customer_id, &update, now)?)
}

fn load<R>(repo: &R, id: CampaignId) -> ServiceResult<Campaign>
where
    R: CampaignReader + ?Sized,
{
    repo.get_campaign_by_id(id)?.ok_or(ServiceError::NotFound)
}

/// Listing must exist and the tracking code must not belong to another campaign.
fn check_details<R>(repo: &R, details: &CampaignDetails, own_id: Option<CampaignId>) -> ServiceResult<()>
where
    R: CampaignReader + ListingReader + ?Sized,
{
    if repo.get_listing_by_id(details.listing_id)?.is_none() {
        return Err(ServiceError::Form("Odabrana ponuda ne postoji.".to_string()));
    }
    match repo.get_campaign_by_utm(details.utm_campaign.as_str())? {
        Some(existing) if Some(existing.id) != own_id => {
            Err(ServiceError::Form(DUPLICATE_CODE.to_string()))
        }
        _ => Ok(()),
    }
}

/// From launch until it ended or today, whichever comes first.
fn lifetime_range(campaign: &Campaign, today: NaiveDate) -> DateRange {
    let last = campaign
        .ends_on
        .map_or(today, |end| end.min(today))
        .max(campaign.starts_on);
    DateRange::from_dates(campaign.starts_on, last).unwrap_or(DateRange {
        start: campaign.created_at,
        end: campaign.created_at,
    })
}

fn listing_title(listings: &[Listing], id: ListingId) -> String {
    listings
        .iter()
        .find(|l| l.id == id)
        .map_or_else(|| format!("#{id}"), |l| l.title.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::customer::Customer;
    use crate::domain::types::{CustomerId, PersonName};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, agent_user, campaign, listing, ts};

    fn form(code: &str) -> CampaignForm {
        CampaignForm {
            listing_id: 1,
            name: "Proljetna akcija".to_string(),
            channel: "instagram".to_string(),
            utm_campaign: code.to_string(),
            budget: "250".to_string(),
            starts_on: "2025-03-01".to_string(),
            ends_on: "2025-03-31".to_string(),
        }
    }

    fn customer(id: i32) -> Customer {
        Customer {
            id: CustomerId::new(id).unwrap(),
            first_name: PersonName::new("Iva").unwrap(),
            last_name: "Horvat".to_string(),
            email: None,
            phone: None,
            city: None,
            note: None,
            import_batch: "import-20250301-080000".to_string(),
            created_at: ts(1, 8),
        }
    }

    fn contact(customer_id: i32, status: ContactStatus) -> CustomerCampaign {
        CustomerCampaign {
            customer_id: CustomerId::new(customer_id).unwrap(),
            campaign_id: CampaignId::new(4).unwrap(),
            status,
            note: None,
            contacted_at: None,
            updated_at: ts(2, 9),
        }
    }

    #[test]
    fn tracking_url_carries_channel_and_code() {
        let url = tracking_url("nekretnine.hr", &listing(1, "stan-centar"), &campaign(4, 1, "proljece"));
        assert_eq!(
            url,
            "https://nekretnine.hr/ponuda/stan-centar?utm_source=facebook&utm_campaign=proljece"
        );
    }

    #[test]
    fn create_derives_code_from_name() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_id()
            .returning(|id| Ok(Some(listing(id.get(), "stan"))));
        repo.expect_get_campaign_by_utm()
            .withf(|code| code == "proljetna-akcija")
            .returning(|_| Ok(None));
        repo.expect_create_campaign()
            .withf(|details| details.utm_campaign.as_str() == "proljetna-akcija")
            .times(1)
            .returning(|_| Ok(campaign(7, 1, "proljetna-akcija")));

        let created = create_campaign(&repo, &agent_user(), form("")).unwrap();

        assert_eq!(created.id.get(), 7);
    }

    #[test]
    fn duplicate_code_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_get_listing_by_id()
            .returning(|id| Ok(Some(listing(id.get(), "stan"))));
        repo.expect_get_campaign_by_utm()
            .returning(|code| Ok(Some(campaign(3, 1, code))));
        repo.expect_create_campaign().times(0);

        let result = create_campaign(&repo, &agent_user(), form("ljeto"));

        assert!(matches!(result, Err(ServiceError::Form(msg)) if msg == DUPLICATE_CODE));
    }

    #[test]
    fn update_may_keep_its_own_code() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id()
            .returning(|id| Ok(Some(campaign(id.get(), 1, "ljeto"))));
        repo.expect_get_listing_by_id()
            .returning(|id| Ok(Some(listing(id.get(), "stan"))));
        repo.expect_get_campaign_by_utm()
            .returning(|code| Ok(Some(campaign(3, 1, code))));
        repo.expect_update_campaign()
            .times(1)
            .returning(|id, _| Ok(campaign(id.get(), 1, "ljeto")));

        assert!(update_campaign(&repo, &agent_user(), 3, form("ljeto")).is_ok());
    }

    #[test]
    fn delete_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_campaign().times(1).returning(|_| Ok(()));

        assert!(matches!(
            delete_campaign(&repo, &agent_user(), 3),
            Err(ServiceError::Unauthorized)
        ));
        assert!(delete_campaign(&repo, &admin_user(), 3).is_ok());
    }

    #[test]
    fn assign_sends_deduplicated_ids() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id()
            .returning(|id| Ok(Some(campaign(id.get(), 1, "ljeto"))));
        repo.expect_assign_customers()
            .withf(|campaign_id, ids, _| {
                campaign_id.get() == 4
                    && ids.iter().map(|id| id.get()).collect::<Vec<_>>() == vec![2, 5]
            })
            .times(1)
            .returning(|_, ids, _| Ok(ids.len()));

        let form = AssignCustomersForm {
            customer_ids: vec![5, 2, 5],
        };

        assert_eq!(assign_customers(&repo, &agent_user(), 4, form).unwrap(), 2);
    }

    #[test]
    fn empty_assignment_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id()
            .returning(|id| Ok(Some(campaign(id.get(), 1, "ljeto"))));
        repo.expect_assign_customers().times(0);

        let form = AssignCustomersForm {
            customer_ids: vec![],
        };

        assert!(matches!(
            assign_customers(&repo, &agent_user(), 4, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn contact_status_other_than_new_stamps_contacted_at() {
        let mut repo = MockRepository::new();
        repo.expect_update_contact()
            .withf(|_, customer_id, update, now| {
                customer_id.get() == 2
                    && update.status == ContactStatus::Interested
                    && update.contacted_at == Some(*now)
                    && update.note.as_ref().map(|n| n.as_str()) == Some("Zove u petak")
            })
            .times(1)
            .returning(|_, customer_id, update, now| {
                Ok(CustomerCampaign {
                    customer_id,
                    campaign_id: CampaignId::new(4).unwrap(),
                    status: update.status,
                    note: update.note.clone(),
                    contacted_at: update.contacted_at,
                    updated_at: now,
                })
            });

        let form = ContactStatusForm {
            customer_id: 2,
            status: "zainteresiran".to_string(),
            note: "Zove u petak".to_string(),
        };

        let contact = update_contact_status(&repo, &agent_user(), 4, form).unwrap();
        assert!(contact.contacted_at.is_some());
    }

    #[test]
    fn show_lists_only_unassigned_customers() {
        let mut repo = MockRepository::new();
        repo.expect_get_campaign_by_id()
            .returning(|id| Ok(Some(campaign(id.get(), 1, "ljeto"))));
        repo.expect_get_listing_by_id()
            .returning(|id| Ok(Some(listing(id.get(), "stan-centar"))));
        repo.expect_list_campaign_contacts().returning(|_| {
            Ok(vec![(contact(1, ContactStatus::Contacted), customer(1))])
        });
        repo.expect_list_customers()
            .returning(|_| Ok((3, vec![customer(1), customer(2), customer(3)])));
        repo.expect_list_web_log_events()
            .returning(|_| Ok((0, vec![])));
        repo.expect_list_calls().returning(|_| Ok((0, vec![])));
        repo.expect_list_all_listings()
            .returning(|| Ok(vec![listing(1, "stan-centar")]));

        let data = show_campaign(&repo, &agent_user(), 4, "nekretnine.hr").unwrap();

        let available = data
            .available_customers
            .iter()
            .map(|c| c.id.get())
            .collect::<Vec<_>>();
        assert_eq!(available, vec![2, 3]);
        let funnel = data.funnel.unwrap();
        assert_eq!(funnel.counts.customers_assigned, 1);
        assert_eq!(funnel.counts.customers_contacted, 1);
    }

    #[test]
    fn lifetime_range_stops_at_end_date() {
        let mut c = campaign(1, 1, "x");
        c.ends_on = NaiveDate::from_ymd_opt(2025, 3, 10);
        let range = lifetime_range(&c, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(range.first_day(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(range.last_day(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }
}
