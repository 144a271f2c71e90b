//! Persistence traits and their Diesel implementation.

use chrono::NaiveDateTime;

use crate::analytics::period::DateRange;
use crate::db::{DbConnection, DbPool};
use crate::domain::call::{Call, CallStatus, NewCall};
use crate::domain::campaign::{Campaign, CampaignDetails, ContactUpdate, CustomerCampaign};
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::listing::{Listing, ListingDetails, NewListing};
use crate::domain::types::{CallId, CampaignId, CustomerId, EmailAddress, ListingId, UserId};
use crate::domain::user::{NewUser, User};
use crate::domain::web_log::{NewWebLogEvent, WebLogEvent};
use crate::repository::errors::RepositoryResult;

pub mod call;
pub mod campaign;
pub mod customer;
pub mod errors;
pub mod listing;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod user;
pub mod web_log;

#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Zero-based row offset; page numbers start at 1.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) as i64 * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingListQuery {
    pub search: Option<String>,
    pub archived: bool,
    pub pagination: Option<Pagination>,
}

impl ListingListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallListQuery {
    pub status: Option<CallStatus>,
    pub listing_id: Option<ListingId>,
    pub range: Option<DateRange>,
    pub pagination: Option<Pagination>,
}

impl CallListQuery {
    pub fn status(mut self, status: CallStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn listing(mut self, listing_id: ListingId) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Events inside `range`, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct WebLogQuery {
    pub range: DateRange,
    pub listing_id: Option<ListingId>,
    pub event_type: Option<String>,
    pub pagination: Option<Pagination>,
}

impl WebLogQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            listing_id: None,
            event_type: None,
            pagination: None,
        }
    }

    pub fn listing(mut self, listing_id: ListingId) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn set_user_active(&self, id: UserId, is_active: bool) -> RepositoryResult<User>;
}

pub trait ListingReader {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
    fn get_listing_by_slug(&self, slug: &str) -> RepositoryResult<Option<Listing>>;
    /// Total number of matches and the requested page.
    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)>;
    /// Every listing including archived ones, ordered by title.
    fn list_all_listings(&self) -> RepositoryResult<Vec<Listing>>;
}

pub trait ListingWriter {
    fn create_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing>;
    fn update_listing(
        &self,
        id: ListingId,
        details: &ListingDetails,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<Listing>;
    fn set_listing_flags(
        &self,
        id: ListingId,
        is_published: bool,
        is_archived: bool,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<Listing>;
    fn delete_listing(&self, id: ListingId) -> RepositoryResult<()>;
}

pub trait CampaignReader {
    fn get_campaign_by_id(&self, id: CampaignId) -> RepositoryResult<Option<Campaign>>;
    fn get_campaign_by_utm(&self, utm_campaign: &str) -> RepositoryResult<Option<Campaign>>;
    /// Campaigns of one listing, or all of them, newest first.
    fn list_campaigns(&self, listing_id: Option<ListingId>) -> RepositoryResult<Vec<Campaign>>;
    fn list_campaign_contacts(
        &self,
        campaign_id: CampaignId,
    ) -> RepositoryResult<Vec<(CustomerCampaign, Customer)>>;
    fn list_all_contacts(&self) -> RepositoryResult<Vec<CustomerCampaign>>;
}

pub trait CampaignWriter {
    fn create_campaign(&self, details: &CampaignDetails) -> RepositoryResult<Campaign>;
    fn update_campaign(
        &self,
        id: CampaignId,
        details: &CampaignDetails,
    ) -> RepositoryResult<Campaign>;
    fn set_campaign_active(&self, id: CampaignId, is_active: bool) -> RepositoryResult<Campaign>;
    fn delete_campaign(&self, id: CampaignId) -> RepositoryResult<()>;
    /// Inserts `novi` contact rows, skipping customers already assigned.
    /// Returns the number of new rows.
    fn assign_customers(
        &self,
        campaign_id: CampaignId,
        customer_ids: &[CustomerId],
        now: NaiveDateTime,
    ) -> RepositoryResult<usize>;
    fn update_contact(
        &self,
        campaign_id: CampaignId,
        customer_id: CustomerId,
        update: &ContactUpdate,
        now: NaiveDateTime,
    ) -> RepositoryResult<CustomerCampaign>;
}

pub trait CustomerReader {
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    /// `(email, phone)` of every stored customer, used for import deduplication.
    fn list_customer_contact_keys(
        &self,
    ) -> RepositoryResult<Vec<(Option<String>, Option<String>)>>;
}

pub trait CustomerWriter {
    fn create_customers(&self, customers: &[NewCustomer]) -> RepositoryResult<usize>;
    fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()>;
}

pub trait CallReader {
    /// Newest first.
    fn list_calls(&self, query: CallListQuery) -> RepositoryResult<(usize, Vec<Call>)>;
}

pub trait CallWriter {
    fn create_call(&self, new_call: &NewCall) -> RepositoryResult<Call>;
    fn update_call_status(&self, id: CallId, status: CallStatus) -> RepositoryResult<Call>;
}

pub trait WebLogReader {
    fn list_web_log_events(&self, query: WebLogQuery)
    -> RepositoryResult<(usize, Vec<WebLogEvent>)>;
}

pub trait WebLogWriter {
    fn create_web_log_event(&self, event: &NewWebLogEvent) -> RepositoryResult<WebLogEvent>;
}

/// Converts loaded rows into domain values, failing on the first invalid row.
fn into_domain<Row, T>(rows: Vec<Row>) -> RepositoryResult<Vec<T>>
where
    T: TryFrom<Row, Error = crate::domain::types::TypeConstraintError>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(errors::RepositoryError::from))
        .collect()
}
