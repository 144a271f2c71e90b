//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::call::{Call, CallStatus, NewCall};
use crate::domain::campaign::{Campaign, CampaignDetails, ContactUpdate, CustomerCampaign};
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::listing::{Listing, ListingDetails, NewListing};
use crate::domain::types::{CallId, CampaignId, CustomerId, EmailAddress, ListingId, UserId};
use crate::domain::user::{NewUser, User};
use crate::domain::web_log::{NewWebLogEvent, WebLogEvent};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CallListQuery, CallReader, CallWriter, CampaignReader, CampaignWriter, CustomerListQuery,
    CustomerReader, CustomerWriter, ListingListQuery, ListingReader, ListingWriter, UserReader,
    UserWriter, WebLogQuery, WebLogReader, WebLogWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>>;
        fn list_users(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn set_user_active(&self, id: UserId, is_active: bool) -> RepositoryResult<User>;
    }

    impl ListingReader for Repository {
        fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
        fn get_listing_by_slug(&self, slug: &str) -> RepositoryResult<Option<Listing>>;
        fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)>;
        fn list_all_listings(&self) -> RepositoryResult<Vec<Listing>>;
    }

    impl ListingWriter for Repository {
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

    impl CampaignReader for Repository {
        fn get_campaign_by_id(&self, id: CampaignId) -> RepositoryResult<Option<Campaign>>;
        fn get_campaign_by_utm(&self, utm_campaign: &str) -> RepositoryResult<Option<Campaign>>;
        fn list_campaigns(&self, listing_id: Option<ListingId>) -> RepositoryResult<Vec<Campaign>>;
        fn list_campaign_contacts(
            &self,
            campaign_id: CampaignId,
        ) -> RepositoryResult<Vec<(CustomerCampaign, Customer)>>;
        fn list_all_contacts(&self) -> RepositoryResult<Vec<CustomerCampaign>>;
    }

    impl CampaignWriter for Repository {
        fn create_campaign(&self, details: &CampaignDetails) -> RepositoryResult<Campaign>;
        fn update_campaign(
            &self,
            id: CampaignId,
            details: &CampaignDetails,
        ) -> RepositoryResult<Campaign>;
        fn set_campaign_active(&self, id: CampaignId, is_active: bool) -> RepositoryResult<Campaign>;
        fn delete_campaign(&self, id: CampaignId) -> RepositoryResult<()>;
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

    impl CustomerReader for Repository {
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
        fn list_customer_contact_keys(
            &self,
        ) -> RepositoryResult<Vec<(Option<String>, Option<String>)>>;
    }

    impl CustomerWriter for Repository {
        fn create_customers(&self, customers: &[NewCustomer]) -> RepositoryResult<usize>;
        fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()>;
    }

    impl CallReader for Repository {
        fn list_calls(&self, query: CallListQuery) -> RepositoryResult<(usize, Vec<Call>)>;
    }

    impl CallWriter for Repository {
        fn create_call(&self, new_call: &NewCall) -> RepositoryResult<Call>;
        fn update_call_status(&self, id: CallId, status: CallStatus) -> RepositoryResult<Call>;
    }

    impl WebLogReader for Repository {
        fn list_web_log_events(
            &self,
            query: WebLogQuery,
        ) -> RepositoryResult<(usize, Vec<WebLogEvent>)>;
    }

    impl WebLogWriter for Repository {
        fn create_web_log_event(&self, event: &NewWebLogEvent) -> RepositoryResult<WebLogEvent>;
    }
}
