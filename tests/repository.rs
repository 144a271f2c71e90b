use chrono::{NaiveDate, NaiveDateTime};
use nekretnine_crm::analytics::period::DateRange;
use nekretnine_crm::domain::call::{CallSource, CallStatus, NewCall};
use nekretnine_crm::domain::campaign::{
    CampaignChannel, CampaignDetails, CampaignSchedule, ContactStatus, ContactUpdate,
};
use nekretnine_crm::domain::customer::NewCustomer;
use nekretnine_crm::domain::listing::{
    Listing, ListingDetails, NewListing, PropertyType, TransactionType,
};
use nekretnine_crm::domain::types::{
    Amount, CampaignName, CityName, EmailAddress, ListingSlug, ListingTitle, PersonName,
    PhoneNumber, SanitizedText, UserName, UtmCode,
};
use nekretnine_crm::domain::user::{NewUser, UserRole};
use nekretnine_crm::domain::web_log::{NewWebLogEvent, UtmParams, WebEventType};
use nekretnine_crm::repository::{
    CallListQuery, CallReader, CallWriter, CampaignReader, CampaignWriter, CustomerListQuery,
    CustomerReader, CustomerWriter, DieselRepository, ListingListQuery, ListingReader,
    ListingWriter, UserReader, UserWriter, WebLogQuery, WebLogReader, WebLogWriter,
};

mod common;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn details(title: &str, city: &str) -> ListingDetails {
    ListingDetails {
        title: ListingTitle::new(title).unwrap(),
        description: SanitizedText::new("<p>Svijetao stan</p>"),
        property_type: PropertyType::Apartment,
        transaction_type: TransactionType::Sale,
        price: Amount::new(185_000.0).unwrap(),
        area: Some(Amount::new(62.0).unwrap()),
        rooms: Some(2),
        city: CityName::new(city).unwrap(),
        address: None,
        image_url: None,
    }
}

fn create_listing(repo: &DieselRepository, title: &str, slug: &str, city: &str) -> Listing {
    let new_listing = NewListing::new(
        None,
        ListingSlug::new(slug).unwrap(),
        details(title, city),
        true,
    );
    repo.create_listing(&new_listing).unwrap()
}

fn campaign_details(listing: &Listing, code: &str) -> CampaignDetails {
    CampaignDetails {
        listing_id: listing.id,
        name: CampaignName::new(format!("Kampanja {code}")).unwrap(),
        channel: CampaignChannel::Facebook,
        utm_campaign: UtmCode::new(code).unwrap(),
        budget: Amount::new(300.0).unwrap(),
        schedule: CampaignSchedule::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), None)
            .unwrap(),
    }
}

fn customer(first_name: &str, email: Option<&str>, phone: Option<&str>) -> NewCustomer {
    NewCustomer {
        first_name: PersonName::new(first_name).unwrap(),
        last_name: "Horvat".to_string(),
        email: email.map(|e| EmailAddress::new(e).unwrap()),
        phone: phone.map(|p| PhoneNumber::new(p).unwrap()),
        city: Some(CityName::new("Zagreb").unwrap()),
        note: None,
        import_batch: "import-20250301-090000".to_string(),
    }
}

fn page_view(listing: &Listing, visitor: &str, created_at: NaiveDateTime) -> NewWebLogEvent {
    NewWebLogEvent {
        listing_id: listing.id,
        campaign_id: None,
        event_type: WebEventType::PageView,
        visitor_id: visitor.to_string(),
        path: Some(format!("/ponuda/{}", listing.slug)),
        referrer: None,
        utm: UtmParams::default(),
        user_agent: None,
        created_at,
    }
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let new_user = NewUser::new(
        EmailAddress::new("Ana@Example.com").unwrap(),
        UserName::new("Ana").unwrap(),
        UserRole::Admin,
        "hash".to_string(),
    );
    let user = repo.create_user(&new_user).unwrap();
    assert!(user.is_active);
    assert_eq!(user.email.as_str(), "ana@example.com");

    let found = repo
        .get_user_by_email(&EmailAddress::new("ana@example.com").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);

    // Emails are unique.
    let err = repo.create_user(&new_user).unwrap_err();
    assert!(err.is_constraint_violation());

    let deactivated = repo.set_user_active(user.id, false).unwrap();
    assert!(!deactivated.is_active);
    assert_eq!(repo.list_users().unwrap().len(), 1);
}

#[test]
fn test_listing_repository_crud() {
    let test_db = common::TestDb::new("test_listing_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let split = create_listing(&repo, "Stan na Žnjanu", "stan-na-znjanu", "Split");
    let zagreb = create_listing(&repo, "Kuća u Dubravi", "kuca-u-dubravi", "Zagreb");

    let by_slug = repo.get_listing_by_slug("stan-na-znjanu").unwrap().unwrap();
    assert_eq!(by_slug.id, split.id);
    assert!(repo.get_listing_by_slug("nepostojeca").unwrap().is_none());

    let (total, items) = repo
        .list_listings(ListingListQuery::default().search("zagreb"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, zagreb.id);

    let updated = repo
        .update_listing(split.id, &details("Stan uz more", "Split"), at(2, 10))
        .unwrap();
    assert_eq!(updated.title.as_str(), "Stan uz more");
    assert_eq!(updated.slug, split.slug);

    let archived = repo
        .set_listing_flags(split.id, false, true, at(3, 10))
        .unwrap();
    assert!(archived.is_archived);
    assert!(!archived.is_public());

    let (active_total, _) = repo.list_listings(ListingListQuery::default()).unwrap();
    assert_eq!(active_total, 1);
    let (archived_total, _) = repo
        .list_listings(ListingListQuery::default().archived(true))
        .unwrap();
    assert_eq!(archived_total, 1);
    assert_eq!(repo.list_all_listings().unwrap().len(), 2);

    // Slugs are unique.
    let duplicate = NewListing::new(
        None,
        ListingSlug::new("kuca-u-dubravi").unwrap(),
        details("Druga kuća", "Zagreb"),
        false,
    );
    assert!(repo.create_listing(&duplicate).unwrap_err().is_constraint_violation());

    repo.delete_listing(zagreb.id).unwrap();
    assert!(repo.get_listing_by_id(zagreb.id).unwrap().is_none());
}

#[test]
fn test_campaign_contacts_and_listing_delete_cascade() {
    let test_db = common::TestDb::new("test_campaign_contacts.db");
    let repo = DieselRepository::new(test_db.pool());

    let listing = create_listing(&repo, "Stan Trešnjevka", "stan-tresnjevka", "Zagreb");
    let campaign = repo
        .create_campaign(&campaign_details(&listing, "proljece-fb"))
        .unwrap();
    assert!(campaign.is_active);
    assert_eq!(
        repo.get_campaign_by_utm("proljece-fb").unwrap().unwrap().id,
        campaign.id
    );
    assert!(
        repo.create_campaign(&campaign_details(&listing, "proljece-fb"))
            .unwrap_err()
            .is_constraint_violation()
    );

    repo.create_customers(&[
        customer("Ivana", Some("ivana@example.com"), None),
        customer("Marko", None, Some("091 234 5678")),
    ])
    .unwrap();
    let (_, customers) = repo.list_customers(CustomerListQuery::default()).unwrap();
    let ids = customers.iter().map(|c| c.id).collect::<Vec<_>>();

    assert_eq!(repo.assign_customers(campaign.id, &ids, at(1, 9)).unwrap(), 2);
    // Already assigned customers are skipped.
    assert_eq!(repo.assign_customers(campaign.id, &ids, at(1, 9)).unwrap(), 0);

    let update = ContactUpdate::new(ContactStatus::Interested, None, at(2, 11));
    let contact = repo
        .update_contact(campaign.id, ids[0], &update, at(2, 11))
        .unwrap();
    assert_eq!(contact.status, ContactStatus::Interested);
    assert_eq!(contact.contacted_at, Some(at(2, 11)));

    let contacts = repo.list_campaign_contacts(campaign.id).unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(repo.list_all_contacts().unwrap().len(), 2);

    let paused = repo.set_campaign_active(campaign.id, false).unwrap();
    assert!(!paused.is_active);

    repo.delete_listing(listing.id).unwrap();
    assert!(repo.get_campaign_by_id(campaign.id).unwrap().is_none());
    assert!(repo.list_all_contacts().unwrap().is_empty());
}

#[test]
fn test_customer_repository_search_and_keys() {
    let test_db = common::TestDb::new("test_customer_repository.db");
    let repo = DieselRepository::new(test_db.pool());

    let inserted = repo
        .create_customers(&[
            customer("Ivana", Some("ivana@example.com"), None),
            customer("Marko", None, Some("091 234 5678")),
            customer("Petra", Some("petra@example.com"), Some("098 765 4321")),
        ])
        .unwrap();
    assert_eq!(inserted, 3);

    let (total, items) = repo
        .list_customers(CustomerListQuery::default().search("Petra"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].full_name(), "Petra Horvat");

    let (page_total, page) = repo
        .list_customers(CustomerListQuery::default().paginate(2, 2))
        .unwrap();
    assert_eq!(page_total, 3);
    assert_eq!(page.len(), 1);

    let keys = repo.list_customer_contact_keys().unwrap();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&(None, Some("+385912345678".to_string()))));

    repo.delete_customer(items[0].id).unwrap();
    let (after, _) = repo.list_customers(CustomerListQuery::default()).unwrap();
    assert_eq!(after, 2);
}

#[test]
fn test_call_repository_filters() {
    let test_db = common::TestDb::new("test_call_repository.db");
    let repo = DieselRepository::new(test_db.pool());
    let listing = create_listing(&repo, "Stan Maksimir", "stan-maksimir", "Zagreb");

    let new_call = |day: u32, listing_id| NewCall {
        listing_id,
        campaign_id: None,
        name: PersonName::new("Luka").unwrap(),
        phone: PhoneNumber::new("+385 91 111 2222").unwrap(),
        email: None,
        message: Some(SanitizedText::new("Zanima me razgledavanje.")),
        source: CallSource::Phone,
        created_by: None,
        created_at: at(day, 12),
    };

    repo.create_call(&new_call(1, Some(listing.id))).unwrap();
    let second = repo.create_call(&new_call(5, Some(listing.id))).unwrap();
    repo.create_call(&new_call(10, None)).unwrap();
    assert_eq!(second.status, CallStatus::New);

    let (total, calls) = repo.list_calls(CallListQuery::default()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(calls[0].created_at, at(10, 12));

    let (for_listing, _) = repo
        .list_calls(CallListQuery::default().listing(listing.id))
        .unwrap();
    assert_eq!(for_listing, 2);

    let range = DateRange::from_dates(
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
    )
    .unwrap();
    let (in_range, calls_in_range) = repo.list_calls(CallListQuery::default().range(range)).unwrap();
    assert_eq!(in_range, 1);
    assert_eq!(calls_in_range[0].id, second.id);

    repo.update_call_status(second.id, CallStatus::Done).unwrap();
    let (done, _) = repo
        .list_calls(CallListQuery::default().status(CallStatus::Done))
        .unwrap();
    assert_eq!(done, 1);
}

#[test]
fn test_web_log_repository_range_and_type() {
    let test_db = common::TestDb::new("test_web_log_repository.db");
    let repo = DieselRepository::new(test_db.pool());
    let listing = create_listing(&repo, "Stan Vrbik", "stan-vrbik", "Zagreb");

    repo.create_web_log_event(&page_view(&listing, "v1", at(1, 8))).unwrap();
    repo.create_web_log_event(&page_view(&listing, "v2", at(3, 8))).unwrap();
    let click = repo
        .create_web_log_event(&NewWebLogEvent {
            event_type: WebEventType::PhoneClick,
            ..page_view(&listing, "v2", at(3, 9))
        })
        .unwrap();
    assert_eq!(click.event_type, WebEventType::PhoneClick);

    let range = DateRange::from_dates(
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    )
    .unwrap();
    let (total, events) = repo.list_web_log_events(WebLogQuery::new(range)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(events[0].id, click.id);

    let (clicks, _) = repo
        .list_web_log_events(WebLogQuery::new(range).event_type("phone_click"))
        .unwrap();
    assert_eq!(clicks, 1);

    let (paged_total, paged) = repo
        .list_web_log_events(WebLogQuery::new(range).listing(listing.id).paginate(2, 1))
        .unwrap();
    assert_eq!(paged_total, 2);
    assert_eq!(paged.len(), 1);
}
