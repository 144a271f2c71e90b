//! Customer list and CSV import.

use std::collections::HashSet;

use chrono::{NaiveDateTime, Utc};

use crate::domain::customer::NewCustomer;
use crate::domain::types::CustomerId;
use crate::dto::customers::{CustomersPageData, ImportReport};
use crate::forms::customers::{CustomersQuery, ParsedCustomers, UploadCustomersForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};
use crate::services::{ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Label stored with every customer of one upload.
pub fn batch_label(now: NaiveDateTime) -> String {
    now.format("import-%Y%m%d-%H%M%S").to_string()
}

pub fn list_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomersQuery,
) -> ServiceResult<CustomersPageData>
where
    R: CustomerReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let search_query = query
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let mut list_query = CustomerListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(search) = &search_query {
        list_query = list_query.search(search.as_str());
    }
    let (total, customers) = repo.list_customers(list_query)?;

    Ok(CustomersPageData {
        customers: Paginated::new(customers, page, total, DEFAULT_ITEMS_PER_PAGE),
        search_query,
    })
}

/// Reads the uploaded CSV and stores the new customers under a fresh batch label.
pub fn upload_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UploadCustomersForm,
) -> ServiceResult<ImportReport>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let import_batch = batch_label(Utc::now().naive_utc());
    let parsed = form.parse(&import_batch)?;

    import_customers(repo, parsed, import_batch)
}

/// Stores parsed customers, skipping anyone whose email or phone is already
/// known or appeared earlier in the same file.
pub fn import_customers<R>(
    repo: &R,
    parsed: ParsedCustomers,
    import_batch: String,
) -> ServiceResult<ImportReport>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let mut emails = HashSet::new();
    let mut phones = HashSet::new();
    for (email, phone) in repo.list_customer_contact_keys()? {
        emails.extend(email);
        phones.extend(phone);
    }

    let mut skipped = parsed.skipped;
    let mut fresh: Vec<NewCustomer> = Vec::with_capacity(parsed.customers.len());
    for customer in parsed.customers {
        let email = customer.email.as_ref().map(|e| e.as_str().to_string());
        let phone = customer.phone.as_ref().map(|p| p.as_str().to_string());
        let known = email.as_ref().is_some_and(|e| emails.contains(e))
            || phone.as_ref().is_some_and(|p| phones.contains(p));
        if known {
            skipped += 1;
            continue;
        }
        emails.extend(email);
        phones.extend(phone);
        fresh.push(customer);
    }

    let imported = if fresh.is_empty() {
        0
    } else {
        repo.create_customers(&fresh)?
    };
    log::info!("Customer import {import_batch}: {imported} imported, {skipped} skipped");

    Ok(ImportReport {
        import_batch,
        imported,
        skipped,
    })
}

pub fn delete_customer<R>(repo: &R, user: &AuthenticatedUser, customer_id: i32) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_customer(CustomerId::new(customer_id)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::forms::customers::parse_customers_csv;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::agent_user;

    #[test]
    fn batch_label_uses_timestamp() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(batch_label(now), "import-20250307-140509");
    }

    #[test]
    fn duplicates_within_file_and_database_are_skipped() {
        let csv = "ime;prezime;email;telefon\n\
                   Ana;Kovač;ana@example.com;\n\
                   Ana;Kovač;ANA@example.com;\n\
                   Ivo;Ivić;;091 234 5678\n\
                   Marko;Marić;marko@example.com;\n\
                   ;Bezimeni;x@example.com;\n";
        let parsed = parse_customers_csv(csv.as_bytes(), "import-1").unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_customer_contact_keys()
            .returning(|| Ok(vec![(Some("marko@example.com".to_string()), None)]));
        repo.expect_create_customers()
            .withf(|customers| {
                customers
                    .iter()
                    .map(|c| c.first_name.as_str())
                    .collect::<Vec<_>>()
                    == vec!["Ana", "Ivo"]
            })
            .times(1)
            .returning(|customers| Ok(customers.len()));

        let report = import_customers(&repo, parsed, "import-1".to_string()).unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 3);
    }

    #[test]
    fn nothing_new_skips_the_insert() {
        let mut repo = MockRepository::new();
        repo.expect_list_customer_contact_keys().returning(|| Ok(vec![]));
        repo.expect_create_customers().times(0);

        let report =
            import_customers(&repo, ParsedCustomers::default(), "import-2".to_string()).unwrap();

        assert_eq!(report.imported, 0);
    }

    #[test]
    fn list_requires_agent() {
        let repo = MockRepository::new();
        let mut user = agent_user();
        user.roles.clear();
        assert!(matches!(
            list_customers(&repo, &user, CustomersQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }
}
