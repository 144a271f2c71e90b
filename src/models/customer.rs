//! Diesel models for imported customers.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer};
use crate::domain::types::{
    CityName, CustomerId, EmailAddress, PersonName, PhoneNumber, SanitizedText,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::kupacimport)]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub note: Option<String>,
    pub import_batch: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::kupacimport)]
pub struct NewCustomer<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub note: Option<&'a str>,
    pub import_batch: &'a str,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CustomerId::try_from(customer.id)?,
            first_name: PersonName::new(customer.first_name)?,
            last_name: customer.last_name,
            // Contact details imported before validation are shown as missing
            // instead of failing the whole listing.
            email: customer.email.and_then(|e| EmailAddress::new(e).ok()),
            phone: customer.phone.and_then(|p| PhoneNumber::new(p).ok()),
            city: customer.city.and_then(|c| CityName::new(c).ok()),
            note: customer.note.and_then(SanitizedText::non_empty),
            import_batch: customer.import_batch,
            created_at: customer.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(customer: &'a DomainNewCustomer) -> Self {
        Self {
            first_name: customer.first_name.as_str(),
            last_name: customer.last_name.as_str(),
            email: customer.email.as_ref().map(EmailAddress::as_str),
            phone: customer.phone.as_ref().map(PhoneNumber::as_str),
            city: customer.city.as_ref().map(CityName::as_str),
            note: customer.note.as_ref().map(SanitizedText::as_str),
            import_batch: customer.import_batch.as_str(),
        }
    }
}
