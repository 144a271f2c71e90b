//! Customers imported from CSV files (`kupacimport`).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{CityName, CustomerId, EmailAddress, PersonName, PhoneNumber, SanitizedText};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: PersonName,
    pub last_name: String,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub city: Option<CityName>,
    pub note: Option<SanitizedText>,
    pub import_batch: String,
    pub created_at: NaiveDateTime,
}

impl Customer {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.to_string()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub first_name: PersonName,
    pub last_name: String,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub city: Option<CityName>,
    pub note: Option<SanitizedText>,
    pub import_batch: String,
}

impl NewCustomer {
    /// Two customers are the same person when they share an email or a phone.
    pub fn matches(&self, email: Option<&str>, phone: Option<&str>) -> bool {
        let same_email = matches!((self.email.as_ref(), email), (Some(a), Some(b)) if a.as_str() == b);
        let same_phone = matches!((self.phone.as_ref(), phone), (Some(a), Some(b)) if a.as_str() == b);
        same_email || same_phone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer(email: Option<&str>, phone: Option<&str>) -> NewCustomer {
        NewCustomer {
            first_name: PersonName::new("Ivana").unwrap(),
            last_name: "Kovač".to_string(),
            email: email.map(|e| EmailAddress::new(e).unwrap()),
            phone: phone.map(|p| PhoneNumber::new(p).unwrap()),
            city: None,
            note: None,
            import_batch: "test".to_string(),
        }
    }

    #[test]
    fn matches_on_email_or_phone() {
        let customer = new_customer(Some("ivana@example.com"), Some("+385911111111"));
        assert!(customer.matches(Some("ivana@example.com"), None));
        assert!(customer.matches(None, Some("+385911111111")));
        assert!(!customer.matches(Some("other@example.com"), Some("+385922222222")));
        assert!(!new_customer(None, None).matches(None, None));
    }
}
