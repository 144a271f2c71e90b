//! Workflow functions between HTTP handlers and the repositories.
//!
//! Every service is generic over the repository traits it needs so tests can
//! run against the mockall `MockRepository`.

use thiserror::Error;

use crate::forms::FormError;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod analytics;
pub mod api;
pub mod auth;
pub mod calls;
pub mod campaigns;
pub mod customers;
pub mod listings;
pub mod main;
pub mod public;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User facing validation message.
    #[error("{0}")]
    Form(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Returns `true` when `role` is among `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Fails with [`ServiceError::Unauthorized`] unless `user` holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::call::{Call, CallSource, CallStatus};
    use crate::domain::campaign::{Campaign, CampaignChannel};
    use crate::domain::listing::{Listing, PropertyType, TransactionType};
    use crate::domain::types::{
        Amount, CallId, CampaignId, CampaignName, CityName, ListingId, ListingSlug, ListingTitle,
        PersonName, PhoneNumber, SanitizedText, UtmCode,
    };
    use crate::models::auth::AuthenticatedUser;
    use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

    pub fn agent_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "agent@example.com".to_string(),
            name: "Agent".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    pub fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    pub fn outsider() -> AuthenticatedUser {
        AuthenticatedUser {
            roles: Vec::new(),
            ..agent_user()
        }
    }

    pub fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid test timestamp")
    }

    pub fn listing(id: i32, slug: &str) -> Listing {
        Listing {
            id: ListingId::new(id).unwrap(),
            agent_id: None,
            title: ListingTitle::new(format!("Stan {id}")).unwrap(),
            slug: ListingSlug::new(slug).unwrap(),
            description: SanitizedText::new("Opis"),
            property_type: PropertyType::Apartment,
            transaction_type: TransactionType::Sale,
            price: Amount::new(150_000.0).unwrap(),
            area: Some(Amount::new(60.0).unwrap()),
            rooms: Some(2),
            city: CityName::new("Zagreb").unwrap(),
            address: None,
            image_url: None,
            is_published: true,
            is_archived: false,
            created_at: ts(1, 8),
            updated_at: ts(1, 8),
        }
    }

    pub fn campaign(id: i32, listing_id: i32, code: &str) -> Campaign {
        Campaign {
            id: CampaignId::new(id).unwrap(),
            listing_id: ListingId::new(listing_id).unwrap(),
            name: CampaignName::new(format!("Kampanja {id}")).unwrap(),
            channel: CampaignChannel::Facebook,
            utm_campaign: UtmCode::new(code).unwrap(),
            budget: Amount::new(100.0).unwrap(),
            starts_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            ends_on: None,
            is_active: true,
            created_at: ts(1, 8),
        }
    }

    pub fn call(id: i32, listing_id: Option<i32>) -> Call {
        Call {
            id: CallId::new(id).unwrap(),
            listing_id: listing_id.map(|l| ListingId::new(l).unwrap()),
            campaign_id: None,
            name: PersonName::new("Marko").unwrap(),
            phone: PhoneNumber::new("+385911234567").unwrap(),
            email: None,
            message: None,
            source: CallSource::Phone,
            status: CallStatus::New,
            created_by: None,
            created_at: ts(2, 10),
        }
    }
}
