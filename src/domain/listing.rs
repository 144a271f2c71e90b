//! Property listings (`ponuda`).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{
    Amount, CityName, ImageUrl, ListingId, ListingSlug, ListingTitle, SanitizedText, UserId,
    string_enum,
};

string_enum! {
    /// Kind of property being offered.
    PropertyType {
        Apartment => "stan",
        House => "kuca",
        Land => "zemljiste",
        Commercial => "poslovni",
        Other => "ostalo",
    }
}

string_enum! {
    /// Whether the property is for sale or for rent.
    TransactionType {
        Sale => "prodaja",
        Rent => "najam",
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub agent_id: Option<UserId>,
    pub title: ListingTitle,
    pub slug: ListingSlug,
    pub description: SanitizedText,
    pub property_type: PropertyType,
    pub transaction_type: TransactionType,
    pub price: Amount,
    pub area: Option<Amount>,
    pub rooms: Option<i32>,
    pub city: CityName,
    pub address: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub is_published: bool,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Listing {
    /// Listing can be shown on the public page.
    pub fn is_public(&self) -> bool {
        self.is_published && !self.is_archived
    }

    /// Price per square metre when the area is known.
    pub fn price_per_m2(&self) -> Option<f64> {
        self.area
            .map(Amount::get)
            .filter(|area| *area > 0.0)
            .map(|area| (self.price.get() / area * 100.0).round() / 100.0)
    }
}

/// Editable listing attributes shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingDetails {
    pub title: ListingTitle,
    pub description: SanitizedText,
    pub property_type: PropertyType,
    pub transaction_type: TransactionType,
    pub price: Amount,
    pub area: Option<Amount>,
    pub rooms: Option<i32>,
    pub city: CityName,
    pub address: Option<String>,
    pub image_url: Option<ImageUrl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewListing {
    pub agent_id: Option<UserId>,
    pub slug: ListingSlug,
    pub details: ListingDetails,
    pub is_published: bool,
}

impl NewListing {
    #[must_use]
    pub fn new(
        agent_id: Option<UserId>,
        slug: ListingSlug,
        details: ListingDetails,
        is_published: bool,
    ) -> Self {
        Self {
            agent_id,
            slug,
            details,
            is_published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing(area: Option<f64>) -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: ListingId::new(1).unwrap(),
            agent_id: None,
            title: ListingTitle::new("Stan").unwrap(),
            slug: ListingSlug::new("stan").unwrap(),
            description: SanitizedText::default(),
            property_type: PropertyType::Apartment,
            transaction_type: TransactionType::Sale,
            price: Amount::new(150_000.0).unwrap(),
            area: area.map(|a| Amount::new(a).unwrap()),
            rooms: Some(2),
            city: CityName::new("Zagreb").unwrap(),
            address: None,
            image_url: None,
            is_published: true,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn archived_listing_is_not_public() {
        let mut l = listing(None);
        assert!(l.is_public());
        l.is_archived = true;
        assert!(!l.is_public());
    }

    #[test]
    fn price_per_m2_requires_positive_area() {
        assert_eq!(listing(Some(60.0)).price_per_m2(), Some(2500.0));
        assert_eq!(listing(Some(0.0)).price_per_m2(), None);
        assert_eq!(listing(None).price_per_m2(), None);
    }
}
