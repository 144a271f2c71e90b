//! Diesel models for property listings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::listing::{
    Listing as DomainListing, ListingDetails as DomainListingDetails,
    NewListing as DomainNewListing,
};
use crate::domain::types::{
    Amount, CityName, ImageUrl, ListingId, ListingSlug, ListingTitle, SanitizedText,
    TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::ponuda)]
/// Diesel model for [`crate::domain::listing::Listing`].
pub struct Listing {
    pub id: i32,
    pub agent_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub property_type: String,
    pub transaction_type: String,
    pub price: f64,
    pub area: Option<f64>,
    pub rooms: Option<i32>,
    pub city: String,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ponuda)]
/// Insertable form of [`Listing`].
pub struct NewListing<'a> {
    pub agent_id: Option<i32>,
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub property_type: &'a str,
    pub transaction_type: &'a str,
    pub price: f64,
    pub area: Option<f64>,
    pub rooms: Option<i32>,
    pub city: &'a str,
    pub address: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub is_published: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::ponuda)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Listing`] record.
pub struct UpdateListing<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub property_type: &'a str,
    pub transaction_type: &'a str,
    pub price: f64,
    pub area: Option<f64>,
    pub rooms: Option<i32>,
    pub city: &'a str,
    pub address: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Listing> for DomainListing {
    type Error = TypeConstraintError;

    fn try_from(listing: Listing) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ListingId::try_from(listing.id)?,
            agent_id: listing.agent_id.map(UserId::try_from).transpose()?,
            title: ListingTitle::new(listing.title)?,
            slug: ListingSlug::new(listing.slug)?,
            description: SanitizedText::new(listing.description),
            property_type: listing.property_type.parse()?,
            transaction_type: listing.transaction_type.parse()?,
            price: Amount::new(listing.price)?,
            area: listing.area.map(Amount::new).transpose()?,
            rooms: listing.rooms,
            city: CityName::new(listing.city)?,
            address: listing.address,
            image_url: listing.image_url.map(ImageUrl::new).transpose()?,
            is_published: listing.is_published,
            is_archived: listing.is_archived,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewListing> for NewListing<'a> {
    fn from(listing: &'a DomainNewListing) -> Self {
        let details = &listing.details;
        Self {
            agent_id: listing.agent_id.map(UserId::get),
            title: details.title.as_str(),
            slug: listing.slug.as_str(),
            description: details.description.as_str(),
            property_type: details.property_type.as_str(),
            transaction_type: details.transaction_type.as_str(),
            price: details.price.get(),
            area: details.area.map(Amount::get),
            rooms: details.rooms,
            city: details.city.as_str(),
            address: details.address.as_deref(),
            image_url: details.image_url.as_ref().map(ImageUrl::as_str),
            is_published: listing.is_published,
        }
    }
}

impl<'a> UpdateListing<'a> {
    pub fn new(details: &'a DomainListingDetails, updated_at: NaiveDateTime) -> Self {
        Self {
            title: details.title.as_str(),
            description: details.description.as_str(),
            property_type: details.property_type.as_str(),
            transaction_type: details.transaction_type.as_str(),
            price: details.price.get(),
            area: details.area.map(Amount::get),
            rooms: details.rooms,
            city: details.city.as_str(),
            address: details.address.as_deref(),
            image_url: details.image_url.as_ref().map(ImageUrl::as_str),
            updated_at,
        }
    }
}
