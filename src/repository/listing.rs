//! Repository implementation for property listings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{
    domain::{
        listing::{Listing, ListingDetails, NewListing},
        types::ListingId,
    },
    models::listing::{
        Listing as DbListing, NewListing as DbNewListing, UpdateListing as DbUpdateListing,
    },
    repository::{
        DieselRepository, ListingListQuery, ListingReader, ListingWriter,
        errors::{RepositoryError, RepositoryResult},
        into_domain,
    },
};

impl ListingReader for DieselRepository {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;
        let db_listing = ponuda::table
            .find(id.get())
            .first::<DbListing>(&mut conn)
            .optional()?;

        db_listing
            .map(|listing| Listing::try_from(listing).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_listing_by_slug(&self, slug: &str) -> RepositoryResult<Option<Listing>> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;
        let db_listing = ponuda::table
            .filter(ponuda::slug.eq(slug))
            .first::<DbListing>(&mut conn)
            .optional()?;

        db_listing
            .map(|listing| Listing::try_from(listing).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = ponuda::table
                .filter(ponuda::is_archived.eq(query.archived))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                let pattern = format!("%{search}%");
                items = items.filter(
                    ponuda::title
                        .like(pattern.clone())
                        .or(ponuda::city.like(pattern.clone()))
                        .or(ponuda::address.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(ponuda::updated_at.desc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let listings = items.load::<DbListing>(&mut conn)?;

        Ok((total, into_domain(listings)?))
    }

    fn list_all_listings(&self) -> RepositoryResult<Vec<Listing>> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;
        let listings = ponuda::table
            .order(ponuda::title.asc())
            .load::<DbListing>(&mut conn)?;

        into_domain(listings)
    }
}

impl ListingWriter for DieselRepository {
    fn create_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;
        let insertable: DbNewListing = new_listing.into();
        let db_listing = diesel::insert_into(ponuda::table)
            .values(&insertable)
            .get_result::<DbListing>(&mut conn)?;

        Ok(Listing::try_from(db_listing)?)
    }

    fn update_listing(
        &self,
        id: ListingId,
        details: &ListingDetails,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<Listing> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;
        let changes = DbUpdateListing::new(details, updated_at);
        let db_listing = diesel::update(ponuda::table.find(id.get()))
            .set(&changes)
            .get_result::<DbListing>(&mut conn)?;

        Ok(Listing::try_from(db_listing)?)
    }

    fn set_listing_flags(
        &self,
        id: ListingId,
        is_published: bool,
        is_archived: bool,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<Listing> {
        use crate::schema::ponuda;

        let mut conn = self.conn()?;
        let db_listing = diesel::update(ponuda::table.find(id.get()))
            .set((
                ponuda::is_published.eq(is_published),
                ponuda::is_archived.eq(is_archived),
                ponuda::updated_at.eq(updated_at),
            ))
            .get_result::<DbListing>(&mut conn)?;

        Ok(Listing::try_from(db_listing)?)
    }

    fn delete_listing(&self, id: ListingId) -> RepositoryResult<()> {
        use crate::schema::{kampanja, kupackampanja, ponuda, pozivi, webstrana_log};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let campaign_ids = kampanja::table
                .filter(kampanja::listing_id.eq(id.get()))
                .select(kampanja::id)
                .load::<i32>(conn)?;

            diesel::delete(
                kupackampanja::table.filter(kupackampanja::campaign_id.eq_any(&campaign_ids)),
            )
            .execute(conn)?;
            diesel::delete(webstrana_log::table.filter(webstrana_log::listing_id.eq(id.get())))
                .execute(conn)?;
            diesel::update(pozivi::table.filter(pozivi::listing_id.eq(id.get())))
                .set((
                    pozivi::listing_id.eq(None::<i32>),
                    pozivi::campaign_id.eq(None::<i32>),
                ))
                .execute(conn)?;
            diesel::delete(kampanja::table.filter(kampanja::listing_id.eq(id.get())))
                .execute(conn)?;

            let deleted = diesel::delete(ponuda::table.find(id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }
}
