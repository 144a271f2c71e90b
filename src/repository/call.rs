//! Repository implementation for calls and inquiries.

use diesel::prelude::*;

use crate::{
    domain::{
        call::{Call, CallStatus, NewCall},
        types::CallId,
    },
    models::call::{Call as DbCall, NewCall as DbNewCall},
    repository::{
        CallListQuery, CallReader, CallWriter, DieselRepository, errors::RepositoryResult,
        into_domain,
    },
};

impl CallReader for DieselRepository {
    fn list_calls(&self, query: CallListQuery) -> RepositoryResult<(usize, Vec<Call>)> {
        use crate::schema::pozivi;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = pozivi::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(status) = query.status {
                items = items.filter(pozivi::status.eq(status.as_str()));
            }
            if let Some(listing_id) = query.listing_id {
                items = items.filter(pozivi::listing_id.eq(listing_id.get()));
            }
            if let Some(range) = query.range {
                items = items
                    .filter(pozivi::created_at.ge(range.start))
                    .filter(pozivi::created_at.lt(range.end));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((pozivi::created_at.desc(), pozivi::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let calls = items.load::<DbCall>(&mut conn)?;

        Ok((total, into_domain(calls)?))
    }
}

impl CallWriter for DieselRepository {
    fn create_call(&self, new_call: &NewCall) -> RepositoryResult<Call> {
        use crate::schema::pozivi;

        let mut conn = self.conn()?;
        let insertable: DbNewCall = new_call.into();
        let db_call = diesel::insert_into(pozivi::table)
            .values(&insertable)
            .get_result::<DbCall>(&mut conn)?;

        Ok(Call::try_from(db_call)?)
    }

    fn update_call_status(&self, id: CallId, status: CallStatus) -> RepositoryResult<Call> {
        use crate::schema::pozivi;

        let mut conn = self.conn()?;
        let db_call = diesel::update(pozivi::table.find(id.get()))
            .set(pozivi::status.eq(status.as_str()))
            .get_result::<DbCall>(&mut conn)?;

        Ok(Call::try_from(db_call)?)
    }
}
