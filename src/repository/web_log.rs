//! Repository implementation for web analytics events.

use diesel::prelude::*;

use crate::{
    domain::web_log::{NewWebLogEvent, WebLogEvent},
    models::web_log::{NewWebLogEvent as DbNewWebLogEvent, WebLogEvent as DbWebLogEvent},
    repository::{
        DieselRepository, WebLogQuery, WebLogReader, WebLogWriter, errors::RepositoryResult,
        into_domain,
    },
};

impl WebLogReader for DieselRepository {
    fn list_web_log_events(
        &self,
        query: WebLogQuery,
    ) -> RepositoryResult<(usize, Vec<WebLogEvent>)> {
        use crate::schema::webstrana_log;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = webstrana_log::table
                .filter(webstrana_log::created_at.ge(query.range.start))
                .filter(webstrana_log::created_at.lt(query.range.end))
                .into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(listing_id) = query.listing_id {
                items = items.filter(webstrana_log::listing_id.eq(listing_id.get()));
            }
            if let Some(event_type) = query.event_type.as_deref() {
                items = items.filter(webstrana_log::event_type.eq(event_type));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((
            webstrana_log::created_at.desc(),
            webstrana_log::id.desc(),
        ));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let events = items.load::<DbWebLogEvent>(&mut conn)?;

        Ok((total, into_domain(events)?))
    }
}

impl WebLogWriter for DieselRepository {
    fn create_web_log_event(&self, event: &NewWebLogEvent) -> RepositoryResult<WebLogEvent> {
        use crate::schema::webstrana_log;

        let mut conn = self.conn()?;
        let insertable: DbNewWebLogEvent = event.into();
        let db_event = diesel::insert_into(webstrana_log::table)
            .values(&insertable)
            .get_result::<DbWebLogEvent>(&mut conn)?;

        Ok(WebLogEvent::try_from(db_event)?)
    }
}
