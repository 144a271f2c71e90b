//! Repository implementation for imported customers.

use diesel::prelude::*;

use crate::{
    domain::{
        customer::{Customer, NewCustomer},
        types::CustomerId,
    },
    models::customer::{Customer as DbCustomer, NewCustomer as DbNewCustomer},
    repository::{
        CustomerListQuery, CustomerReader, CustomerWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
        into_domain,
    },
};

impl CustomerReader for DieselRepository {
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)> {
        use crate::schema::kupacimport;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = kupacimport::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                let pattern = format!("%{search}%");
                items = items.filter(
                    kupacimport::first_name
                        .like(pattern.clone())
                        .or(kupacimport::last_name.like(pattern.clone()))
                        .or(kupacimport::email.like(pattern.clone()))
                        .or(kupacimport::phone.like(pattern.clone()))
                        .or(kupacimport::city.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(kupacimport::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let customers = items.load::<DbCustomer>(&mut conn)?;

        Ok((total, into_domain(customers)?))
    }

    fn list_customer_contact_keys(
        &self,
    ) -> RepositoryResult<Vec<(Option<String>, Option<String>)>> {
        use crate::schema::kupacimport;

        let mut conn = self.conn()?;
        let keys = kupacimport::table
            .select((kupacimport::email, kupacimport::phone))
            .load::<(Option<String>, Option<String>)>(&mut conn)?;

        Ok(keys)
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customers(&self, customers: &[NewCustomer]) -> RepositoryResult<usize> {
        use crate::schema::kupacimport;

        if customers.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let insertables = customers.iter().map(DbNewCustomer::from).collect::<Vec<_>>();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::insert_into(kupacimport::table)
                .values(&insertables)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }

    fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()> {
        use crate::schema::{kupacimport, kupackampanja};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::delete(kupackampanja::table.filter(kupackampanja::customer_id.eq(id.get())))
                .execute(conn)?;
            let deleted = diesel::delete(kupacimport::table.find(id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }
}
