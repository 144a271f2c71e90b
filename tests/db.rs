use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;

mod common;

#[derive(QueryableByName)]
struct Pragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[test]
fn test_creates_migrated_database_file() {
    let test_db = common::TestDb::new("test_creates_migrated_database_file.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
    assert!(test_db.path().exists());
}

#[test]
fn test_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new("test_connections_enforce_foreign_keys.db");
    let mut conn = test_db.pool().get().unwrap();

    let pragma = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<Pragma>(&mut conn)
        .unwrap();
    assert_eq!(pragma.foreign_keys, 1);

    // A campaign pointing at a missing listing is rejected.
    let result = conn.batch_execute(
        "INSERT INTO kampanja (listing_id, name, channel, utm_campaign, budget, starts_on, is_active, created_at) \
         VALUES (999, 'x', 'facebook', 'x', 0, '2025-03-01', 1, '2025-03-01 00:00:00')",
    );
    assert!(result.is_err());
}
