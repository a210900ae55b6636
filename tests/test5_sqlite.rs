#![cfg(feature = "sqlite")]

use sql_router::prelude::*;
use sql_router::test_utils::record_events;
use tempfile::TempDir;

const CREATE_USERS: &str =
    "CREATE TABLE `users` (`id` INTEGER PRIMARY KEY AUTOINCREMENT, `name` TEXT NOT NULL, `score` INTEGER)";

fn memory_adapter() -> Adapter<SqliteProvider> {
    let provider = SqliteProvider::connect(SqliteOptions::new(":memory:".into())).unwrap();
    let mut adapter = Adapter::new(provider);
    adapter.query_primary(CREATE_USERS, &[]).unwrap();
    adapter
}

fn count_users(adapter: &mut Adapter<SqliteProvider>) -> i64 {
    let mut statement = adapter
        .query("SELECT COUNT(*) AS `n` FROM `users`", &[], false)
        .unwrap();
    let rows = statement.fetch_all().unwrap();
    *rows.iter().next().unwrap().get("n").unwrap().as_int().unwrap()
}

#[test]
fn insert_update_delete_round() {
    let mut adapter = memory_adapter();

    let first = adapter
        .insert(
            "users",
            &ColumnMap::new().with("name", "alice").with("score", 10),
            &InsertOptions::default(),
        )
        .unwrap();
    let second = adapter
        .insert(
            "users",
            &ColumnMap::new().with("name", "bob").with("score", 20),
            &InsertOptions::default(),
        )
        .unwrap();
    assert_eq!(first, InsertOutcome::LastInsertId("1".into()));
    assert_eq!(second, InsertOutcome::LastInsertId("2".into()));

    let updated = adapter
        .update(
            "users",
            &ColumnMap::new().with("score", RawSql::new("`score` + 5")),
            [("name", "alice")],
        )
        .unwrap();
    assert_eq!(updated, 1);

    let mut statement = adapter
        .query(
            "SELECT `score` FROM `users` WHERE `id` = ?",
            &[RowValues::Int(1)],
            false,
        )
        .unwrap();
    let rows = statement.fetch_all().unwrap();
    assert_eq!(rows.iter().next().unwrap().get("score"), Some(&RowValues::Int(15)));

    assert_eq!(adapter.delete("users", "score > 100").unwrap(), 0);
    assert_eq!(adapter.delete("users", [("id", 2)]).unwrap(), 1);
    assert_eq!(count_users(&mut adapter), 1);
}

#[test]
fn composite_key_insert_reports_affected_rows() {
    let mut adapter = memory_adapter();
    adapter
        .query_primary(
            "CREATE TABLE `pair` (`x` INTEGER, `y` INTEGER, PRIMARY KEY (`x`, `y`)) WITHOUT ROWID",
            &[],
        )
        .unwrap();

    let first = adapter
        .insert("users", &ColumnMap::new().with("name", "alice"), &InsertOptions::default())
        .unwrap();
    let composite = adapter
        .insert(
            "pair",
            &ColumnMap::new().with("x", 1).with("y", 2),
            &InsertOptions::default(),
        )
        .unwrap();

    assert_eq!(first, InsertOutcome::LastInsertId("1".into()));
    assert_eq!(composite, InsertOutcome::AffectedRows(1));
}

#[test]
fn update_between_inserts_does_not_leak_rowid() {
    let mut adapter = memory_adapter();
    adapter
        .insert("users", &ColumnMap::new().with("name", "alice"), &InsertOptions::default())
        .unwrap();
    adapter
        .update("users", &ColumnMap::new().with("score", 1), [("id", 1)])
        .unwrap();

    let handle = adapter.connection_mut().primary().unwrap();
    assert_eq!(handle.last_insert_id().unwrap(), None);
}

#[test]
fn constraint_violation_keeps_driver_code() {
    let mut adapter = memory_adapter();
    let row = ColumnMap::new().with("id", 1).with("name", "alice");
    adapter.insert("users", &row, &InsertOptions::default()).unwrap();

    let err = adapter
        .insert("users", &row, &InsertOptions::default())
        .unwrap_err();

    assert!(err.is_query_error());
    assert_eq!(
        err.driver_error().and_then(DriverError::code),
        Some("ConstraintViolation")
    );
}

#[test]
fn rollback_discards_writes() {
    let mut adapter = memory_adapter();

    adapter.begin_transaction().unwrap();
    adapter
        .insert("users", &ColumnMap::new().with("name", "ghost"), &InsertOptions::default())
        .unwrap();
    assert_eq!(count_users(&mut adapter), 1);
    adapter.roll_back().unwrap();

    assert!(!adapter.is_in_transaction());
    assert_eq!(count_users(&mut adapter), 0);
}

#[test]
fn commit_keeps_writes() {
    let mut adapter = memory_adapter();

    adapter.begin_transaction().unwrap();
    adapter
        .insert("users", &ColumnMap::new().with("name", "carol"), &InsertOptions::default())
        .unwrap();
    adapter.commit().unwrap();

    assert_eq!(count_users(&mut adapter), 1);
}

#[test]
fn syntax_error_is_a_query_error_without_statement() {
    let mut adapter = memory_adapter();
    let events = record_events(&mut adapter);

    let err = adapter.query("SELEKT 1", &[], false).unwrap_err();

    assert!(err.is_query_error());
    assert!(err.to_string().starts_with("Query Exception: "));
    let post = events.post();
    assert_eq!(post.len(), 1);
    assert!(!post[0].has_statement);
}

#[test]
fn replica_file_is_read_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.db").to_string_lossy().into_owned();

    let provider = SqliteProvider::builder(path.clone())
        .replica(path)
        .busy_timeout_ms(1_000)
        .build()
        .unwrap();
    let mut adapter = Adapter::new(provider);
    adapter.query_primary(CREATE_USERS, &[]).unwrap();
    adapter
        .insert("users", &ColumnMap::new().with("name", "dave"), &InsertOptions::default())
        .unwrap();

    assert_eq!(count_users(&mut adapter), 1);
    assert_eq!(adapter.connection().opened_connections(), 2);

    let err = adapter
        .query("INSERT INTO `users` (`name`) VALUES ('eve')", &[], false)
        .unwrap_err();
    assert!(err.is_query_error());
    assert!(err.to_string().contains("readonly"), "{err}");
}

#[test]
fn reconnect_and_close_drop_cached_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.db").to_string_lossy().into_owned();

    let provider = SqliteProvider::connect(SqliteOptions::new(path)).unwrap();
    let mut adapter = Adapter::new(provider);
    adapter.query_primary(CREATE_USERS, &[]).unwrap();
    adapter
        .insert("users", &ColumnMap::new().with("name", "frank"), &InsertOptions::default())
        .unwrap();
    assert_eq!(adapter.connection().opened_connections(), 1);

    adapter.connection_mut().reconnect().unwrap();
    assert_eq!(adapter.connection().opened_connections(), 0);
    assert_eq!(count_users(&mut adapter), 1);

    adapter.begin_transaction().unwrap();
    adapter.close_connection();
    assert!(!adapter.is_in_transaction());
    assert_eq!(adapter.connection().opened_connections(), 0);
}

#[test]
fn init_sql_runs_on_open() {
    let options = SqliteOptionsBuilder::new(":memory:".into())
        .init_sql("CREATE TABLE `settings` (`key` TEXT PRIMARY KEY, `value` TEXT);")
        .finish();
    let mut adapter = Adapter::new(SqliteProvider::new(options));

    let outcome = adapter
        .insert(
            "settings",
            &ColumnMap::new().with("key", "theme").with("value", "dark"),
            &InsertOptions::default(),
        )
        .unwrap();
    assert_eq!(outcome.last_insert_id(), Some("1"));
}

#[test]
fn unopenable_primary_is_a_connection_error() {
    let dir = TempDir::new().unwrap();
    let path = dir
        .path()
        .join("missing")
        .join("app.db")
        .to_string_lossy()
        .into_owned();

    let err = SqliteProvider::connect(SqliteOptions::new(path)).unwrap_err();
    assert!(matches!(err, SqlRouterError::ConnectionError(_)), "{err}");
}

#[test]
fn quote_uses_sqlite_literals() {
    let mut adapter = memory_adapter();
    assert_eq!(
        adapter
            .quote(&RowValues::Text("won't".into()), ParamType::Str)
            .unwrap(),
        "'won''t'"
    );
    assert_eq!(adapter.quote(&RowValues::Null, ParamType::Null).unwrap(), "NULL");
}
