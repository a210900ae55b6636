use sql_router::prelude::*;
use sql_router::test_utils::{MockProvider, create_result_set, record_events};

fn adapter() -> (MockProvider, Adapter<MockProvider>) {
    let provider = MockProvider::new();
    (provider.clone(), Adapter::new(provider))
}

#[test]
fn reads_go_to_replica_unless_pinned() {
    let (mock, mut adapter) = adapter();

    adapter.query("SELECT 1", &[], false).unwrap();
    adapter.query("SELECT 2", &[], true).unwrap();
    adapter.query_primary("SELECT 3", &[]).unwrap();

    let endpoints: Vec<_> = mock.state().executed.iter().map(|(e, _, _)| *e).collect();
    assert_eq!(
        endpoints,
        vec![Endpoint::Replica, Endpoint::Primary, Endpoint::Primary]
    );
}

#[test]
fn transaction_pins_reads_to_primary() {
    let (mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);

    adapter.begin_transaction().unwrap();
    let statement = adapter.query("SELECT 1", &[], false).unwrap();
    assert_eq!(statement.endpoint(), Endpoint::Primary);
    adapter.commit().unwrap();
    let statement = adapter.query("SELECT 1", &[], false).unwrap();
    assert_eq!(statement.endpoint(), Endpoint::Replica);

    let used: Vec<_> = events.pre().iter().map(|e| e.used_primary).collect();
    assert_eq!(used, vec![true, false]);
    assert_eq!(mock.state().transaction_calls, vec!["begin", "commit"]);
}

#[test]
fn transaction_flag_lifecycle() {
    let (mock, mut adapter) = adapter();
    assert!(!adapter.is_in_transaction());

    adapter.begin_transaction().unwrap();
    assert!(adapter.is_in_transaction());
    adapter.commit().unwrap();
    assert!(!adapter.is_in_transaction());

    adapter.begin_transaction().unwrap();
    adapter.roll_back().unwrap();
    assert!(!adapter.is_in_transaction());

    assert_eq!(
        mock.state().transaction_calls,
        vec!["begin", "commit", "begin", "rollback"]
    );
}

#[test]
fn close_during_transaction_clears_flag() {
    let (mock, mut adapter) = adapter();
    adapter.begin_transaction().unwrap();

    adapter.close_connection();

    assert!(!adapter.is_in_transaction());
    assert_eq!(mock.state().closes, 1);
    adapter.query("SELECT 1", &[], false).unwrap();
    assert_eq!(mock.state().executed[0].0, Endpoint::Replica);
}

#[test]
fn failed_begin_still_marks_transaction() {
    let (mock, mut adapter) = adapter();
    mock.fail_transactions("lock wait timeout exceeded");

    let err = adapter.begin_transaction().unwrap_err();

    assert!(!err.is_query_error());
    assert_eq!(
        err.driver_error().map(DriverError::message),
        Some("lock wait timeout exceeded")
    );
    assert!(adapter.is_in_transaction());
}

#[test]
fn failed_commit_keeps_transaction_open() {
    let (mock, mut adapter) = adapter();
    adapter.begin_transaction().unwrap();
    mock.fail_transactions("deadlock found");

    assert!(adapter.commit().is_err());
    assert!(adapter.is_in_transaction());
    assert!(adapter.roll_back().is_err());
    assert!(adapter.is_in_transaction());
}

#[test]
fn commit_without_begin_reaches_the_driver() {
    let (mock, mut adapter) = adapter();
    adapter.commit().unwrap();
    assert_eq!(mock.state().transaction_calls, vec!["commit"]);
    assert!(!adapter.is_in_transaction());
}

#[test]
fn quote_uses_the_replica() {
    let (mock, mut adapter) = adapter();

    let quoted = adapter
        .quote(&RowValues::Text("it's".into()), ParamType::Str)
        .unwrap();

    assert_eq!(quoted, "'it\\'s'");
    let state = mock.state();
    assert_eq!(state.replica_acquisitions, 1);
    assert_eq!(state.primary_acquisitions, 0);
    assert_eq!(
        state.quoted,
        vec![(Endpoint::Replica, RowValues::Text("it's".into()), ParamType::Str)]
    );
}

#[test]
fn quote_surfaces_replica_failure() {
    let (mock, mut adapter) = adapter();
    mock.fail_next_acquire("replica down");
    let err = adapter.quote(&RowValues::Int(1), ParamType::Int).unwrap_err();
    assert_eq!(err.to_string(), "replica down");
}

#[test]
fn fetch_all_returns_rows() {
    let (mock, mut adapter) = adapter();
    mock.set_rows(create_result_set(
        &["id", "name"],
        vec![
            vec![RowValues::Int(1), RowValues::Text("alice".into())],
            vec![RowValues::Int(2), RowValues::Text("bob".into())],
        ],
    ));

    let mut statement = adapter.query("SELECT `id`, `name` FROM `users`", &[], false).unwrap();
    let rows = statement.fetch_all().unwrap();

    assert_eq!(rows.len(), 2);
    let names: Vec<_> = rows
        .iter()
        .filter_map(|row| row.get("name").and_then(RowValues::as_text).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert!(statement.fetch_all().is_err());
}
