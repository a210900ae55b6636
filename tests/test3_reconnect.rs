use sql_router::prelude::*;
use sql_router::test_utils::{MockProvider, record_events};

const GONE_AWAY: &str = "SQLSTATE[HY000]: General error: 2006 MySQL server has gone away";

fn adapter() -> (MockProvider, Adapter<MockProvider>) {
    let provider = MockProvider::new();
    (provider.clone(), Adapter::new(provider))
}

#[test]
fn successful_query_emits_pre_and_post() {
    let (_mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);

    adapter
        .query("SELECT * FROM `t` WHERE `id` = ?", &[RowValues::Int(1)], false)
        .unwrap();

    let pre = events.pre();
    let post = events.post();
    assert_eq!(pre.len(), 1);
    assert_eq!(post.len(), 1);

    assert!(!pre[0].has_statement);
    assert_eq!(pre[0].query, "SELECT * FROM `t` WHERE `id` = ?");
    assert!(pre[0].has_parameters);
    assert_eq!(pre[0].parameters, vec![RowValues::Int(1)]);
    assert!(!pre[0].used_primary);
    assert!(!pre[0].has_exception());

    assert!(post[0].has_statement);
    assert_eq!(post[0].query, pre[0].query);
    assert!(!post[0].has_exception());
}

#[test]
fn gone_away_outside_transaction_reconnects_once() {
    let (mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);
    mock.fail_next_execute(GONE_AWAY);

    adapter.query("SELECT 1", &[], false).unwrap();

    assert_eq!(mock.reconnects(), 1);
    assert_eq!(mock.executions(), 2);
    assert_eq!(events.pre().len(), 1);

    let post = events.post();
    assert_eq!(post.len(), 2);
    assert!(post[0].exception_is_query_error);
    assert!(post[0].has_statement);
    assert_eq!(
        post[0].exception.as_deref(),
        Some(format!("Query Exception: {GONE_AWAY}").as_str())
    );
    assert!(!post[1].has_exception());
}

#[test]
fn gone_away_during_prepare_also_retries() {
    let (mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);
    mock.fail_next_prepare("MySQL server has gone away");

    adapter.query("SELECT 1", &[], false).unwrap();

    assert_eq!(mock.reconnects(), 1);
    let post = events.post();
    assert_eq!(post.len(), 2);
    assert!(!post[0].has_statement);
    assert_eq!(post[0].query, "SELECT 1");
}

#[test]
fn gone_away_inside_transaction_is_not_retried() {
    let (mock, mut adapter) = adapter();
    adapter.begin_transaction().unwrap();
    let events = record_events(&mut adapter);
    mock.fail_next_execute(GONE_AWAY);

    let err = adapter.query("SELECT 1", &[], false).unwrap_err();

    assert!(err.is_query_error());
    assert_eq!(mock.reconnects(), 0);
    assert_eq!(mock.executions(), 1);
    assert_eq!(events.post().len(), 1);
    assert!(events.post()[0].used_primary);
    assert!(adapter.is_in_transaction());
}

#[test]
fn other_errors_are_not_retried() {
    let (mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);
    mock.fail_next_execute("Duplicate entry '1' for key 'PRIMARY'");

    let err = adapter.query("INSERT INTO `t` VALUES (1)", &[], true).unwrap_err();

    assert!(err.is_query_error());
    assert_eq!(
        err.driver_error().map(DriverError::message),
        Some("Duplicate entry '1' for key 'PRIMARY'")
    );
    assert_eq!(mock.reconnects(), 0);
    assert_eq!(mock.executions(), 1);
    assert_eq!(events.pre().len(), 1);
    assert_eq!(events.post().len(), 1);
}

#[test]
fn second_gone_away_surfaces() {
    let (mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);
    mock.fail_next_execute(GONE_AWAY).fail_next_execute(GONE_AWAY);

    let err = adapter.query("SELECT 1", &[], false).unwrap_err();

    assert!(err.is_query_error());
    assert_eq!(mock.reconnects(), 1);
    assert_eq!(mock.executions(), 2);
    assert_eq!(events.pre().len(), 1);
    let post = events.post();
    assert_eq!(post.len(), 2);
    assert!(post.iter().all(|e| e.exception_is_query_error));
}

#[test]
fn prepare_failure_reports_sql_without_statement() {
    let (mock, mut adapter) = adapter();
    let events = record_events(&mut adapter);
    mock.fail_next_prepare("You have an error in your SQL syntax");

    let err = adapter.query("SELEKT 1", &[], false).unwrap_err();

    assert!(err.is_query_error());
    assert_eq!(mock.executions(), 0);
    let post = events.post();
    assert_eq!(post.len(), 1);
    assert!(!post[0].has_statement);
    assert_eq!(post[0].query, "SELEKT 1");
    assert!(post[0].exception_is_query_error);
}

#[test]
fn listeners_run_in_registration_order() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let (_mock, mut adapter) = adapter();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second"] {
        let order = Rc::clone(&order);
        adapter.bind_event(QueryEventName::PreExecute, move |_| order.borrow_mut().push(tag));
    }

    adapter.query("SELECT 1", &[], false).unwrap();

    assert_eq!(*order.borrow(), vec!["first", "second"]);
    assert_eq!(adapter.dispatcher().listener_count(QueryEventName::PreExecute), 2);
    assert_eq!(adapter.dispatcher().listener_count(QueryEventName::PostExecute), 0);
}

#[test]
fn post_event_exposes_the_prepared_statement() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let (_mock, mut adapter) = adapter();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    adapter.bind_event(QueryEventName::PostExecute, move |event| {
        sink.borrow_mut().push((
            event.statement().map(|statement| statement.sql().to_string()),
            event.has_parameters(),
        ));
    });

    adapter.query("SELECT 1", &[], false).unwrap();

    assert_eq!(*seen.borrow(), vec![(Some("SELECT 1".to_string()), false)]);
}
