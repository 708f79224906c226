//! Async fan-out specs
//!
//! Every handler is scheduled; faults are contained; disposal happens once
//! all units are done.

use crate::prelude::*;

#[tokio::test]
async fn every_handler_runs_once() {
    let bus = EventBus::new();
    let log = CallLog::new();
    bus.subscribe_with_priority::<Foo>(5, log.recorder("foo"));
    bus.subscribe::<dyn Billable>(log.recorder("billable"));

    let foo = Arc::new(Foo::new());
    let report = bus.publish_async(Arc::clone(&foo)).await.unwrap();

    let mut calls = log.calls();
    calls.sort();
    assert_eq!(calls, vec!["billable", "foo"]);
    assert_eq!(report.invoked, 2);
    assert!(report.had_handlers());
    assert!(foo.is_disposed());
}

#[tokio::test]
async fn failing_handler_does_not_fail_the_publish() {
    let bus = EventBus::new();
    let log = CallLog::new();
    bus.subscribe::<Foo>(|_| Err("downstream offline".into()));
    bus.subscribe::<Foo>(log.recorder("survivor"));

    let report = bus.publish_async(Arc::new(Foo::new())).await.unwrap();

    assert_eq!(report.faulted, 1);
    assert_eq!(log.calls(), vec!["survivor"]);
}

#[tokio::test]
async fn disposed_event_is_rejected_before_scheduling() {
    let bus = EventBus::new();
    let log = CallLog::new();
    bus.subscribe::<Foo>(log.recorder("never"));

    let foo = Arc::new(Foo::new());
    foo.mark_disposed();

    assert!(matches!(
        bus.publish_async(foo).await,
        Err(BusError::Disposed { .. })
    ));
    assert_eq!(log.len(), 0);
}
