//! Capability subscription specs
//!
//! Handlers subscribed to a capability trait receive every concrete event
//! that declares it.

use crate::prelude::*;

#[test]
fn capability_handler_receives_concrete_event() {
    let bus = EventBus::new();
    let total = Arc::new(std::sync::atomic::AtomicU64::new(0));
    {
        let total = Arc::clone(&total);
        bus.subscribe::<dyn Billable>(move |event| {
            total.fetch_add(event.amount_cents(), std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });
    }

    assert!(bus.publish(&Foo::billed(250)).unwrap());
    assert!(bus.publish(&Foo::billed(100)).unwrap());
    assert_eq!(total.load(std::sync::atomic::Ordering::SeqCst), 350);
}

#[test]
fn undeclared_capability_is_not_delivered() {
    let bus = EventBus::new();
    let log = CallLog::new();
    bus.subscribe::<dyn Billable>(log.recorder("billable"));

    assert!(!bus.publish(&Bar::new()).unwrap());
    assert_eq!(log.len(), 0);
}

#[test]
fn base_capability_sees_all_events() {
    let bus = EventBus::new();
    let log = CallLog::new();
    bus.subscribe::<dyn Event>(log.recorder("any"));

    bus.publish(&Foo::new()).unwrap();
    bus.publish(&Bar::new()).unwrap();
    assert_eq!(log.len(), 2);
}

#[test]
fn publish_reports_missing_handlers() {
    let bus = EventBus::new();
    bus.subscribe::<Foo>(|_| Ok(()));

    assert!(bus.publish(&Foo::new()).unwrap());
    assert!(!bus.publish(&Bar::new()).unwrap());
}
