//! Subscription lifecycle specs
//!
//! Registrations are independent: subscribe N times, deliver N times,
//! unsubscribe N times to stop.

use crate::prelude::*;

#[test]
fn same_handler_three_times() {
    let bus = EventBus::new();
    let log = CallLog::new();
    let h = handler::<Foo>(log.recorder("H"));

    for _ in 0..3 {
        bus.subscribe_handler(&h, DEFAULT_PRIORITY);
    }
    bus.publish(&Foo::new()).unwrap();
    assert_eq!(log.len(), 3);

    for _ in 0..3 {
        bus.unsubscribe_handler(&h);
    }
    bus.publish(&Foo::new()).unwrap();
    assert_eq!(log.len(), 3);
}

#[test]
fn handles_unsubscribe_individually() {
    let bus = EventBus::new();
    let log = CallLog::new();
    let subs: Vec<_> = (0..3)
        .map(|_| bus.subscribe::<Bar>(log.recorder("bar")))
        .collect();

    bus.unsubscribe(&subs[1]);
    bus.publish(&Bar::new()).unwrap();
    assert_eq!(log.len(), 2);

    for sub in &subs {
        bus.unsubscribe(sub);
    }
    assert!(!bus.publish(&Bar::new()).unwrap());
    assert_eq!(bus.subscription_count(), 0);
}

#[test]
fn buses_are_independent() {
    let billing = EventBus::new();
    let audit = EventBus::new();
    let log = CallLog::new();
    billing.subscribe::<Foo>(log.recorder("billing"));

    assert!(!audit.publish(&Foo::new()).unwrap());
    assert!(billing.publish(&Foo::new()).unwrap());
    assert_eq!(log.calls(), vec!["billing"]);
}

#[test]
fn handle_only_unsubscribes_on_its_own_bus() {
    let billing = EventBus::new();
    let audit = EventBus::new();
    let log = CallLog::new();
    let billing_sub = billing.subscribe::<Foo>(log.recorder("billing"));
    audit.subscribe::<Foo>(log.recorder("audit"));

    assert!(!audit.unsubscribe(&billing_sub));
    assert!(audit.publish(&Foo::new()).unwrap());
    assert!(billing.publish(&Foo::new()).unwrap());
    assert_eq!(log.calls(), labels(&["audit", "billing"]));

    assert!(billing.unsubscribe(&billing_sub));
    assert!(!billing.publish(&Foo::new()).unwrap());
}
