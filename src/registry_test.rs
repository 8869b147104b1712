use std::cell::RefCell;
use std::rc::Rc;

use super::*;

// =============================================================
// Registration
// =============================================================

#[test]
fn new_registry_is_empty() {
    let registry = Registry::new();
    assert!(registry.is_empty());
    assert!(registry.keys().is_empty());
}

#[test]
fn register_adds_key() {
    let registry = Registry::new();
    assert!(registry.register("primary-fullname-gene"));
    assert!(registry.contains("primary-fullname-gene"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn register_twice_is_idempotent() {
    let registry = Registry::new();
    registry.register("k");
    let once = registry.keys();
    assert!(!registry.register("k"));
    assert_eq!(registry.keys(), once);
}

#[test]
fn keys_keep_registration_order() {
    let registry = Registry::new();
    registry.register("zeta");
    registry.register("alpha");
    registry.register("mid");
    registry.register("alpha");
    assert_eq!(registry.keys(), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn contains_unknown_key_is_false() {
    let registry = Registry::new();
    registry.register("a");
    assert!(!registry.contains("b"));
}

// =============================================================
// Observers
// =============================================================

#[test]
fn observer_receives_full_key_list() {
    let registry = Registry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    registry.subscribe(move |keys| sink.borrow_mut().push(keys.to_vec()));

    registry.register("a");
    registry.register("b");

    assert_eq!(
        *seen.borrow(),
        vec![vec!["a".to_owned()], vec!["a".to_owned(), "b".to_owned()]]
    );
}

#[test]
fn duplicate_registration_does_not_notify() {
    let registry = Registry::new();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    registry.subscribe(move |_| *sink.borrow_mut() += 1);

    registry.register("a");
    registry.register("a");
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let registry = Registry::new();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = registry.subscribe(move |_| *sink.borrow_mut() += 1);

    assert!(registry.unsubscribe(id));
    assert!(!registry.unsubscribe(id));
    registry.register("a");
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn observer_can_query_registry_reentrantly() {
    let registry = Rc::new(Registry::new());
    let seen = Rc::new(RefCell::new(0));
    let inner = Rc::clone(&registry);
    let sink = Rc::clone(&seen);
    registry.subscribe(move |_| *sink.borrow_mut() = inner.len());

    registry.register("a");
    registry.register("b");
    assert_eq!(*seen.borrow(), 2);
}

#[test]
fn nested_registration_leaves_observers_on_full_list() {
    let registry = Rc::new(Registry::new());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let inner = Rc::clone(&registry);
    registry.subscribe(move |keys| {
        if keys.len() == 1 {
            inner.register("b");
        }
    });
    let sink = Rc::clone(&seen);
    registry.subscribe(move |keys| sink.borrow_mut().push(keys.to_vec()));

    registry.register("a");
    assert_eq!(registry.keys(), vec!["a", "b"]);
    assert_eq!(*seen.borrow(), vec![vec!["a".to_owned(), "b".to_owned()]]);
}
