//! One gene component, two instances, read back by code that never saw them.

use std::cell::RefCell;
use std::rc::Rc;

use helixium::{ContextCell, GeneField, Snapshot, create_context};

const PRIMARY: &str = "primary-fullname-gene";
const EMERGENCY: &str = "emergency-contact-fullname-gene";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn two_instances_keep_independent_values() {
    init_tracing();
    let ctx = create_context();
    let primary = GeneField::new(PRIMARY, "What is your full name?").mount(&ctx);
    let emergency = GeneField::new(EMERGENCY, "What is your emergency contact's full name?").mount(&ctx);

    primary.on_input("Ada Lovelace");
    emergency.on_input("Charles Babbage");

    assert_eq!(primary.value(), "Ada Lovelace");
    assert_eq!(emergency.value(), "Charles Babbage");
    assert_eq!(primary.label(), "What is your full name?");
}

#[test]
fn external_reader_collects_all_values() {
    init_tracing();
    let ctx = create_context();
    let primary = GeneField::new(PRIMARY, "Primary").mount(&ctx);
    let emergency = GeneField::new(EMERGENCY, "Emergency").mount(&ctx);
    primary.on_input("Ada Lovelace");
    emergency.on_input("Charles Babbage");

    // The reader only holds the context.
    let reader = ctx.clone();
    let all = reader.get_all_values();
    let expected: Snapshot = [(PRIMARY, "Ada Lovelace"), (EMERGENCY, "Charles Babbage")].into_iter().collect();
    assert_eq!(all, expected);
    assert_eq!(reader.list_keys(), vec![PRIMARY, EMERGENCY]);

    let json: serde_json::Value = serde_json::from_str(&all.to_json_pretty().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            PRIMARY: "Ada Lovelace",
            EMERGENCY: "Charles Babbage",
        })
    );
}

#[test]
fn external_reader_fetches_single_value() {
    init_tracing();
    let ctx = create_context();
    let primary = GeneField::new(PRIMARY, "Primary").mount(&ctx);
    let emergency = GeneField::new(EMERGENCY, "Emergency").mount(&ctx);
    primary.on_input("Ada Lovelace");
    emergency.on_input("Charles Babbage");

    let single = ctx.snapshot_of([PRIMARY]);
    assert_eq!(single.to_json_pretty().unwrap(), "{\n  \"primary-fullname-gene\": \"Ada Lovelace\"\n}");
    assert_eq!(ctx.get_value_by_id(EMERGENCY), "Charles Babbage");
}

#[test]
fn values_outlive_unmounted_fields() {
    init_tracing();
    let ctx = create_context();
    {
        let primary = GeneField::new(PRIMARY, "Primary").mount(&ctx);
        primary.on_input("Ada Lovelace");
    }
    assert_eq!(ctx.get_all_values().get(PRIMARY), Some("Ada Lovelace"));
}

#[test]
fn two_dashboards_do_not_share_genes() {
    init_tracing();
    let left = ContextCell::new();
    let right = ContextCell::new();

    // Simulate several re-renders of each owner.
    for pass in 0..3 {
        let gene = GeneField::new(PRIMARY, "Primary").mount(left.get_or_create());
        gene.on_input(format!("left pass {pass}"));
        let gene = GeneField::new(PRIMARY, "Primary").mount(right.get_or_create());
        if pass == 0 {
            gene.on_input("right");
        }
    }

    assert_eq!(left.get_or_create().read(PRIMARY), "left pass 2");
    assert_eq!(right.get_or_create().read(PRIMARY), "right");
    assert_eq!(left.get_or_create().list_keys().len(), 1);
}

#[test]
fn summary_panel_rerenders_on_every_edit() {
    init_tracing();
    let ctx = create_context();
    let first = GeneField::new("first-name", "First name").mount(&ctx);

    let summary = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&summary);
    ctx.subscribe_all(move |all| {
        *sink.borrow_mut() = all.iter().map(|(_, v)| v).collect::<Vec<_>>().join(" ");
    });

    first.on_input("Ada");
    assert_eq!(*summary.borrow(), "Ada");

    // Mounted after the panel subscribed.
    let last = GeneField::new("last-name", "Last name").mount(&ctx);
    assert_eq!(*summary.borrow(), "Ada ");
    last.on_input("Lovelace");
    assert_eq!(*summary.borrow(), "Ada Lovelace");
}

#[test]
fn click_counter_reducer() {
    init_tracing();
    let ctx = create_context();
    let increment = |v: &String| (v.parse::<i64>().unwrap_or(0) + 1).to_string();
    let decrement = |v: &String| (v.parse::<i64>().unwrap_or(0) - 1).to_string();

    ctx.update("click-count", increment);
    ctx.update("click-count", increment);
    ctx.update("click-count", decrement);
    assert_eq!(format!("Click count: {}", ctx.read("click-count")), "Click count: 1");
}
