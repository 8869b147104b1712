use super::*;

// =============================================================
// Construction
// =============================================================

#[test]
fn new_snapshot_is_empty() {
    let snapshot = Snapshot::new();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.len(), 0);
}

#[test]
fn insert_replaces_existing_value() {
    let mut snapshot = Snapshot::new();
    assert_eq!(snapshot.insert("k", "a"), None);
    assert_eq!(snapshot.insert("k", "b"), Some("a".to_owned()));
    assert_eq!(snapshot.get("k"), Some("b"));
}

#[test]
fn keys_keep_insertion_order() {
    let snapshot: Snapshot = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
    assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

#[test]
fn equality_ignores_order() {
    let ab: Snapshot = [("a", "X"), ("b", "Y")].into_iter().collect();
    let ba: Snapshot = [("b", "Y"), ("a", "X")].into_iter().collect();
    assert_eq!(ab, ba);
}

#[test]
fn missing_key_reads_none() {
    let snapshot: Snapshot = [("a", "X")].into_iter().collect();
    assert_eq!(snapshot.get("b"), None);
    assert!(!snapshot.contains_key("b"));
}

// =============================================================
// JSON readout
// =============================================================

#[test]
fn to_json_pretty_renders_object() {
    let snapshot: Snapshot = [("primary-fullname-gene", "Ada Lovelace")].into_iter().collect();
    let json = snapshot.to_json_pretty().unwrap();
    assert_eq!(json, "{\n  \"primary-fullname-gene\": \"Ada Lovelace\"\n}");
}

#[test]
fn empty_snapshot_renders_empty_object() {
    assert_eq!(Snapshot::new().to_json_pretty().unwrap(), "{}");
}

#[test]
fn serializes_as_plain_map() {
    let snapshot: Snapshot = [("a", "X"), ("b", "Y")].into_iter().collect();
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value, serde_json::json!({"a": "X", "b": "Y"}));
}

#[test]
fn into_iter_yields_owned_pairs() {
    let snapshot: Snapshot = [("a", "X")].into_iter().collect();
    let pairs = snapshot.into_iter().collect::<Vec<_>>();
    assert_eq!(pairs, vec![("a".to_owned(), "X".to_owned())]);
}
