// tests/key_store.rs

use proptest::prelude::*;

use autopilot::keys::KeyStore;

#[test]
fn whitespace_only_value_fails_validation() {
    let store = KeyStore::new();
    store.set("apiA", "secret");
    store.set("apiB", "  ");

    assert!(!store.validate(&["apiA", "apiB"]));
    assert!(store.validate(&["apiA"]));
    assert_eq!(store.missing(&["apiA", "apiB"]), vec!["apiB".to_string()]);
}

#[test]
fn unknown_key_reads_as_empty_and_is_invalid() {
    let store = KeyStore::new();

    assert_eq!(store.get("gemini"), "");
    assert!(!store.validate(&["gemini"]));
    assert!(store.validate::<&str>(&[]));
}

#[test]
fn user_value_overrides_default() {
    let store = KeyStore::with_defaults([("youtube", "default-key")]);
    assert_eq!(store.get("youtube"), "default-key");
    assert!(store.validate(&["youtube"]));

    store.set("youtube", "user-key");
    assert_eq!(store.get("youtube"), "user-key");
}

#[test]
fn reset_hides_default_until_set_again() {
    let store = KeyStore::with_defaults([("gemini", "default-key")]);
    store.set("gemini", "user-key");

    store.reset("gemini");
    assert_eq!(store.get("gemini"), "");
    assert!(!store.validate(&["gemini"]));

    store.set("gemini", "fresh-key");
    assert_eq!(store.get("gemini"), "fresh-key");
}

#[test]
fn names_merge_values_and_defaults() {
    let store = KeyStore::with_defaults([("b", "1"), ("a", "2")]);
    store.set("c", "3");
    store.set("a", "4");

    assert_eq!(store.names(), vec!["a", "b", "c"]);
}

#[test]
fn debug_output_does_not_leak_secrets() {
    let store = KeyStore::new();
    store.set("discordWebhook", "super-secret-token");

    let rendered = format!("{store:?}");
    assert!(rendered.contains("discordWebhook"));
    assert!(!rendered.contains("super-secret-token"));
}

#[test]
fn clones_share_one_table() {
    let store = KeyStore::new();
    let other = store.clone();

    other.set("twitter", "token");
    assert_eq!(store.get("twitter"), "token");
}

#[tokio::test]
async fn subscribers_are_notified_on_mutation() {
    let store = KeyStore::new();
    let mut rx = store.subscribe();
    assert_eq!(*rx.borrow_and_update(), 0);

    store.set("threads", "abc");
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 1);

    store.reset("threads");
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 2);
}

proptest! {
    #[test]
    fn validate_matches_trimmed_emptiness(
        entries in proptest::collection::btree_map("[a-d]", "[ x\t]{0,3}", 0..4),
        required in proptest::collection::vec("[a-f]", 0..5),
    ) {
        let store = KeyStore::new();
        for (name, value) in entries.iter() {
            store.set(name.as_str(), value.as_str());
        }

        let expected = required.iter().all(|name| {
            entries
                .get(name)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        });

        prop_assert_eq!(store.validate(&required), expected);
        prop_assert_eq!(store.missing(&required).is_empty(), expected);
    }
}
