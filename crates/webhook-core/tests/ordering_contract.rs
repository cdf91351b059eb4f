//! Contract Test: Change Batch Ordering
//!
//! Constraints verified:
//! - All removals (`delete ++ updateOld`) are issued before any addition
//!   (`create ++ updateNew`), whatever order the sections arrive in
//! - An update is a removal of the old value followed by an addition of the new
//! - An empty batch performs zero registrar calls
//! - A malformed batch performs zero registrar calls

mod common;

use common::*;
use webhook_core::{ChangeBatch, Reconciler};

#[tokio::test]
async fn update_removes_old_value_then_adds_new_one() {
    let registrar = FakeRegistrar::new(vec![editable("a.example.com", "A", "1.1.1.1")]);
    let observer = FakeRegistrar::sharing_state_with(&registrar);
    let reconciler = Reconciler::new(Box::new(registrar));

    let batch = ChangeBatch {
        update_old: vec![endpoint("a.example.com", "A", &["1.1.1.1"])],
        update_new: vec![endpoint("a.example.com", "A", &["3.3.3.3"])],
        ..Default::default()
    };
    reconciler.apply_changes(&batch).await.expect("batch succeeds");

    assert_eq!(
        observer.calls(),
        vec![
            Call::remove("a.example.com", "A", "1.1.1.1"),
            Call::add("a.example.com", "A", "3.3.3.3"),
        ]
    );
    assert!(observer.has_value("a.example.com", "A", "3.3.3.3"));
    assert!(!observer.has_value("a.example.com", "A", "1.1.1.1"));
}

#[tokio::test]
async fn removals_always_precede_additions() {
    let registrar = FakeRegistrar::empty();
    let observer = FakeRegistrar::sharing_state_with(&registrar);
    let reconciler = Reconciler::new(Box::new(registrar));

    // Sections deliberately listed additions-first in the JSON.
    let batch = ChangeBatch::from_json(
        br#"{
            "create":    [{"dnsName": "new.example.com", "recordType": "A", "targets": ["4.4.4.4", "5.5.5.5"]}],
            "updateNew": [{"dnsName": "upd.example.com", "recordType": "CNAME", "targets": ["b.example.com"]}],
            "updateOld": [{"dnsName": "upd.example.com", "recordType": "CNAME", "targets": ["a.example.com"]}],
            "delete":    [{"dnsName": "old.example.com", "recordType": "TXT", "targets": ["x", "y"]}]
        }"#,
    )
    .expect("batch parses");
    reconciler.apply_changes(&batch).await.expect("batch succeeds");

    assert_eq!(
        observer.calls(),
        vec![
            Call::remove("old.example.com", "TXT", "x"),
            Call::remove("old.example.com", "TXT", "y"),
            Call::remove("upd.example.com", "CNAME", "a.example.com"),
            Call::add("new.example.com", "A", "4.4.4.4"),
            Call::add("new.example.com", "A", "5.5.5.5"),
            Call::add("upd.example.com", "CNAME", "b.example.com"),
        ]
    );
}

#[tokio::test]
async fn empty_batch_makes_no_registrar_calls() {
    let registrar = FakeRegistrar::new(vec![editable("a.example.com", "A", "1.1.1.1")]);
    let observer = FakeRegistrar::sharing_state_with(&registrar);
    let reconciler = Reconciler::new(Box::new(registrar));

    reconciler
        .apply_changes(&ChangeBatch::default())
        .await
        .expect("empty batch succeeds");
    reconciler
        .apply_changes(&ChangeBatch::from_json(b"{}").expect("batch parses"))
        .await
        .expect("empty batch succeeds");

    assert!(observer.calls().is_empty());
}

#[tokio::test]
async fn invalid_batch_makes_no_registrar_calls() {
    let registrar = FakeRegistrar::empty();
    let observer = FakeRegistrar::sharing_state_with(&registrar);
    let reconciler = Reconciler::new(Box::new(registrar));

    let batch = ChangeBatch {
        delete: vec![endpoint("a.example.com", "A", &["1.1.1.1"])],
        create: vec![endpoint("", "A", &["2.2.2.2"])],
        ..Default::default()
    };
    let err = reconciler.apply_changes(&batch).await.unwrap_err();

    assert_eq!(err.kind(), "validation");
    assert!(observer.calls().is_empty());
}

#[tokio::test]
async fn apply_changes_does_not_read_the_registrar() {
    let registrar = FakeRegistrar::empty();
    let observer = FakeRegistrar::sharing_state_with(&registrar);
    let reconciler = Reconciler::new(Box::new(registrar));

    let batch = ChangeBatch {
        create: vec![endpoint("a.example.com", "A", &["1.1.1.1"])],
        ..Default::default()
    };
    reconciler.apply_changes(&batch).await.expect("batch succeeds");

    assert_eq!(observer.list_count(), 0);
}
