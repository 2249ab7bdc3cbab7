//! Integration test: a relay tracking transfers in the status ledger and
//! reacting to its notifications.

use std::sync::Arc;

use interledger_core::ErrorKind;
use interledger_state::{StateError, TransferEntryStore, TransferNotification, TransferStatus};

#[test]
fn test_entry_walks_nominal_sequence() {
    let store = TransferEntryStore::new();
    let mut entry = store.create("1003", "0xnonce123", "0xdata456").unwrap();

    let mut visited = vec![entry.status];
    while let Some(next) = entry.status.next() {
        let send_acceptance = (next == TransferStatus::Sent).then_some(true);
        entry = store.update("1003", next, send_acceptance, None).unwrap();
        visited.push(entry.status);
    }

    assert_eq!(visited.len(), 7);
    assert!(entry.status.is_final());
    assert_eq!(entry.send_acceptance, Some(true));
    assert_eq!(entry.payload.data, "0xdata456");

    let names: Vec<_> = store
        .events()
        .poll(0)
        .iter()
        .map(|e| e.event.name())
        .collect();
    assert_eq!(names, vec!["transferReady", "transferResponded"]);
}

#[test]
fn test_missing_and_duplicate_entries() {
    let store = TransferEntryStore::new();
    assert_eq!(
        store.read("nope").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(matches!(
        store.update("nope", TransferStatus::Sent, None, None),
        Err(StateError::NotFound(_))
    ));
    assert!(matches!(store.delete("nope"), Err(StateError::NotFound(_))));

    store.create("1001", "n", "d").unwrap();
    let duplicate = store.create("1001", "n2", "d2");
    assert_eq!(duplicate.unwrap_err().kind(), ErrorKind::Conflict);
}

#[test]
fn test_serialized_record_layout() {
    let store = TransferEntryStore::new();
    store.create("1001", "0xnonce", "0xdata").unwrap();
    let entry = store
        .update("1001", TransferStatus::Responded, Some(false), Some("rejected".into()))
        .unwrap();

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["status"], 5);
    assert_eq!(json["payload"]["id"], "1001");
    assert_eq!(json["sendAcceptance"], false);
    assert_eq!(json["result"], "rejected");
}

#[tokio::test]
async fn test_relay_subscription_sees_ready_then_responded() {
    let store = Arc::new(TransferEntryStore::new());
    let mut rx = store.events().subscribe();

    let writer = Arc::clone(&store);
    let producer = tokio::spawn(async move {
        writer.create("t-1", "n", "d").unwrap();
        for status in [
            TransferStatus::Inquired,
            TransferStatus::Answered,
            TransferStatus::Sent,
            TransferStatus::Responded,
        ] {
            writer.update("t-1", status, None, None).unwrap();
        }
    });

    let first = rx.recv().await.unwrap();
    assert!(matches!(first.event, TransferNotification::Ready { .. }));
    let second = rx.recv().await.unwrap();
    assert!(matches!(second.event, TransferNotification::Responded { .. }));
    assert_eq!(second.event.entry().status, TransferStatus::Responded);
    assert_eq!(second.sequence, first.sequence + 1);

    producer.await.unwrap();
}

#[test]
fn test_delete_emits_nothing_and_frees_id() {
    let store = TransferEntryStore::new();
    store.create("1001", "n", "d").unwrap();
    store.delete("1001").unwrap();
    assert_eq!(store.events().len(), 1);

    let again = store.create("1001", "n", "d").unwrap();
    assert_eq!(again.status, TransferStatus::Ready);
    assert_eq!(store.events().len(), 2);
}
