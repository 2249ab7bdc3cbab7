//! Integration test: a two-ledger atomic swap coordinated through escrow
//! notifications and the relay status ledger.
//!
//! Alice sells on ledger A, Bob pays on ledger B. Both locks share one
//! commitment; Alice's redeem on B reveals the key that Bob uses on A.

use std::sync::Arc;

use interledger_core::{Clock, ManualClock};
use interledger_escrow::{EscrowError, EscrowEvent};
use interledger_integration_tests::{alice, bob, secret, EscrowLedger, FUNDING, START};
use interledger_state::{TransferEntryStore, TransferStatus};

struct Swap {
    clock: Arc<ManualClock>,
    ledger_a: EscrowLedger,
    ledger_b: EscrowLedger,
    status: TransferEntryStore,
}

fn swap() -> Swap {
    let clock = Arc::new(ManualClock::new(START));
    Swap {
        ledger_a: EscrowLedger::with_clock("ledger-a", clock.clone()),
        ledger_b: EscrowLedger::with_clock("ledger-b", clock.clone()),
        clock,
        status: TransferEntryStore::new(),
    }
}

#[test]
fn test_swap_completes_with_revealed_key() {
    let s = swap();
    let (key, lock) = secret("swap");

    // Alice locks first with the longer deadline, Bob answers with a shorter one.
    s.ledger_a
        .escrow
        .deposit(alice(), bob(), lock, START + 20, 500)
        .unwrap();
    s.status.create("swap-1", &lock.to_string(), "A:500->B:700").unwrap();

    s.ledger_b
        .escrow
        .deposit(bob(), alice(), lock, START + 10, 700)
        .unwrap();
    s.status
        .update("swap-1", TransferStatus::Sent, Some(true), None)
        .unwrap();

    // Alice claims on B, which publishes the key.
    s.ledger_b.escrow.redeem(alice(), lock, &key).unwrap();
    let revealed = s
        .ledger_b
        .escrow
        .events()
        .poll(0)
        .into_iter()
        .find_map(|e| match e.event {
            EscrowEvent::Redeemed { .. } => e.event.revealed_key(),
            _ => None,
        })
        .expect("redeem on B reveals the key");
    s.status
        .update(
            "swap-1",
            TransferStatus::Responded,
            None,
            Some("key revealed on B".into()),
        )
        .unwrap();

    // The relay carries the key to A for Bob.
    s.ledger_a.escrow.redeem(bob(), lock, &revealed).unwrap();
    s.status
        .update("swap-1", TransferStatus::Finalized, None, None)
        .unwrap();

    assert_eq!(s.ledger_a.balance(&alice()), FUNDING - 500);
    assert_eq!(s.ledger_a.balance(&bob()), FUNDING + 500);
    assert_eq!(s.ledger_b.balance(&bob()), FUNDING - 700);
    assert_eq!(s.ledger_b.balance(&alice()), FUNDING + 700);

    let entry = s.status.read("swap-1").unwrap();
    assert!(entry.status.is_final());
    assert_eq!(entry.result.as_deref(), Some("key revealed on B"));
    assert_eq!(s.status.events().len(), 2);
}

#[test]
fn test_swap_unwinds_when_key_never_revealed() {
    let s = swap();
    let (_, lock) = secret("stalled");

    s.ledger_a
        .escrow
        .deposit(alice(), bob(), lock, START + 20, 500)
        .unwrap();
    s.ledger_b
        .escrow
        .deposit(bob(), alice(), lock, START + 10, 700)
        .unwrap();

    // Bob's shorter lock expires first; Alice's is still binding.
    s.clock.set(START + 11);
    s.ledger_b.escrow.recover(bob(), lock).unwrap();
    assert!(matches!(
        s.ledger_a.escrow.recover(alice(), lock),
        Err(EscrowError::RefundNotReached { .. })
    ));

    s.clock.set(START + 21);
    s.ledger_a.escrow.recover(alice(), lock).unwrap();

    for ledger in [&s.ledger_a, &s.ledger_b] {
        assert_eq!(ledger.balance(&alice()), FUNDING);
        assert_eq!(ledger.balance(&bob()), FUNDING);
        assert_eq!(ledger.escrow.locked_total(), 0);
    }
    assert_eq!(s.clock.now(), START + 21);
}

#[test]
fn test_same_commitment_is_independent_per_ledger() {
    let s = swap();
    let (key, lock) = secret("shared");
    s.ledger_a
        .escrow
        .deposit(alice(), bob(), lock, START + 5, 100)
        .unwrap();
    s.ledger_b
        .escrow
        .deposit(bob(), alice(), lock, START + 5, 100)
        .unwrap();

    s.ledger_a.escrow.redeem(bob(), lock, &key).unwrap();
    // Spent on A does not spend on B.
    assert_eq!(s.ledger_b.escrow.get(&lock).unwrap().amount, 100);
    assert_ne!(s.ledger_a.escrow.address(), s.ledger_b.escrow.address());
}
