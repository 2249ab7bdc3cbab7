//! Integration test: escrow deposit, redeem and recover across the value
//! ledger, clock and notification log.

use std::sync::{Arc, Barrier};
use std::thread;

use interledger_core::ErrorKind;
use interledger_escrow::{EscrowError, EscrowEvent, LockStatus};
use interledger_integration_tests::{alice, bob, carol, secret, EscrowLedger, FUNDING};

// =========================================================================
// Redeem path
// =========================================================================

#[test]
fn test_deposit_then_redeem_pays_receiver_once() {
    let ledger = EscrowLedger::new("escrow-a");
    let (key, lock) = secret("L1");
    let deadline = ledger.now() + 2;

    ledger
        .escrow
        .deposit(alice(), bob(), lock, deadline, 1000)
        .expect("deposit should succeed");
    assert_eq!(ledger.balance(&alice()), FUNDING - 1000);
    assert_eq!(ledger.balance(&ledger.escrow.address()), 1000);

    let record = ledger
        .escrow
        .redeem(bob(), lock, &key)
        .expect("redeem should succeed");
    assert_eq!(record.status(), LockStatus::Redeemed);
    assert_eq!(ledger.balance(&bob()), FUNDING + 1000);
    assert_eq!(ledger.balance(&ledger.escrow.address()), 0);

    // Second redeem finds nothing to pay.
    let again = ledger.escrow.redeem(bob(), lock, &key);
    assert!(matches!(again, Err(EscrowError::NoFunds(_))));

    // A redeemed lock value is never reusable.
    let reuse = ledger.escrow.deposit(alice(), bob(), lock, deadline, 1000);
    assert_eq!(reuse.unwrap_err().kind(), ErrorKind::Conflict);
}

#[test]
fn test_third_party_redeem_still_pays_receiver() {
    let ledger = EscrowLedger::new("escrow-a");
    let (key, lock) = secret("relay-held");
    ledger
        .escrow
        .deposit(alice(), bob(), lock, ledger.now() + 10, 250)
        .unwrap();

    ledger.escrow.redeem(carol(), lock, &key).unwrap();
    assert_eq!(ledger.balance(&bob()), FUNDING + 250);
    assert_eq!(ledger.balance(&carol()), FUNDING);

    let events = ledger.escrow.events().poll(0);
    match &events[1].event {
        EscrowEvent::Redeemed { caller, receiver, .. } => {
            assert_eq!(*caller, carol());
            assert_eq!(*receiver, bob());
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(events[1].event.revealed_key(), Some(key));
}

#[test]
fn test_wrong_key_leaves_lock_untouched() {
    let ledger = EscrowLedger::new("escrow-a");
    let (_, lock) = secret("L1");
    ledger
        .escrow
        .deposit(alice(), bob(), lock, ledger.now() + 2, 1000)
        .unwrap();

    let result = ledger.escrow.redeem(bob(), lock, b"not the key");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidProof);
    assert_eq!(ledger.escrow.get(&lock).unwrap().amount, 1000);
    assert_eq!(ledger.escrow.events().len(), 1);
}

// =========================================================================
// Recover path
// =========================================================================

#[test]
fn test_recover_after_deadline_and_reuse() {
    let ledger = EscrowLedger::new("escrow-b");
    let (_, lock) = secret("L2");
    let deadline = ledger.now() + 1;
    ledger
        .escrow
        .deposit(alice(), bob(), lock, deadline, 1000)
        .unwrap();

    let early = ledger.escrow.recover(alice(), lock);
    assert!(matches!(early, Err(EscrowError::RefundNotReached { .. })));

    // Exactly at the deadline is still too early.
    ledger.clock.set(deadline);
    let at_deadline = ledger.escrow.recover(alice(), lock);
    assert_eq!(at_deadline.unwrap_err().kind(), ErrorKind::NotYetEligible);

    ledger.clock.advance(1);
    let not_sender = ledger.escrow.recover(bob(), lock);
    assert_eq!(not_sender.unwrap_err().kind(), ErrorKind::PermissionDenied);

    let record = ledger.escrow.recover(alice(), lock).unwrap();
    assert_eq!(record.amount, 0);
    assert!(!record.withdrawn);
    assert_eq!(record.status(), LockStatus::Recovered);
    assert_eq!(ledger.balance(&alice()), FUNDING);

    let nothing_left = ledger.escrow.recover(alice(), lock);
    assert!(matches!(nothing_left, Err(EscrowError::NoFundsToRecover(_))));

    ledger
        .escrow
        .deposit(alice(), bob(), lock, ledger.now() + 2, 1000)
        .expect("recovered lock value is reusable");
    assert_eq!(ledger.escrow.locked_total(), 1000);

    let names: Vec<_> = ledger
        .escrow
        .events()
        .poll(0)
        .iter()
        .map(|e| e.event.name())
        .collect();
    assert_eq!(names, vec!["FundsDeposited", "FundsRecovered", "FundsDeposited"]);
}

#[test]
fn test_redeem_after_deadline_is_still_allowed() {
    let ledger = EscrowLedger::new("escrow-b");
    let (key, lock) = secret("late");
    ledger
        .escrow
        .deposit(alice(), bob(), lock, ledger.now() + 1, 40)
        .unwrap();
    ledger.clock.advance(100);

    ledger.escrow.redeem(bob(), lock, &key).unwrap();
    let recover = ledger.escrow.recover(alice(), lock);
    assert!(matches!(recover, Err(EscrowError::NoFundsToRecover(_))));
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_concurrent_redeem_pays_exactly_once() {
    let ledger = EscrowLedger::new("escrow-race");
    let (key, lock) = secret("race");
    ledger
        .escrow
        .deposit(alice(), bob(), lock, ledger.now() + 5, 1000)
        .unwrap();

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let escrow = Arc::clone(&ledger.escrow);
            let barrier = Arc::clone(&barrier);
            let key = key.clone();
            thread::spawn(move || {
                barrier.wait();
                escrow.redeem(carol(), lock, &key).is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(ledger.balance(&bob()), FUNDING + 1000);
    assert_eq!(ledger.escrow.events().len(), 2);
}

#[test]
fn test_concurrent_deposit_on_same_lock_value() {
    let ledger = EscrowLedger::new("escrow-race");
    let (_, lock) = secret("contended");
    let deadline = ledger.now() + 5;

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [alice(), carol()]
        .into_iter()
        .map(|sender| {
            let escrow = Arc::clone(&ledger.escrow);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                escrow.deposit(sender, bob(), lock, deadline, 300)
            })
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .collect();
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, EscrowError::LockInUse(_))));

    // Only the winner paid.
    assert_eq!(ledger.escrow.locked_total(), 300);
    assert_eq!(
        ledger.balance(&alice()) + ledger.balance(&carol()),
        2 * FUNDING - 300
    );
}
