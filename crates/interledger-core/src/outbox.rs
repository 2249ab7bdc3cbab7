//! Append-only notification log.
//!
//! Components append an event inside the same critical section as the state
//! change that caused it. Consumers either poll from a cursor or subscribe
//! for live delivery; a subscriber that lags can always catch up by polling.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::clock::{Clock, SystemClock};

/// Default number of envelopes buffered per live subscriber.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// A sequenced event as stored in the outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<E> {
    /// Position in the log, dense and starting at zero.
    pub sequence: u64,
    /// When the event was appended, by the owning component's clock.
    pub emitted_at: DateTime<Utc>,
    pub event: E,
}

/// Append-only, sequence-numbered event log with broadcast fan-out.
#[derive(Debug)]
pub struct Outbox<E> {
    log: RwLock<Vec<Envelope<E>>>,
    live_tx: broadcast::Sender<Envelope<E>>,
    clock: Arc<dyn Clock>,
}

impl<E: Clone> Outbox<E> {
    /// Create an empty outbox whose live subscribers buffer up to `capacity`
    /// envelopes each.
    pub fn new(capacity: usize) -> Self {
        let (live_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            log: RwLock::new(Vec::new()),
            live_tx,
            clock: Arc::new(SystemClock),
        }
    }

    /// Stamp envelopes with `clock` instead of wall time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Append an event and return its sequence number.
    pub fn append(&self, event: E) -> u64 {
        let mut log = self.log.write().unwrap_or_else(PoisonError::into_inner);
        let envelope = Envelope {
            sequence: log.len() as u64,
            emitted_at: stamp(self.clock.now()),
            event,
        };
        let sequence = envelope.sequence;
        log.push(envelope.clone());
        // Sent under the write lock so live delivery order matches the log.
        // No receivers is not an error: consumers may poll instead.
        let _ = self.live_tx.send(envelope);
        sequence
    }

    /// All envelopes with `sequence >= from`, in order.
    pub fn poll(&self, from: u64) -> Vec<Envelope<E>> {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(log.len());
        log[start..].to_vec()
    }

    /// Receive every envelope appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope<E>> {
        self.live_tx.subscribe()
    }

    /// The sequence number the next appended event will receive.
    pub fn next_sequence(&self) -> u64 {
        self.len() as u64
    }

    pub fn len(&self) -> usize {
        self.log.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stamp(now: u64) -> DateTime<Utc> {
    i64::try_from(now)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_default()
}

impl<E: Clone> Default for Outbox<E> {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOX_CAPACITY)
    }
}
