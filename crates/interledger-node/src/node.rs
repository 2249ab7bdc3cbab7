//! The interledger node orchestrator.
//!
//! Hosts the value ledger, escrow, asset guard and relay status ledger in one
//! process and forwards their notifications to the log.

use anyhow::Result;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use interledger_asset::{AssetEvent, AssetGuard};
use interledger_core::{Balances, Clock, Envelope, Value};
use interledger_escrow::{EscrowEvent, HashTimeLock};
use interledger_state::{TransferEntryStore, TransferNotification};

use crate::config::NodeConfig;

/// One hosting ledger with all three interledger components.
pub struct LedgerNode {
    config: NodeConfig,
    clock: Arc<dyn Clock>,
    balances: Arc<Balances>,
    escrow: Arc<HashTimeLock>,
    assets: Arc<AssetGuard>,
    transfers: Arc<TransferEntryStore>,
}

/// Handle to a running event logger.
pub struct EventLogger {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<u64>,
}

impl LedgerNode {
    /// Build the components from config and fund the genesis accounts.
    pub fn new(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let balances = Arc::new(Balances::new());
        for account in &config.genesis.accounts {
            balances.credit(account.address, Value::from(account.balance))?;
        }

        let escrow = Arc::new(HashTimeLock::from_config(
            &config.ledger,
            balances.clone(),
            clock.clone(),
        ));
        let assets = Arc::new(AssetGuard::from_config(&config.ledger).with_clock(clock.clone()));
        let transfers = Arc::new(
            TransferEntryStore::from_config(&config.ledger).with_clock(clock.clone()),
        );

        tracing::info!(
            escrow = %escrow.address(),
            asset = %assets.name(),
            accounts = config.genesis.accounts.len(),
            supply = %balances.total_supply(),
            "interledger node created"
        );

        Ok(Self {
            config,
            clock,
            balances,
            escrow,
            assets,
            transfers,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn balances(&self) -> &Arc<Balances> {
        &self.balances
    }

    pub fn escrow(&self) -> &Arc<HashTimeLock> {
        &self.escrow
    }

    pub fn assets(&self) -> &Arc<AssetGuard> {
        &self.assets
    }

    pub fn transfers(&self) -> &Arc<TransferEntryStore> {
        &self.transfers
    }

    /// Subscribe to every outbox and log each event as it arrives.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_event_logger(&self) -> EventLogger {
        let escrow_rx = self.escrow.events().subscribe();
        let asset_rx = self.assets.events().subscribe();
        let transfer_rx = self.transfers.events().subscribe();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run_event_logger(
            escrow_rx,
            asset_rx,
            transfer_rx,
            shutdown_rx,
        ));
        EventLogger { shutdown_tx, task }
    }
}

impl EventLogger {
    /// Stop after draining buffered events; returns how many were logged.
    pub async fn shutdown(self) -> Result<u64> {
        // The task may already have exited on a closed channel.
        let _ = self.shutdown_tx.send(());
        Ok(self.task.await?)
    }
}

async fn run_event_logger(
    mut escrow_rx: broadcast::Receiver<Envelope<EscrowEvent>>,
    mut asset_rx: broadcast::Receiver<Envelope<AssetEvent>>,
    mut transfer_rx: broadcast::Receiver<Envelope<TransferNotification>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> u64 {
    let mut logged = 0u64;
    let (mut escrow_open, mut asset_open, mut transfer_open) = (true, true, true);

    tracing::debug!("event logger started");

    // Runs until shutdown or until every outbox has gone away.
    while escrow_open || asset_open || transfer_open {
        // Biased so that everything already buffered is logged before shutdown.
        tokio::select! {
            biased;
            event = escrow_rx.recv(), if escrow_open => {
                escrow_open = handle(event, "escrow", &mut logged, |ev| {
                    tracing::info!(
                        source = "escrow",
                        event = ev.name(),
                        lock = %ev.lock_value(),
                        "ledger event"
                    );
                });
            }
            event = asset_rx.recv(), if asset_open => {
                asset_open = handle(event, "asset", &mut logged, |ev| {
                    tracing::info!(
                        source = "asset",
                        event = ev.name(),
                        asset = ev.asset_id(),
                        "ledger event"
                    );
                });
            }
            event = transfer_rx.recv(), if transfer_open => {
                transfer_open = handle(event, "transfers", &mut logged, |ev| {
                    tracing::info!(
                        source = "transfers",
                        event = ev.name(),
                        transfer = ev.entry().id(),
                        status = %ev.entry().status,
                        "ledger event"
                    );
                });
            }
            _ = &mut shutdown_rx => break,
        }
    }

    tracing::debug!(logged, "event logger stopped");
    logged
}

/// Returns false once the channel is closed.
fn handle<E, F>(
    received: Result<Envelope<E>, broadcast::error::RecvError>,
    source: impl Display,
    logged: &mut u64,
    log: F,
) -> bool
where
    F: FnOnce(&E),
{
    match received {
        Ok(envelope) => {
            log(&envelope.event);
            *logged += 1;
            true
        }
        Err(broadcast::error::RecvError::Lagged(n)) => {
            tracing::warn!(%source, missed = n, "event receiver lagged");
            true
        }
        Err(broadcast::error::RecvError::Closed) => {
            tracing::info!(%source, "event channel closed");
            false
        }
    }
}
