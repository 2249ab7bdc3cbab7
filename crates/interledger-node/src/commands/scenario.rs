//! `interledger-node scenario`: run a scripted flow against in-process ledgers.
//!
//! Every flow runs on a manual clock so refund deadlines can be crossed
//! without sleeping. Events are streamed to the log while the flow runs and
//! the outbox contents are printed as JSON afterwards.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use interledger_asset::{AssetError, AssetEvent, AssetId, LocationState};
use interledger_core::{Address, Clock, Envelope, ErrorKind, LockHash, ManualClock, Value};
use interledger_escrow::{EscrowError, EscrowEvent};
use interledger_state::{StateError, TransferNotification, TransferStatus};

use crate::config::NodeConfig;
use crate::node::LedgerNode;

const AMOUNT: Value = 1000;
const ASSET_ID: AssetId = 123;
const ABORT_REASON: u64 = 42;

#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Flow to run.
    #[arg(value_enum)]
    pub flow: Flow,

    /// Print the outbox contents on a single line.
    #[arg(long)]
    pub compact: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Deposit, redeem with the key, then show the lock value is spent.
    Redeem,
    /// Deposit, let the deadline pass, recover, then reuse the lock value.
    Recover,
    /// Relocate an asset out and abort back to `Here`.
    Abort,
    /// Relocate an asset out and commit it to `NotHere`.
    Commit,
    /// Move an asset to a second ledger, tracked in the relay status ledger.
    Relay,
}

#[derive(Serialize)]
struct OutboxDump {
    escrow: Vec<Envelope<EscrowEvent>>,
    assets: Vec<Envelope<AssetEvent>>,
    transfers: Vec<Envelope<TransferNotification>>,
}

impl OutboxDump {
    fn collect(node: &LedgerNode) -> Self {
        Self {
            escrow: node.escrow().events().poll(0),
            assets: node.assets().events().poll(0),
            transfers: node.transfers().events().poll(0),
        }
    }
}

pub async fn run(args: &ScenarioArgs, config: NodeConfig) -> Result<()> {
    let clock = Arc::new(ManualClock::starting_now());
    let node = LedgerNode::new(config, clock.clone())?;
    let logger = node.spawn_event_logger();

    tracing::info!(flow = ?args.flow, now = clock.now(), "running scenario");
    let outcome = execute(&node, &clock, args.flow);
    let logged = logger.shutdown().await?;
    outcome?;
    tracing::info!(flow = ?args.flow, logged, "scenario finished");

    let dump = OutboxDump::collect(&node);
    let json = if args.compact {
        serde_json::to_string(&dump)?
    } else {
        serde_json::to_string_pretty(&dump)?
    };
    println!("{}", json);
    Ok(())
}

/// Run one flow to completion, checking every expected outcome on the way.
pub fn execute(node: &LedgerNode, clock: &ManualClock, flow: Flow) -> Result<()> {
    match flow {
        Flow::Redeem => redeem_flow(node, clock),
        Flow::Recover => recover_flow(node, clock),
        Flow::Abort => relocation_flow(node, false),
        Flow::Commit => relocation_flow(node, true),
        Flow::Relay => relay_flow(node, clock),
    }
}

fn alice() -> Address {
    Address::from_label("alice")
}

fn bob() -> Address {
    Address::from_label("bob")
}

fn redeem_flow(node: &LedgerNode, clock: &ManualClock) -> Result<()> {
    let escrow = node.escrow();
    let key: [u8; 32] = rand::random();
    let lock = LockHash::from_preimage(&key);

    escrow.deposit(alice(), bob(), lock, clock.now() + 2, AMOUNT)?;
    escrow.redeem(bob(), lock, &key)?;

    expect_rejected(
        "second redeem",
        escrow.redeem(bob(), lock, &key),
        EscrowError::kind,
        ErrorKind::NotFound,
    )?;
    expect_rejected(
        "deposit on spent lock",
        escrow.deposit(alice(), bob(), lock, clock.now() + 2, AMOUNT),
        EscrowError::kind,
        ErrorKind::Conflict,
    )?;

    tracing::info!(
        alice = %escrow.balances().balance_of(&alice()),
        bob = %escrow.balances().balance_of(&bob()),
        "balances after redeem"
    );
    Ok(())
}

fn recover_flow(node: &LedgerNode, clock: &ManualClock) -> Result<()> {
    let escrow = node.escrow();
    let key: [u8; 32] = rand::random();
    let lock = LockHash::from_preimage(&key);

    escrow.deposit(alice(), bob(), lock, clock.now() + 1, AMOUNT)?;
    expect_rejected(
        "early recover",
        escrow.recover(alice(), lock),
        EscrowError::kind,
        ErrorKind::NotYetEligible,
    )?;

    let now = clock.advance(2);
    tracing::info!(now, "clock advanced past refund deadline");

    expect_rejected(
        "recover by receiver",
        escrow.recover(bob(), lock),
        EscrowError::kind,
        ErrorKind::PermissionDenied,
    )?;
    escrow.recover(alice(), lock)?;

    // A recovered lock value is free again.
    escrow.deposit(alice(), bob(), lock, clock.now() + 2, AMOUNT)?;

    tracing::info!(
        alice = %escrow.balances().balance_of(&alice()),
        locked = %escrow.locked_total(),
        "balances after recover"
    );
    Ok(())
}

fn relocation_flow(node: &LedgerNode, commit: bool) -> Result<()> {
    let assets = node.assets();
    let authority = assets.authority();

    assets.mint(
        assets.minter(),
        bob(),
        ASSET_ID,
        format!("ipfs://assets/{}", ASSET_ID),
        "sword",
    )?;
    assets.accept(authority, ASSET_ID)?;
    assets.transfer_out(bob(), ASSET_ID)?;

    expect_rejected(
        "ownership transfer while moving",
        assets.transfer_from(bob(), bob(), alice(), ASSET_ID),
        AssetError::kind,
        ErrorKind::WrongState,
    )?;

    let (state, expected) = if commit {
        (
            assets.interledger_commit(authority, ASSET_ID)?,
            LocationState::NotHere,
        )
    } else {
        (
            assets.interledger_abort(authority, ASSET_ID, ABORT_REASON)?,
            LocationState::Here,
        )
    };
    if state != expected {
        bail!("asset {} ended in {}, expected {}", ASSET_ID, state, expected);
    }
    Ok(())
}

/// Relocate an asset from `node` to a second ledger built from the same
/// config, driving the transfer through every relay status on the way.
fn relay_flow(node: &LedgerNode, clock: &ManualClock) -> Result<()> {
    let destination = LedgerNode::new(node.config().clone(), node.clock().clone())?;
    let source = node.assets();
    let target = destination.assets();
    let transfers = node.transfers();

    for guard in [source, target] {
        guard.mint(guard.minter(), bob(), ASSET_ID, "ipfs://assets/123", "sword")?;
    }
    source.accept(source.authority(), ASSET_ID)?;

    let cursor = source.events().next_sequence();
    source.transfer_out(bob(), ASSET_ID)?;

    // The relay picks up the relocation request from the source outbox.
    let request = source
        .events()
        .poll(cursor)
        .into_iter()
        .find(|envelope| matches!(envelope.event, AssetEvent::TransferOut { .. }))
        .context("no TransferOut event after transfer_out")?;

    let transfer_id = uuid::Uuid::now_v7().to_string();
    let nonce = hex::encode(rand::random::<[u8; 16]>());
    let data = serde_json::to_string(&request.event)?;
    let mut entry = transfers.create(&transfer_id, &nonce, &data)?;

    expect_rejected(
        "duplicate transfer entry",
        transfers.create(&transfer_id, &nonce, &data),
        StateError::kind,
        ErrorKind::Conflict,
    )?;

    let notes = transfers.events().next_sequence();
    while let Some(status) = entry.status.next() {
        let (send_acceptance, result) = match status {
            TransferStatus::Sent => (Some(true), None),
            TransferStatus::Responded => {
                target.accept(target.authority(), ASSET_ID)?;
                (None, Some(format!("accepted at {}", clock.now())))
            }
            TransferStatus::Confirming => {
                source.interledger_commit(source.authority(), ASSET_ID)?;
                (None, None)
            }
            _ => (None, None),
        };
        entry = transfers.update(&transfer_id, status, send_acceptance, result)?;
    }

    let responded = transfers
        .events()
        .poll(notes)
        .into_iter()
        .filter(|envelope| matches!(envelope.event, TransferNotification::Responded { .. }))
        .count();
    if responded != 1 {
        bail!("expected one transferResponded notification, saw {}", responded);
    }

    transfers.delete(&transfer_id)?;

    tracing::info!(
        transfer = %transfer_id,
        source = %source.get_state(ASSET_ID)?,
        destination = %target.get_state(ASSET_ID)?,
        "relocation finalized"
    );
    Ok(())
}

fn expect_rejected<T, E>(
    step: &str,
    outcome: Result<T, E>,
    kind_of: fn(&E) -> ErrorKind,
    expected: ErrorKind,
) -> Result<()>
where
    T: Debug,
    E: Display,
{
    match outcome {
        Err(e) if kind_of(&e) == expected => {
            tracing::info!(step, kind = %expected, error = %e, "rejected as expected");
            Ok(())
        }
        Err(e) => bail!("{}: expected {} rejection, got {} ({})", step, expected, kind_of(&e), e),
        Ok(value) => bail!("{}: expected {} rejection, call succeeded: {:?}", step, expected, value),
    }
}
