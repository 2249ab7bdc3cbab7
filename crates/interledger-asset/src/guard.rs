use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use interledger_core::outbox::DEFAULT_OUTBOX_CAPACITY;
use interledger_core::{Address, Clock, LedgerConfig, Outbox};

use crate::error::AssetError;
use crate::events::AssetEvent;
use crate::state::{LocationEvent, LocationState, LocationStateMachine};
use crate::types::{Asset, AssetId};

/// The two privileged principals of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    /// May mint new assets.
    pub minter: Address,
    /// May accept assets and commit or abort relocations.
    pub authority: Address,
}

/// Transferable-asset registry with a location state machine.
///
/// Native ownership transfer is only possible while an asset is `Here`. The
/// authority drives relocations to and from other ledgers through `accept`,
/// `interledger_commit` and `interledger_abort`; the owner starts one with
/// `transfer_out`.
///
/// Thread-safe: each asset id is a `DashMap` key and every call checks and
/// mutates under that key's guard.
pub struct AssetGuard {
    name: String,
    symbol: String,
    roles: Roles,
    assets: DashMap<AssetId, Asset>,
    holdings: DashMap<Address, u64>,
    events: Outbox<AssetEvent>,
}

impl AssetGuard {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, roles: Roles) -> Self {
        Self::with_outbox_capacity(name, symbol, roles, DEFAULT_OUTBOX_CAPACITY)
    }

    pub fn with_outbox_capacity(
        name: impl Into<String>,
        symbol: impl Into<String>,
        roles: Roles,
        capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            roles,
            assets: DashMap::new(),
            holdings: DashMap::new(),
            events: Outbox::new(capacity),
        }
    }

    /// Stamp emitted events with the hosting ledger's clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.events = self.events.with_clock(clock);
        self
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        let roles = Roles {
            minter: config.asset.minter,
            authority: config.asset.authority,
        };
        Self::with_outbox_capacity(
            config.asset.name.clone(),
            config.asset.symbol.clone(),
            roles,
            config.outbox.capacity,
        )
    }

    /// Create a new asset owned by `owner`, starting in `NotHere`.
    pub fn mint(
        &self,
        caller: Address,
        owner: Address,
        id: AssetId,
        uri: impl Into<String>,
        asset_name: impl Into<String>,
    ) -> Result<Asset, AssetError> {
        self.require_role(caller, self.roles.minter, "minter")?;
        if owner.is_zero() {
            return Err(AssetError::NullOwner);
        }

        let slot = match self.assets.entry(id) {
            Entry::Occupied(_) => return Err(AssetError::AlreadyMinted(id)),
            Entry::Vacant(slot) => slot,
        };
        let asset = Asset {
            id,
            owner,
            uri: uri.into(),
            asset_name: asset_name.into(),
            state: LocationState::NotHere,
            approved: None,
        };
        let _guard = slot.insert(asset.clone());
        self.add_holding(owner);
        self.events.append(AssetEvent::Minted {
            id,
            owner,
            asset_name: asset.asset_name.clone(),
        });

        tracing::info!(asset = id, %owner, name = %asset.asset_name, "asset minted");
        Ok(asset)
    }

    /// Destroy an asset. Allowed from any location state, by the owner or the
    /// approved principal.
    pub fn burn(&self, caller: Address, id: AssetId) -> Result<(), AssetError> {
        let slot = match self.assets.entry(id) {
            Entry::Occupied(slot) => slot,
            Entry::Vacant(_) => return Err(AssetError::NotFound(id)),
        };
        if !slot.get().is_owner_or_approved(&caller) {
            return Err(AssetError::PermissionDenied {
                caller,
                role: "owner",
            });
        }

        let (_, asset) = slot.remove_entry();
        self.remove_holding(asset.owner);
        self.events.append(AssetEvent::Burned {
            id,
            owner: asset.owner,
        });

        tracing::info!(asset = id, owner = %asset.owner, state = %asset.state, "asset burned");
        Ok(())
    }

    /// Activate an asset on this ledger: `NotHere` → `Here`. Authority only.
    pub fn accept(&self, caller: Address, id: AssetId) -> Result<LocationState, AssetError> {
        self.require_role(caller, self.roles.authority, "authority")?;
        self.apply(id, LocationEvent::Accept, AssetEvent::Accepted { id })
    }

    /// Start moving an asset off this ledger: `Here` → `TransferOut`. Owner only.
    pub fn transfer_out(&self, caller: Address, id: AssetId) -> Result<LocationState, AssetError> {
        let mut asset = self.assets.get_mut(&id).ok_or(AssetError::NotFound(id))?;
        if asset.owner != caller {
            return Err(AssetError::PermissionDenied {
                caller,
                role: "owner",
            });
        }

        asset.state = LocationStateMachine::transition(asset.state, LocationEvent::TransferOut)?;
        self.events.append(AssetEvent::TransferOut {
            id,
            from: caller,
            asset_name: asset.asset_name.clone(),
        });

        tracing::info!(asset = id, from = %caller, "asset transfer out requested");
        Ok(asset.state)
    }

    /// Finalize a relocation: `TransferOut` → `NotHere`. Authority only.
    pub fn interledger_commit(
        &self,
        caller: Address,
        id: AssetId,
    ) -> Result<LocationState, AssetError> {
        self.require_role(caller, self.roles.authority, "authority")?;
        self.apply(id, LocationEvent::Commit, AssetEvent::Committed { id })
    }

    /// Cancel a relocation: `TransferOut` → `Here`. Authority only.
    pub fn interledger_abort(
        &self,
        caller: Address,
        id: AssetId,
        reason: u64,
    ) -> Result<LocationState, AssetError> {
        self.require_role(caller, self.roles.authority, "authority")?;
        self.apply(id, LocationEvent::Abort, AssetEvent::Aborted { id, reason })
    }

    /// Move ownership from `from` to `to`. Only while the asset is `Here`.
    pub fn transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        id: AssetId,
    ) -> Result<(), AssetError> {
        let mut asset = self.assets.get_mut(&id).ok_or(AssetError::NotFound(id))?;
        if !asset.state.is_transferable() {
            return Err(AssetError::NotTransferable {
                id,
                state: asset.state,
            });
        }
        if !asset.is_owner_or_approved(&caller) {
            return Err(AssetError::PermissionDenied {
                caller,
                role: "owner",
            });
        }
        if asset.owner != from {
            return Err(AssetError::WrongOwner { id, claimed: from });
        }
        if to.is_zero() {
            return Err(AssetError::NullRecipient);
        }

        asset.owner = to;
        asset.approved = None;
        self.remove_holding(from);
        self.add_holding(to);
        self.events.append(AssetEvent::Transferred { id, from, to });

        tracing::info!(asset = id, %from, %to, "asset ownership transferred");
        Ok(())
    }

    /// Let `spender` move or burn the asset on the owner's behalf. Passing the
    /// null address clears the approval.
    pub fn approve(&self, caller: Address, spender: Address, id: AssetId) -> Result<(), AssetError> {
        let mut asset = self.assets.get_mut(&id).ok_or(AssetError::NotFound(id))?;
        if asset.owner != caller {
            return Err(AssetError::PermissionDenied {
                caller,
                role: "owner",
            });
        }

        asset.approved = (!spender.is_zero()).then_some(spender);
        self.events.append(AssetEvent::Approval {
            id,
            owner: caller,
            spender: asset.approved,
        });
        Ok(())
    }

    pub fn owner_of(&self, id: AssetId) -> Result<Address, AssetError> {
        self.assets
            .get(&id)
            .map(|asset| asset.owner)
            .ok_or(AssetError::NotFound(id))
    }

    /// Number of assets held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.holdings.get(owner).map(|n| *n).unwrap_or(0)
    }

    pub fn get_state(&self, id: AssetId) -> Result<LocationState, AssetError> {
        self.assets
            .get(&id)
            .map(|asset| asset.state)
            .ok_or(AssetError::NotFound(id))
    }

    /// Name the asset is paired with; `None` once burned.
    pub fn asset_name(&self, id: AssetId) -> Option<String> {
        self.assets.get(&id).map(|asset| asset.asset_name.clone())
    }

    pub fn token_uri(&self, id: AssetId) -> Option<String> {
        self.assets.get(&id).map(|asset| asset.uri.clone())
    }

    pub fn get_approved(&self, id: AssetId) -> Result<Option<Address>, AssetError> {
        self.assets
            .get(&id)
            .map(|asset| asset.approved)
            .ok_or(AssetError::NotFound(id))
    }

    pub fn get(&self, id: AssetId) -> Option<Asset> {
        self.assets.get(&id).map(|asset| asset.clone())
    }

    pub fn minter(&self) -> Address {
        self.roles.minter
    }

    pub fn authority(&self) -> Address {
        self.roles.authority
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of live (unburned) assets.
    pub fn total_supply(&self) -> usize {
        self.assets.len()
    }

    /// Notification log consumed by the relay.
    pub fn events(&self) -> &Outbox<AssetEvent> {
        &self.events
    }

    fn apply(
        &self,
        id: AssetId,
        transition: LocationEvent,
        event: AssetEvent,
    ) -> Result<LocationState, AssetError> {
        let mut asset = self.assets.get_mut(&id).ok_or(AssetError::NotFound(id))?;
        let from = asset.state;
        asset.state = LocationStateMachine::transition(from, transition)?;
        self.events.append(event);

        tracing::info!(asset = id, %from, to = %asset.state, call = %transition, "asset location changed");
        Ok(asset.state)
    }

    fn require_role(
        &self,
        caller: Address,
        holder: Address,
        role: &'static str,
    ) -> Result<(), AssetError> {
        if caller != holder {
            tracing::debug!(%caller, role, "role check failed");
            return Err(AssetError::PermissionDenied { caller, role });
        }
        Ok(())
    }

    fn add_holding(&self, owner: Address) {
        *self.holdings.entry(owner).or_insert(0) += 1;
    }

    fn remove_holding(&self, owner: Address) {
        if let Some(mut count) = self.holdings.get_mut(&owner) {
            *count = count.saturating_sub(1);
        }
    }
}
