// crates/epochs-mint/src/keeper.rs
//
// MintKeeper: mints and distributes provisions at each epoch end.
//
// At genesis `developer_vesting_amount` is minted into the developer vesting
// account. Only ends of `params.epoch_identifier` at or after
// `minting_rewards_distribution_start_epoch` mint anything. On each such end:
//   1. Apply a reduction if `reduction_period_in_epochs` epochs have passed
//      since the last one (the start epoch counts as the first reduction point).
//   2. Mint the epoch provisions into the mint account.
//   3. Distribute them by proportion. The developer share is burned from the
//      mint account and paid out of the developer vesting account instead.
//      Truncation dust stays in the mint account.
//   4. Commit, then run the registered MintHooks in registration order.
//
// Changes are staged on a copy of the state and committed only if every
// transfer succeeds. A hook error is returned after the commit.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use epochs_core::error::EpochError;
use epochs_core::traits::EpochLifecycleSink;

use crate::error::MintError;
use crate::hooks::MintHooks;
use crate::ledger::{
    Ledger, DEVELOPER_VESTING_ACCOUNT, FEE_COLLECTOR_ACCOUNT, MINT_ACCOUNT,
    POOL_INCENTIVES_ACCOUNT,
};
use crate::minter::Minter;
use crate::params::{apply_ratio, MintParams};

/// Mutable state of the mint sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintState {
    pub minter: Minter,
    /// Epoch number of the most recent provision reduction.
    pub last_reduction_epoch: u64,
    pub ledger: Ledger,
}

/// Lifecycle sink that mints on epoch end.
pub struct MintKeeper {
    params: MintParams,
    state: Mutex<MintState>,
    hooks: Vec<Arc<dyn MintHooks>>,
}

impl fmt::Debug for MintKeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintKeeper")
            .field("params", &self.params)
            .field("state", &self.state)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl MintKeeper {
    /// Create a keeper at genesis and fund the developer vesting account.
    /// Fails if the params are invalid.
    pub fn new(params: MintParams) -> Result<Self, MintError> {
        params.validate()?;
        let mut ledger = Ledger::new();
        create_developer_vesting_account(&mut ledger, params.developer_vesting_amount)?;
        let state = MintState {
            minter: Minter::from_params(&params),
            last_reduction_epoch: 0,
            ledger,
        };
        Ok(Self {
            params,
            state: Mutex::new(state),
            hooks: Vec::new(),
        })
    }

    /// Register a hook. Hooks run in the order they are added.
    pub fn with_hook(mut self, hook: Arc<dyn MintHooks>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn params(&self) -> &MintParams {
        &self.params
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> Result<MintState, MintError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MintState>, MintError> {
        self.state
            .lock()
            .map_err(|_| MintError::State("mint state lock poisoned".to_string()))
    }

    fn on_epoch_end(&self, identifier: &str, epoch_number: u64) -> Result<(), MintError> {
        if identifier != self.params.epoch_identifier {
            return Ok(());
        }
        let start_epoch = self.params.minting_rewards_distribution_start_epoch;
        if epoch_number < start_epoch {
            return Ok(());
        }

        let minted = {
            let mut guard = self.lock()?;
            let mut staged = guard.clone();

            if epoch_number == start_epoch {
                staged.last_reduction_epoch = epoch_number;
            }
            if epoch_number
                >= staged.last_reduction_epoch + self.params.reduction_period_in_epochs
            {
                let previous = staged.minter.epoch_provisions;
                staged.minter.epoch_provisions =
                    staged.minter.next_epoch_provisions(&self.params);
                staged.last_reduction_epoch = epoch_number;
                tracing::info!(
                    "Epoch {}: provisions reduced {} -> {} {}",
                    epoch_number,
                    previous,
                    staged.minter.epoch_provisions,
                    self.params.mint_denom
                );
            }

            let minted = staged.minter.epoch_provisions;
            staged.ledger.mint(MINT_ACCOUNT, minted)?;
            distribute(&mut staged.ledger, &self.params, minted)?;

            *guard = staged;
            minted
        };
        tracing::info!(
            "Epoch {} of {}: minted {} {}",
            epoch_number,
            identifier,
            minted,
            self.params.mint_denom
        );

        for hook in &self.hooks {
            hook.after_distribute_minted_coins(minted)?;
        }
        Ok(())
    }
}

impl EpochLifecycleSink for MintKeeper {
    fn before_epoch_start(&self, _identifier: &str, _epoch_number: u64) -> Result<(), EpochError> {
        Ok(())
    }

    fn after_epoch_end(&self, identifier: &str, epoch_number: u64) -> Result<(), EpochError> {
        Ok(self.on_epoch_end(identifier, epoch_number)?)
    }
}

/// Mint the genesis developer vesting funds.
fn create_developer_vesting_account(ledger: &mut Ledger, amount: u64) -> Result<(), MintError> {
    ledger.mint(DEVELOPER_VESTING_ACCOUNT, amount)?;
    tracing::debug!("Developer vesting account funded with {}", amount);
    Ok(())
}

/// Split freshly minted provisions held by the mint account.
fn distribute(ledger: &mut Ledger, params: &MintParams, minted: u64) -> Result<(), MintError> {
    let proportions = &params.distribution_proportions;

    ledger.send(
        MINT_ACCOUNT,
        FEE_COLLECTOR_ACCOUNT,
        apply_ratio(minted, proportions.staking),
    )?;
    ledger.send(
        MINT_ACCOUNT,
        POOL_INCENTIVES_ACCOUNT,
        apply_ratio(minted, proportions.pool_incentives),
    )?;

    // Developer rewards come out of the vesting account, so the same amount
    // of fresh provisions is destroyed.
    let developer = apply_ratio(minted, proportions.developer_rewards);
    ledger.burn(MINT_ACCOUNT, developer)?;
    if params.weighted_developer_rewards_receivers.is_empty() {
        ledger.fund_community_pool(DEVELOPER_VESTING_ACCOUNT, developer)?;
    } else {
        for receiver in &params.weighted_developer_rewards_receivers {
            let share = apply_ratio(developer, receiver.weight);
            if receiver.address.is_empty() {
                ledger.fund_community_pool(DEVELOPER_VESTING_ACCOUNT, share)?;
            } else {
                ledger.send(DEVELOPER_VESTING_ACCOUNT, &receiver.address, share)?;
            }
        }
    }

    ledger.fund_community_pool(MINT_ACCOUNT, apply_ratio(minted, proportions.community_pool))?;
    Ok(())
}
