// crates/epochs-mint/src/ledger.rs
//
// In-memory balances for the mint sink.
//
// Module accounts are addressed by name. The community pool is tracked
// separately from account balances. Total supply grows on mint and shrinks
// on burn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MintError;

/// Account that receives freshly minted provisions.
pub const MINT_ACCOUNT: &str = "mint";
/// Account that collects the staking share.
pub const FEE_COLLECTOR_ACCOUNT: &str = "fee_collector";
/// Account that collects the pool incentives share.
pub const POOL_INCENTIVES_ACCOUNT: &str = "pool_incentives";
/// Account that funds developer reward receivers.
pub const DEVELOPER_VESTING_ACCOUNT: &str = "developer_vesting";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<String, u64>,
    community_pool: u64,
    total_supply: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn community_pool(&self) -> u64 {
        self.community_pool
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Create `amount` new units in `account`.
    pub fn mint(&mut self, account: &str, amount: u64) -> Result<(), MintError> {
        if amount == 0 {
            return Ok(());
        }
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| MintError::Overflow(format!("minting {} exceeds u64", amount)))?;
        self.credit(account, amount)
    }

    /// Move `amount` from one account to another.
    pub fn send(&mut self, from: &str, to: &str, amount: u64) -> Result<(), MintError> {
        if amount == 0 {
            return Ok(());
        }
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    /// Move `amount` from an account into the community pool.
    pub fn fund_community_pool(&mut self, from: &str, amount: u64) -> Result<(), MintError> {
        if amount == 0 {
            return Ok(());
        }
        self.debit(from, amount)?;
        self.community_pool = self
            .community_pool
            .checked_add(amount)
            .ok_or_else(|| MintError::Overflow("community pool".to_string()))?;
        Ok(())
    }

    /// Destroy `amount` units held by `account`.
    pub fn burn(&mut self, account: &str, amount: u64) -> Result<(), MintError> {
        if amount == 0 {
            return Ok(());
        }
        self.debit(account, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    fn credit(&mut self, account: &str, amount: u64) -> Result<(), MintError> {
        let balance = self.balances.entry(account.to_string()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| MintError::Overflow(format!("balance of {}", account)))?;
        Ok(())
    }

    fn debit(&mut self, account: &str, amount: u64) -> Result<(), MintError> {
        let available = self.balance(account);
        if available < amount {
            return Err(MintError::InsufficientFunds {
                account: account.to_string(),
                needed: amount,
                available,
            });
        }
        self.balances.insert(account.to_string(), available - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_send_burn() {
        let mut ledger = Ledger::new();
        ledger.mint(MINT_ACCOUNT, 1_000).unwrap();
        ledger.send(MINT_ACCOUNT, FEE_COLLECTOR_ACCOUNT, 400).unwrap();
        ledger.fund_community_pool(MINT_ACCOUNT, 100).unwrap();
        ledger.burn(MINT_ACCOUNT, 500).unwrap();

        assert_eq!(ledger.balance(MINT_ACCOUNT), 0);
        assert_eq!(ledger.balance(FEE_COLLECTOR_ACCOUNT), 400);
        assert_eq!(ledger.community_pool(), 100);
        assert_eq!(ledger.total_supply(), 500);
    }

    #[test]
    fn test_overdraft_rejected() {
        let mut ledger = Ledger::new();
        ledger.mint(MINT_ACCOUNT, 10).unwrap();
        let err = ledger.send(MINT_ACCOUNT, "alice", 11).unwrap_err();
        assert!(matches!(
            err,
            MintError::InsufficientFunds { needed: 11, available: 10, .. }
        ));
        assert_eq!(ledger.balance(MINT_ACCOUNT), 10);
    }
}
