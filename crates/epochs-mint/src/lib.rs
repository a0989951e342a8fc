// crates/epochs-mint/src/lib.rs
//
// epochs-mint: epoch-driven minting for the Epochs scheduler.
//
// The MintKeeper is an EpochLifecycleSink. At the end of every epoch on its
// configured track it mints the current epoch provisions and distributes them
// by fixed proportions to staking, pool incentives, developer rewards and the
// community pool. Provisions are reduced by a constant factor every
// `reduction_period_in_epochs` epochs. Developer rewards are paid from a
// vesting account funded at genesis, and the matching share of fresh
// provisions is burned. Registered MintHooks run after each distribution.
//
// All amounts are integer base units of `mint_denom`.

pub mod error;
pub mod hooks;
pub mod keeper;
pub mod ledger;
pub mod minter;
pub mod params;

// Re-export key types for ergonomic access from downstream crates.
pub use error::MintError;
pub use hooks::MintHooks;
pub use keeper::MintKeeper;
pub use ledger::{
    Ledger, DEVELOPER_VESTING_ACCOUNT, FEE_COLLECTOR_ACCOUNT, MINT_ACCOUNT,
    POOL_INCENTIVES_ACCOUNT,
};
pub use minter::Minter;
pub use params::{apply_ratio, DistributionProportions, MintParams, WeightedAddress};
