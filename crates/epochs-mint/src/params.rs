// crates/epochs-mint/src/params.rs
//
// Minting parameters.
//
// Defaults: 5,000,000 units per weekly epoch, halved every 156 epochs
// (~3 years), split 40% staking / 30% pool incentives / 20% developer
// rewards / 10% community pool.
//
// Ratios are kept as f64 for configuration but applied in integer
// arithmetic: each ratio is rounded to 12 decimal places and scaled to parts
// per 10^18 before it touches an amount.

use serde::{Deserialize, Serialize};

use crate::error::MintError;

/// Fixed-point scale for ratios: 1.0 == 10^18.
pub const RATIO_SCALE: u128 = 1_000_000_000_000_000_000;

/// Decimal places of a configured ratio that are honoured.
const RATIO_DECIMALS: u128 = 1_000_000_000_000;

/// `ratio` in parts per 10^18.
pub fn ratio_to_fixed(ratio: f64) -> u128 {
    let rounded = (ratio * RATIO_DECIMALS as f64).round() as u128;
    rounded * (RATIO_SCALE / RATIO_DECIMALS)
}

/// `amount * ratio`, truncated to whole units. Exact for any u64 amount.
pub fn apply_ratio(amount: u64, ratio: f64) -> u64 {
    let product = u128::from(amount) * ratio_to_fixed(ratio.min(1.0)) / RATIO_SCALE;
    u64::try_from(product).unwrap_or(u64::MAX)
}

/// How each epoch's provisions are split. Fractions sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionProportions {
    /// Sent to the fee collector for stakers.
    pub staking: f64,
    /// Sent to the pool incentives account.
    pub pool_incentives: f64,
    /// Split among the weighted developer reward receivers.
    pub developer_rewards: f64,
    /// Added to the community pool.
    pub community_pool: f64,
}

impl Default for DistributionProportions {
    fn default() -> Self {
        Self {
            staking: 0.4,
            pool_incentives: 0.3,
            developer_rewards: 0.2,
            community_pool: 0.1,
        }
    }
}

/// A developer reward receiver and its share of developer rewards.
/// An empty address routes the share to the community pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedAddress {
    pub address: String,
    pub weight: f64,
}

/// Parameters of the mint sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintParams {
    /// Denomination being minted.
    #[serde(default = "default_mint_denom")]
    pub mint_denom: String,

    /// Provisions minted per epoch before the first reduction.
    #[serde(default = "default_genesis_epoch_provisions")]
    pub genesis_epoch_provisions: u64,

    /// Epoch track whose ends trigger minting.
    #[serde(default = "default_epoch_identifier")]
    pub epoch_identifier: String,

    /// Number of epochs between provision reductions.
    #[serde(default = "default_reduction_period_in_epochs")]
    pub reduction_period_in_epochs: u64,

    /// Multiplier applied to provisions at each reduction, in [0, 1].
    #[serde(default = "default_reduction_factor")]
    pub reduction_factor: f64,

    #[serde(default)]
    pub distribution_proportions: DistributionProportions,

    #[serde(default)]
    pub weighted_developer_rewards_receivers: Vec<WeightedAddress>,

    /// First epoch number at which minting happens.
    #[serde(default)]
    pub minting_rewards_distribution_start_epoch: u64,

    /// Units minted into the developer vesting account at genesis. Developer
    /// rewards are paid out of this account; the matching share of each
    /// epoch's provisions is burned.
    #[serde(default = "default_developer_vesting_amount")]
    pub developer_vesting_amount: u64,
}

fn default_mint_denom() -> String {
    "uepoch".to_string()
}

fn default_genesis_epoch_provisions() -> u64 {
    5_000_000
}

fn default_epoch_identifier() -> String {
    "week".to_string()
}

fn default_reduction_period_in_epochs() -> u64 {
    156
}

fn default_reduction_factor() -> f64 {
    0.5
}

// Developer share of every epoch under the default schedule:
// 20% of 5,000,000 for 156 epochs, halving forever.
fn default_developer_vesting_amount() -> u64 {
    312_000_000
}

impl Default for MintParams {
    fn default() -> Self {
        Self {
            mint_denom: default_mint_denom(),
            genesis_epoch_provisions: default_genesis_epoch_provisions(),
            epoch_identifier: default_epoch_identifier(),
            reduction_period_in_epochs: default_reduction_period_in_epochs(),
            reduction_factor: default_reduction_factor(),
            distribution_proportions: DistributionProportions::default(),
            weighted_developer_rewards_receivers: Vec::new(),
            minting_rewards_distribution_start_epoch: 0,
            developer_vesting_amount: default_developer_vesting_amount(),
        }
    }
}

impl MintParams {
    pub fn validate(&self) -> Result<(), MintError> {
        if self.mint_denom.trim().is_empty() {
            return Err(MintError::InvalidParams("mint_denom must not be empty".to_string()));
        }
        if self.epoch_identifier.trim().is_empty() {
            return Err(MintError::InvalidParams(
                "epoch_identifier must not be empty".to_string(),
            ));
        }
        if self.reduction_period_in_epochs == 0 {
            return Err(MintError::InvalidParams(
                "reduction_period_in_epochs must be positive".to_string(),
            ));
        }
        check_fraction("reduction_factor", self.reduction_factor)?;

        let p = &self.distribution_proportions;
        let fractions = [
            ("staking", p.staking),
            ("pool_incentives", p.pool_incentives),
            ("developer_rewards", p.developer_rewards),
            ("community_pool", p.community_pool),
        ];
        for (name, value) in fractions {
            check_fraction(name, value)?;
        }
        let total: u128 = fractions.iter().map(|(_, v)| ratio_to_fixed(*v)).sum();
        if total != RATIO_SCALE {
            return Err(MintError::InvalidParams(format!(
                "distribution proportions sum to {}, expected 1",
                total as f64 / RATIO_SCALE as f64
            )));
        }

        if !self.weighted_developer_rewards_receivers.is_empty() {
            for receiver in &self.weighted_developer_rewards_receivers {
                check_fraction("developer reward weight", receiver.weight)?;
            }
            let total: u128 = self
                .weighted_developer_rewards_receivers
                .iter()
                .map(|r| ratio_to_fixed(r.weight))
                .sum();
            if total != RATIO_SCALE {
                return Err(MintError::InvalidParams(format!(
                    "developer reward weights sum to {}, expected 1",
                    total as f64 / RATIO_SCALE as f64
                )));
            }
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> Result<(), MintError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MintError::InvalidParams(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(MintParams::default().validate().is_ok());
    }

    #[test]
    fn test_proportions_must_sum_to_one() {
        let mut params = MintParams::default();
        params.distribution_proportions.community_pool = 0.2;
        assert!(matches!(params.validate(), Err(MintError::InvalidParams(_))));
    }

    #[test]
    fn test_reduction_factor_range() {
        let mut params = MintParams::default();
        params.reduction_factor = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_receiver_weights_must_sum_to_one() {
        let mut params = MintParams::default();
        params.weighted_developer_rewards_receivers = vec![
            WeightedAddress { address: "dev1".to_string(), weight: 0.5 },
            WeightedAddress { address: "dev2".to_string(), weight: 0.3 },
        ];
        assert!(params.validate().is_err());
        params.weighted_developer_rewards_receivers[1].weight = 0.5;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_apply_ratio_is_exact_for_decimal_ratios() {
        // 100.0 * 0.29 == 28.999999999999996 in f64.
        assert_eq!(apply_ratio(100, 0.29), 29);
        assert_eq!(apply_ratio(100, 0.57), 57);
        assert_eq!(apply_ratio(3, 0.5), 1);
        assert_eq!(apply_ratio(7, 0.0), 0);
        assert_eq!(apply_ratio(u64::MAX, 1.0), u64::MAX);
    }

    #[test]
    fn test_apply_ratio_above_f64_precision() {
        let amount = (1u64 << 60) + 3;
        assert_eq!(apply_ratio(amount, 0.5), (1u64 << 59) + 1);
        assert_eq!(apply_ratio(amount, 0.25), (1u64 << 58));
    }

    #[test]
    fn test_decimal_proportions_sum_exactly() {
        let mut params = MintParams::default();
        params.distribution_proportions = DistributionProportions {
            staking: 0.29,
            pool_incentives: 0.37,
            developer_rewards: 0.23,
            community_pool: 0.11,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_zero_reduction_period_rejected() {
        let mut params = MintParams::default();
        params.reduction_period_in_epochs = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let params: MintParams = serde_json::from_str(r#"{"epoch_identifier":"day"}"#).unwrap();
        assert_eq!(params.epoch_identifier, "day");
        assert_eq!(params.genesis_epoch_provisions, 5_000_000);
        assert_eq!(params.developer_vesting_amount, 312_000_000);
        assert_eq!(params.distribution_proportions, DistributionProportions::default());
    }
}
