//! Staking parameters — every tunable value of the engine.
//!
//! Each field is mutable at runtime through the administrative surface;
//! this struct only supplies the initial configuration.

use serde::{Deserialize, Serialize};

/// Fixed-point scale applied to reward rates and accrued rewards.
///
/// A reward rate of `REWARD_SCALE` pays one pool unit per stake unit per
/// era. Accrued rewards are carried scaled and de-scaled (truncating) only
/// at claim time.
pub const REWARD_SCALE: u128 = 100_000_000_000_000_000_000; // 1e20

/// Basis-point denominator for tax rates (10_000 = 100%).
pub const BPS_DENOM: u128 = 10_000;

/// Initial configuration for a [`StakingEngine`].
///
/// [`StakingEngine`]: ../../erapool_engine/engine/struct.StakingEngine.html
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakingParams {
    /// Wall-clock duration of one era in seconds. Default: 1 day.
    pub era_length_secs: u64,

    /// Normalization window for the reward-rate formula, in era units.
    ///
    /// Distinct from `era_length_secs`: the rate divides the pool across
    /// `total_staked * duration_param`, while eras advance on
    /// `era_length_secs`. The two constants are independent knobs.
    /// Default: 7.
    pub duration_param: u64,

    /// Minimum elapsed seconds after a deposit before withdrawal, and
    /// after a claim before the next claim. Default: 1 day.
    pub timelock_secs: u64,

    /// Tax skimmed from every deposit, in basis points. Default: 5%.
    pub deposit_tax_bps: u32,

    /// Share of claimed rewards redirected to the secondary beneficiary
    /// while replenish mode is enabled, in basis points. Default: 20%.
    pub replenish_tax_bps: u32,

    /// Whether the replenish skim applies at claim time. Default: off.
    pub replenish_enabled: bool,
}

impl StakingParams {
    /// Production defaults for a live deployment.
    pub fn production_defaults() -> Self {
        Self {
            era_length_secs: 24 * 3600, // 1 day
            duration_param: 7,
            timelock_secs: 24 * 3600, // 1 day
            deposit_tax_bps: 500,     // 5%
            replenish_tax_bps: 2000,  // 20%
            replenish_enabled: false,
        }
    }
}

/// Default is the production configuration.
impl Default for StakingParams {
    fn default() -> Self {
        Self::production_defaults()
    }
}
