use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use polkadot_sdk::frame_support::{BoundedVec, traits::ConstU32};
use polkadot_sdk::sp_runtime::Permill;
use primitives::{Balance, params::BPS_DENOMINATOR};
use scale_info::TypeInfo;

pub type RuleId = u32;

/// Upper bound on the tiers of a single rule.
pub type MaxTiers = ConstU32<8>;

/// A marginal rate that applies once the fee base reaches `threshold`.
#[derive(
  Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub struct FeeTier {
  pub threshold: Balance,
  /// Rate in basis points (10_000 = 100%).
  pub bps: u16,
}

impl FeeTier {
  pub fn rate(&self) -> Permill {
    Permill::from_parts(u32::from(self.bps) * 100)
  }
}

#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub struct FeeRule<AccountId, AssetId> {
  /// `None` applies the rule to every asset.
  pub asset: Option<AssetId>,
  pub tiers: BoundedVec<FeeTier, MaxTiers>,
  pub recipient: AccountId,
}

impl<AccountId, AssetId: PartialEq> FeeRule<AccountId, AssetId> {
  pub fn applies_to(&self, asset: &AssetId) -> bool {
    self.asset.as_ref().is_none_or(|scoped| scoped == asset)
  }

  /// Highest tier whose threshold does not exceed `base`.
  pub fn active_tier(&self, base: Balance) -> Option<&FeeTier> {
    self.tiers.iter().rev().find(|tier| tier.threshold <= base)
  }

  pub fn fee_for(&self, base: Balance) -> Balance {
    self
      .active_tier(base)
      .map(|tier| tier.rate().mul_floor(base))
      .unwrap_or_default()
  }
}

/// Tiers must start at zero, ascend strictly and never exceed 100%.
pub fn tiers_are_valid(tiers: &[FeeTier]) -> bool {
  let Some(first) = tiers.first() else {
    return false;
  };
  first.threshold == 0
    && tiers.iter().all(|tier| tier.bps <= BPS_DENOMINATOR)
    && tiers.windows(2).all(|pair| pair[0].threshold < pair[1].threshold)
}
