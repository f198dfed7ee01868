//! Interfaces between the batch executor and the registry pallets it consults.

use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

/// Read-only view of the capability registry.
pub trait CapabilityInspect<AccountId> {
  /// Whether `who` may be the target of a batch step.
  fn is_handler(who: &AccountId) -> bool;

  /// Whether `who` may re-enter the executor while a batch is in flight.
  fn is_trusted_caller(who: &AccountId) -> bool;

  /// Whether `who` is barred from opening a batch.
  fn is_banned(who: &AccountId) -> bool;

  /// Whether batch execution is globally suspended.
  fn is_halted() -> bool;
}

/// Empty registry: nothing is whitelisted.
impl<AccountId> CapabilityInspect<AccountId> for () {
  fn is_handler(_: &AccountId) -> bool {
    false
  }

  fn is_trusted_caller(_: &AccountId) -> bool {
    false
  }

  fn is_banned(_: &AccountId) -> bool {
    false
  }

  fn is_halted() -> bool {
    false
  }
}

/// One rule's share of a batch fee.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub struct FeeShare<AccountId, Balance> {
  pub rule_id: u32,
  pub recipient: AccountId,
  pub amount: Balance,
}

/// Pure fee computation over the active rule chain.
pub trait FeeCalculator<AccountId, AssetId, Balance> {
  /// Total fee and per-rule breakdown for moving `base` of `asset`.
  ///
  /// The total may exceed `base`; callers clamp it.
  fn calculate_fee(asset: &AssetId, base: Balance) -> (Balance, Vec<FeeShare<AccountId, Balance>>);
}

/// Fee-free configuration.
impl<AccountId, AssetId, Balance: Default> FeeCalculator<AccountId, AssetId, Balance> for () {
  fn calculate_fee(_: &AssetId, _: Balance) -> (Balance, Vec<FeeShare<AccountId, Balance>>) {
    (Balance::default(), Vec::new())
  }
}
