//! Fee Rules Pallet
//!
//! Ordered chain of fee rules evaluated when a batch settles. Each rule selects a
//! basis-point rate from its tiers according to the amount leaving custody and
//! pays its share to a fixed recipient. Rules can be scoped to a single asset.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::*;

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

const LOG_TARGET: &str = "runtime::fee-rules";

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::{
    frame_support::traits::EnsureOrigin,
    sp_runtime::traits::{MaybeSerializeDeserialize, TrailingZeroInput},
  };
  use primitives::{Balance, FeeCalculator, FeeShare};

  pub type FeeRuleOf<T> = FeeRule<<T as frame_system::Config>::AccountId, <T as Config>::AssetId>;

  #[pallet::config]
  pub trait Config: frame_system::Config {
    /// Asset identifier rules can be scoped to
    type AssetId: Parameter + MaxEncodedLen + MaybeSerializeDeserialize;

    /// Origin that manages the rule chain (e.g. Governance or Root)
    type FeeOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Maximum number of active rules
    #[pallet::constant]
    type MaxRules: Get<u32>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn fee_rules)]
  pub type FeeRules<T: Config> = StorageMap<_, Blake2_128Concat, RuleId, FeeRuleOf<T>, OptionQuery>;

  #[pallet::storage]
  pub type NextRuleId<T> = StorageValue<_, RuleId, ValueQuery>;

  /// Evaluation order of the chain.
  #[pallet::storage]
  #[pallet::getter(fn active_rules)]
  pub type ActiveRules<T: Config> = StorageValue<_, BoundedVec<RuleId, T::MaxRules>, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    FeeRuleAdded {
      rule_id: RuleId,
      asset: Option<T::AssetId>,
      recipient: T::AccountId,
    },
    FeeRuleRemoved {
      rule_id: RuleId,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// The origin may not manage fee rules.
    Unauthorized,
    /// The recipient is the zero address.
    InvalidAddress,
    /// Tiers are empty, unsorted, do not start at zero or exceed 100%.
    InvalidTiers,
    TooManyRules,
    RuleNotFound,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Append a rule to the end of the chain.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::add_rule())]
    pub fn add_rule(
      origin: OriginFor<T>,
      asset: Option<T::AssetId>,
      tiers: BoundedVec<FeeTier, MaxTiers>,
      recipient: T::AccountId,
    ) -> DispatchResult {
      T::FeeOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      let rule_id = Self::do_add_rule(FeeRule {
        asset: asset.clone(),
        tiers,
        recipient: recipient.clone(),
      })?;
      Self::deposit_event(Event::FeeRuleAdded {
        rule_id,
        asset,
        recipient,
      });
      Ok(())
    }

    /// Drop a rule from the chain. The order of the remaining rules is preserved.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::remove_rule())]
    pub fn remove_rule(origin: OriginFor<T>, rule_id: RuleId) -> DispatchResult {
      T::FeeOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      FeeRules::<T>::take(rule_id).ok_or(Error::<T>::RuleNotFound)?;
      ActiveRules::<T>::mutate(|rules| rules.retain(|id| *id != rule_id));
      log::debug!(target: LOG_TARGET, "fee rule {} removed", rule_id);
      Self::deposit_event(Event::FeeRuleRemoved { rule_id });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub(crate) fn do_add_rule(rule: FeeRuleOf<T>) -> Result<RuleId, DispatchError> {
      ensure!(tiers_are_valid(&rule.tiers), Error::<T>::InvalidTiers);
      if let Ok(zero) = T::AccountId::decode(&mut TrailingZeroInput::zeroes()) {
        ensure!(rule.recipient != zero, Error::<T>::InvalidAddress);
      }

      let rule_id = NextRuleId::<T>::get();
      ActiveRules::<T>::try_mutate(|rules| rules.try_push(rule_id))
        .map_err(|_| Error::<T>::TooManyRules)?;
      FeeRules::<T>::insert(rule_id, rule);
      NextRuleId::<T>::put(rule_id.saturating_add(1));
      log::debug!(target: LOG_TARGET, "fee rule {} added", rule_id);
      Ok(rule_id)
    }

    /// Walk the chain in order and collect every non-zero share for `base` of `asset`.
    pub fn calculate_fee(
      asset: &T::AssetId,
      base: Balance,
    ) -> (Balance, Vec<FeeShare<T::AccountId, Balance>>) {
      let mut total: Balance = 0;
      let mut shares = Vec::new();
      for rule_id in ActiveRules::<T>::get() {
        let Some(rule) = FeeRules::<T>::get(rule_id) else {
          continue;
        };
        if !rule.applies_to(asset) {
          continue;
        }
        let amount = rule.fee_for(base);
        if amount == 0 {
          continue;
        }
        total = total.saturating_add(amount);
        shares.push(FeeShare {
          rule_id,
          recipient: rule.recipient,
          amount,
        });
      }
      (total, shares)
    }
  }

  impl<T: Config> FeeCalculator<T::AccountId, T::AssetId, Balance> for Pallet<T> {
    fn calculate_fee(
      asset: &T::AssetId,
      base: Balance,
    ) -> (Balance, Vec<FeeShare<T::AccountId, Balance>>) {
      Self::calculate_fee(asset, base)
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  pub struct GenesisConfig<T: Config> {
    /// `(asset, [(threshold, bps)], recipient)` in evaluation order.
    pub rules: Vec<(Option<T::AssetId>, Vec<(Balance, u16)>, T::AccountId)>,
  }

  impl<T: Config> Default for GenesisConfig<T> {
    fn default() -> Self {
      Self { rules: Vec::new() }
    }
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (asset, tiers, recipient) in &self.rules {
        let tiers: BoundedVec<FeeTier, MaxTiers> = tiers
          .iter()
          .map(|(threshold, bps)| FeeTier {
            threshold: *threshold,
            bps: *bps,
          })
          .collect::<Vec<_>>()
          .try_into()
          .expect("Genesis fee rule has too many tiers");
        Pallet::<T>::do_add_rule(FeeRule {
          asset: asset.clone(),
          tiers,
          recipient: recipient.clone(),
        })
        .expect("Invalid genesis fee rule");
      }
    }
  }
}
