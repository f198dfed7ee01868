//! Boundary between the executor and the handler modules it dispatches to.
//!
//! A handler is any type implementing [`HandlerModule`]. The runtime exposes its
//! handlers to the executor through a [`HandlerTable`], keyed by the address the
//! capability registry whitelists. Handlers only ever touch value through the
//! [`CustodyHandle`] they are given.

use crate::{AssetOps, Config, CustodyAssets, CustodyEntry, Error, LOG_TARGET, Pallet};
use alloc::vec::Vec;
use frame::prelude::*;
use polkadot_sdk::frame_support::weights::Weight;
use primitives::{Balance, word::AmountArg};

/// A step implementation.
///
/// `payload` is the step's arguments after splicing. The returned bytes must be a
/// whole number of 32-byte words; they are cached for later steps of the batch.
/// Any error aborts and rolls back the entire batch.
pub trait HandlerModule<T: Config> {
  fn handle(&self, custody: &mut CustodyHandle<T>, payload: &[u8]) -> Result<Vec<u8>, DispatchError>;

  /// Upper bound on the weight of `handle` for `payload` as submitted, before
  /// splicing. Handlers that re-enter the executor include the nested batch.
  fn weight(&self, payload: &[u8]) -> Weight;
}

/// Runtime-supplied lookup from a whitelisted address to its implementation.
pub trait HandlerTable<T: Config> {
  fn resolve(target: &T::AccountId) -> Option<&'static dyn HandlerModule<T>>;
}

impl<T: Config> HandlerTable<T> for () {
  fn resolve(_: &T::AccountId) -> Option<&'static dyn HandlerModule<T>> {
    None
  }
}

/// A handler's view of the open custody context.
///
/// Balances and the set of touched assets live in storage and are shared with
/// nested batches; the handle itself only carries the context identity.
pub struct CustodyHandle<T: Config> {
  caller: T::AccountId,
  account: T::AccountId,
  depth: u32,
}

impl<T: Config> CustodyHandle<T> {
  pub(crate) fn new(caller: T::AccountId, depth: u32) -> Self {
    Self {
      caller,
      account: Pallet::<T>::account_id(),
      depth,
    }
  }

  /// Owner of the custody context: the signer of the outermost batch.
  pub fn caller(&self) -> &T::AccountId {
    &self.caller
  }

  /// Account holding the assets in custody.
  pub fn account(&self) -> &T::AccountId {
    &self.account
  }

  /// Nesting level of the batch running this step, `0` for the outermost one.
  pub fn depth(&self) -> u32 {
    self.depth
  }

  fn entry(&self, asset: T::AssetId) -> Option<CustodyEntry<T::AssetId>> {
    CustodyAssets::<T>::get()
      .into_iter()
      .find(|entry| entry.asset == asset)
  }

  /// Amount of `asset` held for this batch. Balances that were in the custody
  /// account before the batch touched the asset are not counted.
  pub fn balance(&self, asset: T::AssetId) -> Balance {
    self
      .entry(asset)
      .map(|entry| T::AssetOps::balance(&self.account, asset).saturating_sub(entry.baseline))
      .unwrap_or_default()
  }

  /// Part of [`Self::balance`] that may leave custody: the fee owed on the
  /// caller's inflow stays behind for settlement.
  pub fn spendable(&self, asset: T::AssetId) -> Balance {
    self
      .entry(asset)
      .map(|entry| {
        let held = T::AssetOps::balance(&self.account, asset).saturating_sub(entry.baseline);
        held.saturating_sub(Pallet::<T>::fee_due(&asset, entry.inflow))
      })
      .unwrap_or_default()
  }

  /// Substitute the spendable custody balance for the `MAX_AMOUNT` sentinel.
  pub fn resolve_amount(&self, asset: T::AssetId, amount: AmountArg) -> Balance {
    amount.resolve(self.spendable(asset))
  }

  /// Move `amount` of `asset` from the caller into custody.
  pub fn pull(&mut self, asset: T::AssetId, amount: Balance) -> DispatchResult {
    let caller = self.caller.clone();
    self.receive(&caller, asset, amount)
  }

  /// Move `amount` of `asset` from `from` into custody as fee-bearing inflow.
  pub(crate) fn receive(&mut self, from: &T::AccountId, asset: T::AssetId, amount: Balance) -> DispatchResult {
    self.track(asset)?;
    T::AssetOps::transfer(from, &self.account, asset, amount)?;
    CustodyAssets::<T>::mutate(|entries| {
      if let Some(entry) = entries.iter_mut().find(|entry| entry.asset == asset) {
        entry.inflow = entry.inflow.saturating_add(amount);
      }
    });
    log::trace!(target: LOG_TARGET, "pulled {} of {:?} from {:?}", amount, asset, from);
    Ok(())
  }

  /// Move `amount` of `asset` out of custody to `to`.
  pub fn send(&mut self, asset: T::AssetId, to: &T::AccountId, amount: Balance) -> DispatchResult {
    ensure!(
      self.spendable(asset) >= amount,
      Error::<T>::InsufficientCustody
    );
    T::AssetOps::transfer(&self.account, to, asset, amount)?;
    log::trace!(target: LOG_TARGET, "sent {} of {:?} to {:?}", amount, asset, to);
    Ok(())
  }

  /// Start accounting for `asset` so that whatever arrives afterwards is swept
  /// back to the caller. Must be called before the asset reaches custody.
  pub fn track(&mut self, asset: T::AssetId) -> DispatchResult {
    let baseline = T::AssetOps::balance(&self.account, asset);
    CustodyAssets::<T>::try_mutate(|entries| {
      if entries.iter().any(|entry| entry.asset == asset) {
        return Ok(());
      }
      entries
        .try_push(CustodyEntry {
          asset,
          baseline,
          inflow: 0,
        })
        .map_err(|_| Error::<T>::TooManyCustodyAssets.into())
    })
  }
}
