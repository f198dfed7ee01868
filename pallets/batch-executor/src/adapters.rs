//! Asset adapter used by the executor to move value in and out of custody.
//!
//! Keeps the pallet generic over asset types and independent of the runtime's
//! balances and assets pallets.

use core::marker::PhantomData;
use frame::prelude::*;
use polkadot_sdk::frame_support::traits::{
  fungible, fungibles,
  tokens::{DepositConsequence, Preservation, Provenance},
};
use primitives::{AssetKind, Balance};

/// Asset transfers and balance queries.
pub trait AssetOps<AccountId, AssetId, Balance> {
  fn transfer(
    from: &AccountId,
    to: &AccountId,
    asset: AssetId,
    amount: Balance,
  ) -> Result<(), DispatchError>;

  fn balance(who: &AccountId, asset: AssetId) -> Balance;

  /// Whether `who` can receive `amount` of `asset` without the transfer failing,
  /// e.g. because it would leave a new account below the minimum balance.
  fn can_deposit(who: &AccountId, asset: AssetId, amount: Balance) -> bool;
}

/// No-op `AssetOps` for configurations that never hold value in custody.
impl<AccountId, AssetId, Balance: Default> AssetOps<AccountId, AssetId, Balance> for () {
  fn transfer(_: &AccountId, _: &AccountId, _: AssetId, _: Balance) -> Result<(), DispatchError> {
    Ok(())
  }

  fn balance(_: &AccountId, _: AssetId) -> Balance {
    Balance::default()
  }

  fn can_deposit(_: &AccountId, _: AssetId, _: Balance) -> bool {
    true
  }
}

/// `AssetOps` over a native `fungible` and a `fungibles` set keyed by `u32`.
///
/// `AssetKind::Local` and `AssetKind::Foreign` share the `fungibles` id space.
pub struct FungiblesAssetOps<Native, Assets>(PhantomData<(Native, Assets)>);

impl<AccountId, Native, Assets> AssetOps<AccountId, AssetKind, Balance>
  for FungiblesAssetOps<Native, Assets>
where
  Native: fungible::Mutate<AccountId, Balance = Balance>,
  Assets: fungibles::Mutate<AccountId, AssetId = u32, Balance = Balance>,
  AccountId: Eq,
{
  fn transfer(
    from: &AccountId,
    to: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> Result<(), DispatchError> {
    if amount == 0 {
      return Ok(());
    }
    match asset.local_id() {
      None => {
        <Native as fungible::Mutate<AccountId>>::transfer(from, to, amount, Preservation::Expendable)?;
      }
      Some(id) => {
        <Assets as fungibles::Mutate<AccountId>>::transfer(
          id,
          from,
          to,
          amount,
          Preservation::Expendable,
        )?;
      }
    }
    Ok(())
  }

  fn balance(who: &AccountId, asset: AssetKind) -> Balance {
    match asset.local_id() {
      None => <Native as fungible::Inspect<AccountId>>::balance(who),
      Some(id) => <Assets as fungibles::Inspect<AccountId>>::balance(id, who),
    }
  }

  fn can_deposit(who: &AccountId, asset: AssetKind, amount: Balance) -> bool {
    let consequence = match asset.local_id() {
      None => <Native as fungible::Inspect<AccountId>>::can_deposit(who, amount, Provenance::Extant),
      Some(id) => {
        <Assets as fungibles::Inspect<AccountId>>::can_deposit(id, who, amount, Provenance::Extant)
      }
    };
    consequence == DepositConsequence::Success
  }
}
