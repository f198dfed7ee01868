//! Protocol-agnostic handler for moving funds in and out of custody.
//!
//! Payload layout: word 0 is the action, word 1 the amount (the usual splice
//! target), followed by the SCALE encoding of `(AssetId, Option<AccountId>)`.
//! Every action returns a single amount word.

use crate::{Config, CustodyHandle, Error, HandlerModule, WeightInfo};
use alloc::vec::Vec;
use codec::{DecodeAll, Encode};
use core::marker::PhantomData;
use frame::prelude::*;
use polkadot_sdk::frame_support::weights::Weight;
use primitives::{
  Balance,
  ecosystem::params::WORD_LEN,
  word::{self, AmountArg, Word},
};

const ARGS_LEN: usize = 2 * WORD_LEN;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FundsAction {
  /// Pull an exact amount from the caller into custody.
  Inject,
  /// Send an amount (or everything spendable) out of custody to the recipient.
  Send,
  /// Report the custody balance.
  Balance,
  /// Fail unless custody holds at least the amount.
  CheckSlippage,
}

impl FundsAction {
  pub fn code(self) -> Balance {
    match self {
      FundsAction::Inject => 0,
      FundsAction::Send => 1,
      FundsAction::Balance => 2,
      FundsAction::CheckSlippage => 3,
    }
  }

  fn from_code(code: Balance) -> Option<Self> {
    match code {
      0 => Some(FundsAction::Inject),
      1 => Some(FundsAction::Send),
      2 => Some(FundsAction::Balance),
      3 => Some(FundsAction::CheckSlippage),
      _ => None,
    }
  }
}

/// Build a funds handler payload.
pub fn funds_payload<AssetId: Encode, AccountId: Encode>(
  action: FundsAction,
  amount: Word,
  asset: AssetId,
  recipient: Option<AccountId>,
) -> Vec<u8> {
  let mut payload = word::join_words(&[word::encode_amount(action.code()), amount]);
  (asset, recipient).encode_to(&mut payload);
  payload
}

pub struct FundsHandler<T>(PhantomData<fn() -> T>);

impl<T> FundsHandler<T> {
  pub const fn new() -> Self {
    Self(PhantomData)
  }
}

impl<T> Default for FundsHandler<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Config> FundsHandler<T> {
  fn decode(payload: &[u8]) -> Result<(Balance, AmountArg, T::AssetId, Option<T::AccountId>), Error<T>> {
    let action = word::read_word(payload, 0)
      .and_then(|w| word::decode_amount(&w))
      .map_err(|_| Error::<T>::MalformedPayload)?;
    let amount = word::read_word(payload, WORD_LEN)
      .and_then(|w| word::decode_amount_arg(&w))
      .map_err(|_| Error::<T>::MalformedPayload)?;
    let mut tail = payload.get(ARGS_LEN..).ok_or(Error::<T>::MalformedPayload)?;
    let (asset, recipient) = <(T::AssetId, Option<T::AccountId>)>::decode_all(&mut tail)
      .map_err(|_| Error::<T>::MalformedPayload)?;
    Ok((action, amount, asset, recipient))
  }

  fn exact(amount: AmountArg) -> Result<Balance, Error<T>> {
    match amount {
      AmountArg::Exact(value) => Ok(value),
      AmountArg::Max => Err(Error::<T>::MalformedPayload),
    }
  }
}

impl<T: Config> HandlerModule<T> for FundsHandler<T> {
  fn handle(&self, custody: &mut CustodyHandle<T>, payload: &[u8]) -> Result<Vec<u8>, DispatchError> {
    let (code, amount, asset, recipient) = Self::decode(payload)?;
    let action = FundsAction::from_code(code).ok_or(Error::<T>::UnknownAction)?;
    let reported = match action {
      FundsAction::Inject => {
        let value = Self::exact(amount)?;
        custody.pull(asset, value)?;
        value
      }
      FundsAction::Send => {
        let to = recipient.ok_or(Error::<T>::MissingRecipient)?;
        let value = custody.resolve_amount(asset, amount);
        custody.send(asset, &to, value)?;
        value
      }
      FundsAction::Balance => custody.balance(asset),
      FundsAction::CheckSlippage => {
        let minimum = Self::exact(amount)?;
        let balance = custody.balance(asset);
        ensure!(balance >= minimum, Error::<T>::SlippageExceeded);
        balance
      }
    };
    Ok(word::encode_amount(reported).to_vec())
  }

  fn weight(&self, _payload: &[u8]) -> Weight {
    T::WeightInfo::funds_step()
  }
}
