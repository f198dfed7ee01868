#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use core::marker::PhantomData;
use polkadot_sdk::frame_support::{
  traits::Get,
  weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
  /// Executor overhead for a batch of `n` steps, excluding work done inside handlers.
  fn execute(n: u32) -> Weight;
  /// One funds handler action: a custody ledger read and write plus an asset transfer.
  fn funds_step() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config + crate::Config> WeightInfo for SubstrateWeight<T> {
  fn execute(n: u32) -> Weight {
    let settle_reads = u64::from(T::MaxCustodyAssets::get()).saturating_mul(2);
    Weight::from_parts(30_000_000, 3000)
      .saturating_add(Weight::from_parts(12_000_000, 600).saturating_mul(n.into()))
      .saturating_add(T::DbWeight::get().reads(u64::from(n).saturating_mul(2)))
      .saturating_add(T::DbWeight::get().reads(settle_reads.saturating_add(6)))
      .saturating_add(T::DbWeight::get().writes(settle_reads.saturating_add(4)))
  }

  fn funds_step() -> Weight {
    Weight::from_parts(45_000_000, 7000)
      .saturating_add(T::DbWeight::get().reads(5))
      .saturating_add(T::DbWeight::get().writes(3))
  }
}

impl WeightInfo for () {
  fn execute(n: u32) -> Weight {
    Weight::from_parts(30_000_000, 3000)
      .saturating_add(Weight::from_parts(12_000_000, 600).saturating_mul(n.into()))
      .saturating_add(RocksDbWeight::get().reads(u64::from(n).saturating_mul(2).saturating_add(6)))
      .saturating_add(RocksDbWeight::get().writes(4))
  }

  fn funds_step() -> Weight {
    Weight::from_parts(45_000_000, 7000)
      .saturating_add(RocksDbWeight::get().reads(5))
      .saturating_add(RocksDbWeight::get().writes(3))
  }
}
