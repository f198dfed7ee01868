#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn register() -> Weight;
	fn unregister() -> Weight;
	fn register_caller() -> Weight;
	fn unregister_caller() -> Weight;
	fn ban() -> Weight;
	fn unban() -> Weight;
	fn halt() -> Weight;
	fn unhalt() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn register() -> Weight {
		Weight::from_parts(18_000_000, 1600)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn unregister() -> Weight {
		Weight::from_parts(16_000_000, 1600)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn register_caller() -> Weight {
		Weight::from_parts(16_000_000, 1500)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn unregister_caller() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn ban() -> Weight {
		Weight::from_parts(14_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn unban() -> Weight {
		Weight::from_parts(14_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn halt() -> Weight {
		Weight::from_parts(10_000_000, 500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn unhalt() -> Weight {
		Weight::from_parts(10_000_000, 500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn register() -> Weight {
		Weight::from_parts(18_000_000, 1600)
	}
	fn unregister() -> Weight {
		Weight::from_parts(16_000_000, 1600)
	}
	fn register_caller() -> Weight {
		Weight::from_parts(16_000_000, 1500)
	}
	fn unregister_caller() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn ban() -> Weight {
		Weight::from_parts(14_000_000, 1500)
	}
	fn unban() -> Weight {
		Weight::from_parts(14_000_000, 1500)
	}
	fn halt() -> Weight {
		Weight::from_parts(10_000_000, 500)
	}
	fn unhalt() -> Weight {
		Weight::from_parts(10_000_000, 500)
	}
}
