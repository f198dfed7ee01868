use crate::*;
use alloc::vec::Vec;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::{
  BoundedVec,
  traits::{EnsureOrigin, Get},
};

const SEED: u32 = 0;

fn fee_origin<T: Config>() -> Result<T::RuntimeOrigin, BenchmarkError> {
  T::FeeOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)
}

fn full_tiers() -> BoundedVec<FeeTier, MaxTiers> {
  (0..MaxTiers::get())
    .map(|i| FeeTier {
      threshold: u128::from(i) * 1_000,
      bps: 10,
    })
    .collect::<Vec<_>>()
    .try_into()
    .unwrap_or_default()
}

/// Top the chain up to `target` rules.
fn fill_chain<T: Config>(target: u32) -> Result<(), BenchmarkError> {
  let existing = ActiveRules::<T>::get().len() as u32;
  for i in existing..target {
    Pallet::<T>::do_add_rule(FeeRule {
      asset: None,
      tiers: full_tiers(),
      recipient: account("recipient", i, SEED),
    })?;
  }
  Ok(())
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn add_rule() -> Result<(), BenchmarkError> {
    let origin = fee_origin::<T>()?;
    fill_chain::<T>(T::MaxRules::get().saturating_sub(1))?;
    let recipient: T::AccountId = account("recipient", u32::MAX, SEED);

    #[extrinsic_call]
    add_rule(origin as T::RuntimeOrigin, None, full_tiers(), recipient);

    assert_eq!(ActiveRules::<T>::get().len() as u32, T::MaxRules::get());
    Ok(())
  }

  #[benchmark]
  fn remove_rule() -> Result<(), BenchmarkError> {
    let origin = fee_origin::<T>()?;
    fill_chain::<T>(T::MaxRules::get())?;

    #[extrinsic_call]
    remove_rule(origin as T::RuntimeOrigin, 0);

    assert!(FeeRules::<T>::get(0).is_none());
    Ok(())
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
