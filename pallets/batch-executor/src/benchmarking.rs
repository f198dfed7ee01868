use crate::*;
use alloc::vec::Vec;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::{BoundedVec, traits::Get};
use polkadot_sdk::frame_system::RawOrigin;

fn too_long<E>(_: E) -> BenchmarkError {
  BenchmarkError::Stop("batch exceeds MaxSteps")
}

#[allow(clippy::type_complexity)]
fn repeated_batch<T: Config>(
  n: u32,
) -> Result<
  (
    BoundedVec<T::AccountId, T::MaxSteps>,
    BoundedVec<StepConfig, T::MaxSteps>,
    BoundedVec<PayloadOf<T>, T::MaxSteps>,
  ),
  BenchmarkError,
> {
  let (target, payload) = T::BenchmarkHelper::handler_step()?;
  let payload: PayloadOf<T> = payload
    .try_into()
    .map_err(|_| BenchmarkError::Stop("payload exceeds MaxPayloadLen"))?;
  let n = n as usize;
  let targets: Vec<_> = (0..n).map(|_| target.clone()).collect();
  let configs: Vec<StepConfig> = (0..n).map(|_| StepConfig::default()).collect();
  let payloads: Vec<_> = (0..n).map(|_| payload.clone()).collect();
  Ok((
    targets.try_into().map_err(too_long)?,
    configs.try_into().map_err(too_long)?,
    payloads.try_into().map_err(too_long)?,
  ))
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn execute(n: Linear<1, { T::MaxSteps::get() }>) -> Result<(), BenchmarkError> {
    let caller: T::AccountId = whitelisted_caller();
    let (targets, configs, payloads) = repeated_batch::<T>(n)?;

    #[extrinsic_call]
    execute(RawOrigin::Signed(caller), targets, configs, payloads, 0);

    assert_eq!(Depth::<T>::get(), 0);
    assert!(BatchCaller::<T>::get().is_none());
    Ok(())
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
