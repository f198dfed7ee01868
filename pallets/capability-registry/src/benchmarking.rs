use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::{EnsureOrigin, Get};

const SEED: u32 = 0;

fn owner_origin<T: Config>() -> Result<T::RuntimeOrigin, BenchmarkError> {
  T::RegistryOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)
}

fn max_label<T: Config>() -> LabelOf<T> {
  let len = T::MaxLabelLen::get() as usize;
  alloc::vec![b'h'; len].try_into().unwrap_or_default()
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn register() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    let handler: T::AccountId = account("handler", 0, SEED);
    let label = max_label::<T>();

    #[extrinsic_call]
    register(origin as T::RuntimeOrigin, handler.clone(), label);

    assert!(Pallet::<T>::is_handler(&handler));
    Ok(())
  }

  #[benchmark]
  fn unregister() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    let handler: T::AccountId = account("handler", 0, SEED);
    Pallet::<T>::register(origin.clone(), handler.clone(), max_label::<T>())?;

    #[extrinsic_call]
    unregister(origin as T::RuntimeOrigin, handler.clone());

    assert!(!Pallet::<T>::is_handler(&handler));
    Ok(())
  }

  #[benchmark]
  fn register_caller() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    let caller: T::AccountId = account("caller", 0, SEED);

    #[extrinsic_call]
    register_caller(origin as T::RuntimeOrigin, caller.clone(), [1u8; 32]);

    assert!(Pallet::<T>::is_trusted_caller(&caller));
    Ok(())
  }

  #[benchmark]
  fn unregister_caller() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    let caller: T::AccountId = account("caller", 0, SEED);
    Pallet::<T>::register_caller(origin.clone(), caller.clone(), [1u8; 32])?;

    #[extrinsic_call]
    unregister_caller(origin as T::RuntimeOrigin, caller.clone());

    assert!(!Pallet::<T>::is_trusted_caller(&caller));
    Ok(())
  }

  #[benchmark]
  fn ban() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    let agent: T::AccountId = account("agent", 0, SEED);

    #[extrinsic_call]
    ban(origin as T::RuntimeOrigin, agent.clone());

    assert!(Pallet::<T>::is_banned(&agent));
    Ok(())
  }

  #[benchmark]
  fn unban() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    let agent: T::AccountId = account("agent", 0, SEED);
    Pallet::<T>::ban(origin.clone(), agent.clone())?;

    #[extrinsic_call]
    unban(origin as T::RuntimeOrigin, agent.clone());

    assert!(!Pallet::<T>::is_banned(&agent));
    Ok(())
  }

  #[benchmark]
  fn halt() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;

    #[extrinsic_call]
    halt(origin as T::RuntimeOrigin);

    assert!(Halted::<T>::get());
    Ok(())
  }

  #[benchmark]
  fn unhalt() -> Result<(), BenchmarkError> {
    let origin = owner_origin::<T>()?;
    Pallet::<T>::halt(origin.clone())?;

    #[extrinsic_call]
    unhalt(origin as T::RuntimeOrigin);

    assert!(!Halted::<T>::get());
    Ok(())
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
