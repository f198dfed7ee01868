//! Capability Registry Pallet
//!
//! Whitelists the handler modules the batch executor may dispatch to and the external
//! callers allowed to re-enter the executor while a batch is in flight. Governance can
//! also ban individual agents and halt batch execution globally.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

const LOG_TARGET: &str = "runtime::capability-registry";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::{frame_support::traits::EnsureOrigin, sp_runtime::traits::TrailingZeroInput};
  use primitives::CapabilityInspect;

  /// Opaque data attached to a trusted caller, e.g. the handler its callbacks belong to.
  pub type PermissionData = [u8; 32];

  pub type LabelOf<T> = BoundedVec<u8, <T as Config>::MaxLabelLen>;

  #[derive(
    Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
  )]
  pub struct HandlerInfo<Label, BlockNumber> {
    /// Display tag for audits. Not unique.
    pub label: Label,
    pub registered_at: BlockNumber,
  }

  #[derive(
    Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
  )]
  pub struct CallerInfo<BlockNumber> {
    pub permission: PermissionData,
    pub registered_at: BlockNumber,
  }

  pub type HandlerInfoOf<T> = HandlerInfo<LabelOf<T>, BlockNumberFor<T>>;
  pub type CallerInfoOf<T> = CallerInfo<BlockNumberFor<T>>;

  #[pallet::config]
  pub trait Config: frame_system::Config {
    /// Origin that owns the registry (e.g. Governance or Root)
    type RegistryOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Maximum length of a handler label
    #[pallet::constant]
    type MaxLabelLen: Get<u32>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Handler modules the executor may dispatch to.
  #[pallet::storage]
  #[pallet::getter(fn handlers)]
  pub type Handlers<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, HandlerInfoOf<T>, OptionQuery>;

  /// External contracts allowed to re-enter the executor mid-batch.
  #[pallet::storage]
  #[pallet::getter(fn trusted_callers)]
  pub type TrustedCallers<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, CallerInfoOf<T>, OptionQuery>;

  #[pallet::storage]
  pub type BannedAgents<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, (), OptionQuery>;

  #[pallet::storage]
  #[pallet::getter(fn halted)]
  pub type Halted<T> = StorageValue<_, bool, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A handler was registered or its label replaced.
    HandlerRegistered {
      handler: T::AccountId,
      label: LabelOf<T>,
    },
    HandlerUnregistered {
      handler: T::AccountId,
    },
    /// A trusted caller was registered or its permission data replaced.
    CallerRegistered {
      caller: T::AccountId,
      permission: PermissionData,
    },
    CallerUnregistered {
      caller: T::AccountId,
    },
    AgentBanned {
      agent: T::AccountId,
    },
    AgentUnbanned {
      agent: T::AccountId,
    },
    ExecutionHalted,
    ExecutionResumed,
  }

  #[pallet::error]
  pub enum Error<T> {
    /// The origin is not the registry owner.
    Unauthorized,
    /// The zero address cannot be registered.
    InvalidAddress,
    /// No handler is registered at this address.
    NotRegistered,
    /// No trusted caller is registered at this address.
    CallerNotRegistered,
    AlreadyBanned,
    NotBanned,
    AlreadyHalted,
    NotHalted,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Whitelist `handler` as a batch step target.
    ///
    /// Re-registering an existing handler replaces its label.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::register())]
    pub fn register(origin: OriginFor<T>, handler: T::AccountId, label: LabelOf<T>) -> DispatchResult {
      Self::ensure_owner(origin)?;
      Self::ensure_non_zero(&handler)?;
      Handlers::<T>::insert(
        &handler,
        HandlerInfo {
          label: label.clone(),
          registered_at: frame_system::Pallet::<T>::block_number(),
        },
      );
      log::debug!(target: LOG_TARGET, "handler {:?} registered", handler);
      Self::deposit_event(Event::HandlerRegistered { handler, label });
      Ok(())
    }

    /// Remove `handler` from the whitelist.
    ///
    /// Batches already dispatching to it are unaffected; later dispatches fail.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::unregister())]
    pub fn unregister(origin: OriginFor<T>, handler: T::AccountId) -> DispatchResult {
      Self::ensure_owner(origin)?;
      Handlers::<T>::take(&handler).ok_or(Error::<T>::NotRegistered)?;
      log::debug!(target: LOG_TARGET, "handler {:?} unregistered", handler);
      Self::deposit_event(Event::HandlerUnregistered { handler });
      Ok(())
    }

    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::register_caller())]
    pub fn register_caller(
      origin: OriginFor<T>,
      caller: T::AccountId,
      permission: PermissionData,
    ) -> DispatchResult {
      Self::ensure_owner(origin)?;
      Self::ensure_non_zero(&caller)?;
      TrustedCallers::<T>::insert(
        &caller,
        CallerInfo {
          permission,
          registered_at: frame_system::Pallet::<T>::block_number(),
        },
      );
      log::debug!(target: LOG_TARGET, "trusted caller {:?} registered", caller);
      Self::deposit_event(Event::CallerRegistered { caller, permission });
      Ok(())
    }

    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::unregister_caller())]
    pub fn unregister_caller(origin: OriginFor<T>, caller: T::AccountId) -> DispatchResult {
      Self::ensure_owner(origin)?;
      TrustedCallers::<T>::take(&caller).ok_or(Error::<T>::CallerNotRegistered)?;
      log::debug!(target: LOG_TARGET, "trusted caller {:?} unregistered", caller);
      Self::deposit_event(Event::CallerUnregistered { caller });
      Ok(())
    }

    /// Bar `agent` from opening batches.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::ban())]
    pub fn ban(origin: OriginFor<T>, agent: T::AccountId) -> DispatchResult {
      Self::ensure_owner(origin)?;
      Self::ensure_non_zero(&agent)?;
      ensure!(
        !BannedAgents::<T>::contains_key(&agent),
        Error::<T>::AlreadyBanned
      );
      BannedAgents::<T>::insert(&agent, ());
      Self::deposit_event(Event::AgentBanned { agent });
      Ok(())
    }

    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::unban())]
    pub fn unban(origin: OriginFor<T>, agent: T::AccountId) -> DispatchResult {
      Self::ensure_owner(origin)?;
      BannedAgents::<T>::take(&agent).ok_or(Error::<T>::NotBanned)?;
      Self::deposit_event(Event::AgentUnbanned { agent });
      Ok(())
    }

    /// Suspend all batch execution.
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::halt())]
    pub fn halt(origin: OriginFor<T>) -> DispatchResult {
      Self::ensure_owner(origin)?;
      ensure!(!Halted::<T>::get(), Error::<T>::AlreadyHalted);
      Halted::<T>::put(true);
      log::debug!(target: LOG_TARGET, "batch execution halted");
      Self::deposit_event(Event::ExecutionHalted);
      Ok(())
    }

    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::unhalt())]
    pub fn unhalt(origin: OriginFor<T>) -> DispatchResult {
      Self::ensure_owner(origin)?;
      ensure!(Halted::<T>::get(), Error::<T>::NotHalted);
      Halted::<T>::put(false);
      log::debug!(target: LOG_TARGET, "batch execution resumed");
      Self::deposit_event(Event::ExecutionResumed);
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn is_handler(who: &T::AccountId) -> bool {
      Handlers::<T>::contains_key(who)
    }

    pub fn is_trusted_caller(who: &T::AccountId) -> bool {
      TrustedCallers::<T>::contains_key(who)
    }

    pub fn is_banned(who: &T::AccountId) -> bool {
      BannedAgents::<T>::contains_key(who)
    }

    fn ensure_owner(origin: OriginFor<T>) -> DispatchResult {
      T::RegistryOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Ok(())
    }

    fn ensure_non_zero(who: &T::AccountId) -> DispatchResult {
      // AccountId types without an all-zero encoding have no zero address to reject
      if let Ok(zero) = T::AccountId::decode(&mut TrailingZeroInput::zeroes()) {
        ensure!(*who != zero, Error::<T>::InvalidAddress);
      }
      Ok(())
    }
  }

  impl<T: Config> CapabilityInspect<T::AccountId> for Pallet<T> {
    fn is_handler(who: &T::AccountId) -> bool {
      Self::is_handler(who)
    }

    fn is_trusted_caller(who: &T::AccountId) -> bool {
      Self::is_trusted_caller(who)
    }

    fn is_banned(who: &T::AccountId) -> bool {
      Self::is_banned(who)
    }

    fn is_halted() -> bool {
      Halted::<T>::get()
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  pub struct GenesisConfig<T: Config> {
    pub handlers: Vec<(T::AccountId, Vec<u8>)>,
    pub trusted_callers: Vec<(T::AccountId, PermissionData)>,
  }

  impl<T: Config> Default for GenesisConfig<T> {
    fn default() -> Self {
      Self {
        handlers: Vec::new(),
        trusted_callers: Vec::new(),
      }
    }
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let now = frame_system::Pallet::<T>::block_number();
      for (handler, label) in &self.handlers {
        assert!(
          Pallet::<T>::ensure_non_zero(handler).is_ok(),
          "Genesis handler is the zero address"
        );
        let label: LabelOf<T> = label
          .clone()
          .try_into()
          .expect("Genesis handler label exceeds MaxLabelLen");
        Handlers::<T>::insert(
          handler,
          HandlerInfo {
            label,
            registered_at: now,
          },
        );
      }
      for (caller, permission) in &self.trusted_callers {
        assert!(
          Pallet::<T>::ensure_non_zero(caller).is_ok(),
          "Genesis trusted caller is the zero address"
        );
        TrustedCallers::<T>::insert(
          caller,
          CallerInfo {
            permission: *permission,
            registered_at: now,
          },
        );
      }
    }
  }
}
