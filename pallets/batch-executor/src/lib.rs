//! Batch Executor Pallet
//!
//! Runs a caller-supplied batch of steps against whitelisted handler modules as one
//! atomic operation. Each step targets a handler registered in the capability
//! registry; words from earlier steps' outputs can be spliced into later payloads,
//! so an amount produced by one handler feeds the next without a round trip.
//!
//! While a batch runs, assets are held in the executor's custody account on behalf
//! of the caller. When the outermost batch finishes, the fee rule chain is charged
//! on what the caller moved into custody and the remainder is swept back to them.
//! Whatever sat in the custody account before the batch is left untouched.
//! Trusted callers (e.g. flash-loan lenders) may re-enter the executor from inside
//! a step; such nested batches share the custody context and settle nothing.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{AssetOps, FungiblesAssetOps};

pub mod handler;
pub use handler::{CustodyHandle, HandlerModule, HandlerTable};

pub mod funds;
pub use funds::{FundsAction, FundsHandler, funds_payload};

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

const LOG_TARGET: &str = "runtime::batch-executor";

#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// A registered, resolvable handler and a payload it accepts from any signer
  /// without touching custody.
  fn handler_step() -> Result<(AccountId, alloc::vec::Vec<u8>), polkadot_sdk::sp_runtime::DispatchError>;
}

#[frame::pallet]
pub mod pallet {
  use super::{AssetOps, CustodyHandle, HandlerTable, LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::{
    frame_support::{PalletId, storage::with_storage_layer, weights::Weight},
    sp_runtime::traits::{AccountIdConversion, MaybeSerializeDeserialize},
  };
  use primitives::{
    Balance, CapabilityInspect, FeeCalculator,
    ecosystem::params::WORD_LEN,
    word::{read_word, splice_value, write_word},
  };

  /// Overwrite the word at byte `offset` of a step's payload with word `word` of
  /// the cached output of earlier step `step`.
  #[derive(
    Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
  )]
  pub struct Splice {
    pub offset: u32,
    pub step: u32,
    pub word: u32,
  }

  pub type MaxSplices = ConstU32<16>;

  /// Splices applied to a step's payload before dispatch. Empty for a static payload.
  pub type StepConfig = BoundedVec<Splice, MaxSplices>;

  pub type PayloadOf<T> = BoundedVec<u8, <T as Config>::MaxPayloadLen>;

  /// Custody ledger of one asset for the open batch.
  #[derive(
    Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
  )]
  pub struct CustodyEntry<AssetId> {
    pub asset: AssetId,
    /// Custody balance before the batch first touched the asset. Never swept.
    pub baseline: Balance,
    /// Amount moved in from the caller: the fee base.
    pub inflow: Balance,
  }

  #[pallet::config]
  pub trait Config: frame_system::Config {
    type AssetId: Parameter + Member + Copy + MaybeSerializeDeserialize + MaxEncodedLen;

    #[pallet::constant]
    type NativeAssetId: Get<Self::AssetId>;

    type AssetOps: AssetOps<Self::AccountId, Self::AssetId, Balance>;

    /// Handler whitelist, trusted callers, bans and the halt switch
    type Registry: CapabilityInspect<Self::AccountId>;

    /// Fee rule chain charged when the outermost batch settles
    type FeeRules: FeeCalculator<Self::AccountId, Self::AssetId, Balance>;

    /// Implementations behind whitelisted handler addresses
    type Handlers: HandlerTable<Self>;

    /// Derives the custody account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    #[pallet::constant]
    type MaxSteps: Get<u32>;
    #[pallet::constant]
    type MaxPayloadLen: Get<u32>;
    /// Maximum size in bytes of a single step output
    #[pallet::constant]
    type MaxResultLen: Get<u32>;
    /// Maximum number of simultaneously open batches, the outermost included
    #[pallet::constant]
    type MaxDepth: Get<u32>;
    #[pallet::constant]
    type MaxCustodyAssets: Get<u32>;

    type WeightInfo: WeightInfo;

    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Owner of the open custody context.
  #[pallet::storage]
  #[pallet::getter(fn batch_caller)]
  pub type BatchCaller<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Number of open batches. Zero between transactions.
  #[pallet::storage]
  #[pallet::getter(fn depth)]
  pub type Depth<T> = StorageValue<_, u32, ValueQuery>;

  /// Assets that entered custody during the open batch.
  #[pallet::storage]
  pub type CustodyAssets<T: Config> =
    StorageValue<_, BoundedVec<CustodyEntry<T::AssetId>, T::MaxCustodyAssets>, ValueQuery>;

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn integrity_test() {
      assert!(T::MaxDepth::get() >= 1, "MaxDepth must allow the outermost batch");
      assert!(
        T::MaxResultLen::get() as usize % WORD_LEN == 0,
        "MaxResultLen must be a whole number of words"
      );
    }

    #[cfg(feature = "try-runtime")]
    fn try_state(_n: BlockNumberFor<T>) -> Result<(), polkadot_sdk::sp_runtime::TryRuntimeError> {
      Self::do_try_state()
    }
  }

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    StepExecuted {
      depth: u32,
      step: u32,
      target: T::AccountId,
      /// Number of words the handler returned
      words: u32,
    },
    FeeCharged {
      rule_id: u32,
      asset: T::AssetId,
      recipient: T::AccountId,
      amount: Balance,
    },
    /// Custody leftovers returned to the caller.
    CustodySwept {
      caller: T::AccountId,
      asset: T::AssetId,
      amount: Balance,
    },
    BatchExecuted {
      caller: T::AccountId,
      depth: u32,
      steps: u32,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Targets, configs and payloads differ in length.
    LengthMismatch,
    EmptyBatch,
    /// Batch execution is halted by governance.
    Halted,
    /// The signer is banned from opening batches.
    AgentBanned,
    /// A batch is in flight and the signer is not a trusted caller.
    ReentrancyBlocked,
    /// Nested batches exceed `MaxDepth`.
    DepthExceeded,
    /// The step target is not a registered handler.
    UnauthorizedTarget,
    /// The step target is registered but the runtime has no implementation for it.
    HandlerUnavailable,
    /// A splice refers to a missing step or word, or its placeholder is not a valid ratio.
    InvalidReference,
    /// A splice window does not fit in the payload.
    SpliceOutOfBounds,
    /// The handler output is not a whole number of words within `MaxResultLen`.
    MalformedResult,
    InsufficientCustody,
    TooManyCustodyAssets,
    /// The funds handler could not parse its payload.
    MalformedPayload,
    UnknownAction,
    MissingRecipient,
    /// Custody holds less than the required minimum.
    SlippageExceeded,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Run `targets[i]` with `payloads[i]` spliced per `configs[i]`, in order.
    ///
    /// `value` of the native asset is moved from the signer into custody first.
    /// Any failing step reverts the whole batch, nested batches included.
    #[pallet::call_index(0)]
    #[pallet::weight(
      T::WeightInfo::execute(targets.len() as u32)
        .saturating_add(Pallet::<T>::handlers_weight(targets, payloads))
    )]
    pub fn execute(
      origin: OriginFor<T>,
      targets: BoundedVec<T::AccountId, T::MaxSteps>,
      configs: BoundedVec<StepConfig, T::MaxSteps>,
      payloads: BoundedVec<PayloadOf<T>, T::MaxSteps>,
      value: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      with_storage_layer(|| {
        Self::do_execute(
          who,
          targets.into_inner(),
          configs.into_inner(),
          payloads.into_inner(),
          value,
        )
      })
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    fn do_execute(
      who: T::AccountId,
      targets: Vec<T::AccountId>,
      configs: Vec<StepConfig>,
      payloads: Vec<PayloadOf<T>>,
      value: Balance,
    ) -> DispatchResult {
      let steps = targets.len();
      ensure!(
        configs.len() == steps && payloads.len() == steps,
        Error::<T>::LengthMismatch
      );
      ensure!(steps > 0, Error::<T>::EmptyBatch);
      ensure!(!T::Registry::is_halted(), Error::<T>::Halted);

      let depth = Depth::<T>::get();
      let caller = if depth == 0 {
        ensure!(!T::Registry::is_banned(&who), Error::<T>::AgentBanned);
        BatchCaller::<T>::put(&who);
        who.clone()
      } else {
        ensure!(
          T::Registry::is_trusted_caller(&who),
          Error::<T>::ReentrancyBlocked
        );
        ensure!(depth < T::MaxDepth::get(), Error::<T>::DepthExceeded);
        BatchCaller::<T>::get().ok_or(Error::<T>::ReentrancyBlocked)?
      };
      Depth::<T>::put(depth.saturating_add(1));
      log::debug!(
        target: LOG_TARGET,
        "batch of {} steps opened by {:?} at depth {}",
        steps,
        who,
        depth
      );

      let mut custody = CustodyHandle::<T>::new(caller.clone(), depth);
      if value > 0 {
        custody.receive(&who, T::NativeAssetId::get(), value)?;
      }

      let mut outputs: Vec<Vec<u8>> = Vec::with_capacity(steps);
      for (index, ((target, config), payload)) in
        targets.into_iter().zip(configs).zip(payloads).enumerate()
      {
        ensure!(
          T::Registry::is_handler(&target),
          Error::<T>::UnauthorizedTarget
        );
        let handler = T::Handlers::resolve(&target).ok_or(Error::<T>::HandlerUnavailable)?;

        let mut payload = payload.into_inner();
        Self::apply_splices(&mut payload, &config, &outputs)?;

        log::trace!(target: LOG_TARGET, "step {} -> {:?}", index, target);
        let output = handler.handle(&mut custody, &payload)?;
        ensure!(
          output.len() % WORD_LEN == 0 && output.len() <= T::MaxResultLen::get() as usize,
          Error::<T>::MalformedResult
        );

        Self::deposit_event(Event::StepExecuted {
          depth,
          step: index as u32,
          target,
          words: (output.len() / WORD_LEN) as u32,
        });
        outputs.push(output);
      }

      if depth == 0 {
        Self::settle(&caller)?;
        Depth::<T>::kill();
      } else {
        Depth::<T>::put(depth);
      }

      Self::deposit_event(Event::BatchExecuted {
        caller,
        depth,
        steps: steps as u32,
      });
      Ok(())
    }

    /// Declared weight of the handlers a batch dispatches to. Unknown targets
    /// fail before doing any work and contribute nothing.
    pub fn handlers_weight(targets: &[T::AccountId], payloads: &[PayloadOf<T>]) -> Weight {
      targets
        .iter()
        .zip(payloads)
        .filter_map(|(target, payload)| {
          T::Handlers::resolve(target).map(|handler| handler.weight(payload))
        })
        .fold(Weight::zero(), |total, weight| total.saturating_add(weight))
    }

    /// Resolve every splice of a step against the outputs cached so far.
    ///
    /// Splices are applied in order, so a later splice may overwrite an earlier one.
    pub(crate) fn apply_splices(
      payload: &mut [u8],
      config: &[Splice],
      outputs: &[Vec<u8>],
    ) -> DispatchResult {
      for splice in config {
        let source = outputs
          .get(splice.step as usize)
          .ok_or(Error::<T>::InvalidReference)?;
        let word_offset = (splice.word as usize)
          .checked_mul(WORD_LEN)
          .ok_or(Error::<T>::InvalidReference)?;
        let referenced = read_word(source, word_offset).map_err(|_| Error::<T>::InvalidReference)?;

        let offset = splice.offset as usize;
        let placeholder = read_word(payload, offset).map_err(|_| Error::<T>::SpliceOutOfBounds)?;
        let value =
          splice_value(&placeholder, &referenced).map_err(|_| Error::<T>::InvalidReference)?;
        write_word(payload, offset, &value).map_err(|_| Error::<T>::SpliceOutOfBounds)?;
      }
      Ok(())
    }

    /// Fee owed on `inflow` of `asset`, never more than the inflow itself.
    pub(crate) fn fee_due(asset: &T::AssetId, inflow: Balance) -> Balance {
      if inflow == 0 {
        return 0;
      }
      T::FeeRules::calculate_fee(asset, inflow).0.min(inflow)
    }

    /// Charge fees on every custody inflow and return the rest to `caller`.
    fn settle(caller: &T::AccountId) -> DispatchResult {
      let account = Self::account_id();
      for entry in CustodyAssets::<T>::take() {
        let asset = entry.asset;
        let held = T::AssetOps::balance(&account, asset).saturating_sub(entry.baseline);
        if held == 0 {
          continue;
        }

        if entry.inflow > 0 {
          let (total, shares) = T::FeeRules::calculate_fee(&asset, entry.inflow);
          // Shares are paid in chain order until the clamped total runs out
          let mut remaining = total.min(entry.inflow).min(held);
          for share in shares {
            if remaining == 0 {
              break;
            }
            let amount = share.amount.min(remaining);
            if !T::AssetOps::can_deposit(&share.recipient, asset, amount) {
              // Undeliverable dust stays in custody and is swept to the caller
              log::debug!(
                target: LOG_TARGET,
                "fee rule {} skipped: {} of {:?} cannot be deposited to {:?}",
                share.rule_id,
                amount,
                asset,
                share.recipient
              );
              continue;
            }
            T::AssetOps::transfer(&account, &share.recipient, asset, amount)?;
            remaining = remaining.saturating_sub(amount);
            Self::deposit_event(Event::FeeCharged {
              rule_id: share.rule_id,
              asset,
              recipient: share.recipient,
              amount,
            });
          }
        }

        let leftover = T::AssetOps::balance(&account, asset).saturating_sub(entry.baseline);
        if leftover > 0 {
          T::AssetOps::transfer(&account, caller, asset, leftover)?;
          Self::deposit_event(Event::CustodySwept {
            caller: caller.clone(),
            asset,
            amount: leftover,
          });
        }
      }
      BatchCaller::<T>::kill();
      log::debug!(target: LOG_TARGET, "custody settled for {:?}", caller);
      Ok(())
    }

    /// Transient batch state must be empty outside of `execute`.
    #[cfg(any(feature = "try-runtime", test))]
    pub fn do_try_state() -> Result<(), polkadot_sdk::sp_runtime::TryRuntimeError> {
      ensure!(Depth::<T>::get() == 0, "batch depth left open");
      ensure!(BatchCaller::<T>::get().is_none(), "custody context left open");
      ensure!(
        CustodyAssets::<T>::get().is_empty(),
        "custody assets left tracked"
      );
      Ok(())
    }
  }
}
