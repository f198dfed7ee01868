use crate as pallet_batch_executor;
use crate::{
  AssetOps, FungiblesAssetOps, FundsHandler, HandlerModule, HandlerTable, PayloadOf, Splice,
  StepConfig,
};
use codec::{Decode, Encode};
use core::cell::RefCell;
use frame::prelude::*;
use polkadot_sdk::{
  frame_support::{
    PalletId, construct_runtime, ord_parameter_types, parameter_types,
    traits::{AsEnsureOriginWithArg, ConstU32, ConstU64, ConstU128},
    weights::Weight,
  },
  frame_system::{EnsureRoot, EnsureSigned, EnsureSignedBy},
  sp_runtime::{
    ArithmeticError, BuildStorage,
    traits::{BlakeTwo256, IdentityLookup},
  },
};
use primitives::{
  AssetKind, Balance,
  ecosystem::{params::WORD_LEN, pallet_ids::BATCH_EXECUTOR_PALLET_ID},
  word::{decode_amount, encode_amount, join_words, read_word},
};

type Block = polkadot_sdk::frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;

pub const OWNER: AccountId = 1;
pub const ALICE: AccountId = 2;
pub const BOB: AccountId = 3;
pub const TREASURY: AccountId = 10;
pub const PARTNER: AccountId = 11;
/// Flash lender registered as a trusted caller.
pub const LENDER: AccountId = 50;
/// Flash lender the registry does not trust.
pub const ROGUE: AccountId = 51;

pub const DOUBLER: AccountId = 100;
pub const FUNDS: AccountId = 101;
pub const FAILING: AccountId = 102;
pub const FLASH: AccountId = 103;
pub const ROGUE_FLASH: AccountId = 104;
pub const MALFORMED: AccountId = 105;
/// Registered, but the runtime has no implementation behind it.
pub const UNRESOLVABLE: AccountId = 106;
/// Implemented, but never registered.
pub const UNREGISTERED: AccountId = 107;

pub const NATIVE: AssetKind = AssetKind::Native;
pub const LOCAL_ID: u32 = 1;
pub const LOCAL: AssetKind = AssetKind::Local(LOCAL_ID);

pub const INITIAL_BALANCE: Balance = 1_000_000;

construct_runtime!(
  pub enum Test {
    System: polkadot_sdk::frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    CapabilityRegistry: pallet_capability_registry,
    FeeRules: pallet_fee_rules,
    BatchExecutor: pallet_batch_executor,
  }
);

impl polkadot_sdk::frame_system::Config for Test {
  type BaseCallFilter = polkadot_sdk::frame_support::traits::Everything;
  type BlockWeights = ();
  type BlockLength = ();
  type DbWeight = ();
  type RuntimeOrigin = RuntimeOrigin;
  type RuntimeCall = RuntimeCall;
  type Nonce = u64;
  type Hash = polkadot_sdk::sp_core::H256;
  type Hashing = BlakeTwo256;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Block = Block;
  type RuntimeEvent = RuntimeEvent;
  type BlockHashCount = ConstU64<250>;
  type Version = ();
  type PalletInfo = PalletInfo;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<Balance>;
  type OnNewAccount = ();
  type OnKilledAccount = ();
  type SystemWeightInfo = ();
  type SS58Prefix = ();
  type OnSetCode = ();
  type MaxConsumers = ConstU32<16>;
  type RuntimeTask = ();
  type ExtensionsWeightInfo = ();
  type SingleBlockMigrations = ();
  type MultiBlockMigrator = ();
  type PreInherents = ();
  type PostInherents = ();
  type PostTransactions = ();
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ConstU32<50>;
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = Balance;
  type RuntimeEvent = RuntimeEvent;
  type DustRemoval = ();
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = RuntimeHoldReason;
  type RuntimeFreezeReason = RuntimeFreezeReason;
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = Balance;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = AsEnsureOriginWithArg<EnsureSigned<AccountId>>;
  type ForceOrigin = EnsureRoot<AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

ord_parameter_types! {
  pub const RegistryOwner: AccountId = OWNER;
}

impl pallet_capability_registry::Config for Test {
  type RegistryOrigin = EnsureSignedBy<RegistryOwner, AccountId>;
  type MaxLabelLen = ConstU32<32>;
  type WeightInfo = ();
}

impl pallet_fee_rules::Config for Test {
  type AssetId = AssetKind;
  type FeeOrigin = EnsureRoot<AccountId>;
  type MaxRules = ConstU32<4>;
  type WeightInfo = ();
}

parameter_types! {
  pub const BatchExecutorPalletId: PalletId = PalletId(*BATCH_EXECUTOR_PALLET_ID);
  pub const NativeAssetId: AssetKind = AssetKind::Native;
}

impl pallet_batch_executor::Config for Test {
  type AssetId = AssetKind;
  type NativeAssetId = NativeAssetId;
  type AssetOps = FungiblesAssetOps<Balances, Assets>;
  type Registry = CapabilityRegistry;
  type FeeRules = FeeRules;
  type Handlers = MockHandlers;
  type PalletId = BatchExecutorPalletId;
  type MaxSteps = ConstU32<8>;
  type MaxPayloadLen = ConstU32<1024>;
  type MaxResultLen = ConstU32<256>;
  type MaxDepth = ConstU32<2>;
  type MaxCustodyAssets = ConstU32<4>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = MockBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct MockBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<AccountId> for MockBenchmarkHelper {
  fn handler_step() -> Result<(AccountId, Vec<u8>), DispatchError> {
    Ok((DOUBLER, encode_amount(1).to_vec()))
  }
}

// Handler modules

pub const STEP_WEIGHT: Weight = Weight::from_parts(1_000_000, 100);

thread_local! {
  static LAST_DOUBLER_PAYLOAD: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

pub fn last_doubler_payload() -> Vec<u8> {
  LAST_DOUBLER_PAYLOAD.with(|p| p.borrow().clone())
}

/// Returns `[2x, x]` for an input word `x`.
pub struct Doubler;

impl HandlerModule<Test> for Doubler {
  fn handle(
    &self,
    _custody: &mut crate::CustodyHandle<Test>,
    payload: &[u8],
  ) -> Result<Vec<u8>, DispatchError> {
    LAST_DOUBLER_PAYLOAD.with(|p| *p.borrow_mut() = payload.to_vec());
    let x = read_word(payload, 0)
      .and_then(|w| decode_amount(&w))
      .map_err(|_| DispatchError::Other("doubler input"))?;
    let doubled = x
      .checked_mul(2)
      .ok_or(DispatchError::Arithmetic(ArithmeticError::Overflow))?;
    Ok(join_words(&[encode_amount(doubled), encode_amount(x)]))
  }

  fn weight(&self, _payload: &[u8]) -> Weight {
    STEP_WEIGHT
  }
}

pub struct Failing;

impl HandlerModule<Test> for Failing {
  fn handle(
    &self,
    _custody: &mut crate::CustodyHandle<Test>,
    _payload: &[u8],
  ) -> Result<Vec<u8>, DispatchError> {
    Err(DispatchError::Other("handler failed"))
  }

  fn weight(&self, _payload: &[u8]) -> Weight {
    STEP_WEIGHT
  }
}

/// Returns a result that is not a whole number of words.
pub struct Malformed;

impl HandlerModule<Test> for Malformed {
  fn handle(
    &self,
    _custody: &mut crate::CustodyHandle<Test>,
    _payload: &[u8],
  ) -> Result<Vec<u8>, DispatchError> {
    Ok(vec![0u8; WORD_LEN + 1])
  }

  fn weight(&self, _payload: &[u8]) -> Weight {
    STEP_WEIGHT
  }
}

pub type Step = (AccountId, Vec<Splice>, Vec<u8>);

/// Lends native funds into custody, re-enters the executor with the batch carried in
/// its payload, then takes the loan back out of custody.
///
/// Payload: word 0 is the loan amount, followed by the SCALE-encoded nested steps.
pub struct FlashLender {
  lender: AccountId,
}

impl HandlerModule<Test> for FlashLender {
  fn handle(
    &self,
    custody: &mut crate::CustodyHandle<Test>,
    payload: &[u8],
  ) -> Result<Vec<u8>, DispatchError> {
    let amount = read_word(payload, 0)
      .and_then(|w| decode_amount(&w))
      .map_err(|_| DispatchError::Other("loan amount"))?;
    let steps = payload
      .get(WORD_LEN..)
      .and_then(|mut tail| Vec::<Step>::decode(&mut tail).ok())
      .ok_or(DispatchError::Other("nested batch"))?;

    custody.track(NATIVE)?;
    <Test as crate::Config>::AssetOps::transfer(&self.lender, custody.account(), NATIVE, amount)?;

    let (targets, configs, payloads) = bound_batch(steps)?;
    BatchExecutor::execute(
      RuntimeOrigin::signed(self.lender),
      targets,
      configs,
      payloads,
      0,
    )?;

    custody.send(NATIVE, &self.lender, amount)?;
    Ok(encode_amount(amount).to_vec())
  }

  fn weight(&self, payload: &[u8]) -> Weight {
    let nested = payload
      .get(WORD_LEN..)
      .and_then(|mut tail| Vec::<Step>::decode(&mut tail).ok())
      .and_then(|steps| bound_batch(steps).ok());
    match nested {
      Some((targets, _, payloads)) => STEP_WEIGHT
        .saturating_add(<() as crate::WeightInfo>::execute(targets.len() as u32))
        .saturating_add(BatchExecutor::handlers_weight(&targets, &payloads)),
      None => STEP_WEIGHT,
    }
  }
}

static FUNDS_HANDLER: FundsHandler<Test> = FundsHandler::new();
static TRUSTED_LENDER: FlashLender = FlashLender { lender: LENDER };
static ROGUE_LENDER: FlashLender = FlashLender { lender: ROGUE };

pub struct MockHandlers;

impl HandlerTable<Test> for MockHandlers {
  fn resolve(target: &AccountId) -> Option<&'static dyn HandlerModule<Test>> {
    match *target {
      DOUBLER | UNREGISTERED => Some(&Doubler),
      FUNDS => Some(&FUNDS_HANDLER),
      FAILING => Some(&Failing),
      FLASH => Some(&TRUSTED_LENDER),
      ROGUE_FLASH => Some(&ROGUE_LENDER),
      MALFORMED => Some(&Malformed),
      _ => None,
    }
  }
}

// Batch builders

pub fn step(target: AccountId, payload: Vec<u8>) -> Step {
  (target, vec![], payload)
}

pub fn spliced(target: AccountId, payload: Vec<u8>, splices: Vec<Splice>) -> Step {
  (target, splices, payload)
}

pub fn splice(offset: u32, step: u32, word: u32) -> Splice {
  Splice { offset, step, word }
}

pub fn amount_payload(amount: Balance) -> Vec<u8> {
  encode_amount(amount).to_vec()
}

pub fn flash_payload(amount: Balance, steps: Vec<Step>) -> Vec<u8> {
  let mut payload = amount_payload(amount);
  steps.encode_to(&mut payload);
  payload
}

pub type BatchArgs = (
  BoundedVec<AccountId, ConstU32<8>>,
  BoundedVec<StepConfig, ConstU32<8>>,
  BoundedVec<PayloadOf<Test>, ConstU32<8>>,
);

pub fn bound_batch(steps: Vec<Step>) -> Result<BatchArgs, DispatchError> {
  let too_long = DispatchError::Other("batch exceeds mock bounds");
  let mut targets = Vec::new();
  let mut configs = Vec::new();
  let mut payloads = Vec::new();
  for (target, splices, payload) in steps {
    targets.push(target);
    configs.push(StepConfig::try_from(splices).map_err(|_| too_long)?);
    payloads.push(PayloadOf::<Test>::try_from(payload).map_err(|_| too_long)?);
  }
  Ok((
    targets.try_into().map_err(|_| too_long)?,
    configs.try_into().map_err(|_| too_long)?,
    payloads.try_into().map_err(|_| too_long)?,
  ))
}

pub fn execute_batch(who: AccountId, steps: Vec<Step>, value: Balance) -> DispatchResult {
  let (targets, configs, payloads) = bound_batch(steps)?;
  BatchExecutor::execute(RuntimeOrigin::signed(who), targets, configs, payloads, value)
}

// Balances

pub fn custody_account() -> AccountId {
  BatchExecutor::account_id()
}

pub fn balance_of(who: AccountId, asset: AssetKind) -> Balance {
  <Test as crate::Config>::AssetOps::balance(&who, asset)
}

fn label(tag: &[u8]) -> Vec<u8> {
  tag.to_vec()
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: vec![
      (OWNER, INITIAL_BALANCE),
      (ALICE, INITIAL_BALANCE),
      (BOB, INITIAL_BALANCE),
      (LENDER, INITIAL_BALANCE),
      (ROGUE, INITIAL_BALANCE),
    ],
    ..Default::default()
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_capability_registry::GenesisConfig::<Test> {
    handlers: vec![
      (DOUBLER, label(b"Doubler")),
      (FUNDS, label(b"HFunds")),
      (FAILING, label(b"Failing")),
      (FLASH, label(b"FlashLender")),
      (ROGUE_FLASH, label(b"RogueLender")),
      (MALFORMED, label(b"Malformed")),
      (UNRESOLVABLE, label(b"Unresolvable")),
    ],
    trusted_callers: vec![(LENDER, [0u8; 32])],
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| {
    Assets::force_create(RuntimeOrigin::root(), LOCAL_ID, OWNER, true, 1).unwrap();
    Assets::mint(RuntimeOrigin::signed(OWNER), LOCAL_ID, ALICE, INITIAL_BALANCE).unwrap();
    polkadot_sdk::frame_system::Pallet::<Test>::set_block_number(1);
  });
  ext
}
