use crate as pallet_capability_registry;
use polkadot_sdk::frame_support::{
  construct_runtime, ord_parameter_types,
  traits::{ConstU32, ConstU64},
};
use polkadot_sdk::frame_system::EnsureSignedBy;
use polkadot_sdk::sp_runtime::{
  BuildStorage,
  traits::{BlakeTwo256, IdentityLookup},
};

type Block = polkadot_sdk::frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;

pub const OWNER: AccountId = 1;
pub const ALICE: AccountId = 2;
pub const HANDLER: AccountId = 100;
pub const LENDER: AccountId = 200;

construct_runtime!(
  pub enum Test {
    System: polkadot_sdk::frame_system,
    CapabilityRegistry: pallet_capability_registry,
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
  type AccountData = ();
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

ord_parameter_types! {
  pub const RegistryOwner: AccountId = OWNER;
}

impl pallet_capability_registry::Config for Test {
  type RegistryOrigin = EnsureSignedBy<RegistryOwner, AccountId>;
  type MaxLabelLen = ConstU32<32>;
  type WeightInfo = ();
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_capability_registry::GenesisConfig::<Test> {
    handlers: vec![],
    trusted_callers: vec![(LENDER, [7u8; 32])],
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| polkadot_sdk::frame_system::Pallet::<Test>::set_block_number(1));
  ext
}
