use crate as pallet_fee_rules;
use polkadot_sdk::frame_support::{
  construct_runtime,
  traits::{ConstU32, ConstU64},
};
use polkadot_sdk::frame_system::EnsureRoot;
use polkadot_sdk::sp_runtime::{
  BuildStorage,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::AssetKind;

type Block = polkadot_sdk::frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;

pub const ALICE: AccountId = 2;
pub const TREASURY: AccountId = 10;
pub const PARTNER: AccountId = 11;

/// Flat 0.2% on every asset, installed at genesis as rule 0.
pub const GENESIS_BPS: u16 = 20;

construct_runtime!(
  pub enum Test {
    System: polkadot_sdk::frame_system,
    FeeRules: pallet_fee_rules,
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

impl pallet_fee_rules::Config for Test {
  type AssetId = AssetKind;
  type FeeOrigin = EnsureRoot<AccountId>;
  type MaxRules = ConstU32<4>;
  type WeightInfo = ();
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_fee_rules::GenesisConfig::<Test> {
    rules: vec![(None, vec![(0, GENESIS_BPS)], TREASURY)],
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| polkadot_sdk::frame_system::Pallet::<Test>::set_block_number(1));
  ext
}
