use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Asset identifier shared by the executor, the fee rules and their adapters.
///
/// - `Native`: The system's native token (managed by pallet-balances).
/// - `Local(u32)`: Local assets (managed by pallet-assets).
/// - `Foreign(u32)`: Assets bridged in over XCM.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native token managed by pallet-balances
  #[default]
  Native,
  /// Local asset managed by pallet-assets
  Local(u32),
  /// Foreign asset managed by pallet-assets via XCM mapping
  Foreign(u32),
}

impl AssetKind {
  /// Id in the `pallet-assets` id space, `None` for the native token.
  pub fn local_id(&self) -> Option<u32> {
    match self {
      AssetKind::Local(id) | AssetKind::Foreign(id) => Some(*id),
      AssetKind::Native => None,
    }
  }
}
