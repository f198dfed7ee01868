//! System-level constants shared by the executor pallets and their runtime glue.

/// Balance type alias for consistency across the workspace
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used with `PalletId::into_account_truncating()` to derive the executor's
/// custody account.
pub mod pallet_ids {
  /// Batch executor custody account
  pub const BATCH_EXECUTOR_PALLET_ID: &[u8; 8] = b"py/batch";
}

pub mod params {
  use super::Balance;

  /// Denominator of basis-point fee rates (100% = 10_000 bps).
  pub const BPS_DENOMINATOR: u16 = 10_000;

  /// Fixed-point base for ratio splices (100% = 10^18).
  pub const PERCENTAGE_BASE: Balance = 1_000_000_000_000_000_000;

  /// Size in bytes of one value-threading word.
  pub const WORD_LEN: usize = 32;
}
