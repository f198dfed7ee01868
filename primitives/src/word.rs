//! Word encoding shared by the executor and every handler module.
//!
//! Handler payloads and results are sequences of 32-byte big-endian words. Amounts occupy
//! the low 16 bytes of a word; the all-ones word is the "use the whole custody balance"
//! sentinel. Handlers must read and write amounts through this module so that a value
//! produced by one handler can be spliced into the payload of another.

use crate::ecosystem::{
  Balance,
  params::{PERCENTAGE_BASE, WORD_LEN},
};
use alloc::vec::Vec;
use sp_arithmetic::{Rounding, helpers_128bit::multiply_by_rational_with_rounding};

pub type Word = [u8; WORD_LEN];

pub const ZERO_WORD: Word = [0u8; WORD_LEN];

/// Sentinel meaning "the entire current custody balance of the asset".
pub const MAX_AMOUNT: Word = [0xffu8; WORD_LEN];

const AMOUNT_OFFSET: usize = WORD_LEN - core::mem::size_of::<Balance>();

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WordError {
  /// The word window does not fit in the buffer.
  OutOfBounds,
  /// The high half of the word is non-zero.
  NotAnAmount,
  /// A ratio placeholder is not a valid fraction of `PERCENTAGE_BASE`.
  InvalidRatio,
  Overflow,
}

/// An amount argument as read from a payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AmountArg {
  Max,
  Exact(Balance),
}

impl AmountArg {
  /// Substitute the live balance for the sentinel.
  pub fn resolve(self, available: Balance) -> Balance {
    match self {
      AmountArg::Max => available,
      AmountArg::Exact(amount) => amount,
    }
  }
}

pub fn encode_amount(amount: Balance) -> Word {
  let mut word = ZERO_WORD;
  word[AMOUNT_OFFSET..].copy_from_slice(&amount.to_be_bytes());
  word
}

pub fn decode_amount(word: &Word) -> Result<Balance, WordError> {
  if word[..AMOUNT_OFFSET].iter().any(|b| *b != 0) {
    return Err(WordError::NotAnAmount);
  }
  let mut bytes = [0u8; core::mem::size_of::<Balance>()];
  bytes.copy_from_slice(&word[AMOUNT_OFFSET..]);
  Ok(Balance::from_be_bytes(bytes))
}

pub fn is_max_amount(word: &Word) -> bool {
  *word == MAX_AMOUNT
}

pub fn decode_amount_arg(word: &Word) -> Result<AmountArg, WordError> {
  if is_max_amount(word) {
    return Ok(AmountArg::Max);
  }
  decode_amount(word).map(AmountArg::Exact)
}

pub fn read_word(data: &[u8], offset: usize) -> Result<Word, WordError> {
  let end = offset.checked_add(WORD_LEN).ok_or(WordError::OutOfBounds)?;
  let slice = data.get(offset..end).ok_or(WordError::OutOfBounds)?;
  let mut word = ZERO_WORD;
  word.copy_from_slice(slice);
  Ok(word)
}

pub fn write_word(data: &mut [u8], offset: usize, word: &Word) -> Result<(), WordError> {
  let end = offset.checked_add(WORD_LEN).ok_or(WordError::OutOfBounds)?;
  let slice = data.get_mut(offset..end).ok_or(WordError::OutOfBounds)?;
  slice.copy_from_slice(word);
  Ok(())
}

pub fn join_words(words: &[Word]) -> Vec<u8> {
  words.iter().flat_map(|w| w.iter().copied()).collect()
}

/// Compute the word written over `placeholder` when splicing in `referenced`.
///
/// A zero placeholder takes the referenced word verbatim. A non-zero placeholder is a
/// ratio scaled by `PERCENTAGE_BASE` applied to the referenced amount, rounding down.
pub fn splice_value(placeholder: &Word, referenced: &Word) -> Result<Word, WordError> {
  if *placeholder == ZERO_WORD {
    return Ok(*referenced);
  }
  let ratio = decode_amount(placeholder).map_err(|_| WordError::InvalidRatio)?;
  if ratio > PERCENTAGE_BASE {
    return Err(WordError::InvalidRatio);
  }
  let amount = decode_amount(referenced)?;
  multiply_by_rational_with_rounding(amount, ratio, PERCENTAGE_BASE, Rounding::Down)
    .map(encode_amount)
    .ok_or(WordError::Overflow)
}
