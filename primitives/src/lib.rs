#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod assets;
pub mod capability;
pub mod ecosystem;
pub mod word;

pub use assets::*;
pub use capability::*;
pub use ecosystem::*;
