//! Pubkey Validation Module
//! 
//! This module checks the syntactic shape of validator public keys before they reach storage.
//! A valid key is `0x` followed by 96 hex digits (a 48-byte BLS key).

mod pubkey;
pub use pubkey::{validate_format, PUBKEY_HEX_LEN, PUBKEY_PREFIX};
