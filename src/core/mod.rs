//! Core primitives.
//!
//! Everything here is a pure function of its inputs: digests, the script
//! number encoding, and key/signature handling.

pub mod hash;
pub mod keys;
pub mod num;

// Re-export core types
pub use hash::{hash160, sha256, sha256d, Hash160, Hash256};
pub use keys::{verify_signature, Address, KeyError, KeyPair, PubKeyHash, PublicKey, TxSignature};
pub use num::EncodingError;
