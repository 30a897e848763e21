//! Pay to Public Key Hash
//!
//! The output names the HASH160 of a key; the spender reveals the key and
//! signs with it.

use rand::{CryptoRng, RngCore};

use crate::core::keys::{KeyPair, PubKeyHash};
use crate::core::num::EncodingError;
use crate::error::Result;
use crate::script::{LockingProgram, Opcode, ProgramBuilder, UnlockingProgram};
use crate::tx::UnsignedTransaction;

/// `DUP HASH160 <key-hash> EQUALVERIFY CHECKSIG`.
///
/// Also the predicate behind a plain payment to an address.
pub fn locking_for(key_hash: &PubKeyHash) -> std::result::Result<LockingProgram, EncodingError> {
    ProgramBuilder::new()
        .op(Opcode::Dup)
        .op(Opcode::Hash160)
        .data(key_hash.as_bytes())
        .op(Opcode::EqualVerify)
        .op(Opcode::CheckSig)
        .build_locking()
}

/// Key-hash scheme owning its key.
#[derive(Clone, Debug)]
pub struct PayToKeyHash {
    key: KeyPair,
}

impl PayToKeyHash {
    /// Scheme over an existing key.
    pub fn new(key: KeyPair) -> Self {
        Self { key }
    }

    /// Scheme over a freshly generated key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::new(KeyPair::generate(rng))
    }

    /// The owned key.
    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// Predicate over the key's hash.
    pub fn locking_program(&self) -> Result<LockingProgram> {
        Ok(locking_for(&self.key.key_hash())?)
    }

    /// `<signature> <pubkey>` for the pending transaction.
    pub fn unlocking_program(&self, tx: &UnsignedTransaction) -> Result<UnlockingProgram> {
        let signature = self.key.sign_hash(&tx.signing_hash())?;
        let program = ProgramBuilder::new()
            .data(signature.to_bytes())
            .data(self.key.public_key().as_bytes())
            .build_unlocking()?;
        Ok(program)
    }
}
