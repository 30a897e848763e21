//! Pay to Public Key: `<pubkey> CHECKSIG`, unlocked by a bare signature.

use rand::{CryptoRng, RngCore};

use crate::core::keys::KeyPair;
use crate::error::Result;
use crate::script::{LockingProgram, Opcode, ProgramBuilder, UnlockingProgram};
use crate::tx::UnsignedTransaction;

/// Bare-key scheme owning its key.
#[derive(Clone, Debug)]
pub struct PayToPubKey {
    key: KeyPair,
}

impl PayToPubKey {
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

    /// Predicate embedding the full public key.
    pub fn locking_program(&self) -> Result<LockingProgram> {
        let program = ProgramBuilder::new()
            .data(self.key.public_key().as_bytes())
            .op(Opcode::CheckSig)
            .build_locking()?;
        Ok(program)
    }

    /// `<signature>` for the pending transaction.
    pub fn unlocking_program(&self, tx: &UnsignedTransaction) -> Result<UnlockingProgram> {
        let signature = self.key.sign_hash(&tx.signing_hash())?;
        Ok(ProgramBuilder::new()
            .data(signature.to_bytes())
            .build_unlocking()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::StackMachine;
    use crate::testing::spend_of;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_round_trip_accepts() {
        let scheme = PayToPubKey::generate(&mut StdRng::seed_from_u64(31));
        let locking = scheme.locking_program().unwrap();
        let tx = spend_of(&locking);
        let unlocking = scheme.unlocking_program(&tx).unwrap();

        assert!(StackMachine::new().execute(&locking, &unlocking, &tx.context()));
    }

    #[test]
    fn test_other_key_is_rejected() {
        let mut rng = StdRng::seed_from_u64(32);
        let owner = PayToPubKey::generate(&mut rng);
        let other = PayToPubKey::generate(&mut rng);

        let locking = owner.locking_program().unwrap();
        let tx = spend_of(&locking);
        let unlocking = other.unlocking_program(&tx).unwrap();

        assert!(!StackMachine::new().execute(&locking, &unlocking, &tx.context()));
    }
}
