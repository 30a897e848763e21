//! Commitment Protocol
//!
//! Each player commits to a secret before the game is settled and reveals
//! it when the funds are claimed. The commitment is HASH160 of the secret,
//! the same digest `OP_HASH160` computes, so the reveal can be checked on
//! the ledger as well as off it.

use std::fmt;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::hash::{hash160, Hash160};

/// Length of a secret before the choice bit is added.
pub const SECRET_BASE_LEN: usize = 16;

/// Random nonce whose length parity carries a player's choice.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Fresh secret of `SECRET_BASE_LEN + extra_len` random bytes.
    pub fn generate<R: RngCore + CryptoRng>(extra_len: usize, rng: &mut R) -> Self {
        let mut bytes = vec![0u8; SECRET_BASE_LEN + extra_len];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap existing bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length secret.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the bytes: that would be an early reveal.
        write!(f, "Secret({} bytes)", self.0.len())
    }
}

/// Published fingerprint of a secret.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub Hash160);

impl Commitment {
    /// Commit to a secret.
    pub fn commit(secret: &Secret) -> Self {
        Self(hash160(secret.as_bytes()))
    }

    /// Digest bytes as pushed into a locking program.
    pub fn as_bytes(&self) -> &Hash160 {
        &self.0
    }

    /// Check whether `secret` is the committed preimage.
    pub fn verify(&self, secret: &Secret) -> bool {
        hash160(secret.as_bytes()) == self.0
    }

    /// Open the commitment, failing if `secret` is not the preimage.
    pub fn open(&self, secret: &Secret) -> Result<(), CommitmentError> {
        if self.verify(secret) {
            Ok(())
        } else {
            Err(CommitmentError::PreimageMismatch {
                commitment: *self,
                revealed_len: secret.len(),
            })
        }
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(self.0))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Errors that can occur when opening a commitment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// Revealed secret does not hash to the commitment.
    #[error("revealed {revealed_len}-byte secret does not open commitment {commitment}")]
    PreimageMismatch {
        /// Commitment that failed to open.
        commitment: Commitment,
        /// Length of the offending reveal.
        revealed_len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_commitment_creation() {
        let secret = Secret::generate(1, &mut StdRng::seed_from_u64(1));
        let commitment = Commitment::commit(&secret);

        assert_eq!(secret.len(), SECRET_BASE_LEN + 1);
        assert!(commitment.verify(&secret));
        assert!(commitment.open(&secret).is_ok());
    }

    #[test]
    fn test_commitment_determinism() {
        let secret = Secret::from_bytes(vec![5; 16]);
        assert_eq!(Commitment::commit(&secret), Commitment::commit(&secret));
    }

    #[test]
    fn test_wrong_preimage_fails() {
        let secret = Secret::from_bytes(vec![1; 16]);
        let commitment = Commitment::commit(&secret);

        let mut wrong = secret.as_bytes().to_vec();
        wrong[0] = 0xff;

        assert!(matches!(
            commitment.open(&Secret::from_bytes(wrong)),
            Err(CommitmentError::PreimageMismatch { revealed_len: 16, .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let secret = Secret::from_bytes(vec![0xab; 17]);
        assert_eq!(format!("{:?}", secret), "Secret(17 bytes)");
    }

    proptest! {
        #[test]
        fn prop_distinct_secret_never_opens(
            committed in prop::collection::vec(any::<u8>(), 16..18),
            revealed in prop::collection::vec(any::<u8>(), 0..40),
        ) {
            prop_assume!(committed != revealed);
            let commitment = Commitment::commit(&Secret::from_bytes(committed));
            prop_assert!(commitment.open(&Secret::from_bytes(revealed)).is_err());
        }
    }
}
