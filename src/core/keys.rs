//! Keys and Transaction Signatures
//!
//! secp256k1 ECDSA key pairs. Public keys are carried in compressed SEC1
//! form (33 bytes); their HASH160 is the key hash embedded in
//! pay-to-key-hash predicates and used as a payment address.

use std::fmt;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::{hash160, Hash160, Hash256};

/// Sighash type committing to every input and output.
pub const SIGHASH_ALL: u8 = 0x01;

/// Signing failures.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The ECDSA backend refused to sign.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Compressed SEC1 public key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub Vec<u8>);

impl PublicKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// HASH160 of the key bytes.
    pub fn key_hash(&self) -> PubKeyHash {
        PubKeyHash(hash160(&self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0))
    }
}

/// HASH160 of a public key. Doubles as a payment address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PubKeyHash(pub Hash160);

/// Destination for spent funds.
pub type Address = PubKeyHash;

impl PubKeyHash {
    /// Raw hash bytes.
    pub fn as_bytes(&self) -> &Hash160 {
        &self.0
    }
}

impl fmt::Debug for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeyHash({})", hex::encode(self.0))
    }
}

impl fmt::Display for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Private/public key pair.
///
/// Owned by whichever party generated it; never shared between instances.
#[derive(Clone)]
pub struct KeyPair {
    signing: SigningKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key pair.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_signing_key(SigningKey::random(rng))
    }

    /// Wrap an existing signing key.
    pub fn from_signing_key(signing: SigningKey) -> Self {
        let verifying = VerifyingKey::from(&signing);
        let public = PublicKey(verifying.to_encoded_point(true).as_bytes().to_vec());
        Self { signing, public }
    }

    /// Compressed public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// HASH160 of the public key.
    pub fn key_hash(&self) -> PubKeyHash {
        self.public.key_hash()
    }

    /// Sign a 32-byte signing hash.
    pub fn sign_hash(&self, hash: &Hash256) -> Result<TxSignature, KeyError> {
        let signature: Signature = self
            .signing
            .sign_prehash(hash)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        Ok(TxSignature {
            der: signature.to_der().as_bytes().to_vec(),
            sighash_type: SIGHASH_ALL,
        })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// DER signature plus sighash type, as it appears on the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    /// DER-encoded ECDSA signature.
    pub der: Vec<u8>,
    /// Trailing sighash byte.
    pub sighash_type: u8,
}

impl TxSignature {
    /// Stack encoding: DER bytes followed by the sighash byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.der.len() + 1);
        bytes.extend_from_slice(&self.der);
        bytes.push(self.sighash_type);
        bytes
    }
}

/// Check a stack-encoded signature against a public key and signing hash.
///
/// Malformed keys or signatures verify as false.
pub fn verify_signature(sig_bytes: &[u8], pubkey: &[u8], hash: &Hash256) -> bool {
    let Some((&sighash_type, der)) = sig_bytes.split_last() else {
        return false;
    };
    if sighash_type != SIGHASH_ALL {
        return false;
    }
    let Ok(key) = VerifyingKey::from_sec1_bytes(pubkey) else {
        return false;
    };
    let Ok(signature) = Signature::from_der(der) else {
        return false;
    };
    key.verify_prehash(hash, &signature).is_ok()
}
