//! Opcodes understood by the stack machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stack operations.
///
/// Byte values follow the ledger's script numbering so serialized programs
/// line up with what the ledger stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Duplicate the top item.
    Dup,
    /// Duplicate the top two items, preserving order.
    TwoDup,
    /// Replace the top item with RIPEMD160(SHA256(item)).
    Hash160,
    /// Pop two numbers, push their sum.
    Add,
    /// Pop `a` then `b`, push `b - a`.
    Sub,
    /// Pop a number, push its absolute value.
    Abs,
    /// Pop two items, push whether they are byte-equal.
    Equal,
    /// `Equal`, then abort unless true.
    EqualVerify,
    /// Pop a public key then a signature, push whether the signature is valid.
    CheckSig,
}

impl Opcode {
    /// Byte value in serialized programs.
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Dup => 0x76,
            Self::TwoDup => 0x6e,
            Self::Hash160 => 0xa9,
            Self::Add => 0x93,
            Self::Sub => 0x94,
            Self::Abs => 0x90,
            Self::Equal => 0x87,
            Self::EqualVerify => 0x88,
            Self::CheckSig => 0xac,
        }
    }

    /// Assembly mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dup => "OP_DUP",
            Self::TwoDup => "OP_2DUP",
            Self::Hash160 => "OP_HASH160",
            Self::Add => "OP_ADD",
            Self::Sub => "OP_SUB",
            Self::Abs => "OP_ABS",
            Self::Equal => "OP_EQUAL",
            Self::EqualVerify => "OP_EQUALVERIFY",
            Self::CheckSig => "OP_CHECKSIG",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
