//! Program Representation
//!
//! A program is an ordered, immutable list of operations. Locking and
//! unlocking programs share the representation but are distinct types so a
//! witness can never be passed where a predicate is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::opcode::Opcode;
use crate::core::num::encode_num;

/// `OP_0`: push the empty vector.
const OP_0: u8 = 0x00;
/// Next byte is the push length.
const OP_PUSHDATA1: u8 = 0x4c;
/// Next two bytes (little-endian) are the push length.
const OP_PUSHDATA2: u8 = 0x4d;
/// Next four bytes (little-endian) are the push length.
const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1.
const OP_1NEGATE: u8 = 0x4f;
/// `OP_1`; `OP_1..OP_16` are contiguous.
const OP_1: u8 = 0x51;

/// A single program step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Push raw bytes.
    PushBytes(Vec<u8>),
    /// Push a script number.
    PushNumber(i64),
    /// Execute an opcode.
    Op(Opcode),
}

impl Operation {
    /// Append the serialized form of this operation to `out`.
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            Self::PushNumber(0) => out.push(OP_0),
            Self::PushNumber(-1) => out.push(OP_1NEGATE),
            Self::PushNumber(n @ 1..=16) => out.push(OP_1 + (*n as u8 - 1)),
            Self::PushNumber(n) => write_push(out, &encode_num(*n)),
            Self::PushBytes(data) => write_push(out, data),
            Self::Op(op) => out.push(op.to_byte()),
        }
    }
}

fn write_push(out: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        0 => out.push(OP_0),
        len @ 1..=75 => out.push(len as u8),
        len @ 76..=255 => {
            out.push(OP_PUSHDATA1);
            out.push(len as u8);
        }
        len @ 256..=0xffff => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&(len as u16).to_le_bytes());
        }
        len => {
            // Saturates past 4 GiB.
            out.push(OP_PUSHDATA4);
            out.extend_from_slice(&u32::try_from(len).unwrap_or(u32::MAX).to_le_bytes());
        }
    }
    out.extend_from_slice(data);
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PushBytes(data) if data.is_empty() => f.write_str("0"),
            Self::PushBytes(data) => f.write_str(&hex::encode(data)),
            Self::PushNumber(n) => write!(f, "{}", n),
            Self::Op(op) => write!(f, "{}", op),
        }
    }
}

/// Ordered operation sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    ops: Vec<Operation>,
}

impl Program {
    pub(crate) fn from_operations(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Operations in execution order.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the program has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Serialized ledger form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for op in &self.ops {
            op.write_bytes(&mut out);
        }
        out
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// The spending predicate attached to an output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingProgram(pub(crate) Program);

/// The witness a spender supplies for one input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockingProgram(pub(crate) Program);

macro_rules! program_newtype {
    ($name:ident) => {
        impl $name {
            /// Underlying program.
            pub fn program(&self) -> &Program {
                &self.0
            }

            /// Operations in execution order.
            pub fn operations(&self) -> &[Operation] {
                self.0.operations()
            }

            /// Serialized ledger form.
            pub fn to_bytes(&self) -> Vec<u8> {
                self.0.to_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

program_newtype!(LockingProgram);
program_newtype!(UnlockingProgram);

#[cfg(test)]
mod tests {
    use super::*;

    fn program(ops: Vec<Operation>) -> Program {
        Program::from_operations(ops)
    }

    #[test]
    fn test_small_numbers_use_dedicated_opcodes() {
        let p = program(vec![
            Operation::PushNumber(0),
            Operation::PushNumber(-1),
            Operation::PushNumber(1),
            Operation::PushNumber(16),
            Operation::PushNumber(17),
        ]);
        assert_eq!(p.to_bytes(), vec![0x00, 0x4f, 0x51, 0x60, 0x01, 0x11]);
    }

    #[test]
    fn test_push_length_prefixes() {
        let short = program(vec![Operation::PushBytes(vec![0xab; 20])]).to_bytes();
        assert_eq!(short[0], 20);
        assert_eq!(short.len(), 21);

        let medium = program(vec![Operation::PushBytes(vec![0; 100])]).to_bytes();
        assert_eq!(&medium[..2], &[OP_PUSHDATA1, 100]);

        let long = program(vec![Operation::PushBytes(vec![0; 300])]).to_bytes();
        assert_eq!(&long[..3], &[OP_PUSHDATA2, 0x2c, 0x01]);

        let widest = program(vec![Operation::PushBytes(vec![0; 0xffff])]).to_bytes();
        assert_eq!(&widest[..3], &[OP_PUSHDATA2, 0xff, 0xff]);
    }

    #[test]
    fn test_oversized_push_keeps_full_length() {
        // Deserialized programs bypass the builder's element limit.
        let json = serde_json::to_string(&program(vec![Operation::PushBytes(vec![7; 70_000])]))
            .unwrap();
        let decoded: Program = serde_json::from_str(&json).unwrap();
        let bytes = decoded.to_bytes();

        assert_eq!(bytes[0], OP_PUSHDATA4);
        assert_eq!(u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]), 70_000);
        assert_eq!(bytes.len(), 5 + 70_000);

        let truncated = program(vec![Operation::PushBytes(vec![7; 70_000 - 0x10000])]).to_bytes();
        assert_ne!(bytes[..5], truncated[..5]);
    }

    #[test]
    fn test_assembly_rendering() {
        let p = program(vec![
            Operation::Op(Opcode::Dup),
            Operation::Op(Opcode::Hash160),
            Operation::PushBytes(vec![0xde, 0xad]),
            Operation::PushNumber(-703),
            Operation::Op(Opcode::EqualVerify),
        ]);
        assert_eq!(p.to_string(), "OP_DUP OP_HASH160 dead -703 OP_EQUALVERIFY");
    }
}
