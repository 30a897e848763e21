//! Program Builder
//!
//! Fluent accumulation of operations. Encoding problems are recorded at the
//! call that caused them and reported by `build`, so a chain of calls never
//! needs intermediate `?`.

use super::opcode::Opcode;
use super::program::{LockingProgram, Operation, Program, UnlockingProgram};
use crate::core::num::{check_range, EncodingError, MAX_ELEMENT_SIZE};

/// Builder for locking and unlocking programs.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    ops: Vec<Operation>,
    error: Option<EncodingError>,
}

impl ProgramBuilder {
    /// Start an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an opcode.
    pub fn op(mut self, opcode: Opcode) -> Self {
        self.ops.push(Operation::Op(opcode));
        self
    }

    /// Append a data push.
    pub fn data(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        if bytes.len() > MAX_ELEMENT_SIZE {
            self.record(EncodingError::PushTooLarge {
                len: bytes.len(),
                max: MAX_ELEMENT_SIZE,
            });
        } else {
            self.ops.push(Operation::PushBytes(bytes.to_vec()));
        }
        self
    }

    /// Append a number push.
    pub fn number(mut self, n: i64) -> Self {
        match check_range(n) {
            Ok(n) => self.ops.push(Operation::PushNumber(n)),
            Err(e) => self.record(e),
        }
        self
    }

    fn record(&mut self, error: EncodingError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Finish as an untyped program.
    pub fn build(self) -> Result<Program, EncodingError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Program::from_operations(self.ops)),
        }
    }

    /// Finish as a locking program.
    pub fn build_locking(self) -> Result<LockingProgram, EncodingError> {
        self.build().map(LockingProgram)
    }

    /// Finish as an unlocking program.
    pub fn build_unlocking(self) -> Result<UnlockingProgram, EncodingError> {
        self.build().map(UnlockingProgram)
    }
}
