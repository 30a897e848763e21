//! Stack Machine
//!
//! Runs an unlocking program and then a locking program over one shared
//! stack. The pair is accepted iff execution completes and the top item is
//! canonically true.
//!
//! ## Evaluation
//!
//! ```text
//! fresh stack ──▶ unlocking ops (push witness) ──▶ locking ops (check) ──▶ top true?
//! ```
//!
//! Any underflow, malformed operand, failed `EQUALVERIFY` or limit breach
//! stops evaluation with a [`VerificationFailure`]. No state survives
//! between calls: every evaluation allocates its own stack.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::opcode::Opcode;
use super::program::{LockingProgram, Operation, Program, UnlockingProgram};
use crate::core::hash::{hash160, Hash256};
use crate::core::keys::verify_signature;
use crate::core::num::{cast_to_bool, decode_num, encode_num, MAX_ELEMENT_SIZE, MAX_NUM_SIZE};

/// What a signature check commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    /// Signing hash of the input being verified.
    pub signing_hash: Hash256,
}

impl TransactionContext {
    /// Context for a given signing hash.
    pub fn new(signing_hash: Hash256) -> Self {
        Self { signing_hash }
    }
}

/// Resource limits for one evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Maximum number of stack items.
    pub max_stack_depth: usize,
    /// Maximum element size in bytes.
    pub max_element_size: usize,
    /// Maximum opcodes (not pushes) per program.
    pub max_ops: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 1_000,
            max_element_size: MAX_ELEMENT_SIZE,
            max_ops: 201,
        }
    }
}

/// Why a witness failed to satisfy a predicate.
///
/// Expected outcome of a bad spend attempt, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// An opcode needed more items than the stack held.
    #[error("stack underflow in {0}")]
    StackUnderflow(Opcode),
    /// An arithmetic operand was not a valid script number.
    #[error("invalid numeric operand for {0}")]
    InvalidNumber(Opcode),
    /// `EQUALVERIFY` compared unequal items.
    #[error("OP_EQUALVERIFY failed")]
    EqualVerifyFailed,
    /// Execution ended with nothing on the stack.
    #[error("stack empty at end of execution")]
    EmptyStack,
    /// Execution ended with a false top item.
    #[error("top of stack is false")]
    FalseResult,
    /// Stack grew past the configured depth.
    #[error("stack depth exceeds {0}")]
    StackOverflow(usize),
    /// A pushed or computed element is too large.
    #[error("element of {len} bytes exceeds {limit}")]
    ElementTooLarge {
        /// Element size.
        len: usize,
        /// Configured maximum.
        limit: usize,
    },
    /// A program has too many opcodes.
    #[error("program has more than {0} opcodes")]
    TooManyOps(usize),
}

/// The predicate evaluator.
#[derive(Clone, Debug, Default)]
pub struct StackMachine {
    config: MachineConfig,
}

impl StackMachine {
    /// Machine with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine with custom limits.
    pub fn with_config(config: MachineConfig) -> Self {
        Self { config }
    }

    /// Active limits.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Accept/reject verdict.
    pub fn execute(
        &self,
        locking: &LockingProgram,
        unlocking: &UnlockingProgram,
        context: &TransactionContext,
    ) -> bool {
        self.evaluate(locking, unlocking, context).is_ok()
    }

    /// Evaluate the pair, reporting the reason for a rejection.
    pub fn evaluate(
        &self,
        locking: &LockingProgram,
        unlocking: &UnlockingProgram,
        context: &TransactionContext,
    ) -> Result<(), VerificationFailure> {
        let mut exec = Execution {
            stack: Vec::new(),
            config: &self.config,
            context,
        };

        exec.run(unlocking.program())?;
        exec.run(locking.program())?;

        match exec.stack.last() {
            None => Err(VerificationFailure::EmptyStack),
            Some(top) if cast_to_bool(top) => Ok(()),
            Some(_) => Err(VerificationFailure::FalseResult),
        }
    }
}

/// State of a single evaluation.
struct Execution<'a> {
    stack: Vec<Vec<u8>>,
    config: &'a MachineConfig,
    context: &'a TransactionContext,
}

impl Execution<'_> {
    fn run(&mut self, program: &Program) -> Result<(), VerificationFailure> {
        let op_count = program
            .operations()
            .iter()
            .filter(|op| matches!(op, Operation::Op(_)))
            .count();
        if op_count > self.config.max_ops {
            return Err(VerificationFailure::TooManyOps(self.config.max_ops));
        }

        for op in program.operations() {
            #[cfg(feature = "debug-tracing")]
            tracing::trace!(op = %op, depth = self.stack.len(), "step");

            match op {
                Operation::PushBytes(data) => self.push(data.clone())?,
                Operation::PushNumber(n) => self.push(encode_num(*n))?,
                Operation::Op(opcode) => self.step(*opcode)?,
            }
        }
        Ok(())
    }

    fn step(&mut self, opcode: Opcode) -> Result<(), VerificationFailure> {
        match opcode {
            Opcode::Dup => {
                let top = self.peek(opcode, 0)?;
                self.push(top)?;
            }
            Opcode::TwoDup => {
                let second = self.peek(opcode, 1)?;
                let top = self.peek(opcode, 0)?;
                self.push(second)?;
                self.push(top)?;
            }
            Opcode::Hash160 => {
                let item = self.pop(opcode)?;
                self.push(hash160(&item).to_vec())?;
            }
            Opcode::Add => {
                let a = self.pop_num(opcode)?;
                let b = self.pop_num(opcode)?;
                self.push(encode_num(b + a))?;
            }
            Opcode::Sub => {
                let a = self.pop_num(opcode)?;
                let b = self.pop_num(opcode)?;
                self.push(encode_num(b - a))?;
            }
            Opcode::Abs => {
                let a = self.pop_num(opcode)?;
                self.push(encode_num(a.abs()))?;
            }
            Opcode::Equal => {
                let a = self.pop(opcode)?;
                let b = self.pop(opcode)?;
                self.push(bool_item(a == b))?;
            }
            Opcode::EqualVerify => {
                let a = self.pop(opcode)?;
                let b = self.pop(opcode)?;
                if a != b {
                    return Err(VerificationFailure::EqualVerifyFailed);
                }
            }
            Opcode::CheckSig => {
                let pubkey = self.pop(opcode)?;
                let signature = self.pop(opcode)?;
                let valid = verify_signature(&signature, &pubkey, &self.context.signing_hash);
                self.push(bool_item(valid))?;
            }
        }
        Ok(())
    }

    fn push(&mut self, item: Vec<u8>) -> Result<(), VerificationFailure> {
        if item.len() > self.config.max_element_size {
            return Err(VerificationFailure::ElementTooLarge {
                len: item.len(),
                limit: self.config.max_element_size,
            });
        }
        if self.stack.len() >= self.config.max_stack_depth {
            return Err(VerificationFailure::StackOverflow(self.config.max_stack_depth));
        }
        self.stack.push(item);
        Ok(())
    }

    fn pop(&mut self, opcode: Opcode) -> Result<Vec<u8>, VerificationFailure> {
        self.stack
            .pop()
            .ok_or(VerificationFailure::StackUnderflow(opcode))
    }

    /// Copy of the item `depth` positions below the top.
    fn peek(&self, opcode: Opcode, depth: usize) -> Result<Vec<u8>, VerificationFailure> {
        if depth >= self.stack.len() {
            return Err(VerificationFailure::StackUnderflow(opcode));
        }
        Ok(self.stack[self.stack.len() - 1 - depth].clone())
    }

    fn pop_num(&mut self, opcode: Opcode) -> Result<i64, VerificationFailure> {
        let item = self.pop(opcode)?;
        decode_num(&item, MAX_NUM_SIZE).ok_or(VerificationFailure::InvalidNumber(opcode))
    }
}

fn bool_item(value: bool) -> Vec<u8> {
    if value {
        vec![1]
    } else {
        Vec::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
