//! Predicate programs and their evaluator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SCRIPT LAYER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  opcode.rs   - Supported opcodes and their byte values      │
//! │  program.rs  - Operations, locking/unlocking programs       │
//! │  builder.rs  - Fluent program construction                  │
//! │  machine.rs  - Witness-then-predicate stack evaluation      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod builder;
pub mod machine;
pub mod opcode;
pub mod program;

// Re-export key types
pub use builder::ProgramBuilder;
pub use machine::{MachineConfig, StackMachine, TransactionContext, VerificationFailure};
pub use opcode::Opcode;
pub use program::{LockingProgram, Operation, Program, UnlockingProgram};
