//! Linear Puzzle
//!
//! Locks an output behind the integer system
//!
//! ```text
//! x + y   = S
//! |x - y| = D
//! ```
//!
//! Taking `x <= y` gives `y = (S + D) / 2` and `x = S - y`. The system has
//! an integer solution only when S and D share parity, which is checked
//! before any predicate exists.
//!
//! The witness pushes y then x. With x on top, `2DUP ADD` yields S and
//! `SUB` yields `y - x = D`, so `ABS` is a no-op for the canonical pair
//! and still accepts the swapped one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::num::check_range;
use crate::error::{ConstraintError, Result};
use crate::script::{LockingProgram, Opcode, ProgramBuilder, UnlockingProgram};

/// Integer pair satisfying a puzzle, with `x <= y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Smaller value.
    pub x: i64,
    /// Larger value.
    pub y: i64,
}

/// Solve `x + y = sum`, `|x - y| = difference`.
pub fn solve(sum: i64, difference: i64) -> Result<Solution> {
    if difference < 0 {
        return Err(ConstraintError::NegativeDifference(difference).into());
    }
    let (s, d) = (i128::from(sum), i128::from(difference));
    if (s - d) % 2 != 0 {
        return Err(ConstraintError::ParityMismatch { sum, difference }.into());
    }

    // Halving brings both back into i64 range.
    let y = ((s + d) / 2) as i64;
    let x = ((s - d) / 2) as i64;
    Ok(Solution { x, y })
}

/// Arithmetic puzzle scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearPuzzle {
    sum: i64,
    difference: i64,
    solution: Solution,
}

impl LinearPuzzle {
    /// Validate the targets and solve the system.
    ///
    /// Fails with a constraint error when no integer solution exists and an
    /// encoding error when a target does not fit a script number.
    pub fn new(sum: i64, difference: i64) -> Result<Self> {
        check_range(sum)?;
        check_range(difference)?;
        // |x| and |y| never exceed max(|S|, |D|), so the pair fits too.
        let solution = solve(sum, difference)?;

        debug!(sum, difference, x = solution.x, y = solution.y, "linear puzzle solved");
        Ok(Self {
            sum,
            difference,
            solution,
        })
    }

    /// Target sum.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Target absolute difference.
    pub fn difference(&self) -> i64 {
        self.difference
    }

    /// The solved pair.
    pub fn solution(&self) -> Solution {
        self.solution
    }

    /// `2DUP ADD <S> EQUALVERIFY SUB ABS <D> EQUAL`.
    pub fn locking_program(&self) -> Result<LockingProgram> {
        let program = ProgramBuilder::new()
            .op(Opcode::TwoDup)
            .op(Opcode::Add)
            .number(self.sum)
            .op(Opcode::EqualVerify)
            .op(Opcode::Sub)
            .op(Opcode::Abs)
            .number(self.difference)
            .op(Opcode::Equal)
            .build_locking()?;
        Ok(program)
    }

    /// `<y> <x>`; needs no signature, so it is not tied to a transaction.
    pub fn unlocking_program(&self) -> Result<UnlockingProgram> {
        let program = ProgramBuilder::new()
            .number(self.solution.y)
            .number(self.solution.x)
            .build_unlocking()?;
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::num::{EncodingError, MAX_SCRIPT_NUM};
    use crate::error::Error;
    use crate::script::{StackMachine, TransactionContext, VerificationFailure};

    const CTX: TransactionContext = TransactionContext {
        signing_hash: [0; 32],
    };

    #[test]
    fn test_reference_solution() {
        let puzzle = LinearPuzzle::new(36, 1442).unwrap();
        let Solution { x, y } = puzzle.solution();

        assert_eq!((x, y), (-703, 739));
        assert_eq!(x + y, 36);
        assert_eq!((x - y).abs(), 1442);
    }

    #[test]
    fn test_machine_accepts_solution() {
        let puzzle = LinearPuzzle::new(36, 1442).unwrap();
        let locking = puzzle.locking_program().unwrap();
        let unlocking = puzzle.unlocking_program().unwrap();

        assert_eq!(locking.to_string(), "OP_2DUP OP_ADD 36 OP_EQUALVERIFY OP_SUB OP_ABS 1442 OP_EQUAL");
        assert_eq!(unlocking.to_string(), "739 -703");
        assert!(StackMachine::new().execute(&locking, &unlocking, &CTX));
    }

    #[test]
    fn test_swapped_pair_also_accepted() {
        let puzzle = LinearPuzzle::new(36, 1442).unwrap();
        let locking = puzzle.locking_program().unwrap();
        let swapped = ProgramBuilder::new()
            .number(-703)
            .number(739)
            .build_unlocking()
            .unwrap();

        assert!(StackMachine::new().execute(&locking, &swapped, &CTX));
    }

    #[test]
    fn test_wrong_pair_rejected() {
        let puzzle = LinearPuzzle::new(36, 1442).unwrap();
        let locking = puzzle.locking_program().unwrap();

        // Right sum, wrong difference.
        let wrong = ProgramBuilder::new().number(18).number(18).build_unlocking().unwrap();
        assert_eq!(
            StackMachine::new().evaluate(&locking, &wrong, &CTX),
            Err(VerificationFailure::FalseResult)
        );

        // Wrong sum.
        let wrong = ProgramBuilder::new().number(739).number(-702).build_unlocking().unwrap();
        assert_eq!(
            StackMachine::new().evaluate(&locking, &wrong, &CTX),
            Err(VerificationFailure::EqualVerifyFailed)
        );

        // Missing witness.
        let short = ProgramBuilder::new().number(739).build_unlocking().unwrap();
        assert_eq!(
            StackMachine::new().evaluate(&locking, &short, &CTX),
            Err(VerificationFailure::StackUnderflow(Opcode::TwoDup))
        );
    }

    #[test]
    fn test_parity_mismatch_is_constraint_error() {
        assert!(matches!(
            LinearPuzzle::new(36, 7),
            Err(Error::Constraint(ConstraintError::ParityMismatch { sum: 36, difference: 7 }))
        ));
        assert!(matches!(
            LinearPuzzle::new(-5, 2),
            Err(Error::Constraint(ConstraintError::ParityMismatch { .. }))
        ));
    }

    #[test]
    fn test_negative_difference_is_constraint_error() {
        assert!(matches!(
            LinearPuzzle::new(36, -2),
            Err(Error::Constraint(ConstraintError::NegativeDifference(-2)))
        ));
    }

    #[test]
    fn test_out_of_range_target_is_encoding_error() {
        assert!(matches!(
            LinearPuzzle::new(MAX_SCRIPT_NUM + 1, 1),
            Err(Error::Encoding(EncodingError::NumberOutOfRange(_)))
        ));
    }

    #[test]
    fn test_solve_handles_extreme_inputs() {
        assert!(solve(i64::MIN, i64::MAX).is_err());
        assert_eq!(
            solve(i64::MIN, 0).unwrap(),
            Solution { x: i64::MIN / 2, y: i64::MIN / 2 }
        );
    }

    #[test]
    fn test_odd_targets_solve() {
        let puzzle = LinearPuzzle::new(7, 3).unwrap();
        assert_eq!(puzzle.solution(), Solution { x: 2, y: 5 });
    }
}
