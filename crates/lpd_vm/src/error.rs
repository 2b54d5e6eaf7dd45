//! Error types for loading and executing object code

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading an object file from disk. Parsing itself never fails:
/// malformed lines are skipped and reported on the [`crate::Program`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read object file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An instruction that cannot be executed as written. Detected when the
/// program is decoded but only raised if the instruction is reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode {0:?}")]
    UnknownOpcode(String),

    #[error("{opcode} expects {expected} as operand, found {found:?}")]
    InvalidOperand {
        opcode: &'static str,
        expected: &'static str,
        found: String,
    },
}

/// Failures of the I/O port while serving `RD`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("invalid input: {0:?} is not an integer")]
    InvalidInput(String),

    #[error("input cancelled")]
    Cancelled,
}

/// Fatal runtime errors. Every one of them ends the run in the error state;
/// output emitted before the failure is kept on the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid input: {0:?} is not an integer")]
    InvalidInput(String),

    #[error("input cancelled by the operator")]
    InputCancelled,

    #[error("unresolved label {0:?}")]
    UnresolvedLabel(String),

    #[error("memory address {address} out of bounds (capacity {capacity})")]
    MemoryOutOfBounds { address: i64, capacity: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("step limit of {0} exhausted")]
    StepLimitExceeded(u64),

    #[error("machine already halted; reset before running again")]
    AlreadyHalted,
}

impl From<PortError> for ExecError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::InvalidInput(raw) => ExecError::InvalidInput(raw),
            PortError::Cancelled => ExecError::InputCancelled,
        }
    }
}
