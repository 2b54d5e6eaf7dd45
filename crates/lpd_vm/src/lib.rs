//! LPD-VM - stack virtual machine for LPD object code
//!
//! Executes the fixed-width text object code emitted by the LPD compiler.
//! One flat memory region holds globals, call frames and the operand stack;
//! the stack pointer starts at -1 and grows upward.
//!
//! - `loader`: object-code text -> [`Program`] (instructions + label table)
//! - `exec`: the fetch/execute loop over a [`Memory`]
//! - `port`: the injected [`IoPort`] that answers `RD` and receives `PRN`
//! - `disasm` / `insights`: listing and static statistics of a loaded program

pub mod config;
pub mod disasm;
pub mod error;
pub mod exec;
pub mod insights;
pub mod instr;
pub mod labels;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod port;
pub mod providers;

pub use config::VmConfig;
pub use disasm::disassemble;
pub use error::{DecodeError, ExecError, LoadError, PortError};
pub use exec::{execute, ExecutionResult, Fault, HaltReason, TraceStep, Vm, VmOutcome};
pub use insights::Insights;
pub use instr::{BinOp, Instruction, Op, UnOp};
pub use labels::LabelTable;
pub use loader::{load_file, parse_object_code, Program, SkippedLine};
pub use memory::Memory;
pub use opcode::Opcode;
pub use port::{IoPort, StopHandle};
pub use providers::{ChannelPort, PortHandle, ScriptedPort, StdioPort};
