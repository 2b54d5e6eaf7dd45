//! Object-code loader.
//!
//! Each non-blank line carries four fixed-width columns:
//!
//! ```text
//! 0..4    label
//! 4..12   opcode
//! 12..16  operand 1
//! 16..20  operand 2
//! ```
//!
//! Lines shorter than 20 characters are skipped with a warning. No opcode or
//! operand validation happens here; bad instructions fail when executed.

use crate::error::LoadError;
use crate::instr::Instruction;
use crate::labels::LabelTable;
use crate::opcode::Opcode;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

pub const LINE_WIDTH: usize = 20;

const LABEL: std::ops::Range<usize> = 0..4;
const OPCODE: std::ops::Range<usize> = 4..12;
const OPERAND1: std::ops::Range<usize> = 12..16;
const OPERAND2: std::ops::Range<usize> = 16..20;

/// A line the loader dropped because it was too short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the source text.
    pub line: usize,
    pub len: usize,
}

/// Instructions in address order plus the marks declared among them.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
    pub skipped: Vec<SkippedLine>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Append one instruction, registering it as a mark if it is a `NULL`.
    pub fn push(&mut self, ins: Instruction) {
        let index = self.instructions.len();
        if ins.opcode == Opcode::Null.mnemonic() {
            self.labels.declare(&ins.label, index);
        }
        self.instructions.push(ins);
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut p = Program::default();
        for ins in iter {
            p.push(ins);
        }
        p
    }
}

pub fn parse_object_code(text: &str) -> Program {
    let mut program = Program::default();
    for (n, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        if chars.len() < LINE_WIDTH {
            warn!(line = n + 1, len = chars.len(), "skipping short object-code line");
            program.skipped.push(SkippedLine {
                line: n + 1,
                len: chars.len(),
            });
            continue;
        }
        program.push(Instruction {
            label: column(&chars, LABEL),
            opcode: column(&chars, OPCODE),
            operand1: column(&chars, OPERAND1),
            operand2: column(&chars, OPERAND2),
        });
    }
    program
}

fn column(chars: &[char], range: std::ops::Range<usize>) -> String {
    chars[range].iter().collect::<String>().trim().to_string()
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_object_code(&text))
}
