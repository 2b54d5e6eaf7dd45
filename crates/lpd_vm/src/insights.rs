use crate::loader::Program;
use crate::opcode::Opcode;
use serde::Serialize;

/// Static counts over a loaded program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Insights {
    pub instructions: usize,
    pub labels: usize,
    pub calls: usize,
    /// Sum of the counts of every `ALLOC`; unreadable counts are ignored.
    pub allocated_cells: i64,
    pub reads: usize,
    pub prints: usize,
    pub skipped_lines: usize,
}

impl Insights {
    pub fn of(program: &Program) -> Self {
        let mut s = Insights {
            instructions: program.len(),
            skipped_lines: program.skipped.len(),
            ..Insights::default()
        };
        for ins in &program.instructions {
            match ins.opcode() {
                Some(Opcode::Null) => s.labels += 1,
                Some(Opcode::Call) => s.calls += 1,
                Some(Opcode::Rd) => s.reads += 1,
                Some(Opcode::Prn) => s.prints += 1,
                Some(Opcode::Alloc) => {
                    s.allocated_cells += ins.operand2.parse::<i64>().unwrap_or(0);
                }
                _ => {}
            }
        }
        s
    }
}
