//! Human-readable listing of a loaded program.

use crate::instr::Instruction;
use crate::loader::Program;
use crate::opcode::Opcode;

/// One line per instruction: index, label, opcode, operands, and the resolved
/// target of `CALL`/`JMP`/`JMPF`.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();

    for (index, ins) in program.instructions.iter().enumerate() {
        out.push_str(&format_instr(program, index, ins));
        out.push('\n');
    }

    if out.is_empty() {
        out.push_str("(empty program)\n");
    }

    for (name, index) in program.labels.sorted() {
        out.push_str(&format!("; mark {:<4} = {:04}\n", name, index));
    }

    for s in &program.skipped {
        out.push_str(&format!("; skipped line {} ({} chars)\n", s.line, s.len));
    }

    out
}

fn format_instr(program: &Program, index: usize, ins: &Instruction) -> String {
    let base = format!(
        "{:04}  {:<4} {:<8} {:<4} {:<4}",
        index, ins.label, ins.opcode, ins.operand1, ins.operand2
    );
    let detail = format_target(program, ins);
    if detail.is_empty() {
        base.trim_end().to_string()
    } else {
        format!("{}  {}", base.trim_end(), detail)
    }
}

fn format_target(program: &Program, ins: &Instruction) -> String {
    match ins.opcode() {
        Some(op) if op.takes_label() => match program.labels.get(&ins.operand1) {
            Some(i) => format!("-> {:04}", i),
            None => "-> ?".to_string(),
        },
        Some(_) => String::new(),
        None => "; unknown opcode".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_object_code;

    fn line(label: &str, op: &str, a: &str, b: &str) -> String {
        format!("{:<4}{:<8}{:<4}{:<4}", label, op, a, b)
    }

    #[test]
    fn empty() {
        assert_eq!(disassemble(&Program::default()), "(empty program)\n");
    }

    #[test]
    fn resolves_targets() {
        let src = [
            line("", "JMP", "L1", ""),
            line("", "CALL", "L9", ""),
            line("L1", "NULL", "", ""),
            line("", "ALLOC", "0", "2"),
        ]
        .join("\n");
        let listing = disassemble(&parse_object_code(&src));
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "0000       JMP      L1  -> 0002");
        assert_eq!(lines[1], "0001       CALL     L9  -> ?");
        assert_eq!(lines[2], "0002  L1   NULL");
        assert_eq!(lines[3], "0003       ALLOC    0    2");
        assert_eq!(lines[4], "; mark L1   = 0002");
    }

    #[test]
    fn flags_unknown_opcodes_and_skips() {
        let src = format!("{}\nshort", line("", "FOO", "", ""));
        let listing = disassemble(&parse_object_code(&src));
        assert!(listing.contains("FOO  ; unknown opcode"));
        assert!(listing.contains("; skipped line 2 (5 chars)"));
    }
}
