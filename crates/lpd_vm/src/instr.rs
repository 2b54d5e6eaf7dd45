use crate::error::{DecodeError, ExecError};
use crate::opcode::Opcode;
use serde::Serialize;

/// One object-code line, fields trimmed but otherwise as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub label: String,
    pub opcode: String,
    pub operand1: String,
    pub operand2: String,
}

/// Two-operand stack operations: pop b, pop a, push `a OP b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mult,
    Divi,
    And,
    Or,
    Cme,
    Cma,
    Ceq,
    Cdif,
    Cmeq,
    Cmaq,
}

/// Operations that replace the top cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Inv,
    Neg,
}

/// Decoded instruction with its static operands parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Ldc(i64),
    Ldv(i64),
    Binary(BinOp),
    Unary(UnOp),
    Str(i64),
    Rd,
    Prn,
    Call(String),
    Return,
    Jmp(String),
    Jmpf(String),
    Alloc { base: i64, count: i64 },
    Dalloc { base: i64, count: i64 },
    Hlt,
    Nop,
}

impl Instruction {
    pub fn new(label: &str, opcode: &str, operand1: &str, operand2: &str) -> Self {
        Self {
            label: label.to_string(),
            opcode: opcode.to_string(),
            operand1: operand1.to_string(),
            operand2: operand2.to_string(),
        }
    }

    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::try_from(self.opcode.as_str()).ok()
    }

    pub fn decode(&self) -> Result<Op, DecodeError> {
        let op = self
            .opcode()
            .ok_or_else(|| DecodeError::UnknownOpcode(self.opcode.clone()))?;
        let first = || int_operand(op, "an integer", &self.operand1);
        let label = || label_operand(op, &self.operand1);
        Ok(match op {
            Opcode::Ldc => Op::Ldc(first()?),
            Opcode::Ldv => Op::Ldv(int_operand(op, "an address", &self.operand1)?),
            Opcode::Str => Op::Str(int_operand(op, "an address", &self.operand1)?),
            Opcode::Add => Op::Binary(BinOp::Add),
            Opcode::Sub => Op::Binary(BinOp::Sub),
            Opcode::Mult => Op::Binary(BinOp::Mult),
            Opcode::Divi => Op::Binary(BinOp::Divi),
            Opcode::And => Op::Binary(BinOp::And),
            Opcode::Or => Op::Binary(BinOp::Or),
            Opcode::Cme => Op::Binary(BinOp::Cme),
            Opcode::Cma => Op::Binary(BinOp::Cma),
            Opcode::Ceq => Op::Binary(BinOp::Ceq),
            Opcode::Cdif => Op::Binary(BinOp::Cdif),
            Opcode::Cmeq => Op::Binary(BinOp::Cmeq),
            Opcode::Cmaq => Op::Binary(BinOp::Cmaq),
            Opcode::Inv => Op::Unary(UnOp::Inv),
            Opcode::Neg => Op::Unary(UnOp::Neg),
            Opcode::Rd => Op::Rd,
            Opcode::Prn => Op::Prn,
            Opcode::Call => Op::Call(label()?),
            Opcode::Return => Op::Return,
            Opcode::Jmp => Op::Jmp(label()?),
            Opcode::Jmpf => Op::Jmpf(label()?),
            Opcode::Alloc | Opcode::Dalloc => {
                let base = int_operand(op, "a base address", &self.operand1)?;
                let count = int_operand(op, "a cell count", &self.operand2)?;
                if op == Opcode::Alloc {
                    Op::Alloc { base, count }
                } else {
                    Op::Dalloc { base, count }
                }
            }
            Opcode::Hlt => Op::Hlt,
            Opcode::Null | Opcode::Start => Op::Nop,
        })
    }
}

fn int_operand(op: Opcode, expected: &'static str, raw: &str) -> Result<i64, DecodeError> {
    raw.parse::<i64>().map_err(|_| DecodeError::InvalidOperand {
        opcode: op.mnemonic(),
        expected,
        found: raw.to_string(),
    })
}

fn label_operand(op: Opcode, raw: &str) -> Result<String, DecodeError> {
    if raw.is_empty() {
        return Err(DecodeError::InvalidOperand {
            opcode: op.mnemonic(),
            expected: "a label",
            found: String::new(),
        });
    }
    Ok(raw.to_string())
}

impl BinOp {
    pub fn apply(self, a: i64, b: i64) -> Result<i64, ExecError> {
        use BinOp::*;
        Ok(match self {
            Add => a.wrapping_add(b),
            Sub => a.wrapping_sub(b),
            Mult => a.wrapping_mul(b),
            Divi => floor_div(a, b)?,
            And => flag(a == 1 && b == 1),
            Or => flag(a == 1 || b == 1),
            Cme => flag(a < b),
            Cma => flag(a > b),
            Ceq => flag(a == b),
            Cdif => flag(a != b),
            Cmeq => flag(a <= b),
            Cmaq => flag(a >= b),
        })
    }
}

impl UnOp {
    pub fn apply(self, a: i64) -> i64 {
        match self {
            UnOp::Inv => a.wrapping_neg(),
            UnOp::Neg => 1i64.wrapping_sub(a),
        }
    }
}

fn flag(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}

/// Integer division rounded toward negative infinity.
pub fn floor_div(a: i64, b: i64) -> Result<i64, ExecError> {
    if b == 0 {
        return Err(ExecError::DivisionByZero);
    }
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        Ok(q.wrapping_sub(1))
    } else {
        Ok(q)
    }
}
