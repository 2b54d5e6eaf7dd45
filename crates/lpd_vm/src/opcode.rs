#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Ldc,    // operand1: literal
    Ldv,    // operand1: address
    Add,
    Sub,
    Mult,
    Divi,   // floored
    Inv,    // negate top
    And,
    Or,
    Neg,    // 1 - top
    Cme,    // <
    Cma,    // >
    Ceq,    // =
    Cdif,   // !=
    Cmeq,   // <=
    Cmaq,   // >=
    Str,    // operand1: address
    Rd,
    Prn,
    Call,   // operand1: label
    Return,
    Jmp,    // operand1: label
    Jmpf,   // operand1: label
    Alloc,  // operand1: base, operand2: count
    Dalloc, // operand1: base, operand2: count
    Hlt,
    Null,   // label marker
    Start,
}

impl Opcode {
    pub const ALL: [Opcode; 28] = [
        Opcode::Ldc,
        Opcode::Ldv,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mult,
        Opcode::Divi,
        Opcode::Inv,
        Opcode::And,
        Opcode::Or,
        Opcode::Neg,
        Opcode::Cme,
        Opcode::Cma,
        Opcode::Ceq,
        Opcode::Cdif,
        Opcode::Cmeq,
        Opcode::Cmaq,
        Opcode::Str,
        Opcode::Rd,
        Opcode::Prn,
        Opcode::Call,
        Opcode::Return,
        Opcode::Jmp,
        Opcode::Jmpf,
        Opcode::Alloc,
        Opcode::Dalloc,
        Opcode::Hlt,
        Opcode::Null,
        Opcode::Start,
    ];

    /// Name as written in the object code.
    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Ldc => "LDC",
            Ldv => "LDV",
            Add => "ADD",
            Sub => "SUB",
            Mult => "MULT",
            Divi => "DIVI",
            Inv => "INV",
            And => "AND",
            Or => "OR",
            Neg => "NEG",
            Cme => "CME",
            Cma => "CMA",
            Ceq => "CEQ",
            Cdif => "CDIF",
            Cmeq => "CMEQ",
            Cmaq => "CMAQ",
            Str => "STR",
            Rd => "RD",
            Prn => "PRN",
            Call => "CALL",
            Return => "RETURN",
            Jmp => "JMP",
            Jmpf => "JMPF",
            Alloc => "ALLOC",
            Dalloc => "DALLOC",
            Hlt => "HLT",
            Null => "NULL",
            Start => "START",
        }
    }

    /// Opcodes whose first operand names a label.
    pub fn takes_label(self) -> bool {
        matches!(self, Opcode::Call | Opcode::Jmp | Opcode::Jmpf)
    }
}

impl TryFrom<&str> for Opcode {
    type Error = ();
    fn try_from(v: &str) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match v {
            "LDC" => Ldc,
            "LDV" => Ldv,
            "ADD" => Add,
            "SUB" => Sub,
            "MULT" => Mult,
            "DIVI" => Divi,
            "INV" => Inv,
            "AND" => And,
            "OR" => Or,
            "NEG" => Neg,
            "CME" => Cme,
            "CMA" => Cma,
            "CEQ" => Ceq,
            "CDIF" => Cdif,
            "CMEQ" => Cmeq,
            "CMAQ" => Cmaq,
            "STR" => Str,
            "RD" => Rd,
            "PRN" => Prn,
            "CALL" => Call,
            "RETURN" => Return,
            "JMP" => Jmp,
            "JMPF" => Jmpf,
            "ALLOC" => Alloc,
            "DALLOC" => Dalloc,
            "HLT" => Hlt,
            "NULL" => Null,
            "START" => Start,
            _ => return Err(()),
        })
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
