use lpd_vm::{
    DecodeError, ExecError, HaltReason, ScriptedPort, Vm, VmConfig, VmOutcome,
};

fn line(label: &str, op: &str, a: &str, b: &str) -> String {
    format!("{:<4}{:<8}{:<4}{:<4}", label, op, a, b)
}

fn op(name: &str) -> String {
    line("", name, "", "")
}

fn op1(name: &str, a: impl ToString) -> String {
    line("", name, &a.to_string(), "")
}

fn op2(name: &str, a: impl ToString, b: impl ToString) -> String {
    line("", name, &a.to_string(), &b.to_string())
}

fn mark(label: &str) -> String {
    line(label, "NULL", "", "")
}

fn run_with(lines: &[String], answers: &[&str]) -> VmOutcome {
    let port = ScriptedPort::new(answers.iter().copied());
    Vm::from_source(VmConfig::default(), &lines.join("\n"), port).run()
}

fn run(lines: &[String]) -> VmOutcome {
    run_with(lines, &[])
}

fn binary(a: i64, b: i64, name: &str) -> Vec<i64> {
    let out = run(&[op1("LDC", a), op1("LDC", b), op(name), op("PRN"), op("HLT")]);
    assert!(out.is_success(), "{name}: {:?}", out.fault);
    out.output
}

fn err(out: &VmOutcome) -> Option<ExecError> {
    out.fault.as_ref().map(|f| f.error.clone())
}

#[test]
fn arithmetic() {
    assert_eq!(binary(7, 2, "ADD"), vec![9]);
    assert_eq!(binary(7, 2, "SUB"), vec![5]);
    assert_eq!(binary(7, -2, "MULT"), vec![-14]);
    assert_eq!(binary(7, 2, "DIVI"), vec![3]);
    assert_eq!(binary(-7, 2, "DIVI"), vec![-4]);
}

#[test]
fn comparisons() {
    assert_eq!(binary(1, 2, "CME"), vec![1]);
    assert_eq!(binary(2, 2, "CME"), vec![0]);
    assert_eq!(binary(3, 2, "CMA"), vec![1]);
    assert_eq!(binary(2, 2, "CEQ"), vec![1]);
    assert_eq!(binary(2, 3, "CDIF"), vec![1]);
    assert_eq!(binary(2, 2, "CMEQ"), vec![1]);
    assert_eq!(binary(3, 2, "CMEQ"), vec![0]);
    assert_eq!(binary(2, 2, "CMAQ"), vec![1]);
    assert_eq!(binary(1, 2, "CMAQ"), vec![0]);
}

#[test]
fn logic() {
    assert_eq!(binary(1, 1, "AND"), vec![1]);
    assert_eq!(binary(1, 0, "AND"), vec![0]);
    assert_eq!(binary(0, 1, "OR"), vec![1]);
    assert_eq!(binary(0, 0, "OR"), vec![0]);
    let out = run(&[op1("LDC", 0), op("NEG"), op("PRN"), op1("LDC", 1), op("NEG"), op("PRN")]);
    assert_eq!(out.output, vec![1, 0]);
}

#[test]
fn inv_negates_top() {
    let out = run(&[op1("LDC", 8), op("INV"), op("PRN")]);
    assert_eq!(out.output, vec![-8]);
}

#[test]
fn ldv_and_str_move_cells() {
    // globals live at 0..2, materialised onto the stack first
    let out = run(&[
        op("START"),
        op2("ALLOC", 0, 2),
        op1("LDC", 11),
        op1("STR", 1),
        op1("LDV", 1),
        op("PRN"),
        op2("DALLOC", 0, 2),
        op("HLT"),
    ]);
    assert!(out.is_success());
    assert_eq!(out.output, vec![11]);
}

#[test]
fn rd_pushes_operator_answer() {
    let out = run_with(&[op("RD"), op("RD"), op("ADD"), op("PRN")], &["40", " 2 "]);
    assert_eq!(out.output, vec![42]);
}

#[test]
fn rd_rejects_non_numeric_answer() {
    let out = run_with(&[op1("LDC", 1), op("PRN"), op("RD"), op("PRN")], &["abc"]);
    assert_eq!(err(&out), Some(ExecError::InvalidInput("abc".into())));
    assert_eq!(out.output, vec![1]);
}

#[test]
fn rd_without_answer_is_cancelled() {
    let out = run(&[op("RD")]);
    assert_eq!(err(&out), Some(ExecError::InputCancelled));
    assert_eq!(out.reason, HaltReason::Error);
}

#[test]
fn jmp_skips_instructions() {
    let out = run(&[
        op1("JMP", "L1"),
        op1("LDC", 1),
        op("PRN"),
        mark("L1"),
        op1("LDC", 2),
        op("PRN"),
    ]);
    assert_eq!(out.output, vec![2]);
}

#[test]
fn jmp_to_first_instruction() {
    let cfg = VmConfig {
        step_limit: Some(7),
        ..VmConfig::default()
    };
    let src = [mark("L0"), op1("LDC", 1), op("PRN"), op1("JMP", "L0")].join("\n");
    let out = Vm::from_source(cfg, &src, ScriptedPort::default()).run();
    assert_eq!(out.output, vec![1, 1]);
    assert_eq!(err(&out), Some(ExecError::StepLimitExceeded(7)));
}

#[test]
fn while_loop_counts_down() {
    // n := 3; while n > 0 do { write n; n := n - 1 }
    let out = run(&[
        op("START"),
        op2("ALLOC", 0, 1),
        op1("LDC", 3),
        op1("STR", 0),
        mark("L1"),
        op1("LDV", 0),
        op1("LDC", 0),
        op("CMA"),
        op1("JMPF", "L2"),
        op1("LDV", 0),
        op("PRN"),
        op1("LDV", 0),
        op1("LDC", 1),
        op("SUB"),
        op1("STR", 0),
        op1("JMP", "L1"),
        mark("L2"),
        op2("DALLOC", 0, 1),
        op("HLT"),
    ]);
    assert!(out.is_success());
    assert_eq!(out.output, vec![3, 2, 1]);
    assert_eq!(out.sp, -1);
}

#[test]
fn procedure_call_with_frame() {
    // global at 0, return address lands at 1, procedure local at 2
    let out = run(&[
        op("START"),
        op2("ALLOC", 0, 1),
        op1("CALL", "L1"),
        op1("CALL", "L1"),
        op2("DALLOC", 0, 1),
        op("HLT"),
        mark("L1"),
        op2("ALLOC", 2, 1),
        op1("LDC", 5),
        op1("STR", 2),
        op1("LDV", 2),
        op("PRN"),
        op2("DALLOC", 2, 1),
        op("RETURN"),
    ]);
    assert!(out.is_success(), "{:?}", out.fault);
    assert_eq!(out.output, vec![5, 5]);
    assert_eq!(out.sp, -1);
}

#[test]
fn unknown_opcode_fails_only_when_reached() {
    let out = run(&[op1("LDC", 1), op("PRN"), op("HLT"), op("BOGUS")]);
    assert!(out.is_success());

    let out = run(&[op1("LDC", 1), op("PRN"), op("BOGUS")]);
    assert_eq!(
        err(&out),
        Some(ExecError::Decode(DecodeError::UnknownOpcode("BOGUS".into())))
    );
    assert_eq!(out.fault.map(|f| f.pc), Some(2));
    assert_eq!(out.output, vec![1]);
}

#[test]
fn non_numeric_literal_is_reported() {
    let out = run(&[op1("LDC", "ab")]);
    assert!(matches!(
        err(&out),
        Some(ExecError::Decode(DecodeError::InvalidOperand { opcode: "LDC", .. }))
    ));
}

#[test]
fn null_and_start_are_no_ops() {
    let out = run(&[op("START"), mark("L1"), mark("L2"), op1("LDC", 4), op("PRN")]);
    assert_eq!(out.output, vec![4]);
    assert_eq!(out.steps, 5);
    assert_eq!(out.reason, HaltReason::EndOfProgram);
}

#[test]
fn pop_from_empty_stack_is_out_of_bounds() {
    let out = run(&[op("PRN")]);
    assert_eq!(
        err(&out),
        Some(ExecError::MemoryOutOfBounds {
            address: -1,
            capacity: lpd_vm::config::DEFAULT_MEMORY_CELLS
        })
    );
}

#[test]
fn stack_overflow_is_out_of_bounds() {
    let cfg = VmConfig {
        memory_capacity: 3,
        ..VmConfig::default()
    };
    let src = [op1("LDC", 1), op1("LDC", 2), op1("LDC", 3), op1("LDC", 4)].join("\n");
    let out = Vm::from_source(cfg, &src, ScriptedPort::default()).run();
    assert_eq!(
        err(&out),
        Some(ExecError::MemoryOutOfBounds {
            address: 3,
            capacity: 3
        })
    );
    assert_eq!(out.sp, 2);
}

#[test]
fn negative_address_is_out_of_bounds() {
    let out = run(&[op1("LDV", -4)]);
    assert!(matches!(
        err(&out),
        Some(ExecError::MemoryOutOfBounds { address: -4, .. })
    ));
}

#[test]
fn return_to_negative_address_ends_program() {
    let out = run(&[op1("LDC", -10), op("RETURN"), op1("LDC", 1), op("PRN")]);
    assert_eq!(out.reason, HaltReason::EndOfProgram);
    assert!(out.output.is_empty());
}
