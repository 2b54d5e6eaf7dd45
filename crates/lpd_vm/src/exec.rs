use crate::config::VmConfig;
use crate::error::{DecodeError, ExecError};
use crate::instr::Op;
use crate::loader::{parse_object_code, Program};
use crate::memory::Memory;
use crate::port::{IoPort, StopHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// `HLT` reached.
    Halt,
    /// Program counter left the instruction list.
    EndOfProgram,
    /// Stop requested through the [`StopHandle`].
    Stopped,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub step: u64,
    pub pc: i64,
    pub op: String,
    pub sp_after: i64,
    pub note: Option<String>,
}

/// A fatal error together with the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub pc: i64,
    pub error: ExecError,
}

#[derive(Debug)]
pub struct VmOutcome {
    pub reason: HaltReason,
    /// Values printed by `PRN`, in order.
    pub output: Vec<i64>,
    pub steps: u64,
    pub pc: i64,
    pub sp: i64,
    pub trace: Vec<TraceStep>,
    pub fault: Option<Fault>,
}

/// Caller-facing summary: `output` holds the `Res: <v>` lines joined by `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl VmOutcome {
    pub fn is_success(&self) -> bool {
        self.fault.is_none()
    }

    pub fn output_lines(&self) -> Vec<String> {
        self.output.iter().map(|v| format!("Res: {v}")).collect()
    }

    pub fn into_result(self) -> ExecutionResult {
        ExecutionResult {
            success: self.fault.is_none(),
            output: self.output_lines().join("\n"),
            error: self.fault.map(|f| f.error.to_string()),
        }
    }
}

/// One execution of one program. The machine owns its memory, program and
/// output; once halted it stays halted until [`Vm::reset`].
pub struct Vm<P: IoPort> {
    cfg: VmConfig,
    program: Program,
    ops: Vec<Result<Op, DecodeError>>,
    memory: Memory,
    port: P,
    pc: i64,
    sp: i64,
    halted: bool,
    steps: u64,
    output: Vec<i64>,
    trace: Vec<TraceStep>,
    stop: StopHandle,
}

impl<P: IoPort> Vm<P> {
    pub fn new(cfg: VmConfig, program: Program, port: P) -> Self {
        let ops = program.instructions.iter().map(|i| i.decode()).collect();
        Self {
            memory: Memory::new(cfg.memory_capacity),
            cfg,
            program,
            ops,
            port,
            pc: 0,
            sp: -1,
            halted: false,
            steps: 0,
            output: Vec::new(),
            trace: Vec::new(),
            stop: StopHandle::new(),
        }
    }

    pub fn from_source(cfg: VmConfig, source: &str, port: P) -> Self {
        Self::new(cfg, parse_object_code(source), port)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    pub fn pc(&self) -> i64 {
        self.pc
    }

    pub fn sp(&self) -> i64 {
        self.sp
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Handle for stopping this machine from another thread or from the port.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Back to the ready state with the same program and config.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.pc = 0;
        self.sp = -1;
        self.halted = false;
        self.steps = 0;
        self.output.clear();
        self.trace.clear();
        self.stop.clear();
    }

    /// Run until `HLT`, the end of the program, a stop request, or a fault.
    pub fn run(&mut self) -> VmOutcome {
        if self.halted {
            return self.outcome(
                HaltReason::Error,
                Some(Fault {
                    pc: self.pc,
                    error: ExecError::AlreadyHalted,
                }),
            );
        }
        info!(instructions = self.program.len(), "run started");
        let result = self.run_loop();
        self.halted = true;
        match result {
            Ok(reason) => {
                info!(?reason, steps = self.steps, printed = self.output.len(), "run finished");
                self.outcome(reason, None)
            }
            Err(e) => {
                error!(pc = self.pc, error = %e, "run failed");
                let fault = Fault {
                    pc: self.pc,
                    error: e,
                };
                self.outcome(HaltReason::Error, Some(fault))
            }
        }
    }

    fn outcome(&mut self, reason: HaltReason, fault: Option<Fault>) -> VmOutcome {
        VmOutcome {
            reason,
            output: self.output.clone(),
            steps: self.steps,
            pc: self.pc,
            sp: self.sp,
            trace: std::mem::take(&mut self.trace),
            fault,
        }
    }

    fn run_loop(&mut self) -> Result<HaltReason, ExecError> {
        loop {
            if self.stop.is_stopped() {
                return Ok(HaltReason::Stopped);
            }
            let Some(index) = self.current_index() else {
                return Ok(HaltReason::EndOfProgram);
            };
            let op = self.ops[index].clone()?;
            if op == Op::Hlt {
                return Ok(HaltReason::Halt);
            }
            self.charge()?;
            let pc = self.pc;
            self.step(&op)?;
            if self.cfg.trace {
                self.record(pc, &op);
            }
            self.pc = self.pc.saturating_add(1);
        }
    }

    fn current_index(&self) -> Option<usize> {
        usize::try_from(self.pc)
            .ok()
            .filter(|&i| i < self.ops.len())
    }

    fn charge(&mut self) -> Result<(), ExecError> {
        if let Some(limit) = self.cfg.step_limit {
            if self.steps >= limit {
                return Err(ExecError::StepLimitExceeded(limit));
            }
        }
        self.steps += 1;
        Ok(())
    }

    fn record(&mut self, pc: i64, op: &Op) {
        let note = match op {
            Op::Call(_) | Op::Jmp(_) | Op::Jmpf(_) | Op::Return if self.pc != pc => {
                Some(format!("-> {}", self.pc.saturating_add(1)))
            }
            Op::Prn => self.output.last().map(|v| format!("Res: {v}")),
            _ => None,
        };
        debug!(step = self.steps, pc, ?op, sp = self.sp, "step");
        self.trace.push(TraceStep {
            step: self.steps,
            pc,
            op: format!("{op:?}"),
            sp_after: self.sp,
            note,
        });
    }

    fn push(&mut self, v: i64) -> Result<(), ExecError> {
        let top = self.sp + 1;
        self.memory.write(top, v)?;
        self.sp = top;
        Ok(())
    }

    fn pop(&mut self) -> Result<i64, ExecError> {
        let v = self.memory.read(self.sp)?;
        self.sp -= 1;
        Ok(v)
    }

    /// Point the counter one before `label` so the loop's increment lands on it.
    fn jump_to(&mut self, label: &str) -> Result<(), ExecError> {
        let target = self.program.labels.resolve(label)?;
        self.pc = target as i64 - 1;
        Ok(())
    }

    fn step(&mut self, op: &Op) -> Result<(), ExecError> {
        match op {
            Op::Ldc(c) => self.push(*c)?,
            Op::Ldv(addr) => {
                let v = self.memory.read(*addr)?;
                self.push(v)?;
            }
            Op::Binary(bin) => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(bin.apply(a, b)?)?;
            }
            Op::Unary(un) => {
                let a = self.pop()?;
                self.push(un.apply(a))?;
            }
            Op::Str(addr) => {
                let v = self.pop()?;
                self.memory.write(*addr, v)?;
            }
            Op::Rd => {
                let v = self.port.request_integer(&self.stop)?;
                self.push(v)?;
            }
            Op::Prn => {
                let v = self.pop()?;
                self.output.push(v);
                self.port.emit(v);
            }
            Op::Call(label) => {
                let target = self.program.labels.resolve(label)?;
                self.push(self.pc)?;
                self.pc = target as i64 - 1;
            }
            Op::Return => {
                self.pc = self.pop()?;
            }
            Op::Jmp(label) => self.jump_to(label)?,
            Op::Jmpf(label) => {
                if self.pop()? == 0 {
                    self.jump_to(label)?;
                }
            }
            Op::Alloc { base, count } => {
                for i in 0..*count {
                    let v = self.memory.read(base.saturating_add(i))?;
                    self.push(v)?;
                }
            }
            Op::Dalloc { base, count } => {
                for i in (0..*count).rev() {
                    let v = self.pop()?;
                    self.memory.write(base.saturating_add(i), v)?;
                }
            }
            Op::Hlt | Op::Nop => {}
        }
        Ok(())
    }
}

/// Load `source`, run it to completion against `port`, and summarise.
pub fn execute<P: IoPort>(cfg: VmConfig, source: &str, port: P) -> ExecutionResult {
    Vm::from_source(cfg, source, port).run().into_result()
}
