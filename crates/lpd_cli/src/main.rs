//! lpdvm - run, list and inspect LPD object code

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lpd_vm::{
    disassemble, load_file, Insights, IoPort, Program, ScriptedPort, StdioPort, Vm, VmConfig,
    VmOutcome,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lpdvm")]
#[command(about = "Stack virtual machine for LPD object code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute an object file
    Run(RunArgs),
    /// Print an instruction listing with resolved jump targets
    Disasm {
        /// Path to a .obj file
        file: PathBuf,
    },
    /// Print static counts (labels, calls, allocated cells, reads, prints)
    Insights {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to a .obj file
    file: PathBuf,
    /// Comma-separated answers for RD instead of reading stdin
    #[arg(short, long, value_delimiter = ',')]
    input: Option<Vec<String>>,
    /// Memory cells (overrides LPDVM_MEMORY)
    #[arg(long)]
    memory: Option<usize>,
    /// Abort after this many instructions (overrides LPDVM_MAX_STEPS)
    #[arg(long)]
    max_steps: Option<u64>,
    /// Print every executed step to stderr
    #[arg(long)]
    trace: bool,
    /// Print the execution result as JSON instead of streaming `Res:` lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args),

        Commands::Disasm { file } => {
            let program = load(&file)?;
            print!("{}", disassemble(&program));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Insights { file, json } => {
            let program = load(&file)?;
            let s = Insights::of(&program);
            if json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else {
                println!("instructions:    {}", s.instructions);
                println!("labels:          {}", s.labels);
                println!("calls:           {}", s.calls);
                println!("allocated cells: {}", s.allocated_cells);
                println!("reads:           {}", s.reads);
                println!("prints:          {}", s.prints);
                if s.skipped_lines > 0 {
                    println!("skipped lines:   {}", s.skipped_lines);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,lpd_vm=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn load(path: &Path) -> Result<Program> {
    let program = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    debug!(
        instructions = program.len(),
        labels = program.labels.len(),
        skipped = program.skipped.len(),
        "object file loaded"
    );
    Ok(program)
}

fn config(args: &RunArgs) -> VmConfig {
    let mut cfg = VmConfig::from_env();
    if let Some(m) = args.memory {
        cfg.memory_capacity = m;
    }
    if let Some(n) = args.max_steps {
        cfg.step_limit = Some(n);
    }
    cfg.trace |= args.trace;
    cfg
}

fn run(args: RunArgs) -> Result<ExitCode> {
    let program = load(&args.file)?;
    let cfg = config(&args);

    let outcome = match &args.input {
        Some(answers) => {
            let port = ScriptedPort::new(answers.iter().cloned());
            let echo = !args.json;
            execute(cfg, program, EchoPort { inner: port, echo })
        }
        None => {
            let stdin = io::stdin();
            let port = StdioPort::new(stdin.lock(), io::stdout()).with_prompt("input> ");
            if args.json {
                execute(cfg, program, port.quiet())
            } else {
                execute(cfg, program, port)
            }
        }
    };

    if !outcome.trace.is_empty() {
        let mut err = io::stderr().lock();
        for step in &outcome.trace {
            writeln!(err, "{}", serde_json::to_string(step)?)?;
        }
    }

    let failed = !outcome.is_success();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.into_result())?);
    } else if let Some(fault) = &outcome.fault {
        eprintln!("Error: {} (at instruction {})", fault.error, fault.pc);
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn execute<P: IoPort>(cfg: VmConfig, program: Program, port: P) -> VmOutcome {
    Vm::new(cfg, program, port).run()
}

/// Scripted answers, with results streamed to stdout as they are printed.
struct EchoPort {
    inner: ScriptedPort,
    echo: bool,
}

impl IoPort for EchoPort {
    fn request_integer(
        &mut self,
        stop: &lpd_vm::StopHandle,
    ) -> std::result::Result<i64, lpd_vm::PortError> {
        self.inner.request_integer(stop)
    }

    fn emit(&mut self, value: i64) {
        if self.echo {
            println!("Res: {value}");
        }
        self.inner.emit(value);
    }
}
