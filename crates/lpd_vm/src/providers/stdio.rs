use crate::error::PortError;
use crate::port::{parse_answer, IoPort, StopHandle};
use std::io::{BufRead, Write};
use tracing::warn;

/// Line-oriented terminal port: one answer per line from `input`,
/// `Res: <value>` lines to `output`.
pub struct StdioPort<R, W> {
    input: R,
    output: W,
    prompt: Option<String>,
    echo: bool,
}

impl<R: BufRead, W: Write> StdioPort<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt: None,
            echo: true,
        }
    }

    /// Text written before each `RD` read.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Stop echoing results and prompts; the caller reports output itself.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> IoPort for StdioPort<R, W> {
    fn request_integer(&mut self, stop: &StopHandle) -> Result<i64, PortError> {
        if stop.is_stopped() {
            return Err(PortError::Cancelled);
        }
        if self.echo {
            if let Some(prompt) = &self.prompt {
                let _ = write!(self.output, "{prompt}");
                let _ = self.output.flush();
            }
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Err(PortError::Cancelled),
            Ok(_) if stop.is_stopped() => Err(PortError::Cancelled),
            Ok(_) => parse_answer(&line),
            Err(e) => {
                warn!(error = %e, "reading RD answer failed");
                Err(PortError::Cancelled)
            }
        }
    }

    fn emit(&mut self, value: i64) {
        if !self.echo {
            return;
        }
        if let Err(e) = writeln!(self.output, "Res: {value}").and_then(|_| self.output.flush()) {
            warn!(error = %e, "writing PRN result failed");
        }
    }
}
