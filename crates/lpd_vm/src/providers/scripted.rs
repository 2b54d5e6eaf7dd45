use crate::error::PortError;
use crate::port::{parse_answer, IoPort, StopHandle};
use std::collections::VecDeque;

/// Answers `RD` from a fixed queue and keeps every emitted value.
/// An exhausted queue behaves like an operator cancelling the prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPort {
    answers: VecDeque<String>,
    emitted: Vec<i64>,
}

impl ScriptedPort {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            emitted: Vec::new(),
        }
    }

    pub fn from_values(values: &[i64]) -> Self {
        Self::new(values.iter().map(|v| v.to_string()))
    }

    pub fn emitted(&self) -> &[i64] {
        &self.emitted
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl IoPort for ScriptedPort {
    fn request_integer(&mut self, stop: &StopHandle) -> Result<i64, PortError> {
        if stop.is_stopped() {
            return Err(PortError::Cancelled);
        }
        let raw = self.answers.pop_front().ok_or(PortError::Cancelled)?;
        parse_answer(&raw)
    }

    fn emit(&mut self, value: i64) {
        self.emitted.push(value);
    }
}
