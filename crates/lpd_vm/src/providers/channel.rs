use crate::error::PortError;
use crate::port::{parse_answer, IoPort, StopHandle};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

const POLL: Duration = Duration::from_millis(20);

/// Port fed from another thread. A pending `RD` wakes up every poll interval
/// to check the stop flag, so stopping the machine aborts the wait.
pub struct ChannelPort {
    answers: Receiver<String>,
    results: Sender<i64>,
    poll: Duration,
}

/// The controller's side of a [`ChannelPort`].
pub struct PortHandle {
    answers: Sender<String>,
    results: Receiver<i64>,
}

impl ChannelPort {
    pub fn pair() -> (ChannelPort, PortHandle) {
        let (answer_tx, answer_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        (
            ChannelPort {
                answers: answer_rx,
                results: result_tx,
                poll: POLL,
            },
            PortHandle {
                answers: answer_tx,
                results: result_rx,
            },
        )
    }

    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }
}

impl IoPort for ChannelPort {
    fn request_integer(&mut self, stop: &StopHandle) -> Result<i64, PortError> {
        loop {
            if stop.is_stopped() {
                return Err(PortError::Cancelled);
            }
            match self.answers.recv_timeout(self.poll) {
                Ok(raw) => return parse_answer(&raw),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(PortError::Cancelled),
            }
        }
    }

    fn emit(&mut self, value: i64) {
        // Controller may have gone away; results are still on the outcome.
        let _ = self.results.send(value);
    }
}

impl PortHandle {
    /// Queue an answer for the next `RD`. Returns false if the port is gone.
    pub fn answer(&self, raw: impl Into<String>) -> bool {
        self.answers.send(raw.into()).is_ok()
    }

    /// Block for the next printed value; `None` once the port is dropped.
    pub fn next_result(&self) -> Option<i64> {
        self.results.recv().ok()
    }

    pub fn drain_results(&self) -> Vec<i64> {
        self.results.try_iter().collect()
    }
}
