use crate::error::PortError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The machine's only channel to the outside world.
pub trait IoPort {
    /// Block until the operator supplies an integer for `RD`.
    /// Implementations that wait should poll `stop` and give up with
    /// [`PortError::Cancelled`] once it is set.
    fn request_integer(&mut self, stop: &StopHandle) -> Result<i64, PortError>;
    /// Receive a value printed by `PRN`.
    fn emit(&mut self, value: i64);
}

impl<P: IoPort + ?Sized> IoPort for &mut P {
    fn request_integer(&mut self, stop: &StopHandle) -> Result<i64, PortError> {
        (**self).request_integer(stop)
    }
    fn emit(&mut self, value: i64) {
        (**self).emit(value)
    }
}

impl<P: IoPort + ?Sized> IoPort for Box<P> {
    fn request_integer(&mut self, stop: &StopHandle) -> Result<i64, PortError> {
        (**self).request_integer(stop)
    }
    fn emit(&mut self, value: i64) {
        (**self).emit(value)
    }
}

/// Cooperative stop flag shared between a running machine and its controller.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Parse an operator answer. Surrounding whitespace is ignored; anything
/// else that is not a base-10 `i64` is rejected.
pub fn parse_answer(raw: &str) -> Result<i64, PortError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PortError::InvalidInput(raw.trim().to_string()))
}
