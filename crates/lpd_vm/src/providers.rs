//! Ready-made [`crate::IoPort`] implementations.

pub mod channel;
pub mod scripted;
pub mod stdio;

pub use channel::{ChannelPort, PortHandle};
pub use scripted::ScriptedPort;
pub use stdio::StdioPort;
