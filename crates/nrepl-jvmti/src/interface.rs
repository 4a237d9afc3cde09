//! MachineInterface trait — the JVMTI operations the agent needs
//!
//! The agent programs against this trait instead of the raw function table.
//! `JvmtiEnv` is the implementation backed by a live VM; tests provide their
//! own.

use crate::capabilities::Capabilities;
use crate::error::JvmtiError;
use crate::handle::{Cause, ThreadRef};

/// Metadata resolved for a thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    /// Thread name
    pub name: String,
    /// Java priority (1..=10)
    pub priority: i32,
    /// Whether the thread is a daemon thread
    pub is_daemon: bool,
}

/// Control surface of a JVMTI environment.
pub trait MachineInterface {
    /// `AddCapabilities`: ask the VM to enable optional features for this
    /// environment.
    fn add_capabilities(&self, capabilities: &Capabilities) -> Result<(), JvmtiError>;

    /// `GetThreadInfo`: resolve a thread reference to its metadata.
    fn thread_info(&self, thread: ThreadRef) -> Result<ThreadInfo, JvmtiError>;

    /// `StopThread`: ask the VM to raise `cause` in `thread`.
    ///
    /// Returns once the request is queued. The target unwinds later, at a
    /// point of the VM's choosing; nothing reports back when it does.
    fn stop_thread(&self, thread: ThreadRef, cause: Cause) -> Result<(), JvmtiError>;
}
