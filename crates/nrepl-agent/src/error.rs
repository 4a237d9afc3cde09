//! Agent error taxonomy
//!
//! None of these reach managed code. Attach failures become a JNI status
//! code; everything else becomes one diagnostic line.

use nrepl_jvmti::{EnvError, JvmtiError};

/// Everything that can go wrong between attach and a submitted stop
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// `GetEnv` refused the requested JVMTI version. Fatal to attach.
    #[error("Failed to get JVMTI environment: {0}")]
    EnvUnavailable(#[from] EnvError),

    /// `AddCapabilities` failed. Reported, attach continues.
    #[error("Failed to add JVMTI capabilities: {0}")]
    Capabilities(JvmtiError),

    /// `GetThreadInfo` failed; the stop was not submitted.
    #[error("Error getting thread info: {0}")]
    ThreadInfo(JvmtiError),

    /// `StopThread` rejected the request.
    #[error("Error stopping thread: {0}")]
    StopThread(JvmtiError),

    /// The native method ran before any attach succeeded.
    #[error("nREPL native agent is not attached; cannot stop thread")]
    NotAttached,

    /// A panic caught at an exported function
    #[error("nREPL native agent panicked: {0}")]
    Panic(String),
}

impl AgentError {
    /// Build a `Panic` error from a `catch_unwind` payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        AgentError::Panic(msg)
    }
}
