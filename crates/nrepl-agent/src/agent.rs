//! Attach sequence and the thread-stop operation
//!
//! `Agent` owns the machine interface obtained at attach plus the diagnostic
//! sink. It holds no other state: every `stop_thread` call is independent.

use crate::diagnostics::Diagnostics;
use crate::error::AgentError;
use crate::options::AgentOptions;
use nrepl_jvmti::{Capabilities, Cause, EnvError, JvmtiVersion, MachineInterface, ThreadRef};

/// JVMTI version requested from `GetEnv`
pub const REQUIRED_VERSION: JvmtiVersion = JvmtiVersion::V1_2;

/// An attached agent: the machine interface from attach, the diagnostic sink
/// and the parsed options.
pub struct Agent<M, D> {
    machine: M,
    diagnostics: D,
    options: AgentOptions,
}

impl<M: MachineInterface, D: Diagnostics> Agent<M, D> {
    /// Run the attach sequence.
    ///
    /// `acquire` is handed [`REQUIRED_VERSION`] and must produce the machine
    /// interface. Its failure is the only fatal outcome; a refused capability
    /// request is reported and the agent is returned anyway.
    pub fn attach<F>(acquire: F, options: AgentOptions, diagnostics: D) -> Result<Self, AgentError>
    where
        F: FnOnce(JvmtiVersion) -> Result<M, EnvError>,
    {
        if !options.quiet {
            diagnostics.info("nREPL native agent loaded");
        }
        for token in &options.unknown {
            diagnostics.warn(&format!("Ignoring unknown agent option `{}`", token));
        }

        let machine = match acquire(REQUIRED_VERSION) {
            Ok(machine) => machine,
            Err(e) => {
                let err = AgentError::from(e);
                diagnostics.error(&err.to_string());
                return Err(err);
            }
        };

        let agent = Agent {
            machine,
            diagnostics,
            options,
        };
        if agent.options.verbose {
            agent
                .diagnostics
                .info(&format!("Using {}", REQUIRED_VERSION));
        }

        match agent.request_capabilities() {
            Ok(()) => {
                if agent.options.verbose {
                    agent.diagnostics.info("Requested can_signal_thread capability");
                }
            }
            Err(err) => agent.diagnostics.warn(&err.to_string()),
        }

        Ok(agent)
    }

    fn request_capabilities(&self) -> Result<(), AgentError> {
        self.machine
            .add_capabilities(&Capabilities::signal_thread())
            .map_err(AgentError::Capabilities)
    }

    /// Ask the VM to raise `cause` in `thread`.
    ///
    /// Announces the stop before submitting it. Never blocks on the target
    /// thread; success only means the request was accepted.
    pub fn try_stop_thread(&self, thread: ThreadRef, cause: Cause) -> Result<(), AgentError> {
        let info = self
            .machine
            .thread_info(thread)
            .map_err(AgentError::ThreadInfo)?;

        self.diagnostics
            .info(&format!("Stopping thread \"{}\" using JVMTI...", info.name));

        self.machine
            .stop_thread(thread, cause)
            .map_err(AgentError::StopThread)
    }

    /// Fire-and-forget variant of [`Agent::try_stop_thread`]: failures are
    /// written as a single error line and dropped.
    pub fn stop_thread(&self, thread: ThreadRef, cause: Cause) {
        if let Err(err) = self.try_stop_thread(thread, cause) {
            self.diagnostics.error(&err.to_string());
        }
    }

    /// The machine interface obtained at attach
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Where this agent writes its lines
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}
