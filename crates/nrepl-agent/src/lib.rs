//! nREPL native agent
//!
//! A JVMTI agent that brings back `Thread.stop()` for JDK 20+. nREPL loads it
//! into its own VM and calls `nrepl.JvmtiAgent.stopThread(Thread, Throwable)`,
//! which binds to the exported `Java_nrepl_JvmtiAgent_stopThread` below.
//!
//! Exported symbols:
//! - `Agent_OnAttach`: dynamic attach into a running VM
//! - `Agent_OnLoad`: `-agentpath:libnrepl.so[=options]` at VM start
//! - `Java_nrepl_JvmtiAgent_stopThread`: the native method
//!
//! Nothing here ever throws into Java. Failures are reported as one line on
//! stderr and the call returns normally.

pub mod agent;
pub mod diagnostics;
pub mod error;
pub mod options;

pub use agent::{Agent, REQUIRED_VERSION};
pub use diagnostics::{Console, Diagnostics, Level, Recorder};
pub use error::AgentError;
pub use options::AgentOptions;

use jni_sys::{jclass, jint, jobject, jthrowable, JNIEnv, JavaVM, JNI_ERR, JNI_OK};
use nrepl_jvmti::{Cause, JvmtiEnv, MachineInterface, ThreadRef};
use once_cell::sync::OnceCell;
use std::os::raw::{c_char, c_void};
use std::panic::{self, AssertUnwindSafe};

// ============================================================================
// Process-wide State
// ============================================================================

/// Set once by the first successful attach, read by every native call.
static AGENT: OnceCell<Agent<JvmtiEnv, Console>> = OnceCell::new();

/// Whether an attach has succeeded in this process
pub fn is_attached() -> bool {
    AGENT.get().is_some()
}

/// Run the attach sequence unless it already succeeded.
///
/// Concurrent callers block until the first one finishes, so capabilities are
/// requested exactly once. A failed attach leaves the slot empty and may be
/// retried.
unsafe fn install(vm: *mut JavaVM, options: *const c_char) -> jint {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        AGENT
            .get_or_try_init(|| {
                let options = unsafe { AgentOptions::from_c_str(options) };
                Agent::attach(
                    |version| unsafe { JvmtiEnv::from_vm(vm, version) },
                    options,
                    Console::stdio(),
                )
            })
            .map(|_| ())
    }));

    match outcome {
        Ok(Ok(())) => JNI_OK,
        // Already reported by the attach sequence
        Ok(Err(_)) => JNI_ERR,
        Err(payload) => {
            Console::stdio().error(&AgentError::from_panic(payload).to_string());
            JNI_ERR
        }
    }
}

// ============================================================================
// Agent Entry Points
// ============================================================================

/// Called by the VM when the agent is attached to a running process.
///
/// # Returns
/// * `JNI_OK` once a JVMTI environment is held
/// * `JNI_ERR` if the VM refused the requested JVMTI version
///
/// # Safety
/// Must only be called by the VM, with a valid `JavaVM` and a null or
/// NUL-terminated options string.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnAttach(
    vm: *mut JavaVM,
    options: *mut c_char,
    _reserved: *mut c_void,
) -> jint {
    install(vm, options)
}

/// Called by the VM when the agent is loaded with `-agentpath` at startup.
/// Same sequence and status codes as [`Agent_OnAttach`].
///
/// # Safety
/// Same as [`Agent_OnAttach`].
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Agent_OnLoad(
    vm: *mut JavaVM,
    options: *mut c_char,
    _reserved: *mut c_void,
) -> jint {
    install(vm, options)
}

// ============================================================================
// Native Methods
// ============================================================================

/// `static native void nrepl.JvmtiAgent.stopThread(Thread, Throwable)`
///
/// Asks the VM to throw `throwable` in `thread` at its next safepoint. Returns
/// without waiting for the thread to die and without raising anything in the
/// caller, whatever happens.
///
/// # Safety
/// Must only be called by the VM through the JNI native method binding.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Java_nrepl_JvmtiAgent_stopThread(
    _env: *mut JNIEnv,
    _class: jclass,
    thread: jobject,
    throwable: jthrowable,
) {
    dispatch_stop(
        AGENT.get(),
        &Console::stdio(),
        ThreadRef::from_raw(thread),
        Cause::from_raw(throwable),
    );
}

/// Body of the native method, minus the process-wide slot.
///
/// Failures the agent cannot report itself (no agent, a panic) go to
/// `fallback` as one error line.
fn dispatch_stop<M, D, F>(agent: Option<&Agent<M, D>>, fallback: &F, thread: ThreadRef, cause: Cause)
where
    M: MachineInterface,
    D: Diagnostics,
    F: Diagnostics,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match agent {
        Some(agent) => {
            agent.stop_thread(thread, cause);
            Ok(())
        }
        None => Err(AgentError::NotAttached),
    }));

    let err = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(err)) => err,
        Err(payload) => AgentError::from_panic(payload),
    };
    fallback.error(&err.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrepl_jvmti::{Capabilities, JvmtiError, ThreadInfo};
    use parking_lot::Mutex;

    /// Records every call it receives; `thread_info` panics if asked to
    #[derive(Default)]
    struct CountingMachine {
        calls: Mutex<Vec<&'static str>>,
        panic_on_lookup: bool,
    }

    impl MachineInterface for CountingMachine {
        fn add_capabilities(&self, _capabilities: &Capabilities) -> Result<(), JvmtiError> {
            self.calls.lock().push("add_capabilities");
            Ok(())
        }

        fn thread_info(&self, _thread: ThreadRef) -> Result<ThreadInfo, JvmtiError> {
            self.calls.lock().push("thread_info");
            if self.panic_on_lookup {
                panic!("thread table corrupted");
            }
            Ok(ThreadInfo {
                name: "worker-1".to_string(),
                priority: 5,
                is_daemon: false,
            })
        }

        fn stop_thread(&self, _thread: ThreadRef, _cause: Cause) -> Result<(), JvmtiError> {
            self.calls.lock().push("stop_thread");
            Ok(())
        }
    }

    fn thread() -> ThreadRef {
        ThreadRef::from_raw(0x1000 as jobject)
    }

    fn cause() -> Cause {
        Cause::from_raw(0x9000 as jobject)
    }

    #[test]
    fn test_stop_without_agent_reports_not_attached_once() {
        let fallback = Recorder::new();

        dispatch_stop::<CountingMachine, Recorder, _>(None, &fallback, thread(), cause());

        assert_eq!(
            fallback.lines(),
            vec![(
                Level::Error,
                "nREPL native agent is not attached; cannot stop thread".to_string()
            )]
        );
    }

    #[test]
    fn test_stop_with_agent_leaves_fallback_silent() {
        let agent = Agent::attach(
            |_| Ok(CountingMachine::default()),
            AgentOptions::parse("quiet"),
            Recorder::new(),
        )
        .unwrap();
        let fallback = Recorder::new();

        dispatch_stop(Some(&agent), &fallback, thread(), cause());

        assert!(fallback.lines().is_empty());
        assert_eq!(
            *agent.machine().calls.lock(),
            vec!["add_capabilities", "thread_info", "stop_thread"]
        );
    }

    #[test]
    fn test_panic_in_stop_is_reported_once() {
        let machine = CountingMachine {
            panic_on_lookup: true,
            ..Default::default()
        };
        let agent =
            Agent::attach(|_| Ok(machine), AgentOptions::parse("quiet"), Recorder::new()).unwrap();
        let fallback = Recorder::new();

        dispatch_stop(Some(&agent), &fallback, thread(), cause());

        let errors = fallback.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("thread table corrupted"));
        assert!(agent.diagnostics().lines().is_empty());
        assert_eq!(*agent.machine().calls.lock(), vec!["add_capabilities", "thread_info"]);
    }
}
