//! nrepl-jvmti - minimal JVMTI bindings for the nREPL native agent
//!
//! This crate declares the small slice of the JVM Tool Interface the agent
//! uses and wraps it behind [`MachineInterface`]:
//!
//! - [`sys`]: raw `#[repr(C)]` layouts and constants from `jvmti.h`
//! - [`JvmtiEnv`]: a live environment obtained from `JavaVM->GetEnv`
//! - [`ThreadRef`] / [`Cause`]: the opaque references the agent forwards
//! - [`Capabilities`]: the `jvmtiCapabilities` bitfield
//!
//! JNI types themselves come from `jni-sys`.
//!
//! # Example
//!
//! ```ignore
//! use nrepl_jvmti::{Capabilities, JvmtiEnv, JvmtiVersion, MachineInterface};
//!
//! let env = unsafe { JvmtiEnv::from_vm(vm, JvmtiVersion::V1_2)? };
//! env.add_capabilities(&Capabilities::signal_thread())?;
//! let info = env.thread_info(thread)?;
//! env.stop_thread(thread, cause)?;
//! ```

pub mod capabilities;
pub mod env;
pub mod error;
pub mod handle;
pub mod interface;
pub mod sys;
pub mod version;

pub use capabilities::Capabilities;
pub use env::JvmtiEnv;
pub use error::{EnvError, JvmtiError};
pub use handle::{Cause, ThreadRef};
pub use interface::{MachineInterface, ThreadInfo};
pub use version::JvmtiVersion;
