//! Typed wrappers for the opaque references the agent forwards
//!
//! Neither type owns the reference it wraps. Both are JNI local references
//! handed to a native method and stay valid only until that call returns.

use crate::sys::JThread;
use jni_sys::jobject;

/// Reference to a `java.lang.Thread`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRef(JThread);

impl ThreadRef {
    /// Wrap the `thread` argument of a native method
    pub fn from_raw(raw: JThread) -> Self {
        ThreadRef(raw)
    }

    /// The reference as passed to JVMTI
    pub fn as_raw(&self) -> JThread {
        self.0
    }
}

/// Reference to the `Throwable` raised in a stopped thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cause(jobject);

impl Cause {
    /// Wrap the `throwable` argument of a native method
    pub fn from_raw(raw: jobject) -> Self {
        Cause(raw)
    }

    /// The reference as passed to `StopThread`
    pub fn as_raw(&self) -> jobject {
        self.0
    }
}
