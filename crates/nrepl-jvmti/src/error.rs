//! Error types for JVMTI calls

use crate::sys::{RawJvmtiError, JVMTI_ERROR_NONE};
use crate::version::JvmtiVersion;
use jni_sys::jint;

/// A non-zero `jvmtiError` returned by a JVMTI function.
///
/// Displays as `<code> (JVMTI_ERROR_<NAME>)`, or the bare code when the name
/// is not known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{}", describe(.0))]
pub struct JvmtiError(RawJvmtiError);

impl JvmtiError {
    /// `JVMTI_ERROR_INVALID_THREAD`
    pub const INVALID_THREAD: JvmtiError = JvmtiError(10);
    /// `JVMTI_ERROR_THREAD_NOT_ALIVE`
    pub const THREAD_NOT_ALIVE: JvmtiError = JvmtiError(15);
    /// `JVMTI_ERROR_INVALID_OBJECT`
    pub const INVALID_OBJECT: JvmtiError = JvmtiError(20);
    /// `JVMTI_ERROR_OPAQUE_FRAME`
    pub const OPAQUE_FRAME: JvmtiError = JvmtiError(32);
    /// `JVMTI_ERROR_UNSUPPORTED_OPERATION`
    pub const UNSUPPORTED_OPERATION: JvmtiError = JvmtiError(73);
    /// `JVMTI_ERROR_NOT_AVAILABLE`
    pub const NOT_AVAILABLE: JvmtiError = JvmtiError(98);
    /// `JVMTI_ERROR_MUST_POSSESS_CAPABILITY`
    pub const MUST_POSSESS_CAPABILITY: JvmtiError = JvmtiError(99);
    /// `JVMTI_ERROR_NULL_POINTER`
    pub const NULL_POINTER: JvmtiError = JvmtiError(100);
    /// `JVMTI_ERROR_WRONG_PHASE`
    pub const WRONG_PHASE: JvmtiError = JvmtiError(112);

    /// Wrap a raw code. Returns `None` for `JVMTI_ERROR_NONE`.
    pub fn from_raw(code: RawJvmtiError) -> Option<Self> {
        if code == JVMTI_ERROR_NONE {
            None
        } else {
            Some(JvmtiError(code))
        }
    }

    /// Turn a raw return code into a `Result`
    pub fn check(code: RawJvmtiError) -> Result<(), JvmtiError> {
        match JvmtiError::from_raw(code) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// Numeric error code
    pub fn code(&self) -> RawJvmtiError {
        self.0
    }

    /// Symbolic name from `jvmti.h`, without the `JVMTI_ERROR_` prefix
    pub fn name(&self) -> Option<&'static str> {
        let name = match self.0 {
            10 => "INVALID_THREAD",
            11 => "INVALID_THREAD_GROUP",
            12 => "INVALID_PRIORITY",
            13 => "THREAD_NOT_SUSPENDED",
            14 => "THREAD_SUSPENDED",
            15 => "THREAD_NOT_ALIVE",
            20 => "INVALID_OBJECT",
            21 => "INVALID_CLASS",
            22 => "CLASS_NOT_PREPARED",
            23 => "INVALID_METHODID",
            24 => "INVALID_LOCATION",
            25 => "INVALID_FIELDID",
            26 => "INVALID_MODULE",
            31 => "NO_MORE_FRAMES",
            32 => "OPAQUE_FRAME",
            34 => "TYPE_MISMATCH",
            35 => "INVALID_SLOT",
            40 => "DUPLICATE",
            41 => "NOT_FOUND",
            50 => "INVALID_MONITOR",
            51 => "NOT_MONITOR_OWNER",
            52 => "INTERRUPT",
            73 => "UNSUPPORTED_OPERATION",
            98 => "NOT_AVAILABLE",
            99 => "MUST_POSSESS_CAPABILITY",
            100 => "NULL_POINTER",
            101 => "ABSENT_INFORMATION",
            102 => "INVALID_EVENT_TYPE",
            103 => "ILLEGAL_ARGUMENT",
            104 => "NATIVE_METHOD",
            106 => "CLASS_LOADER_UNSUPPORTED",
            110 => "OUT_OF_MEMORY",
            111 => "ACCESS_DENIED",
            112 => "WRONG_PHASE",
            113 => "INTERNAL",
            115 => "UNATTACHED_THREAD",
            116 => "INVALID_ENVIRONMENT",
            _ => return None,
        };
        Some(name)
    }
}

fn describe(code: &RawJvmtiError) -> String {
    match JvmtiError(*code).name() {
        Some(name) => format!("{} (JVMTI_ERROR_{})", code, name),
        None => code.to_string(),
    }
}

/// Failure to obtain a JVMTI environment from a `JavaVM`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// The VM handle was null
    #[error("JavaVM handle is null")]
    NullVm,

    /// The VM does not implement the requested interface version
    #[error("{version} is not supported by this VM")]
    Unsupported {
        /// Requested version
        version: JvmtiVersion,
    },

    /// `GetEnv` failed for another reason
    #[error("GetEnv for {version} failed with status {status}")]
    Refused {
        /// Requested version
        version: JvmtiVersion,
        /// JNI status returned by `GetEnv`
        status: jint,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_none_is_ok() {
        assert_eq!(JvmtiError::check(JVMTI_ERROR_NONE), Ok(()));
        assert!(JvmtiError::from_raw(0).is_none());
    }

    #[test]
    fn test_check_error_keeps_code() {
        let err = JvmtiError::check(15).unwrap_err();
        assert_eq!(err, JvmtiError::THREAD_NOT_ALIVE);
        assert_eq!(err.code(), 15);
    }

    #[test]
    fn test_display_known_code() {
        assert_eq!(
            JvmtiError::MUST_POSSESS_CAPABILITY.to_string(),
            "99 (JVMTI_ERROR_MUST_POSSESS_CAPABILITY)"
        );
    }

    #[test]
    fn test_display_unknown_code() {
        let err = JvmtiError::from_raw(4242).unwrap();
        assert_eq!(err.name(), None);
        assert_eq!(err.to_string(), "4242");
    }

    #[test]
    fn test_usable_as_boxed_error() {
        let err: Box<dyn std::error::Error> = Box::new(JvmtiError::OPAQUE_FRAME);
        assert_eq!(err.to_string(), "32 (JVMTI_ERROR_OPAQUE_FRAME)");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_env_error_messages() {
        let err = EnvError::Unsupported {
            version: JvmtiVersion::V1_2,
        };
        assert_eq!(err.to_string(), "JVMTI 1.2.0 is not supported by this VM");

        let err = EnvError::Refused {
            version: JvmtiVersion::V1_2,
            status: -1,
        };
        assert_eq!(err.to_string(), "GetEnv for JVMTI 1.2.0 failed with status -1");
    }
}
