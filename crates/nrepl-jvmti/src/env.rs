//! JvmtiEnv — MachineInterface backed by a real `jvmtiEnv*`

use crate::capabilities::Capabilities;
use crate::error::{EnvError, JvmtiError};
use crate::handle::{Cause, ThreadRef};
use crate::interface::{MachineInterface, ThreadInfo};
use crate::sys::{JvmtiInterface, JvmtiThreadInfo, RawEnv};
use crate::version::JvmtiVersion;
use jni_sys::{JavaVM, JNI_EVERSION, JNI_ERR, JNI_OK};
use std::ffi::CStr;
use std::os::raw::{c_uchar, c_void};
use std::ptr;

/// Handle to a JVMTI environment obtained from a `JavaVM`.
pub struct JvmtiEnv {
    raw: *mut RawEnv,
    version: JvmtiVersion,
}

// JVMTI environments may be used from any thread attached to the VM. The
// handle itself is immutable after construction.
unsafe impl Send for JvmtiEnv {}
unsafe impl Sync for JvmtiEnv {}

impl JvmtiEnv {
    /// Request a JVMTI environment of the given version through
    /// `JavaVM->GetEnv`.
    ///
    /// # Safety
    /// `vm` must be null or point to a live `JavaVM` whose function table
    /// outlives the returned environment.
    pub unsafe fn from_vm(vm: *mut JavaVM, version: JvmtiVersion) -> Result<Self, EnvError> {
        if vm.is_null() || (*vm).is_null() {
            return Err(EnvError::NullVm);
        }

        let get_env = (**vm).GetEnv.ok_or(EnvError::Refused {
            version,
            status: JNI_ERR,
        })?;

        let mut env: *mut c_void = ptr::null_mut();
        match get_env(vm, &mut env, version.raw()) {
            JNI_OK if !env.is_null() => Ok(JvmtiEnv {
                raw: env as *mut RawEnv,
                version,
            }),
            JNI_EVERSION => Err(EnvError::Unsupported { version }),
            status => Err(EnvError::Refused { version, status }),
        }
    }

    /// Wrap an environment pointer obtained elsewhere.
    ///
    /// # Safety
    /// `raw` must be null or a valid `jvmtiEnv*` for the lifetime of the
    /// returned value.
    pub unsafe fn from_raw(raw: *mut RawEnv, version: JvmtiVersion) -> Option<Self> {
        if raw.is_null() || (*raw).is_null() {
            None
        } else {
            Some(JvmtiEnv { raw, version })
        }
    }

    /// Version this environment was requested with
    pub fn version(&self) -> JvmtiVersion {
        self.version
    }

    pub fn as_raw(&self) -> *mut RawEnv {
        self.raw
    }

    fn functions(&self) -> &JvmtiInterface {
        // Non-null checked at construction
        unsafe { &**self.raw }
    }
}

impl MachineInterface for JvmtiEnv {
    fn add_capabilities(&self, capabilities: &Capabilities) -> Result<(), JvmtiError> {
        let add = self
            .functions()
            .add_capabilities
            .ok_or(JvmtiError::NOT_AVAILABLE)?;
        JvmtiError::check(unsafe { add(self.raw, capabilities.as_raw()) })
    }

    fn thread_info(&self, thread: ThreadRef) -> Result<ThreadInfo, JvmtiError> {
        let functions = self.functions();
        let get_info = functions.get_thread_info.ok_or(JvmtiError::NOT_AVAILABLE)?;

        let mut raw_info = JvmtiThreadInfo::empty();
        JvmtiError::check(unsafe { get_info(self.raw, thread.as_raw(), &mut raw_info) })?;

        let name = if raw_info.name.is_null() {
            String::new()
        } else {
            let name = unsafe { CStr::from_ptr(raw_info.name) }
                .to_string_lossy()
                .into_owned();
            if let Some(deallocate) = functions.deallocate {
                // The name is already copied; a failed release only leaks it.
                let _ = unsafe { deallocate(self.raw, raw_info.name as *mut c_uchar) };
            }
            name
        };

        Ok(ThreadInfo {
            name,
            priority: raw_info.priority,
            is_daemon: raw_info.is_daemon != 0,
        })
    }

    fn stop_thread(&self, thread: ThreadRef, cause: Cause) -> Result<(), JvmtiError> {
        let stop = self.functions().stop_thread.ok_or(JvmtiError::NOT_AVAILABLE)?;
        JvmtiError::check(unsafe { stop(self.raw, thread.as_raw(), cause.as_raw()) })
    }
}

impl std::fmt::Debug for JvmtiEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JvmtiEnv")
            .field("raw", &self.raw)
            .field("version", &self.version)
            .finish()
    }
}
