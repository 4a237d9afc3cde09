//! Raw JVMTI ABI declarations
//!
//! Only the parts of `jvmti.h` that the agent calls are spelled out. The
//! function table keeps every entry at its documented slot number; slots the
//! agent never calls are opaque pointers so the layout still lines up.

use jni_sys::{jboolean, jint, jobject};
use std::os::raw::{c_char, c_uchar, c_void};
use std::ptr;

/// `jthread` is a plain object reference in the JNI type system
pub type JThread = jobject;

/// Raw `jvmtiError` return code
pub type RawJvmtiError = u32;

/// `jvmtiEnv`: a pointer to the function table
pub type RawEnv = *const JvmtiInterface;

/// `JVMTI_VERSION_1_2`
pub const JVMTI_VERSION_1_2: jint = 0x3001_0200;

/// `JVMTI_ERROR_NONE`
pub const JVMTI_ERROR_NONE: RawJvmtiError = 0;

// ============================================================================
// Function Table
// ============================================================================

/// Slot 7: `StopThread(env, thread, exception)`
pub type StopThreadFn =
    unsafe extern "system" fn(env: *mut RawEnv, thread: JThread, exception: jobject) -> RawJvmtiError;

/// Slot 9: `GetThreadInfo(env, thread, info_ptr)`
pub type GetThreadInfoFn = unsafe extern "system" fn(
    env: *mut RawEnv,
    thread: JThread,
    info_ptr: *mut JvmtiThreadInfo,
) -> RawJvmtiError;

/// Slot 47: `Deallocate(env, mem)`
pub type DeallocateFn = unsafe extern "system" fn(env: *mut RawEnv, mem: *mut c_uchar) -> RawJvmtiError;

/// Slot 142: `AddCapabilities(env, capabilities_ptr)`
pub type AddCapabilitiesFn = unsafe extern "system" fn(
    env: *mut RawEnv,
    capabilities_ptr: *const JvmtiCapabilities,
) -> RawJvmtiError;

/// Prefix of `jvmtiInterface_1`, up to and including `AddCapabilities`.
///
/// The real table is longer; the agent only ever reads through a pointer
/// handed out by the VM, so the missing tail is never touched.
#[repr(C)]
pub struct JvmtiInterface {
    _slots_1_to_6: [*const c_void; 6],
    /// Slot 7
    pub stop_thread: Option<StopThreadFn>,
    _slot_8: *const c_void,
    /// Slot 9
    pub get_thread_info: Option<GetThreadInfoFn>,
    _slots_10_to_46: [*const c_void; 37],
    /// Slot 47
    pub deallocate: Option<DeallocateFn>,
    _slots_48_to_141: [*const c_void; 94],
    /// Slot 142
    pub add_capabilities: Option<AddCapabilitiesFn>,
}

impl JvmtiInterface {
    /// A table with every slot empty. Used to assemble in-process fakes.
    pub fn empty() -> Self {
        JvmtiInterface {
            _slots_1_to_6: [ptr::null(); 6],
            stop_thread: None,
            _slot_8: ptr::null(),
            get_thread_info: None,
            _slots_10_to_46: [ptr::null(); 37],
            deallocate: None,
            _slots_48_to_141: [ptr::null(); 94],
            add_capabilities: None,
        }
    }
}

// ============================================================================
// Structures
// ============================================================================

/// `jvmtiThreadInfo`
#[repr(C)]
pub struct JvmtiThreadInfo {
    /// Modified UTF-8 name, allocated by the VM; release with `Deallocate`
    pub name: *mut c_char,
    /// Thread priority
    pub priority: jint,
    /// Non-zero for daemon threads
    pub is_daemon: jboolean,
    /// Local reference to the thread group
    pub thread_group: jobject,
    /// Local reference to the context class loader
    pub context_class_loader: jobject,
}

impl JvmtiThreadInfo {
    /// Zeroed out-parameter for `GetThreadInfo`
    pub fn empty() -> Self {
        JvmtiThreadInfo {
            name: ptr::null_mut(),
            priority: 0,
            is_daemon: 0,
            thread_group: ptr::null_mut(),
            context_class_loader: ptr::null_mut(),
        }
    }
}

/// `jvmtiCapabilities`: 128 one-bit fields packed into four words
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JvmtiCapabilities {
    /// Raw bitfield storage
    pub words: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    const SLOT: usize = size_of::<*const c_void>();

    #[test]
    fn test_table_slot_offsets() {
        // Slot numbers in jvmti.h are 1-based.
        assert_eq!(offset_of!(JvmtiInterface, stop_thread), 6 * SLOT);
        assert_eq!(offset_of!(JvmtiInterface, get_thread_info), 8 * SLOT);
        assert_eq!(offset_of!(JvmtiInterface, deallocate), 46 * SLOT);
        assert_eq!(offset_of!(JvmtiInterface, add_capabilities), 141 * SLOT);
    }

    #[test]
    fn test_capabilities_size() {
        assert_eq!(size_of::<JvmtiCapabilities>(), 16);
    }

    #[test]
    fn test_empty_table_has_no_functions() {
        let table = JvmtiInterface::empty();
        assert!(table.stop_thread.is_none());
        assert!(table.get_thread_info.is_none());
        assert!(table.deallocate.is_none());
        assert!(table.add_capabilities.is_none());
    }
}
