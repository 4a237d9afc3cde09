//! Exported entry points against a fake VM that only knows an older JVMTI

use jni_sys::{jint, jobject, JNIInvokeInterface_, JavaVM, JNI_EVERSION, JNI_OK};
use nrepl::{is_attached, Agent_OnAttach, Java_nrepl_JvmtiAgent_stopThread};
use std::os::raw::c_void;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

static GET_ENV_CALLS: AtomicUsize = AtomicUsize::new(0);

unsafe extern "system" fn get_env(_vm: *mut JavaVM, penv: *mut *mut c_void, _version: jint) -> jint {
    GET_ENV_CALLS.fetch_add(1, Ordering::SeqCst);
    *penv = ptr::null_mut();
    JNI_EVERSION
}

fn fake_vm() -> *mut JavaVM {
    let invoke: &'static JNIInvokeInterface_ = Box::leak(Box::new(JNIInvokeInterface_ {
        reserved0: ptr::null_mut(),
        reserved1: ptr::null_mut(),
        reserved2: ptr::null_mut(),
        DestroyJavaVM: None,
        AttachCurrentThread: None,
        DetachCurrentThread: None,
        GetEnv: Some(get_env),
        AttachCurrentThreadAsDaemon: None,
    }));
    Box::leak(Box::new(invoke as JavaVM))
}

#[test]
fn test_unsupported_version_leaves_agent_unusable() {
    let status = unsafe { Agent_OnAttach(fake_vm(), ptr::null_mut(), ptr::null_mut()) };
    assert_ne!(status, JNI_OK);
    assert!(!is_attached());

    // Must return without touching a handle
    unsafe {
        Java_nrepl_JvmtiAgent_stopThread(
            ptr::null_mut(),
            ptr::null_mut(),
            0x1000 as jobject,
            0x9000 as jobject,
        );
    }

    // A later attach is attempted again rather than cached as failed
    let status = unsafe { Agent_OnAttach(fake_vm(), ptr::null_mut(), ptr::null_mut()) };
    assert_ne!(status, JNI_OK);
    assert_eq!(GET_ENV_CALLS.load(Ordering::SeqCst), 2);
    assert!(!is_attached());
}

#[test]
fn test_null_vm_is_rejected() {
    let status = unsafe { Agent_OnAttach(ptr::null_mut(), ptr::null_mut(), ptr::null_mut()) };
    assert_ne!(status, JNI_OK);
    assert!(!is_attached());
}
