//! JVMTI interface version words

use crate::sys::JVMTI_VERSION_1_2;
use jni_sys::jint;
use std::fmt;

const MAJOR_MASK: jint = 0x0FFF_0000;
const MAJOR_SHIFT: u32 = 16;
const MINOR_MASK: jint = 0x0000_FF00;
const MINOR_SHIFT: u32 = 8;
const MICRO_MASK: jint = 0x0000_00FF;

/// A version word as passed to `JavaVM->GetEnv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JvmtiVersion(jint);

impl JvmtiVersion {
    /// `JVMTI_VERSION_1_2`, the version the agent requests
    pub const V1_2: JvmtiVersion = JvmtiVersion(JVMTI_VERSION_1_2);

    /// Wrap a raw version word
    pub const fn from_raw(raw: jint) -> Self {
        JvmtiVersion(raw)
    }

    /// Raw version word
    pub const fn raw(&self) -> jint {
        self.0
    }

    /// Major version, e.g. 1 for 1.2 or 21 for JDK 21
    pub fn major(&self) -> u32 {
        ((self.0 & MAJOR_MASK) >> MAJOR_SHIFT) as u32
    }

    /// Minor version
    pub fn minor(&self) -> u32 {
        ((self.0 & MINOR_MASK) >> MINOR_SHIFT) as u32
    }

    /// Micro version
    pub fn micro(&self) -> u32 {
        (self.0 & MICRO_MASK) as u32
    }
}

impl fmt::Display for JvmtiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JVMTI {}.{}.{}", self.major(), self.minor(), self.micro())
    }
}
