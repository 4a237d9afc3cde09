//! Capability sets
//!
//! `jvmtiCapabilities` is a C struct of one-bit fields. Bit numbering below is
//! the field's declaration order in `jvmti.h`; the compiler packs fields from
//! the least significant bit on little-endian targets and from the most
//! significant bit on big-endian ones.

use crate::sys::JvmtiCapabilities;

/// Declaration index of `can_signal_thread`
const CAN_SIGNAL_THREAD: usize = 10;

fn locate(index: usize) -> (usize, u32) {
    let word = index / 32;
    let bit = index % 32;
    let shift = if cfg!(target_endian = "little") {
        bit
    } else {
        31 - bit
    };
    (word, 1u32 << shift)
}

/// A set of optional JVMTI features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    raw: JvmtiCapabilities,
}

impl Capabilities {
    /// The empty set
    pub fn none() -> Self {
        Self::default()
    }

    /// The set the agent requests at attach: signalling (stopping and
    /// interrupting) other threads.
    pub fn signal_thread() -> Self {
        Self::none().with_signal_thread()
    }

    /// Add `can_signal_thread`
    pub fn with_signal_thread(mut self) -> Self {
        self.set(CAN_SIGNAL_THREAD);
        self
    }

    /// Whether `can_signal_thread` is present
    pub fn can_signal_thread(&self) -> bool {
        self.get(CAN_SIGNAL_THREAD)
    }

    /// Whether no capability bit is set
    pub fn is_empty(&self) -> bool {
        self.raw.words.iter().all(|w| *w == 0)
    }

    /// Wrap a raw struct, e.g. one received by a fake `AddCapabilities`
    pub fn from_raw(raw: JvmtiCapabilities) -> Self {
        Capabilities { raw }
    }

    /// Borrow the raw struct for `AddCapabilities`
    pub fn as_raw(&self) -> &JvmtiCapabilities {
        &self.raw
    }

    fn set(&mut self, index: usize) {
        let (word, mask) = locate(index);
        self.raw.words[word] |= mask;
    }

    fn get(&self, index: usize) -> bool {
        let (word, mask) = locate(index);
        self.raw.words[word] & mask != 0
    }
}
