//! Agent options
//!
//! Parsed from the string after `=` in `-agentpath:libnrepl.so=<options>`,
//! or the options argument of a dynamic attach. Tokens are comma-separated;
//! unknown tokens are kept so the agent can report them.

use std::ffi::CStr;
use std::os::raw::c_char;

/// Parsed agent options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentOptions {
    /// Suppress the load announcement. Stop announcements are always written.
    pub quiet: bool,
    /// Also report the negotiated version and capability outcome
    pub verbose: bool,
    /// Tokens that were not recognized, in order of appearance
    pub unknown: Vec<String>,
}

impl AgentOptions {
    /// Parse a comma-separated options string. Never fails.
    pub fn parse(options: &str) -> Self {
        let mut parsed = AgentOptions::default();
        for token in options.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token {
                "quiet" => parsed.quiet = true,
                "verbose" => parsed.verbose = true,
                other => parsed.unknown.push(other.to_string()),
            }
        }
        parsed
    }

    /// Parse the options pointer handed to `Agent_OnAttach` / `Agent_OnLoad`.
    ///
    /// # Safety
    /// `options` must be null or a valid NUL-terminated string.
    pub unsafe fn from_c_str(options: *const c_char) -> Self {
        if options.is_null() {
            return AgentOptions::default();
        }
        AgentOptions::parse(&CStr::from_ptr(options).to_string_lossy())
    }
}
