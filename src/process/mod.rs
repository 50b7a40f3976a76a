pub mod procfs;
pub mod source;

pub use procfs::ProcfsSource;
pub use source::{ProcessSource, StaticProcessSource};

use crate::common::Pid;

/// What a process source knows about a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    /// Resident set size.
    pub memory_kb: u64,
}

impl ProcessInfo {
    pub fn new(pid: Pid, name: impl Into<String>, memory_kb: u64) -> Self {
        Self {
            pid,
            name: name.into(),
            memory_kb,
        }
    }
}
