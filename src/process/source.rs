use std::collections::BTreeMap;

use crate::common::Pid;
use crate::process::ProcessInfo;

/// Supplies process data on demand. The memory manager never calls this;
/// front ends do, and hand the result to `register_process`.
pub trait ProcessSource: Send + Sync {
    fn lookup(&self, pid: Pid) -> Option<ProcessInfo>;

    fn list(&self) -> Vec<ProcessInfo>;

    /// Case-insensitive substring match on the process name.
    fn find_by_name(&self, needle: &str) -> Vec<ProcessInfo> {
        let needle = needle.to_lowercase();
        self.list()
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Fixed, in-memory process table.
#[derive(Debug, Default, Clone)]
pub struct StaticProcessSource {
    processes: BTreeMap<Pid, ProcessInfo>,
}

impl StaticProcessSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, info: ProcessInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn insert(&mut self, info: ProcessInfo) {
        self.processes.insert(info.pid, info);
    }
}

impl ProcessSource for StaticProcessSource {
    fn lookup(&self, pid: Pid) -> Option<ProcessInfo> {
        self.processes.get(&pid).cloned()
    }

    fn list(&self) -> Vec<ProcessInfo> {
        self.processes.values().cloned().collect()
    }
}
