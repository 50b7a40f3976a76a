use std::fs;
use std::path::{Path, PathBuf};

use crate::common::Pid;
use crate::debugger::{Component, Logger, null_logger};
use crate::process::{ProcessInfo, source::ProcessSource};
use crate::vm_warn;

/// Reads live processes from a Linux `/proc` tree.
///
/// Unreadable or vanished entries are skipped with a warning. Kernel threads
/// have no `VmRSS` line and report 0 KB.
#[derive(Clone)]
pub struct ProcfsSource {
    root: PathBuf,
    logger: Logger,
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcfsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logger: null_logger(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    fn read(&self, dir: &Path, pid: Pid) -> Option<ProcessInfo> {
        let status = fs::read_to_string(dir.join("status")).ok()?;
        let name = match fs::read_to_string(dir.join("comm")) {
            Ok(comm) => comm.trim().to_string(),
            Err(_) => field(&status, "Name")?.to_string(),
        };
        let memory_kb = field(&status, "VmRSS")
            .and_then(|v| v.split_whitespace().next())
            .and_then(|kb| kb.parse().ok())
            .unwrap_or(0);
        Some(ProcessInfo {
            pid,
            name,
            memory_kb,
        })
    }
}

fn field<'a>(status: &'a str, key: &str) -> Option<&'a str> {
    status.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        (k == key).then(|| v.trim())
    })
}

impl ProcessSource for ProcfsSource {
    fn lookup(&self, pid: Pid) -> Option<ProcessInfo> {
        self.read(&self.root.join(pid.to_string()), pid)
    }

    fn list(&self) -> Vec<ProcessInfo> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut out: Vec<ProcessInfo> = entries
            .filter_map(Result::ok)
            .filter_map(|e| {
                let pid: Pid = e.file_name().to_str()?.parse().ok()?;
                let info = self.read(&e.path(), pid);
                if info.is_none() {
                    vm_warn!(self.logger, Component::Process, "skipping unreadable entry {}", pid);
                }
                info
            })
            .collect();
        out.sort_by_key(|p| p.pid);
        out
    }
}
