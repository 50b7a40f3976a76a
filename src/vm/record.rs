use std::collections::VecDeque;

use crate::common::{PageNumber, Pid, pages_for};
use crate::process::ProcessInfo;

/// A process tracked by the memory manager.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub name: String,
    pub memory_kb: u64,
    pub pages_needed: usize,
    sequence: VecDeque<PageNumber>,
}

impl ProcessRecord {
    pub fn new(info: ProcessInfo, page_size_kb: u64, sequence: VecDeque<PageNumber>) -> Self {
        Self {
            pid: info.pid,
            pages_needed: pages_for(info.memory_kb, page_size_kb),
            name: info.name,
            memory_kb: info.memory_kb,
            sequence,
        }
    }

    pub fn sequence(&self) -> &VecDeque<PageNumber> {
        &self.sequence
    }

    pub fn has_sequence(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// Takes the next page of the replay and re-queues it at the back.
    /// Returns the page with up to `window` accesses that follow it.
    pub fn next_access(&mut self, window: usize) -> Option<(PageNumber, Vec<PageNumber>)> {
        let page = self.sequence.pop_front()?;
        self.sequence.push_back(page);
        let lookahead = self.sequence.iter().take(window).copied().collect();
        Some((page, lookahead))
    }
}
