use std::fmt;

/// Operating-system process identifier.
pub type Pid = u32;

/// Index of a page inside one process's address space.
pub type PageNumber = usize;

/// Index of a physical frame, `0..frame_count`.
pub type FrameIndex = usize;

/// One page of one process's address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalPage {
    pub pid: Pid,
    pub page: PageNumber,
}

impl LogicalPage {
    pub fn new(pid: Pid, page: PageNumber) -> Self {
        Self { pid, page }
    }
}

impl fmt::Display for LogicalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.page)
    }
}

/// Number of pages needed to hold `memory_kb` kilobytes, rounded up.
/// Saturates at `usize::MAX` where the count does not fit.
pub fn pages_for(memory_kb: u64, page_size_kb: u64) -> usize {
    if page_size_kb == 0 {
        return 0;
    }
    usize::try_from(memory_kb.div_ceil(page_size_kb)).unwrap_or(usize::MAX)
}
