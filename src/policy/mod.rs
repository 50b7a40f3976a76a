pub mod errors;
pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod optimal;
mod unit_tests;

use std::fmt;
use std::str::FromStr;

use crate::common::PageNumber;
use crate::policy::errors::PolicyError;
use crate::policy::fifo::FifoState;
use crate::policy::lfu::LfuState;
use crate::policy::lru::LruState;
use crate::policy::optimal::OptimalState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fifo,
    Lru,
    Lfu,
    Optimal,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fifo,
        PolicyKind::Lru,
        PolicyKind::Lfu,
        PolicyKind::Optimal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
            PolicyKind::Optimal => "Optimal",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(PolicyKind::Fifo),
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            "optimal" | "opt" => Ok(PolicyKind::Optimal),
            _ => Err(PolicyError::UnknownPolicy { name: s.to_string() }),
        }
    }
}

/// Outcome of one access as seen by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub is_fault: bool,
    pub evicted: Option<PageNumber>,
}

impl Resolution {
    pub fn hit() -> Self {
        Self {
            is_fault: false,
            evicted: None,
        }
    }

    pub fn fault(evicted: Option<PageNumber>) -> Self {
        Self {
            is_fault: true,
            evicted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolicyStats {
    pub hits: u64,
    pub faults: u64,
    pub total_accesses: u64,
    /// `hits / total_accesses`, 0 before the first access.
    pub hit_rate: f64,
}

impl PolicyStats {
    pub fn from_counters(hits: u64, faults: u64) -> Self {
        let total = hits + faults;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        Self {
            hits,
            faults,
            total_accesses: total,
            hit_rate,
        }
    }
}

#[derive(Debug)]
enum PolicyState {
    Fifo(FifoState),
    Lru(LruState),
    Lfu(LfuState),
    Optimal(OptimalState),
}

impl PolicyState {
    fn new(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Fifo => PolicyState::Fifo(FifoState::new()),
            PolicyKind::Lru => PolicyState::Lru(LruState::new()),
            PolicyKind::Lfu => PolicyState::Lfu(LfuState::new()),
            PolicyKind::Optimal => PolicyState::Optimal(OptimalState::new()),
        }
    }

    fn begin_access(&mut self) {
        if let PolicyState::Lfu(s) = self {
            s.tick();
        }
    }

    fn contains(&self, page: PageNumber) -> bool {
        match self {
            PolicyState::Fifo(s) => s.contains(page),
            PolicyState::Lru(s) => s.contains(page),
            PolicyState::Lfu(s) => s.contains(page),
            PolicyState::Optimal(s) => s.contains(page),
        }
    }

    fn len(&self) -> usize {
        match self {
            PolicyState::Fifo(s) => s.len(),
            PolicyState::Lru(s) => s.len(),
            PolicyState::Lfu(s) => s.len(),
            PolicyState::Optimal(s) => s.len(),
        }
    }

    fn touch(&mut self, page: PageNumber) {
        match self {
            PolicyState::Lru(s) => s.touch(page),
            PolicyState::Lfu(s) => s.touch(page),
            PolicyState::Fifo(_) | PolicyState::Optimal(_) => {}
        }
    }

    fn admit(&mut self, page: PageNumber) {
        match self {
            PolicyState::Fifo(s) => s.admit(page),
            PolicyState::Lru(s) => s.admit(page),
            PolicyState::Lfu(s) => s.admit(page),
            PolicyState::Optimal(s) => s.admit(page),
        }
    }

    fn evict(&mut self, lookahead: &[PageNumber]) -> Option<PageNumber> {
        match self {
            PolicyState::Fifo(s) => s.evict(),
            PolicyState::Lru(s) => s.evict(),
            PolicyState::Lfu(s) => s.evict(),
            PolicyState::Optimal(s) => s.evict(lookahead),
        }
    }

    fn resident(&self) -> Vec<PageNumber> {
        match self {
            PolicyState::Fifo(s) => s.resident(),
            PolicyState::Lru(s) => s.resident(),
            PolicyState::Lfu(s) => s.resident(),
            PolicyState::Optimal(s) => s.resident(),
        }
    }

    fn clear(&mut self) {
        match self {
            PolicyState::Fifo(s) => s.clear(),
            PolicyState::Lru(s) => s.clear(),
            PolicyState::Lfu(s) => s.clear(),
            PolicyState::Optimal(s) => s.clear(),
        }
    }
}

/// A page-replacement policy over a fixed number of slots.
///
/// Only logical page numbers are tracked here; which physical frame holds a
/// page is the memory manager's business.
#[derive(Debug)]
pub struct ReplacementPolicy {
    kind: PolicyKind,
    capacity: usize,
    state: PolicyState,
    hits: u64,
    faults: u64,
}

impl ReplacementPolicy {
    pub fn new(kind: PolicyKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            state: PolicyState::new(kind),
            hits: 0,
            faults: 0,
        }
    }

    pub fn from_name(name: &str, capacity: usize) -> Result<Self, PolicyError> {
        Ok(Self::new(name.parse()?, capacity))
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn resident_count(&self) -> usize {
        self.state.len()
    }

    pub fn is_resident(&self, page: PageNumber) -> bool {
        self.state.contains(page)
    }

    /// Resident pages in the policy's own eviction-relevant order.
    pub fn resident_pages(&self) -> Vec<PageNumber> {
        self.state.resident()
    }

    /// Resolves one access. `lookahead` holds the upcoming accesses and is
    /// only consulted by Optimal.
    pub fn resolve(&mut self, page: PageNumber, lookahead: &[PageNumber]) -> Resolution {
        self.state.begin_access();

        if self.state.contains(page) {
            self.hits += 1;
            self.state.touch(page);
            return Resolution::hit();
        }

        self.faults += 1;
        let evicted = if self.state.len() >= self.capacity {
            self.state.evict(lookahead)
        } else {
            None
        };
        if self.capacity > 0 {
            self.state.admit(page);
        }
        Resolution::fault(evicted)
    }

    pub fn reset(&mut self) {
        self.state.clear();
        self.hits = 0;
        self.faults = 0;
    }

    pub fn stats(&self) -> PolicyStats {
        PolicyStats::from_counters(self.hits, self.faults)
    }
}
