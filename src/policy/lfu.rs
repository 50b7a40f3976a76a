use std::collections::HashMap;

use crate::common::PageNumber;

#[derive(Debug, Clone, Copy)]
struct Usage {
    frequency: u64,
    last_used: u64,
    admitted: u64,
}

/// Evicts the least frequently used page, oldest last access first on ties.
///
/// Frequency is forgotten on eviction: a page that comes back starts at 1.
#[derive(Debug, Default)]
pub struct LfuState {
    clock: u64,
    usage: HashMap<PageNumber, Usage>,
}

impl LfuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.usage.contains_key(&page)
    }

    pub fn len(&self) -> usize {
        self.usage.len()
    }

    /// Advances the access clock. Called once per access, hit or fault.
    pub fn tick(&mut self) {
        self.clock += 1;
    }

    pub fn touch(&mut self, page: PageNumber) {
        if let Some(u) = self.usage.get_mut(&page) {
            u.frequency += 1;
            u.last_used = self.clock;
        }
    }

    pub fn admit(&mut self, page: PageNumber) {
        let clock = self.clock;
        self.usage.entry(page).or_insert(Usage {
            frequency: 1,
            last_used: clock,
            admitted: clock,
        });
    }

    pub fn frequency(&self, page: PageNumber) -> Option<u64> {
        self.usage.get(&page).map(|u| u.frequency)
    }

    pub fn evict(&mut self) -> Option<PageNumber> {
        let victim = self
            .usage
            .iter()
            .min_by_key(|(_, u)| (u.frequency, u.last_used))
            .map(|(page, _)| *page)?;
        self.usage.remove(&victim);
        Some(victim)
    }

    /// Resident pages in admission order.
    pub fn resident(&self) -> Vec<PageNumber> {
        let mut pages: Vec<_> = self.usage.iter().map(|(p, u)| (u.admitted, *p)).collect();
        pages.sort_unstable();
        pages.into_iter().map(|(_, p)| p).collect()
    }

    pub fn clear(&mut self) {
        self.clock = 0;
        self.usage.clear();
    }
}
