use std::collections::{HashSet, VecDeque};

use crate::common::PageNumber;

/// Evicts the page admitted earliest.
#[derive(Debug, Default)]
pub struct FifoState {
    queue: VecDeque<PageNumber>,
    resident: HashSet<PageNumber>,
}

impl FifoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.resident.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn admit(&mut self, page: PageNumber) {
        if self.resident.insert(page) {
            self.queue.push_back(page);
        }
    }

    pub fn evict(&mut self) -> Option<PageNumber> {
        let victim = self.queue.pop_front()?;
        self.resident.remove(&victim);
        Some(victim)
    }

    pub fn resident(&self) -> Vec<PageNumber> {
        self.queue.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.resident.clear();
    }
}
