use std::collections::{BTreeMap, HashMap};

use crate::common::PageNumber;

/// Evicts the page whose most recent access is oldest.
///
/// Every touch stamps the page with a fresh logical tick; `by_tick` keeps the
/// stamps ordered so the victim is always the first entry.
#[derive(Debug, Default)]
pub struct LruState {
    clock: u64,
    last_used: HashMap<PageNumber, u64>,
    by_tick: BTreeMap<u64, PageNumber>,
}

impl LruState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.last_used.contains_key(&page)
    }

    pub fn len(&self) -> usize {
        self.last_used.len()
    }

    pub fn touch(&mut self, page: PageNumber) {
        self.clock += 1;
        if let Some(old) = self.last_used.insert(page, self.clock) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(self.clock, page);
    }

    pub fn admit(&mut self, page: PageNumber) {
        self.touch(page);
    }

    pub fn evict(&mut self) -> Option<PageNumber> {
        let (_, victim) = self.by_tick.pop_first()?;
        self.last_used.remove(&victim);
        Some(victim)
    }

    /// Resident pages from least to most recently used.
    pub fn resident(&self) -> Vec<PageNumber> {
        self.by_tick.values().copied().collect()
    }

    pub fn clear(&mut self) {
        self.clock = 0;
        self.last_used.clear();
        self.by_tick.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_promotes_page() {
        let mut lru = LruState::new();
        lru.admit(1);
        lru.admit(2);
        lru.admit(3);
        lru.touch(1);

        assert_eq!(lru.resident(), vec![2, 3, 1]);
        assert_eq!(lru.evict(), Some(2));
        assert_eq!(lru.evict(), Some(3));
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut lru = LruState::new();
        lru.admit(9);
        lru.clear();

        assert!(!lru.contains(9));
        assert_eq!(lru.evict(), None);
    }
}
