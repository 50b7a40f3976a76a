use crate::common::PageNumber;

/// Belady's algorithm over a bounded lookahead window.
///
/// Residents are kept in frame iteration order (admission order). With an
/// empty window the oldest resident is evicted, as FIFO would.
#[derive(Debug, Default)]
pub struct OptimalState {
    resident: Vec<PageNumber>,
}

impl OptimalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.resident.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.resident.len()
    }

    pub fn admit(&mut self, page: PageNumber) {
        if !self.contains(page) {
            self.resident.push(page);
        }
    }

    pub fn evict(&mut self, lookahead: &[PageNumber]) -> Option<PageNumber> {
        let idx = self.victim_index(lookahead)?;
        Some(self.resident.remove(idx))
    }

    fn victim_index(&self, lookahead: &[PageNumber]) -> Option<usize> {
        if self.resident.is_empty() {
            return None;
        }
        if lookahead.is_empty() {
            return Some(0);
        }

        let mut victim = 0;
        let mut farthest = None;
        for (idx, page) in self.resident.iter().enumerate() {
            match lookahead.iter().position(|p| p == page) {
                // never used again inside the window
                None => return Some(idx),
                Some(next_use) => {
                    if farthest.is_none_or(|f| next_use > f) {
                        farthest = Some(next_use);
                        victim = idx;
                    }
                }
            }
        }
        Some(victim)
    }

    pub fn resident(&self) -> Vec<PageNumber> {
        self.resident.clone()
    }

    pub fn clear(&mut self) {
        self.resident.clear();
    }
}
