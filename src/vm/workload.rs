use std::collections::VecDeque;

use rand::Rng;

use crate::common::PageNumber;

/// Chance that the next access stays near the current page.
pub const LOCALITY_PROBABILITY: f64 = 0.7;

/// Step taken when staying local; 0 appears twice so re-touching the same
/// page is as likely as moving either way.
const NEIGHBOR_OFFSETS: [isize; 4] = [-1, 0, 0, 1];

/// Synthetic access trace with locality of reference.
///
/// Starts on a random page; each step either moves to a neighbouring page
/// (clamped to `[0, pages_needed)`) or jumps anywhere.
pub fn generate_access_sequence<R: Rng + ?Sized>(
    pages_needed: usize,
    length: usize,
    rng: &mut R,
) -> VecDeque<PageNumber> {
    let mut seq = VecDeque::with_capacity(length);
    if pages_needed == 0 {
        return seq;
    }

    let last = pages_needed - 1;
    let mut current = rng.random_range(0..pages_needed);

    for _ in 0..length {
        seq.push_back(current);

        current = if rng.random_bool(LOCALITY_PROBABILITY) {
            let offset = NEIGHBOR_OFFSETS[rng.random_range(0..NEIGHBOR_OFFSETS.len())];
            current.saturating_add_signed(offset).min(last)
        } else {
            rng.random_range(0..pages_needed)
        };
    }

    seq
}
