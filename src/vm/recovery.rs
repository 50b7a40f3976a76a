use std::collections::VecDeque;

pub const RECOVERY_SAMPLE_CAP: usize = 10_000;
pub const RECOVERY_SAMPLE_KEEP: usize = 5_000;

/// Fault recovery times in microseconds. Once more than
/// `RECOVERY_SAMPLE_CAP` samples pile up only the newest
/// `RECOVERY_SAMPLE_KEEP` are kept.
#[derive(Debug, Default)]
pub struct RecoverySamples {
    samples: VecDeque<f64>,
    sum: f64,
}

impl RecoverySamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, micros: f64) {
        self.samples.push_back(micros);
        self.sum += micros;

        if self.samples.len() > RECOVERY_SAMPLE_CAP {
            let excess = self.samples.len() - RECOVERY_SAMPLE_KEEP;
            self.samples.drain(..excess);
            self.sum = self.samples.iter().sum();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(RecoverySamples::new().average(), 0.0);
    }

    #[test]
    fn average_tracks_samples() {
        let mut r = RecoverySamples::new();
        r.push(2.0);
        r.push(4.0);

        assert_eq!(r.len(), 2);
        assert!((r.average() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn overflow_keeps_most_recent() {
        let mut r = RecoverySamples::new();
        for i in 0..RECOVERY_SAMPLE_CAP {
            r.push(i as f64);
        }
        assert_eq!(r.len(), RECOVERY_SAMPLE_CAP);

        r.push(1.0e6);
        assert_eq!(r.len(), RECOVERY_SAMPLE_KEEP);
        assert_eq!(r.latest(), Some(1.0e6));

        // oldest survivor is sample 5001
        let expected: f64 = ((RECOVERY_SAMPLE_CAP - RECOVERY_SAMPLE_KEEP + 1)
            ..RECOVERY_SAMPLE_CAP)
            .map(|i| i as f64)
            .sum::<f64>()
            + 1.0e6;
        assert!((r.average() - expected / RECOVERY_SAMPLE_KEEP as f64).abs() < 1e-6);
    }
}
