/// Running sums for a group of delay values.
///
/// Finalized into a mean and a sample (Bessel-corrected) standard deviation
/// without keeping the individual values around.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DelayAccumulator {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl DelayAccumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean. Returns `None` for an empty accumulator.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    /// Sample standard deviation. A single value has no spread and yields 0.0.
    pub fn stddev(&self) -> Option<f64> {
        match self.count {
            0 => None,
            1 => Some(0.0),
            n => {
                let n = n as f64;
                let variance = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
                // rounding can push a zero variance slightly negative
                Some(variance.max(0.0).sqrt())
            }
        }
    }
}

impl FromIterator<f64> for DelayAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = DelayAccumulator::default();
        for v in iter {
            acc.push(v);
        }
        acc
    }
}

/// Share of `part` in `total` as a percentage. Returns 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
