//! Fixed-window history of the true and believed joint angle.

/// One point of the angle plot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TraceSample {
    pub tick: u64,
    /// True joint angle
    pub real: f64,
    /// Believed joint angle
    pub belief: f64,
}

/// Circular buffer keeping the newest `N` samples.
#[derive(Debug, Clone)]
pub struct AngleTrace<const N: usize> {
    samples: Box<[TraceSample; N]>,
    head: usize,
    len: usize,
}

impl<const N: usize> Default for AngleTrace<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AngleTrace<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: Box::new([TraceSample::default(); N]),
            head: 0,
            len: 0,
        }
    }

    /// Appends a sample, dropping the oldest once full.
    pub fn push(&mut self, sample: TraceSample) {
        self.samples[self.head] = sample;
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sample by age, 0 being the oldest kept.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TraceSample> {
        if index >= self.len {
            return None;
        }
        let start = if self.len < N { 0 } else { self.head };
        Some(&self.samples[(start + index) % N])
    }

    #[must_use]
    pub fn last(&self) -> Option<&TraceSample> {
        if self.len == 0 {
            return None;
        }
        let last = if self.head == 0 { N - 1 } else { self.head - 1 };
        Some(&self.samples[last])
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TraceSample> {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// `(tick, angle)` points of both curves, ready for a chart.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn series(&self) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
        self.iter()
            .map(|s| ((s.tick as f64, s.real), (s.tick as f64, s.belief)))
            .unzip()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u64) -> TraceSample {
        #[allow(clippy::cast_precision_loss)]
        let value = tick as f64;
        TraceSample {
            tick,
            real: value,
            belief: -value,
        }
    }

    #[test]
    fn test_push_and_len() {
        let mut trace: AngleTrace<4> = AngleTrace::new();
        assert!(trace.is_empty());
        trace.push(sample(1));
        trace.push(sample(2));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.last().map(|s| s.tick), Some(2));
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let mut trace: AngleTrace<3> = AngleTrace::new();
        for t in 1..=5 {
            trace.push(sample(t));
        }
        let ticks: Vec<u64> = trace.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
        assert_eq!(trace.get(0).map(|s| s.tick), Some(3));
        assert!(trace.get(3).is_none());
    }

    #[test]
    fn test_series_splits_curves() {
        let mut trace: AngleTrace<8> = AngleTrace::new();
        trace.push(sample(10));
        trace.push(sample(20));
        let (real, belief) = trace.series();
        assert_eq!(real, vec![(10.0, 10.0), (20.0, 20.0)]);
        assert_eq!(belief, vec![(10.0, -10.0), (20.0, -20.0)]);
    }

    #[test]
    fn test_clear() {
        let mut trace: AngleTrace<4> = AngleTrace::new();
        trace.push(sample(1));
        trace.clear();
        assert!(trace.is_empty());
        assert!(trace.last().is_none());
    }
}
