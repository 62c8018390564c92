// ── Telemetry rolling window ──
//
// Fixed-capacity FIFO of recent throughput samples feeding the traffic
// graph. Samples are never persisted.

use std::collections::VecDeque;

/// Samples kept when no capacity is configured (one minute at 1 Hz).
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// One throughput reading, in bits per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetrySample {
    pub download_bps: f64,
    pub upload_bps: f64,
}

impl TelemetrySample {
    pub fn new(download_bps: f64, upload_bps: f64) -> Self {
        Self {
            download_bps,
            upload_bps,
        }
    }

    /// The larger of the two directions.
    pub fn peak(&self) -> f64 {
        self.download_bps.max(self.upload_bps)
    }
}

/// Rolling window of the last `capacity` samples, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRing {
    samples: VecDeque<TelemetrySample>,
    capacity: usize,
}

impl Default for TelemetryRing {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TelemetryRing {
    /// Capacity is fixed for the life of the ring. Zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full.
    pub fn push(&mut self, sample: TelemetrySample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Current samples in push order.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &TelemetrySample> + '_ {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<TelemetrySample> {
        self.samples.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
