// Sliding-window driver for local metrics.
//
// Local metrics measure local structure, so every window is re-encoded with
// its own scoped alphabet: Hmax for a window reflects the symbols the
// window actually contains, not the global alphabet. Windows are full-size
// only: offsets advance by `step` while `offset + size` still fits, which
// makes the series length `floor((N - size)/step) + 1` for `N ≥ size` and
// empty otherwise. Overlap (`step < size`) and gaps (`step > size`) are
// both valid.
//
// Each window is an independent computation; there is no shared accumulator
// between windows.

use crate::alphabet::Alphabet;
use crate::analysis::MetricsRecord;
use crate::lzc::BinaryProjection;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Iterator over `(offset, subsequence)` pairs at offsets `0, step, 2·step…`
/// while the full window fits. Lazy, finite, restartable by constructing a
/// new instance.
#[derive(Debug, Clone)]
pub struct Windows<'a, T> {
    sequence: &'a [T],
    size: usize,
    step: usize,
    offset: usize,
}

impl<'a, T> Windows<'a, T> {
    /// Callers are expected to have validated `size > 0` and `step > 0`
    /// (see `AnalysisConfig::validate`); a zero parameter yields an empty
    /// iterator rather than looping forever.
    pub fn new(sequence: &'a [T], size: usize, step: usize) -> Self {
        Windows {
            sequence,
            size,
            step,
            offset: 0,
        }
    }
}

impl<'a, T> Iterator for Windows<'a, T> {
    type Item = (usize, &'a [T]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 || self.step == 0 {
            return None;
        }
        let end = self.offset.checked_add(self.size)?;
        if end > self.sequence.len() {
            return None;
        }
        let item = (self.offset, &self.sequence[self.offset..end]);
        self.offset += self.step;
        Some(item)
    }
}

/// Metrics for one window, indexed by its start offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub offset: usize,
    pub metrics: MetricsRecord,
}

/// Run the full metric set over every window of a sequence.
///
/// Each window is encoded against its own alphabet and fed through the
/// entropy estimators and the complexity estimator (canonical code-parity
/// projection).
pub fn local_metrics<T: Eq + Hash + Clone>(
    sequence: &[T],
    window_size: usize,
    window_step: usize,
    markov_order: usize,
) -> Vec<WindowMetrics> {
    Windows::new(sequence, window_size, window_step)
        .map(|(offset, window)| {
            let (codes, alphabet) = Alphabet::encode(window);
            let projection = BinaryProjection::from_codes(&codes);
            WindowMetrics {
                offset,
                metrics: MetricsRecord::from_encoded(
                    &codes,
                    alphabet.size(),
                    markov_order,
                    &projection,
                ),
            }
        })
        .collect()
}
