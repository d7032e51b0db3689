// Analysis orchestration: configuration, metric records, and the pipeline
// that turns a melody/rhythm pair into a full result.
//
// The orchestrator is thin. Loaders (a different crate) supply the two
// decoded sequences; this module standardizes the melody, encodes both
// sequences, runs the entropy and complexity estimators, and optionally the
// sliding-window driver. It holds no state between calls; every analysis
// owns its own encoder and alphabets, so concurrent analyses with disjoint
// inputs never interact.
//
// Configuration is validated up front and never silently coerced.
// Degenerate data (empty sequences, one-note pieces) is not an error and
// flows through to well-defined sentinel values.

use crate::alphabet::Alphabet;
use crate::entropy::{
    markov_entropy, max_entropy, predictability_index, redundancy, shannon_entropy,
};
use crate::lzc::{BinaryProjection, lempel_ziv_complexity, normalized_lzc};
use crate::token::{Token, standardize_melody};
use crate::window::{WindowMetrics, local_metrics};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Markov order k for conditional entropy.
    pub markov_order: usize,
    /// Window length for local metrics.
    pub window_size: usize,
    /// Stride between consecutive windows.
    pub window_step: usize,
    /// Beat resolution for MIDI rhythm grids (e.g. 0.25 for sixteenths).
    pub time_unit: f64,
    /// Whether to compute the per-window local metric series.
    pub compute_local: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            markov_order: 1,
            window_size: 16,
            window_step: 8,
            time_unit: 0.25,
            compute_local: false,
        }
    }
}

impl AnalysisConfig {
    /// Fail-fast validation. Degenerate *data* is fine; degenerate
    /// *configuration* is not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compute_local && (self.window_size == 0 || self.window_step == 0) {
            return Err(ConfigError::InvalidWindow {
                size: self.window_size,
                step: self.window_step,
            });
        }
        if !self.time_unit.is_finite() || self.time_unit <= 0.0 {
            return Err(ConfigError::InvalidTimeUnit(self.time_unit));
        }
        Ok(())
    }
}

/// Rejected configuration. The core reports these to the caller and never
/// masks them.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "window_size and window_step must be positive when local metrics are requested \
         (got size={size}, step={step})"
    )]
    InvalidWindow { size: usize, step: usize },
    #[error("time_unit must be positive and finite (got {0})")]
    InvalidTimeUnit(f64),
}

/// The full metric set for one sequence (or one window of it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub h0: f64,
    pub hk: f64,
    pub hmax: f64,
    pub redundancy: f64,
    pub lzc: u64,
    pub lzc_normalized: f64,
    pub ip: f64,
}

impl MetricsRecord {
    /// Assemble the record from an encoded sequence, its alphabet size, the
    /// Markov order, and the binary projection to parse for complexity.
    pub fn from_encoded(
        codes: &[u32],
        alphabet_size: usize,
        markov_order: usize,
        projection: &BinaryProjection,
    ) -> Self {
        let h0 = shannon_entropy(codes);
        let hk = markov_entropy(codes, markov_order);
        let hmax = max_entropy(alphabet_size);
        MetricsRecord {
            h0,
            hk,
            hmax,
            redundancy: redundancy(hmax, hk),
            lzc: lempel_ziv_complexity(projection),
            lzc_normalized: normalized_lzc(projection),
            ip: predictability_index(hk, hmax),
        }
    }
}

/// Per-sequence result: the global record plus the optional local series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceAnalysis {
    pub metrics: MetricsRecord,
    pub local: Option<Vec<WindowMetrics>>,
}

/// Complete result for one melody/rhythm pair.
///
/// `combined` is the headline record: entropy figures from the melody,
/// complexity figures from the rhythm grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub combined: MetricsRecord,
    pub melody: SequenceAnalysis,
    pub rhythm: SequenceAnalysis,
}

/// Analyze a melody/rhythm pair.
///
/// The melody may contain raw tokens (note names, numeric strings); it is
/// standardized before encoding. The rhythm is expected as binary
/// activation flags (see `token::standardize_rhythm`).
pub fn analyze(
    melody: &[Token],
    rhythm: &[u8],
    config: &AnalysisConfig,
) -> Result<AnalysisRecord, ConfigError> {
    config.validate()?;

    let melody = standardize_melody(melody);
    let (melody_codes, melody_alphabet) = Alphabet::encode(&melody);
    let melody_projection = BinaryProjection::from_codes(&melody_codes);
    let melody_metrics = MetricsRecord::from_encoded(
        &melody_codes,
        melody_alphabet.size(),
        config.markov_order,
        &melody_projection,
    );

    let (rhythm_codes, rhythm_alphabet) = Alphabet::encode(rhythm);
    let rhythm_projection = BinaryProjection::from_flags(rhythm);
    let rhythm_metrics = MetricsRecord::from_encoded(
        &rhythm_codes,
        rhythm_alphabet.size(),
        config.markov_order,
        &rhythm_projection,
    );

    let combined = MetricsRecord {
        h0: melody_metrics.h0,
        hk: melody_metrics.hk,
        hmax: melody_metrics.hmax,
        redundancy: melody_metrics.redundancy,
        lzc: rhythm_metrics.lzc,
        lzc_normalized: rhythm_metrics.lzc_normalized,
        ip: melody_metrics.ip,
    };

    let (melody_local, rhythm_local) = if config.compute_local {
        (
            Some(local_metrics(
                &melody,
                config.window_size,
                config.window_step,
                config.markov_order,
            )),
            Some(local_metrics(
                rhythm,
                config.window_size,
                config.window_step,
                config.markov_order,
            )),
        )
    } else {
        (None, None)
    };

    Ok(AnalysisRecord {
        combined,
        melody: SequenceAnalysis {
            metrics: melody_metrics,
            local: melody_local,
        },
        rhythm: SequenceAnalysis {
            metrics: rhythm_metrics,
            local: rhythm_local,
        },
    })
}
