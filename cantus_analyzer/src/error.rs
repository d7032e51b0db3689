// Loader error taxonomy.
//
// Loaders fail loudly: a missing file, malformed data, or a bad track
// selection is reported to the caller with enough context to name the
// failing construct. Degenerate-but-well-formed content (an empty melody,
// a silent rhythm grid) is not an error and flows through to the core.

use cantus_metrics::analysis::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid MIDI data: {0}")]
    Midi(#[from] midly::Error),
    #[error("unsupported MIDI timing (SMPTE timecode)")]
    SmpteTiming,
    #[error("track index {index} out of bounds for MIDI with {count} tracks")]
    TrackIndex { index: usize, count: usize },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON must contain 'melody' and 'rhythm' arrays")]
    MissingKeys,
    #[error("invalid rhythm value: {0}")]
    BadRhythmValue(String),
    #[error("unsupported CSV layout: {0}")]
    BadCsv(String),
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
