// Per-piece analysis pipeline: pick a loader, standardize, run the core.

use crate::error::LoadError;
use crate::loader_midi::load_midi;
use crate::loader_text::load_text_sequence;
use cantus_metrics::analysis::{AnalysisConfig, AnalysisRecord, analyze};
use cantus_metrics::token::{Token, standardize_rhythm};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Midi,
    Json,
    Csv,
}

impl FromStr for InputType {
    type Err = LoadError;

    fn from_str(text: &str) -> Result<Self, LoadError> {
        match text.to_ascii_lowercase().as_str() {
            "midi" => Ok(InputType::Midi),
            "json" => Ok(InputType::Json),
            "csv" => Ok(InputType::Csv),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl InputType {
    /// Whether a file's extension belongs to this input type.
    pub fn matches_extension(self, path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match self {
            InputType::Midi => extension == "mid" || extension == "midi",
            InputType::Json => extension == "json",
            InputType::Csv => extension == "csv",
        }
    }
}

/// One analyzed file: where it came from and the full metric record.
#[derive(Debug, Clone, Serialize)]
pub struct PieceAnalysis {
    pub path: PathBuf,
    pub record: AnalysisRecord,
}

/// Load one file and compute all metrics for it.
pub fn analyze_piece(
    path: &Path,
    input_type: InputType,
    config: &AnalysisConfig,
) -> Result<PieceAnalysis, LoadError> {
    config.validate()?;
    let (melody, rhythm) = match input_type {
        InputType::Midi => {
            let midi = load_midi(path, config.time_unit, None)?;
            let melody: Vec<Token> = midi.melody.iter().map(|&pitch| Token::Pitch(pitch)).collect();
            (melody, midi.rhythm)
        }
        InputType::Json | InputType::Csv => {
            let text = load_text_sequence(path)?;
            let rhythm = standardize_rhythm(&text.rhythm);
            (text.melody, rhythm)
        }
    };
    let record = analyze(&melody, &rhythm, config)?;
    Ok(PieceAnalysis {
        path: path.to_path_buf(),
        record,
    })
}
