// CSV and JSON export of analysis results.
//
// All renderers build a String; writing to disk is a thin wrapper. The
// global CSV carries one row per piece (the combined record); the local CSV
// one row per window, tagged with the sequence it came from.

use crate::piece::PieceAnalysis;
use cantus_metrics::window::WindowMetrics;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

const GLOBAL_HEADER: &str = "path,h0,hk,hmax,redundancy,lzc,lzc_normalized,ip";
const LOCAL_HEADER: &str = "path,sequence,window,offset,h0,hk,hmax,redundancy,lzc,lzc_normalized,ip";

/// Render the combined record of each piece as CSV.
pub fn global_csv(results: &[PieceAnalysis]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", GLOBAL_HEADER);
    for piece in results {
        let m = &piece.record.combined;
        let _ = writeln!(
            out,
            "{},{:.6},{:.6},{:.6},{:.6},{},{:.6},{:.6}",
            csv_field(&piece.path.display().to_string()),
            m.h0,
            m.hk,
            m.hmax,
            m.redundancy,
            m.lzc,
            m.lzc_normalized,
            m.ip,
        );
    }
    out
}

/// Render every local window of every piece as CSV. Pieces analyzed without
/// local metrics contribute no rows.
pub fn local_csv(results: &[PieceAnalysis]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", LOCAL_HEADER);
    for piece in results {
        let path = csv_field(&piece.path.display().to_string());
        write_local_rows(&mut out, &path, "melody", piece.record.melody.local.as_deref());
        write_local_rows(&mut out, &path, "rhythm", piece.record.rhythm.local.as_deref());
    }
    out
}

fn write_local_rows(out: &mut String, path: &str, label: &str, series: Option<&[WindowMetrics]>) {
    let Some(series) = series else {
        return;
    };
    for (index, window) in series.iter().enumerate() {
        let m = &window.metrics;
        let _ = writeln!(
            out,
            "{},{},{},{},{:.6},{:.6},{:.6},{:.6},{},{:.6},{:.6}",
            path,
            label,
            index,
            window.offset,
            m.h0,
            m.hk,
            m.hmax,
            m.redundancy,
            m.lzc,
            m.lzc_normalized,
            m.ip,
        );
    }
}

/// Pretty JSON summary of one analyzed piece.
pub fn json_summary(piece: &PieceAnalysis) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(piece)?)
}

/// Write rendered text to disk.
pub fn write_text(content: &str, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
