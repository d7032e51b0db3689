// Cantus analyzer
//
// The boundary layer around the cantus_metrics core: file loaders, export,
// charts, and batch fan-out. Nothing here computes metrics: it decodes
// inputs into the two sequences the core consumes and renders the records
// the core produces.
//
// - error.rs: loader error taxonomy
// - loader_midi.rs: melody and rhythm-grid extraction from MIDI files
// - loader_text.rs: JSON/CSV sequence files
// - piece.rs: per-file pipeline (load → standardize → core analysis)
// - batch.rs: parallel folder analysis
// - export.rs: CSV and JSON renderers
// - chart.rs: SVG chart renderers
//
// The `analyze` binary (src/main.rs) wires these together behind a CLI.

pub mod batch;
pub mod chart;
pub mod error;
pub mod export;
pub mod loader_midi;
pub mod loader_text;
pub mod piece;
