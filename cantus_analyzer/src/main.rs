// Cantus music entropy analyzer CLI entry point.
//
// Computes entropy, redundancy, predictability and Lempel-Ziv complexity
// for symbolic music files, with optional sliding-window local metrics,
// CSV/JSON export and SVG charts.
//
// Usage:
//   analyze analyze --input FILE --input-type midi|json|csv
//     [--markov-order N] [--window-size N] [--window-step N] [--time-unit X]
//     [--local] [--output-csv PATH] [--local-csv PATH] [--output-json PATH]
//     [--plot-dir DIR]
//   analyze analyze-batch --input FOLDER --input-type midi|json|csv
//     [--pattern GLOB] [--batch-plot] [... same options as analyze]

use cantus_analyzer::batch::analyze_folder;
use cantus_analyzer::chart::{batch_chart_svg, global_chart_svg, local_chart_svg};
use cantus_analyzer::export::{ExportError, global_csv, json_summary, local_csv, write_text};
use cantus_analyzer::piece::{InputType, PieceAnalysis, analyze_piece};
use cantus_metrics::analysis::AnalysisConfig;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let exit_code = match args.get(1).map(String::as_str) {
        Some("analyze") => run_analyze(&args),
        Some("analyze-batch") => run_batch(&args),
        Some("--help") | Some("-h") | None => {
            print_usage();
            0
        }
        Some(other) => {
            eprintln!("Unknown command '{}'.", other);
            print_usage();
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_analyze(args: &[String]) -> i32 {
    let Some((input, input_type)) = required_input(args) else {
        return 1;
    };
    let config = config_from_args(args);

    println!("=== Cantus Music Entropy Analyzer ===");
    println!("Input: {}", input);
    println!("Markov order: {}", config.markov_order);
    if config.compute_local {
        println!(
            "Local windows: size {} step {}",
            config.window_size, config.window_step
        );
    }
    println!();

    let piece = match analyze_piece(Path::new(&input), input_type, &config) {
        Ok(piece) => piece,
        Err(error) => {
            eprintln!("Error: {}", error);
            return 1;
        }
    };
    print_result(&piece);

    if let Some(path) = get_flag(args, "--output-csv") {
        if fail(write_text(
            &global_csv(std::slice::from_ref(&piece)),
            Path::new(&path),
        )) {
            return 1;
        }
        println!("Global CSV saved: {}", path);
    }
    if let Some(path) = get_flag(args, "--local-csv") {
        if fail(write_text(
            &local_csv(std::slice::from_ref(&piece)),
            Path::new(&path),
        )) {
            return 1;
        }
        println!("Local CSV saved: {}", path);
    }
    if let Some(path) = get_flag(args, "--output-json") {
        let json = match json_summary(&piece) {
            Ok(json) => json,
            Err(error) => {
                eprintln!("Error: {}", error);
                return 1;
            }
        };
        if fail(write_text(&json, Path::new(&path))) {
            return 1;
        }
        println!("JSON summary saved: {}", path);
    }
    if let Some(dir) = get_flag(args, "--plot-dir") {
        if fail(write_piece_charts(&piece, Path::new(&dir))) {
            return 1;
        }
        println!("Charts saved under: {}", dir);
    }
    0
}

fn run_batch(args: &[String]) -> i32 {
    let Some((input, input_type)) = required_input(args) else {
        return 1;
    };
    let config = config_from_args(args);
    let pattern = get_flag(args, "--pattern").unwrap_or_else(|| "*".to_string());

    println!("=== Cantus Music Entropy Analyzer (batch) ===");
    println!("Folder: {}", input);
    println!("Pattern: {}", pattern);
    println!();

    let results = match analyze_folder(Path::new(&input), input_type, &config, &pattern) {
        Ok(results) => results,
        Err(error) => {
            eprintln!("Error: {}", error);
            return 1;
        }
    };
    if results.is_empty() {
        eprintln!("No files processed.");
        return 1;
    }
    for piece in &results {
        print_result(piece);
    }
    println!("{} file(s) analyzed.", results.len());

    if let Some(dir) = get_flag(args, "--plot-dir") {
        let base = Path::new(&dir);
        for piece in &results {
            let stem = file_stem(piece);
            let song_dir = base.join(stem);
            if fail(write_piece_charts(piece, &song_dir)) {
                return 1;
            }
        }

        let batch_dir = base.join("batch");
        if let Err(error) = std::fs::create_dir_all(&batch_dir) {
            eprintln!("Error: failed to create {}: {}", batch_dir.display(), error);
            return 1;
        }
        let csv_path = batch_dir.join("batch_results.csv");
        if fail(write_text(&global_csv(&results), &csv_path)) {
            return 1;
        }
        println!("Batch results CSV saved: {}", csv_path.display());

        if has_flag(args, "--batch-plot") {
            let chart_path = batch_dir.join("batch_comparison.svg");
            if fail(write_text(&batch_chart_svg(&results), &chart_path)) {
                return 1;
            }
            println!("Batch comparison chart saved: {}", chart_path.display());
        }
    }

    if let Some(path) = get_flag(args, "--output-csv") {
        if fail(write_text(&global_csv(&results), Path::new(&path))) {
            return 1;
        }
        println!("Global CSV saved: {}", path);
    }
    if let Some(path) = get_flag(args, "--local-csv") {
        if fail(write_text(&local_csv(&results), Path::new(&path))) {
            return 1;
        }
        println!("Local CSV saved: {}", path);
    }
    0
}

/// Print one piece's combined record, four decimal places.
fn print_result(piece: &PieceAnalysis) {
    let m = &piece.record.combined;
    println!("File: {}", piece.path.display());
    println!("  H0: {:.4}", m.h0);
    println!("  Hk: {:.4}", m.hk);
    println!("  Hmax: {:.4}", m.hmax);
    println!("  Redundancy: {:.4}", m.redundancy);
    println!("  LZC: {}", m.lzc);
    println!("  LZC normalized: {:.4}", m.lzc_normalized);
    println!("  Predictability (IP): {:.4}", m.ip);
    if let Some(local) = &piece.record.melody.local {
        println!("  Local windows: {}", local.len());
    }
}

/// Global chart plus, when local metrics were computed, the local entropy
/// line chart, written into `dir`.
fn write_piece_charts(piece: &PieceAnalysis, dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let stem = file_stem(piece);
    write_text(
        &global_chart_svg(piece),
        &dir.join(format!("{}_global.svg", stem)),
    )?;
    if let Some(series) = piece.record.melody.local.as_deref() {
        write_text(
            &local_chart_svg(&format!("{} local entropy", stem), series),
            &dir.join(format!("{}_local.svg", stem)),
        )?;
    }
    Ok(())
}

fn file_stem(piece: &PieceAnalysis) -> &str {
    piece
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
}

fn required_input(args: &[String]) -> Option<(String, InputType)> {
    let Some(input) = get_flag(args, "--input") else {
        eprintln!("--input is required.");
        return None;
    };
    let Some(type_text) = get_flag(args, "--input-type") else {
        eprintln!("--input-type is required (midi, json or csv).");
        return None;
    };
    match type_text.parse::<InputType>() {
        Ok(input_type) => Some((input, input_type)),
        Err(error) => {
            eprintln!("Error: {}", error);
            None
        }
    }
}

fn config_from_args(args: &[String]) -> AnalysisConfig {
    let defaults = AnalysisConfig::default();
    AnalysisConfig {
        markov_order: parse_flag(args, "--markov-order").unwrap_or(defaults.markov_order),
        window_size: parse_flag(args, "--window-size").unwrap_or(defaults.window_size),
        window_step: parse_flag(args, "--window-step").unwrap_or(defaults.window_step),
        time_unit: parse_flag(args, "--time-unit").unwrap_or(defaults.time_unit),
        compute_local: has_flag(args, "--local"),
    }
}

fn fail(result: Result<(), ExportError>) -> bool {
    if let Err(error) = result {
        eprintln!("Error: {}", error);
        true
    } else {
        false
    }
}

fn print_usage() {
    println!("Cantus music entropy and redundancy toolkit.");
    println!();
    println!("Commands:");
    println!("  analyze        Analyze a single file.");
    println!("  analyze-batch  Analyze all matching files in a folder.");
    println!();
    println!("Common options:");
    println!("  --input PATH          Input file (or folder for analyze-batch). Required.");
    println!("  --input-type TYPE     midi, json or csv. Required.");
    println!("  --markov-order N      Markov order k (default 1).");
    println!("  --window-size N       Window size for local metrics (default 16).");
    println!("  --window-step N       Stride for local metrics (default 8).");
    println!("  --time-unit X         Beat resolution for MIDI rhythm grids (default 0.25).");
    println!("  --local               Compute sliding-window local metrics.");
    println!("  --output-csv PATH     Save global metrics CSV.");
    println!("  --local-csv PATH      Save local metrics CSV.");
    println!("  --output-json PATH    Save a JSON summary (analyze only).");
    println!("  --plot-dir DIR        Write SVG charts into DIR.");
    println!();
    println!("Batch options:");
    println!("  --pattern GLOB        File-name filter inside the folder (default *).");
    println!("  --batch-plot          Write a comparison chart across all files.");
}

fn get_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    get_flag(args, flag).and_then(|v| v.parse().ok())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
