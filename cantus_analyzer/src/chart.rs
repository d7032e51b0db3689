// SVG chart output for analysis results.
//
// Small self-contained renderings, no plotting dependency: a bar chart of
// the combined record for one piece, a line chart of the per-window entropy
// series, and a comparison bar chart across a batch. The approach mirrors
// the other text emitters: walk the data, compute a layout, serialize.

use crate::piece::PieceAnalysis;
use cantus_metrics::window::WindowMetrics;
use std::fmt::Write as _;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 48.0;

const H0_COLOR: &str = "#2f6f9f";
const HK_COLOR: &str = "#c25b3a";
const BAR_COLOR: &str = "#4a7fb0";

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn svg_open(out: &mut String, title: &str) {
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
         viewBox=\"0 0 {} {}\">",
        WIDTH, HEIGHT, WIDTH, HEIGHT
    );
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"white\"/>",
        WIDTH, HEIGHT
    );
    let _ = writeln!(
        out,
        "<text x=\"{}\" y=\"20\" font-family=\"sans-serif\" font-size=\"14\" \
         text-anchor=\"middle\">{}</text>",
        WIDTH / 2.0,
        xml_escape(title)
    );
}

fn svg_axes(out: &mut String, y_max: f64) {
    let x0 = MARGIN_LEFT;
    let y0 = HEIGHT - MARGIN_BOTTOM;
    let _ = writeln!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"black\"/>",
        x0,
        y0,
        x0 + plot_width(),
        y0
    );
    let _ = writeln!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"black\"/>",
        x0, MARGIN_TOP, x0, y0
    );
    let _ = writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" \
         text-anchor=\"end\">{:.2}</text>",
        x0 - 6.0,
        MARGIN_TOP + 4.0,
        y_max
    );
    let _ = writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" \
         text-anchor=\"end\">0</text>",
        x0 - 6.0,
        y0 + 4.0
    );
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Bar chart from labeled values. Negative values draw as empty bars at the
/// baseline (the labels still show the raw number).
fn bar_chart(title: &str, bars: &[(String, f64)]) -> String {
    let mut out = String::new();
    svg_open(&mut out, title);
    let y_max = bars
        .iter()
        .map(|&(_, v)| v)
        .fold(0.0_f64, f64::max)
        .max(1e-9);
    svg_axes(&mut out, y_max);

    let slot = plot_width() / bars.len() as f64;
    let bar_width = slot * 0.6;
    let baseline = HEIGHT - MARGIN_BOTTOM;
    for (index, (label, value)) in bars.iter().enumerate() {
        let height = (value.max(0.0) / y_max) * plot_height();
        let x = MARGIN_LEFT + slot * index as f64 + (slot - bar_width) / 2.0;
        let y = baseline - height;
        let _ = writeln!(
            out,
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            x, y, bar_width, height, BAR_COLOR
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"11\" \
             text-anchor=\"middle\">{:.3}</text>",
            x + bar_width / 2.0,
            y - 4.0,
            value
        );
        let _ = writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"11\" \
             text-anchor=\"middle\">{}</text>",
            x + bar_width / 2.0,
            baseline + 16.0,
            xml_escape(label)
        );
    }
    out.push_str("</svg>\n");
    out
}

/// Bar chart of one piece's combined record.
pub fn global_chart_svg(piece: &PieceAnalysis) -> String {
    let m = &piece.record.combined;
    let stem = piece
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("piece");
    let bars = vec![
        ("H0".to_string(), m.h0),
        ("Hk".to_string(), m.hk),
        ("Hmax".to_string(), m.hmax),
        ("R".to_string(), m.redundancy),
        ("LZCn".to_string(), m.lzc_normalized),
        ("IP".to_string(), m.ip),
    ];
    bar_chart(&format!("{} global metrics", stem), &bars)
}

/// Comparison bar chart: combined H0 for every piece in a batch.
pub fn batch_chart_svg(results: &[PieceAnalysis]) -> String {
    let bars: Vec<(String, f64)> = results
        .iter()
        .map(|piece| {
            let stem = piece
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("piece");
            let label: String = stem.chars().take(12).collect();
            (label, piece.record.combined.h0)
        })
        .collect();
    if bars.is_empty() {
        return empty_chart("batch comparison", "no results");
    }
    bar_chart("batch comparison: H0 per piece", &bars)
}

/// Line chart of H0 and Hk across a local window series.
pub fn local_chart_svg(title: &str, series: &[WindowMetrics]) -> String {
    if series.is_empty() {
        return empty_chart(title, "no windows");
    }
    let mut out = String::new();
    svg_open(&mut out, title);
    let y_max = series
        .iter()
        .flat_map(|w| [w.metrics.h0, w.metrics.hk])
        .fold(0.0_f64, f64::max)
        .max(1e-9);
    svg_axes(&mut out, y_max);

    polyline(&mut out, series, y_max, |m| m.h0, H0_COLOR);
    polyline(&mut out, series, y_max, |m| m.hk, HK_COLOR);

    // Legend.
    let legend_x = MARGIN_LEFT + 8.0;
    let _ = writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"12\" height=\"4\" fill=\"{}\"/>\
         <text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\">H0</text>",
        legend_x,
        MARGIN_TOP + 2.0,
        H0_COLOR,
        legend_x + 16.0,
        MARGIN_TOP + 8.0
    );
    let _ = writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"12\" height=\"4\" fill=\"{}\"/>\
         <text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\">Hk</text>",
        legend_x,
        MARGIN_TOP + 16.0,
        HK_COLOR,
        legend_x + 16.0,
        MARGIN_TOP + 22.0
    );
    let _ = writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" \
         text-anchor=\"middle\">window</text>",
        MARGIN_LEFT + plot_width() / 2.0,
        HEIGHT - 12.0
    );
    out.push_str("</svg>\n");
    out
}

fn polyline(
    out: &mut String,
    series: &[WindowMetrics],
    y_max: f64,
    value: impl Fn(&cantus_metrics::analysis::MetricsRecord) -> f64,
    color: &str,
) {
    let baseline = HEIGHT - MARGIN_BOTTOM;
    let step = if series.len() > 1 {
        plot_width() / (series.len() - 1) as f64
    } else {
        0.0
    };
    let mut points = String::new();
    for (index, window) in series.iter().enumerate() {
        let x = if series.len() > 1 {
            MARGIN_LEFT + step * index as f64
        } else {
            MARGIN_LEFT + plot_width() / 2.0
        };
        let y = baseline - (value(&window.metrics).max(0.0) / y_max) * plot_height();
        let _ = write!(points, "{:.1},{:.1} ", x, y);
    }
    let _ = writeln!(
        out,
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
        points.trim_end(),
        color
    );
}

fn empty_chart(title: &str, message: &str) -> String {
    let mut out = String::new();
    svg_open(&mut out, title);
    let _ = writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"13\" \
         text-anchor=\"middle\">{}</text>",
        WIDTH / 2.0,
        HEIGHT / 2.0,
        xml_escape(message)
    );
    out.push_str("</svg>\n");
    out
}
