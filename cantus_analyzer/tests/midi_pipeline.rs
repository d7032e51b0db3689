// Full pipeline over a real MIDI file on disk: write, load, analyze, and
// check the metric record against hand-computed reference values.

use cantus_analyzer::piece::{InputType, analyze_piece};
use cantus_metrics::analysis::AnalysisConfig;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u28},
};

const TOLERANCE: f64 = 1e-4;

/// Six distinct contiguous eighth notes (an ascending scale fragment) at
/// 480 ticks per quarter.
fn scale_fragment_bytes() -> Vec<u8> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(480)),
    ));
    let mut track = Vec::new();
    for &pitch in &[60u8, 62, 64, 65, 67, 69] {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(pitch),
                    vel: u7::new(80),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(240),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOff {
                    key: u7::new(pitch),
                    vel: u7::new(0),
                },
            },
        });
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    let mut bytes = Vec::new();
    smf.write(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_midi_scale_reference_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scale.mid");
    std::fs::write(&path, scale_fragment_bytes()).unwrap();

    let config = AnalysisConfig {
        markov_order: 1,
        time_unit: 0.25,
        ..AnalysisConfig::default()
    };
    let piece = analyze_piece(&path, InputType::Midi, &config).unwrap();
    let combined = &piece.record.combined;

    // Six distinct pitches heard once each: uniform distribution.
    assert!((combined.h0 - 2.5850).abs() < TOLERANCE);
    assert!(combined.hk.abs() < TOLERANCE);
    assert!((combined.hmax - 2.5850).abs() < TOLERANCE);
    assert!((combined.redundancy - 2.5850).abs() < TOLERANCE);
    // Rhythm grid: twelve active steps and a silent tail step.
    assert_eq!(combined.lzc, 2);
    assert!((combined.lzc_normalized - 0.5693).abs() < TOLERANCE);
    assert!((combined.ip - 1.0).abs() < TOLERANCE);
}

#[test]
fn test_midi_local_metrics_series_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scale.mid");
    std::fs::write(&path, scale_fragment_bytes()).unwrap();

    let config = AnalysisConfig {
        markov_order: 1,
        window_size: 4,
        window_step: 1,
        compute_local: true,
        ..AnalysisConfig::default()
    };
    let piece = analyze_piece(&path, InputType::Midi, &config).unwrap();

    // Melody N=6: floor((6-4)/1) + 1 = 3 windows.
    assert_eq!(piece.record.melody.local.as_ref().unwrap().len(), 3);
    // Rhythm N=13: floor((13-4)/1) + 1 = 10 windows.
    assert_eq!(piece.record.rhythm.local.as_ref().unwrap().len(), 10);
}
