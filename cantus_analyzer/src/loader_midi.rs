// MIDI input: extracting a melody line and a binary rhythm grid.
//
// One track is chosen as the representative line (the one with the most
// note-on events, unless the caller picks an index). The melody is the
// sequence of note numbers in onset order. The rhythm is an activation
// grid: note start/end times in beats, quantized at `time_unit` beats per
// step, with a step set to 1 whenever any note sounds during it.
//
// Uses the `midly` crate. Only metrical (ticks-per-beat) timing is
// supported; SMPTE timecode files are rejected.

use crate::error::LoadError;
use cantus_metrics::analysis::ConfigError;
use midly::{MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::collections::BTreeMap;
use std::path::Path;

/// Discrete sequences extracted from one MIDI track.
#[derive(Debug, Clone)]
pub struct MidiSequence {
    /// Note numbers in onset order.
    pub melody: Vec<i64>,
    /// Binary activation grid at `time_unit` resolution.
    pub rhythm: Vec<u8>,
}

/// Load a MIDI file from disk.
pub fn load_midi(
    path: &Path,
    time_unit: f64,
    track_index: Option<usize>,
) -> Result<MidiSequence, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_midi_bytes(&bytes, time_unit, track_index)
}

/// Parse in-memory MIDI data.
pub fn load_midi_bytes(
    bytes: &[u8],
    time_unit: f64,
    track_index: Option<usize>,
) -> Result<MidiSequence, LoadError> {
    if !time_unit.is_finite() || time_unit <= 0.0 {
        return Err(LoadError::Config(ConfigError::InvalidTimeUnit(time_unit)));
    }
    let smf = Smf::parse(bytes)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks) => f64::from(ticks.as_int()),
        Timing::Timecode(..) => return Err(LoadError::SmpteTiming),
    };

    let index = match track_index {
        Some(index) if index >= smf.tracks.len() => {
            return Err(LoadError::TrackIndex {
                index,
                count: smf.tracks.len(),
            });
        }
        Some(index) => index,
        None => select_melody_track(&smf),
    };
    if smf.tracks.is_empty() {
        return Err(LoadError::TrackIndex {
            index,
            count: 0,
        });
    }

    let (melody, intervals) = collect_intervals(&smf.tracks[index], ticks_per_beat);
    let total_beats = intervals
        .iter()
        .map(|&(_, end)| end)
        .fold(0.0_f64, f64::max);
    let rhythm = intervals_to_rhythm(&intervals, total_beats, time_unit);
    Ok(MidiSequence { melody, rhythm })
}

/// Choose the track with the largest number of note-on events.
fn select_melody_track(smf: &Smf<'_>) -> usize {
    let mut best_index = 0;
    let mut best_count = -1i64;
    for (index, track) in smf.tracks.iter().enumerate() {
        let count = track
            .iter()
            .filter(|event| {
                matches!(
                    event.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { vel, .. },
                        ..
                    } if vel.as_int() > 0
                )
            })
            .count() as i64;
        if count > best_count {
            best_index = index;
            best_count = count;
        }
    }
    best_index
}

/// Walk one track, returning the melody note list and the (start, end)
/// sounding intervals in beats. Notes still sounding at track end are
/// closed there.
fn collect_intervals(track: &[TrackEvent<'_>], ticks_per_beat: f64) -> (Vec<i64>, Vec<(f64, f64)>) {
    let mut melody = Vec::new();
    let mut intervals = Vec::new();
    let mut time_acc: u64 = 0;
    let mut active: BTreeMap<u8, f64> = BTreeMap::new();

    for event in track {
        time_acc += u64::from(event.delta.as_int());
        if let TrackEventKind::Midi { message, .. } = event.kind {
            match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    let start = time_acc as f64 / ticks_per_beat;
                    melody.push(i64::from(key.as_int()));
                    active.insert(key.as_int(), start);
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    if let Some(start) = active.remove(&key.as_int()) {
                        intervals.push((start, time_acc as f64 / ticks_per_beat));
                    }
                }
                _ => {}
            }
        }
    }

    let end_time = time_acc as f64 / ticks_per_beat;
    for start in active.into_values() {
        intervals.push((start, end_time));
    }
    (melody, intervals)
}

/// Quantize sounding intervals onto a binary grid of `time_unit`-beat steps.
/// Every note occupies at least one step.
fn intervals_to_rhythm(intervals: &[(f64, f64)], total_beats: f64, time_unit: f64) -> Vec<u8> {
    let n_steps = (((total_beats / time_unit) + 1.0) as usize).max(1);
    let mut rhythm = vec![0u8; n_steps];
    for &(start, end) in intervals {
        let start_idx = (start / time_unit) as usize;
        let end_idx = ((end / time_unit + 0.9999) as usize).max(start_idx + 1);
        for slot in rhythm.iter_mut().take(end_idx.min(n_steps)).skip(start_idx) {
            *slot = 1;
        }
    }
    rhythm
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::{
        Format, Header,
        num::{u4, u7, u15, u28},
    };

    /// Six distinct contiguous eighth notes at 480 ticks per quarter.
    fn eighth_note_scale() -> Vec<u8> {
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
    fn test_load_eighth_note_scale() {
        let sequence = load_midi_bytes(&eighth_note_scale(), 0.25, None).unwrap();
        assert_eq!(sequence.melody, vec![60, 62, 64, 65, 67, 69]);
        // 3.0 beats at 0.25 resolution: 13 steps, the last one silent.
        let mut expected = vec![1u8; 12];
        expected.push(0);
        assert_eq!(sequence.rhythm, expected);
    }

    #[test]
    fn test_explicit_track_index_bounds() {
        let err = load_midi_bytes(&eighth_note_scale(), 0.25, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TrackIndex { index: 3, count: 1 }
        ));
    }

    #[test]
    fn test_rejects_bad_time_unit() {
        let err = load_midi_bytes(&eighth_note_scale(), 0.0, None).unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn test_note_on_velocity_zero_ends_note() {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        let mut track = Vec::new();
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(60),
                    vel: u7::new(80),
                },
            },
        });
        // Running-status style note end: note-on with velocity 0.
        track.push(TrackEvent {
            delta: u28::new(480),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(60),
                    vel: u7::new(0),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();

        let sequence = load_midi_bytes(&bytes, 0.25, None).unwrap();
        assert_eq!(sequence.melody, vec![60]);
        // One beat sounding: steps 0..4 active, final grid step silent.
        assert_eq!(sequence.rhythm, vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_hanging_note_closed_at_track_end() {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        let mut track = Vec::new();
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(64),
                    vel: u7::new(64),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(960),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();

        let sequence = load_midi_bytes(&bytes, 0.5, None).unwrap();
        assert_eq!(sequence.melody, vec![64]);
        // Two beats sounding at 0.5 resolution: 5 steps, first 4 active.
        assert_eq!(sequence.rhythm, vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_empty_track_yields_minimal_grid() {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(480)),
        ));
        smf.tracks.push(vec![TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        }]);
        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();

        let sequence = load_midi_bytes(&bytes, 0.25, None).unwrap();
        assert!(sequence.melody.is_empty());
        assert_eq!(sequence.rhythm, vec![0]);
    }
}
