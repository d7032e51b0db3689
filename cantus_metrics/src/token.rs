// Symbolic tokens and input standardization.
//
// Loaders hand the analysis layer raw melodic tokens that may be MIDI
// numbers, numeric strings, or note names like "C#4"/"Db3". Before encoding,
// melodies are standardized: anything that can be read as a pitch becomes a
// `Token::Pitch`, everything else stays a `Token::Text` and is treated as an
// opaque symbol. Rhythm values are forced down to a binary activation flag.
//
// Standardization never fails; an unrecognized melodic token is still a
// valid symbol, it just won't merge with any pitch spelling of itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single melodic symbol: either a concrete pitch (MIDI number) or an
/// opaque text token that did not parse as one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Pitch(i64),
    Text(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pitch(p) => write!(f, "{}", p),
            Token::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<i64> for Token {
    fn from(pitch: i64) -> Self {
        Token::Pitch(pitch)
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Text(text.to_string())
    }
}

/// Semitone offsets of the natural note letters within an octave.
fn note_letter_semitones(letter: char) -> Option<i64> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Convert a note name like `C#4` or `Db3` to its MIDI number.
///
/// Accepts a note letter (either case), an optional `#` or `b` accidental,
/// and a signed octave. MIDI convention: C4 = 60, so the number is
/// `(octave + 1) * 12 + semitone`. Returns `None` for anything that does
/// not match this shape.
pub fn note_name_to_midi(note: &str) -> Option<i64> {
    let trimmed = note.trim();
    let mut chars = trimmed.chars();
    let base = note_letter_semitones(chars.next()?)?;
    let rest = chars.as_str();
    let (accidental, octave_text) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };
    if octave_text.is_empty() {
        return None;
    }
    let octave: i64 = octave_text.parse().ok()?;
    Some((octave + 1) * 12 + base + accidental)
}

/// Standardize a melody: numeric strings and note names become pitches,
/// anything else is kept verbatim as a text symbol.
pub fn standardize_melody(melody: &[Token]) -> Vec<Token> {
    melody
        .iter()
        .map(|token| match token {
            Token::Pitch(p) => Token::Pitch(*p),
            Token::Text(text) => {
                let trimmed = text.trim();
                if let Ok(number) = trimmed.parse::<i64>() {
                    Token::Pitch(number)
                } else if let Some(midi) = note_name_to_midi(trimmed) {
                    Token::Pitch(midi)
                } else {
                    Token::Text(text.clone())
                }
            }
        })
        .collect()
}

/// Force a rhythm sequence down to binary activation flags: any positive
/// value becomes 1, everything else 0.
pub fn standardize_rhythm(rhythm: &[i64]) -> Vec<u8> {
    rhythm.iter().map(|&value| u8::from(value > 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name_to_midi_basic() {
        assert_eq!(note_name_to_midi("C4"), Some(60));
        assert_eq!(note_name_to_midi("A4"), Some(69));
        assert_eq!(note_name_to_midi("F#3"), Some(54));
        assert_eq!(note_name_to_midi("Db5"), Some(73));
    }

    #[test]
    fn test_note_name_to_midi_lowercase_and_negative_octave() {
        assert_eq!(note_name_to_midi("c4"), Some(60));
        assert_eq!(note_name_to_midi("C-1"), Some(0));
    }

    #[test]
    fn test_note_name_to_midi_rejects_garbage() {
        assert_eq!(note_name_to_midi("H4"), None);
        assert_eq!(note_name_to_midi("C"), None);
        assert_eq!(note_name_to_midi("C#"), None);
        assert_eq!(note_name_to_midi(""), None);
        assert_eq!(note_name_to_midi("4C"), None);
    }

    #[test]
    fn test_standardize_melody_converts_and_keeps() {
        let melody = vec![
            Token::from("C4"),
            Token::from("61"),
            Token::from("X1"),
            Token::Pitch(72),
        ];
        let standardized = standardize_melody(&melody);
        assert_eq!(standardized[0], Token::Pitch(60));
        assert_eq!(standardized[1], Token::Pitch(61));
        assert_eq!(standardized[2], Token::Text("X1".to_string()));
        assert_eq!(standardized[3], Token::Pitch(72));
    }

    #[test]
    fn test_standardize_rhythm_binarizes() {
        assert_eq!(standardize_rhythm(&[1, 0, 1, 0, 2]), vec![1, 0, 1, 0, 1]);
        assert_eq!(standardize_rhythm(&[-3, 0, 5]), vec![0, 0, 1]);
        assert!(standardize_rhythm(&[]).is_empty());
    }

    #[test]
    fn test_token_serde_untagged() {
        let melody: Vec<Token> = serde_json::from_str(r#"["C4", 61]"#).unwrap();
        assert_eq!(melody[0], Token::Text("C4".to_string()));
        assert_eq!(melody[1], Token::Pitch(61));
    }
}
