// JSON and CSV input: melody and rhythm sequences from text files.
//
// JSON is an object with "melody" and "rhythm" arrays:
//     {"melody": ["C4", "D4", 64], "rhythm": [1, 1, 0]}
//
// CSV accepts three layouts:
//     melody,rhythm
//     C4 D4 E4,"1 1 0"
// or row-per-sequence:
//     type,sequence
//     melody,"C4,D4,E4"
//     rhythm,"1,1,0"
// or, as a fallback, any file whose first column holds melody cells and
// second column rhythm cells. Cells split on commas and whitespace; quoted
// fields are honored.
//
// Melody tokens stay raw here (standardization happens in the core);
// rhythm entries must parse as integers; anything else is a load error.

use crate::error::LoadError;
use cantus_metrics::token::Token;
use serde_json::Value;
use std::path::Path;

/// Raw sequences from a JSON or CSV file.
#[derive(Debug, Clone)]
pub struct TextSequence {
    pub melody: Vec<Token>,
    pub rhythm: Vec<i64>,
}

/// Load symbolic sequences from a `.json` or `.csv` file.
pub fn load_text_sequence(path: &Path) -> Result<TextSequence, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => parse_json(&content),
        "csv" => parse_csv(&content),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a JSON document with "melody" and "rhythm" arrays.
pub fn parse_json(content: &str) -> Result<TextSequence, LoadError> {
    let document: Value = serde_json::from_str(content)?;
    let melody_values = document
        .get("melody")
        .and_then(Value::as_array)
        .ok_or(LoadError::MissingKeys)?;
    let rhythm_values = document
        .get("rhythm")
        .and_then(Value::as_array)
        .ok_or(LoadError::MissingKeys)?;

    let melody = melody_values.iter().map(value_to_token).collect();
    let rhythm = rhythm_values
        .iter()
        .map(value_to_rhythm)
        .collect::<Result<Vec<i64>, LoadError>>()?;
    Ok(TextSequence { melody, rhythm })
}

fn value_to_token(value: &Value) -> Token {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(Token::Pitch)
            .unwrap_or_else(|| Token::Text(number.to_string())),
        Value::String(text) => Token::Text(text.clone()),
        other => Token::Text(other.to_string()),
    }
}

fn value_to_rhythm(value: &Value) -> Result<i64, LoadError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .ok_or_else(|| LoadError::BadRhythmValue(number.to_string())),
        Value::String(text) => parse_rhythm_token(text),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        other => Err(LoadError::BadRhythmValue(other.to_string())),
    }
}

fn parse_rhythm_token(token: &str) -> Result<i64, LoadError> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|_| LoadError::BadRhythmValue(token.to_string()))
}

/// Parse a CSV document in any of the supported layouts.
pub fn parse_csv(content: &str) -> Result<TextSequence, LoadError> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| LoadError::BadCsv("empty file".to_string()))?;
    let columns: Vec<String> = split_csv_line(header)
        .into_iter()
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let rows: Vec<Vec<String>> = lines.map(split_csv_line).collect();

    let column_index = |name: &str| columns.iter().position(|c| c == name);

    if let (Some(melody_col), Some(rhythm_col)) = (column_index("melody"), column_index("rhythm")) {
        let mut melody = Vec::new();
        let mut rhythm = Vec::new();
        for row in &rows {
            if let Some(cell) = row.get(melody_col).filter(|c| !c.is_empty()) {
                melody.extend(parse_cell_tokens(cell));
            }
            if let Some(cell) = row.get(rhythm_col).filter(|c| !c.is_empty()) {
                for token in split_cell(cell) {
                    rhythm.push(parse_rhythm_token(&token)?);
                }
            }
        }
        return Ok(TextSequence { melody, rhythm });
    }

    if let (Some(type_col), Some(seq_col)) = (column_index("type"), column_index("sequence")) {
        let mut melody = Vec::new();
        let mut rhythm = Vec::new();
        for row in &rows {
            let kind = row
                .get(type_col)
                .map(|c| c.trim().to_ascii_lowercase())
                .unwrap_or_default();
            let Some(cell) = row.get(seq_col) else {
                continue;
            };
            match kind.as_str() {
                "melody" => melody.extend(parse_cell_tokens(cell)),
                "rhythm" => {
                    for token in split_cell(cell) {
                        rhythm.push(parse_rhythm_token(&token)?);
                    }
                }
                _ => {}
            }
        }
        if melody.is_empty() || rhythm.is_empty() {
            return Err(LoadError::BadCsv(
                "CSV with type/sequence must include both melody and rhythm rows".to_string(),
            ));
        }
        return Ok(TextSequence { melody, rhythm });
    }

    // Fallback: first column melody, second column rhythm.
    if columns.len() >= 2 {
        let mut melody = Vec::new();
        let mut rhythm = Vec::new();
        for row in &rows {
            if let Some(cell) = row.first().filter(|c| !c.is_empty()) {
                melody.extend(parse_cell_tokens(cell));
            }
            if let Some(cell) = row.get(1).filter(|c| !c.is_empty()) {
                for token in split_cell(cell) {
                    rhythm.push(parse_rhythm_token(&token)?);
                }
            }
        }
        return Ok(TextSequence { melody, rhythm });
    }

    Err(LoadError::BadCsv(
        "include columns melody/rhythm or type/sequence".to_string(),
    ))
}

/// Split one CSV line into fields, honoring double-quoted cells with
/// doubled-quote escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Split a cell value into bare tokens on commas and whitespace.
fn split_cell(cell: &str) -> Vec<String> {
    cell.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn parse_cell_tokens(cell: &str) -> Vec<Token> {
    split_cell(cell)
        .into_iter()
        .map(|token| match token.parse::<i64>() {
            Ok(number) => Token::Pitch(number),
            Err(_) => Token::Text(token),
        })
        .collect()
}
