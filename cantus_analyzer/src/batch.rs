// Folder-level analysis.
//
// Each file's computation is independent and stateless, so the fan-out is
// parallelized with rayon; results come back ordered by path regardless of
// completion order. The first failing file aborts the batch; partial
// results are never reported as a successful run.

use crate::error::LoadError;
use crate::piece::{InputType, PieceAnalysis, analyze_piece};
use cantus_metrics::analysis::AnalysisConfig;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Analyze every matching file in a folder.
///
/// Files are filtered by the input type's extensions and by a simple glob
/// pattern (`*` and `?`) against the file name, then analyzed in parallel.
pub fn analyze_folder(
    folder: &Path,
    input_type: InputType,
    config: &AnalysisConfig,
    pattern: &str,
) -> Result<Vec<PieceAnalysis>, LoadError> {
    if !folder.exists() {
        return Err(LoadError::NotFound(folder.to_path_buf()));
    }
    let entries = std::fs::read_dir(folder).map_err(|source| LoadError::Io {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| input_type.matches_extension(path))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| glob_match(pattern, name))
        })
        .collect();
    paths.sort();

    paths
        .par_iter()
        .map(|path| analyze_piece(path, input_type, config))
        .collect()
}

/// Minimal glob matching: `*` matches any run of characters, `?` exactly
/// one. Case-sensitive, like shell globs.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    fn matches(pattern: &[char], name: &[char]) -> bool {
        match pattern.first() {
            None => name.is_empty(),
            Some('*') => {
                matches(&pattern[1..], name)
                    || (!name.is_empty() && matches(pattern, &name[1..]))
            }
            Some('?') => !name.is_empty() && matches(&pattern[1..], &name[1..]),
            Some(&ch) => name.first() == Some(&ch) && matches(&pattern[1..], &name[1..]),
        }
    }
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    matches(&pattern, &name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_piece(dir: &Path, name: &str, melody: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        write!(
            file,
            r#"{{"melody": [{}], "rhythm": [1, 1, 0, 1]}}"#,
            melody
        )
        .unwrap();
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*", "anything.json"));
        assert!(glob_match("*.json", "piece.json"));
        assert!(!glob_match("*.json", "piece.csv"));
        assert!(glob_match("piece_?.json", "piece_1.json"));
        assert!(!glob_match("piece_?.json", "piece_12.json"));
        assert!(glob_match("", ""));
    }

    #[test]
    fn test_analyze_folder_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_piece(dir.path(), "b.json", r#""C4", "D4""#);
        write_piece(dir.path(), "a.json", r#""E4", "F4""#);
        write_piece(dir.path(), "ignored.csv", r#""C4""#);

        let results = analyze_folder(
            dir.path(),
            InputType::Json,
            &AnalysisConfig::default(),
            "*",
        )
        .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].path.ends_with("a.json"));
        assert!(results[1].path.ends_with("b.json"));
    }

    #[test]
    fn test_analyze_folder_pattern_filter() {
        let dir = tempfile::tempdir().unwrap();
        write_piece(dir.path(), "keep_1.json", r#""C4""#);
        write_piece(dir.path(), "skip.json", r#""D4""#);

        let results = analyze_folder(
            dir.path(),
            InputType::Json,
            &AnalysisConfig::default(),
            "keep_*",
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].path.ends_with("keep_1.json"));
    }

    #[test]
    fn test_analyze_folder_missing() {
        let err = analyze_folder(
            Path::new("/nonexistent/folder"),
            InputType::Json,
            &AnalysisConfig::default(),
            "*",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_analyze_folder_propagates_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("broken.json")).unwrap();
        write!(file, "not json at all").unwrap();

        let err = analyze_folder(
            dir.path(),
            InputType::Json,
            &AnalysisConfig::default(),
            "*",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
