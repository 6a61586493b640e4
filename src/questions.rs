use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::utils::trim_line;

/// Loads the newline-delimited question list, dropping blank lines.
/// File order is preserved; shuffling is the run loop's job.
pub fn load_questions(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions file at {}", path.display()))?;

    let questions: Vec<String> = contents
        .lines()
        .filter_map(trim_line)
        .map(str::to_string)
        .collect();

    if questions.is_empty() {
        bail!("No questions found in {}", path.display());
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_questions(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("questions.txt");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_questions_in_file_order() {
        let (_dir, path) = write_questions("first?\nsecond?\nthird?\n");
        let questions = load_questions(&path).unwrap();
        assert_eq!(questions, vec!["first?", "second?", "third?"]);
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let (_dir, path) = write_questions("first?\r\n\r\n  \nsecond?\r\n");
        let questions = load_questions(&path).unwrap();
        assert_eq!(questions, vec!["first?", "second?"]);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let (_dir, path) = write_questions("  padded question?  \n");
        let questions = load_questions(&path).unwrap();
        assert_eq!(questions, vec!["padded question?"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.txt");
        let err = load_questions(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn blank_only_file_is_an_error() {
        let (_dir, path) = write_questions("\n  \n\t\n\r\n");
        let err = load_questions(&path).unwrap_err();
        assert!(err.to_string().contains("No questions found"));
    }
}
