//! Seed keyword files: one keyword per line, `#` starts a comment line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Read seed keywords, skipping blank and `#` lines. Surrounding whitespace is trimmed.
pub fn read_seeds<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut seeds = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let seed = line.trim();
        if seed.is_empty() || seed.starts_with('#') {
            continue;
        }
        seeds.push(seed.to_string());
    }
    Ok(seeds)
}

pub fn load_seeds<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let seeds = read_seeds(BufReader::new(File::open(path.as_ref())?))?;
    debug!(path = %path.as_ref().display(), seeds = seeds.len(), "loaded seed keywords");
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# colegios\ncolegio quito\n\n   \n  matricula 2026  \n#pension\nbilingue\n";
        let seeds = read_seeds(text.as_bytes()).unwrap();
        assert_eq!(seeds, vec!["colegio quito", "matricula 2026", "bilingue"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_seeds("/definitely/not/here/seeds.txt").unwrap_err();
        assert!(matches!(err, ScoringError::Io(_)));
    }
}
