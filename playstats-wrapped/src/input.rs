//! History file discovery and decoding.

use anyhow::{bail, Context, Result};
use playstats_core::{ingest, RawRecord};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Expand command-line paths into a de-duplicated list of history files.
///
/// Explicit files keep their command-line position. Directories are searched
/// with `pattern` (falling back to any `*.json` file) and their matches are
/// inserted in natural order, so `_2.json` reads before `_10.json`. Record
/// order decides first-seen tie-breaks downstream.
pub fn discover_files(paths: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = glob_in(path, pattern)?;
            if found.is_empty() {
                tracing::debug!(dir = %path.display(), pattern, "No files matched, trying *.json");
                found = glob_in(path, "*.json")?;
            }
            found.sort_by(|a, b| natural_key(a).cmp(&natural_key(b)));
            files.extend(found);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("history path not found: {}", path.display());
        }
    }

    let mut seen = HashSet::new();
    files.retain(|file| seen.insert(file.clone()));

    if files.is_empty() {
        bail!("no history files found");
    }

    tracing::info!(count = files.len(), "Discovered history files");
    Ok(files)
}

fn glob_in(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();
    let entries = glob::glob(&full).with_context(|| format!("invalid file pattern: {}", pattern))?;

    let mut found = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => found.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Unreadable path while searching history files"),
        }
    }
    Ok(found)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u128),
    Text(String),
}

/// Split a path into text and digit runs so embedded numbers compare by value.
fn natural_key(path: &Path) -> Vec<Chunk> {
    let text = path.to_string_lossy();
    let mut chunks = Vec::new();
    let mut rest: &str = &text;

    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        chunks.push(match run.parse::<u128>() {
            Ok(n) if is_digit => Chunk::Number(n),
            _ => Chunk::Text(run.to_string()),
        });
        rest = tail;
    }
    chunks
}

/// Read and decode every file, concatenating records in file order.
pub fn load_records(files: &[PathBuf]) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();

    for file in files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let decoded = ingest::decode_records(&content)
            .with_context(|| format!("failed to decode {}", file.display()))?;

        tracing::debug!(file = %file.display(), records = decoded.len(), "Decoded history file");
        records.extend(decoded);
    }

    Ok(records)
}
