//! Path helpers for files dropped onto the terminal or typed into the browser.
//!
//! Terminals deliver a drag-and-drop from a desktop file manager as a
//! bracketed paste. Depending on the terminal the payload holds quoted paths,
//! backslash-escaped paths, or `file://` URLs, separated by whitespace or
//! newlines.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use dirs_next::home_dir;
use pdfdrop_types::{CandidateFile, DirectoryEntry};
use percent_encoding::percent_decode_str;
use url::Url;

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Resolves a single path or `file://` URL typed by the user.
///
/// Returns `None` for URLs with any other scheme.
pub fn resolve_user_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("://") {
        let url = Url::parse(trimmed).ok()?;
        return file_url_to_path(&url);
    }
    Some(expand_tilde(trimmed))
}

/// Splits a paste payload into the paths it names.
pub fn parse_dropped_paths(payload: &str) -> Vec<PathBuf> {
    split_shell_words(payload)
        .into_iter()
        .filter_map(|word| resolve_user_path(&word))
        .collect()
}

fn file_url_to_path(url: &Url) -> Option<PathBuf> {
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path()
        .ok()
        .or_else(|| Some(PathBuf::from(percent_decode_str(url.path()).decode_utf8_lossy().into_owned())))
}

/// Whitespace-separated words honoring single quotes, double quotes and
/// (outside Windows) backslash escapes.
fn split_shell_words(payload: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = payload.chars();

    while let Some(character) = chars.next() {
        match (quote, character) {
            (Some(open), c) if c == open => quote = None,
            (Some('"'), '\\') if !cfg!(windows) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(character);
                in_word = true;
            }
            (None, '\\') if !cfg!(windows) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Describes the file at `path` for the acceptance policy.
pub fn candidate_from_path(path: &Path) -> io::Result<CandidateFile> {
    let metadata = fs::metadata(path)?;
    if metadata.is_dir() {
        return Err(io::Error::other("path is a directory"));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(CandidateFile::new(name, metadata.len()).with_path(path))
}

/// Lists `dir` with directories first, each group sorted case-insensitively.
///
/// Entries whose metadata cannot be read are skipped.
pub fn read_directory_entries(dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries: Vec<DirectoryEntry> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            let metadata = fs::metadata(&path).ok()?;
            Some(DirectoryEntry {
                path,
                is_directory: metadata.is_dir(),
                size_bytes: metadata.len(),
            })
        })
        .collect();

    entries.sort_by_cached_key(|entry| (!entry.is_directory, entry.file_name().to_lowercase()));
    Ok(entries)
}
