use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File held by the picker after it passed the acceptance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    /// Display name, usually the final path component.
    pub name: String,
    /// Size reported by the file system.
    pub size_bytes: u64,
    /// Local path the collaborator resolved the file from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: None,
        }
    }
}

impl From<CandidateFile> for SelectedFile {
    fn from(candidate: CandidateFile) -> Self {
        Self {
            name: candidate.name,
            size_bytes: candidate.size_bytes,
            path: candidate.path,
        }
    }
}

/// A file offered to the picker, before the acceptance policy has run.
///
/// The MIME type is derived from the name's extension, which mirrors what
/// browsers report for files picked from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub path: Option<PathBuf>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let mime_type = mime_type_for_name(&name).map(str::to_owned);
        Self {
            name,
            size_bytes,
            mime_type,
            path: None,
        }
    }

    /// Attaches the local path the file was resolved from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Overrides the MIME type derived from the name.
    pub fn with_mime_type(mut self, mime_type: Option<String>) -> Self {
        self.mime_type = mime_type;
        self
    }
}

/// Returns the MIME type commonly reported for the extension of `name`.
pub fn mime_type_for_name(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

/// Entry listed by the file browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub is_directory: bool,
    pub size_bytes: u64,
}

impl DirectoryEntry {
    /// Final path component, falling back to the whole path for roots.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_follows_extension_case_insensitively() {
        assert_eq!(mime_type_for_name("resume.pdf"), Some("application/pdf"));
        assert_eq!(mime_type_for_name("RESUME.PDF"), Some("application/pdf"));
        assert_eq!(mime_type_for_name("archive.tar.gz"), None);
        assert_eq!(mime_type_for_name("no_extension"), None);
    }

    #[test]
    fn selected_file_serializes_with_camel_case_size() {
        let file = SelectedFile::new("resume.pdf", 15_728_640);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "resume.pdf", "sizeBytes": 15_728_640 }));
    }
}
