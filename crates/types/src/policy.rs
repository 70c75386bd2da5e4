//! Acceptance policy applied to files offered by a drop or a file dialog.
//!
//! The rules follow the browser drop-zone conventions: a single-file policy
//! rejects every file of a multi-file drop, a file matches the type filter
//! when either its MIME type or its extension is listed, and anything above
//! `max_size` is too large. Every failed rule is recorded, so one rejection
//! can carry several reasons.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CandidateFile, SelectedFile};

/// Largest file accepted by the default policy (20 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 20 * 1024 * 1024;

/// Filter deciding which offered files may become the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptPolicy {
    /// Whether more than one file may be offered at once.
    pub multiple: bool,
    /// Inclusive upper bound on file size, in bytes.
    pub max_size: u64,
    /// MIME type to extensions (with leading dot). Empty accepts everything.
    pub accept: IndexMap<String, Vec<String>>,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self::pdf()
    }
}

impl AcceptPolicy {
    /// One PDF at a time, at most 20 MiB.
    pub fn pdf() -> Self {
        let mut accept = IndexMap::new();
        accept.insert("application/pdf".to_string(), vec![".pdf".to_string()]);
        Self {
            multiple: false,
            max_size: DEFAULT_MAX_SIZE,
            accept,
        }
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Every accepted extension, in declaration order.
    pub fn accepted_extensions(&self) -> impl Iterator<Item = &str> {
        self.accept.values().flatten().map(String::as_str)
    }

    /// Returns `true` when `name` ends with one of the accepted extensions.
    pub fn matches_extension(&self, name: &str) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        let name = name.to_ascii_lowercase();
        self.accepted_extensions()
            .any(|extension| name.ends_with(&extension.to_ascii_lowercase()))
    }

    /// Returns `true` when the MIME type or the name of `file` is accepted.
    pub fn matches_type(&self, file: &CandidateFile) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        let mime_matches = file
            .mime_type
            .as_deref()
            .is_some_and(|mime| self.accept.keys().any(|pattern| mime_matches_pattern(mime, pattern)));
        mime_matches || self.matches_extension(&file.name)
    }

    /// Splits `files` into accepted files and rejections.
    pub fn evaluate(&self, files: Vec<CandidateFile>) -> DropOutcome {
        let count = files.len();
        let too_many = !self.multiple && count > 1;
        let mut outcome = DropOutcome::default();

        for file in files {
            let mut reasons = Vec::new();
            if !self.matches_type(&file) {
                reasons.push(RejectionReason::UnsupportedType {
                    accepted: self.accepted_extensions().map(str::to_owned).collect(),
                });
            }
            if file.size_bytes > self.max_size {
                reasons.push(RejectionReason::TooLarge {
                    size: file.size_bytes,
                    max: self.max_size,
                });
            }
            if too_many {
                reasons.push(RejectionReason::TooMany { count });
            }

            if reasons.is_empty() {
                outcome.accepted.push(SelectedFile::from(file));
            } else {
                outcome.rejected.push(FileRejection { file, reasons });
            }
        }

        outcome
    }
}

fn mime_matches_pattern(mime: &str, pattern: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();
    match pattern.strip_suffix("/*") {
        Some(base) => mime.split('/').next() == Some(base),
        None => mime == pattern,
    }
}

/// Why an offered file did not become the selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("file type must be one of {}", .accepted.join(", "))]
    UnsupportedType { accepted: Vec<String> },
    #[error("file is {size} bytes, larger than the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
    #[error("{count} files offered but only one is accepted")]
    TooMany { count: usize },
    #[error("file could not be read: {reason}")]
    Unreadable { reason: String },
}

/// An offered file together with every rule it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRejection {
    pub file: CandidateFile,
    pub reasons: Vec<RejectionReason>,
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.file.name)?;
        for (index, reason) in self.reasons.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

/// Result of applying the policy to one drop or dialog choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOutcome {
    pub accepted: Vec<SelectedFile>,
    pub rejected: Vec<FileRejection>,
}

impl DropOutcome {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn default_policy_accepts_a_single_small_pdf() {
        let outcome = AcceptPolicy::default().evaluate(vec![CandidateFile::new("resume.pdf", 15 * MIB)]);
        assert_eq!(outcome.accepted, vec![SelectedFile::new("resume.pdf", 15_728_640)]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn exactly_max_size_is_accepted_one_byte_more_is_not() {
        let policy = AcceptPolicy::default();
        let outcome = policy.evaluate(vec![CandidateFile::new("edge.pdf", DEFAULT_MAX_SIZE)]);
        assert_eq!(outcome.accepted.len(), 1);

        let outcome = policy.evaluate(vec![CandidateFile::new("edge.pdf", DEFAULT_MAX_SIZE + 1)]);
        assert_eq!(
            outcome.rejected[0].reasons,
            vec![RejectionReason::TooLarge {
                size: DEFAULT_MAX_SIZE + 1,
                max: DEFAULT_MAX_SIZE
            }]
        );
    }

    #[test]
    fn docx_is_rejected_as_unsupported_type() {
        let outcome = AcceptPolicy::default().evaluate(vec![CandidateFile::new("letter.docx", 1024)]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(
            outcome.rejected[0].reasons,
            vec![RejectionReason::UnsupportedType {
                accepted: vec![".pdf".to_string()]
            }]
        );
    }

    #[test]
    fn multi_file_drop_rejects_every_file_when_single() {
        let outcome = AcceptPolicy::default().evaluate(vec![
            CandidateFile::new("a.pdf", 10),
            CandidateFile::new("b.pdf", 20),
        ]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 2);
        assert!(
            outcome
                .rejected
                .iter()
                .all(|rejection| rejection.reasons == vec![RejectionReason::TooMany { count: 2 }])
        );

        let outcome = AcceptPolicy::default().with_multiple(true).evaluate(vec![
            CandidateFile::new("a.pdf", 10),
            CandidateFile::new("b.pdf", 20),
        ]);
        assert_eq!(outcome.accepted.len(), 2);
    }

    #[test]
    fn extension_or_mime_type_is_enough_to_match() {
        let policy = AcceptPolicy::default();
        assert!(policy.matches_type(&CandidateFile::new("SCAN.PDF", 1)));
        let renamed = CandidateFile::new("scan.bin", 1).with_mime_type(Some("application/pdf".to_string()));
        assert!(policy.matches_type(&renamed));
        assert!(!policy.matches_type(&CandidateFile::new("scan.bin", 1)));
    }

    #[test]
    fn wildcard_mime_patterns_match_the_base_type() {
        let mut accept = IndexMap::new();
        accept.insert("image/*".to_string(), Vec::new());
        let policy = AcceptPolicy {
            multiple: true,
            max_size: u64::MAX,
            accept,
        };
        assert!(policy.matches_type(&CandidateFile::new("photo.png", 1)));
        assert!(!policy.matches_type(&CandidateFile::new("resume.pdf", 1)));
    }

    #[test]
    fn rejection_lists_every_reason() {
        let outcome = AcceptPolicy::default().evaluate(vec![CandidateFile::new("huge.docx", 30 * MIB)]);
        let rejection = &outcome.rejected[0];
        assert_eq!(rejection.reasons.len(), 2);
        assert_eq!(
            rejection.to_string(),
            "huge.docx: file type must be one of .pdf; file is 31457280 bytes, larger than the 20971520 byte limit"
        );
    }
}
