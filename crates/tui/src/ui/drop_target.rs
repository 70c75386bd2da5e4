//! Drop-target collaborator for the file picker.
//!
//! The picker never inspects files on its own. A [`DropTarget`] turns raw
//! gestures (a bracketed paste carrying dropped paths, a choice made in the
//! file dialog, the pointer entering or leaving the zone) into accepted and
//! rejected files, using the [`AcceptPolicy`] it was configured with.

use std::path::PathBuf;

use pdfdrop_types::{AcceptPolicy, CandidateFile, DropOutcome, FileRejection, RejectionReason, SelectedFile};
use pdfdrop_util::{candidate_from_path, parse_dropped_paths};
use tracing::debug;

use crate::ui::components::common::FileBrowserState;

/// Raw gestures routed from the widget to the drop collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropGesture {
    /// Text delivered by a bracketed paste; terminals deliver drag-and-drop this way.
    Paste(String),
    /// Paths committed from the native file dialog.
    Chosen(Vec<PathBuf>),
    /// Pointer entered the drop zone.
    DragEnter,
    /// Pointer left the drop zone.
    DragLeave,
}

/// Bindings the picker needs from whatever performs drop handling.
pub trait DropTarget {
    /// Root event binding. Returns an outcome only for gestures that offered files.
    fn root_event(&mut self, gesture: DropGesture) -> Option<DropOutcome>;
    /// Opens the native file dialog.
    fn open_file_dialog(&mut self);
    /// Files accepted by the most recent offer.
    fn accepted_files(&self) -> &[SelectedFile];
    /// True while a drag hovers over the zone.
    fn is_drag_active(&self) -> bool;
}

/// Terminal implementation of [`DropTarget`].
///
/// Dropped paths are resolved on the local filesystem. The file dialog is an
/// in-terminal [`FileBrowserState`] rooted at the last directory visited.
#[derive(Debug)]
pub struct TerminalDropTarget {
    policy: AcceptPolicy,
    accepted: Vec<SelectedFile>,
    drag_active: bool,
    start_dir: Option<PathBuf>,
    file_dialog: Option<FileBrowserState>,
}

impl TerminalDropTarget {
    pub fn new(policy: AcceptPolicy, start_dir: Option<PathBuf>) -> Self {
        Self {
            policy,
            accepted: Vec::new(),
            drag_active: false,
            start_dir,
            file_dialog: None,
        }
    }

    pub fn policy(&self) -> &AcceptPolicy {
        &self.policy
    }

    /// The open file dialog, if any.
    pub fn file_dialog(&self) -> Option<&FileBrowserState> {
        self.file_dialog.as_ref()
    }

    pub fn file_dialog_mut(&mut self) -> Option<&mut FileBrowserState> {
        self.file_dialog.as_mut()
    }

    /// Closes the dialog and remembers where the user left off.
    ///
    /// Pointer moves go to the dialog while it is open, so the hover state is stale.
    pub fn close_file_dialog(&mut self) {
        self.drag_active = false;
        if let Some(dialog) = self.file_dialog.take() {
            self.start_dir = Some(dialog.cur_dir().to_path_buf());
        }
    }

    /// Directory the next dialog opens in.
    pub fn start_dir(&self) -> Option<&PathBuf> {
        self.start_dir.as_ref()
    }

    fn resolve_paths(&self, paths: Vec<PathBuf>) -> DropOutcome {
        let offered = paths.len();
        let too_many = !self.policy.multiple && offered > 1;
        let mut candidates: Vec<CandidateFile> = Vec::with_capacity(offered);
        let mut unreadable: Vec<FileRejection> = Vec::new();
        for path in paths {
            match candidate_from_path(&path) {
                Ok(candidate) => candidates.push(candidate),
                Err(error) => {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    let mut reasons = vec![RejectionReason::Unreadable { reason: error.to_string() }];
                    if too_many {
                        reasons.push(RejectionReason::TooMany { count: offered });
                    }
                    unreadable.push(FileRejection {
                        file: CandidateFile::new(name, 0).with_path(path),
                        reasons,
                    });
                }
            }
        }

        let mut outcome = self.policy.evaluate(candidates);
        // A lone readable file among unreadable ones still counts as a multi-file offer.
        if too_many {
            for selected in outcome.accepted.drain(..) {
                let file = CandidateFile::new(selected.name, selected.size_bytes);
                let file = match selected.path {
                    Some(path) => file.with_path(path),
                    None => file,
                };
                outcome.rejected.push(FileRejection {
                    file,
                    reasons: vec![RejectionReason::TooMany { count: offered }],
                });
            }
        }
        outcome.rejected.extend(unreadable);
        outcome
    }
}

impl DropTarget for TerminalDropTarget {
    fn root_event(&mut self, gesture: DropGesture) -> Option<DropOutcome> {
        let paths = match gesture {
            DropGesture::DragEnter => {
                self.drag_active = true;
                return None;
            }
            DropGesture::DragLeave => {
                self.drag_active = false;
                return None;
            }
            DropGesture::Paste(payload) => parse_dropped_paths(&payload),
            DropGesture::Chosen(paths) => paths,
        };
        self.drag_active = false;
        if paths.is_empty() {
            return None;
        }

        debug!(count = paths.len(), "resolving offered files");
        let outcome = self.resolve_paths(paths);
        self.accepted = outcome.accepted.clone();
        Some(outcome)
    }

    fn open_file_dialog(&mut self) {
        self.drag_active = false;
        if self.file_dialog.is_some() {
            return;
        }
        self.file_dialog = Some(FileBrowserState::new(self.policy.clone(), self.start_dir.clone()));
    }

    fn accepted_files(&self) -> &[SelectedFile] {
        &self.accepted
    }

    fn is_drag_active(&self) -> bool {
        self.drag_active
    }
}
