//! State container for the file browser modal.

use std::path::{Path, PathBuf};

use dirs_next::home_dir;
use pdfdrop_types::{AcceptPolicy, DirectoryEntry};
use pdfdrop_util::{read_directory_entries, resolve_user_path};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};
use tracing::warn;
use url::Url;

use crate::ui::components::common::TextInputState;

/// What committing the current selection did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommit {
    /// The browser moved into another directory and stays open.
    Navigated,
    /// A file was chosen; the dialog should close and offer it.
    Chosen(PathBuf),
}

/// UI state backing the file browser modal.
///
/// The state tracks the active directory, the highlighted entry and the focus
/// graph used for keyboard navigation between controls. It also owns the
/// `TextInputState` that accepts a typed path or `file://` URL, and validates
/// that input before a selection is committed.
#[derive(Debug, Clone)]
pub struct FileBrowserState {
    policy: AcceptPolicy,
    cur_dir: PathBuf,
    entries: Vec<DirectoryEntry>,
    has_parent_entry: bool,
    listing_error: Option<String>,

    list_state: ListState,
    path_input_state: TextInputState,
    user_input_error: Option<String>,
    mouse_over_idx: Option<usize>,

    container_focus: FocusFlag,
    pub f_path_input: FocusFlag,
    pub f_list: FocusFlag,
    pub f_cancel: FocusFlag,
    pub f_confirm: FocusFlag,
}

impl FileBrowserState {
    /// Opens the browser in `start_dir`, falling back to the home directory.
    pub fn new(policy: AcceptPolicy, start_dir: Option<PathBuf>) -> Self {
        let cur_dir = start_dir
            .filter(|dir| dir.is_dir())
            .or_else(home_dir)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut state = Self {
            policy,
            cur_dir: cur_dir.clone(),
            entries: Vec::new(),
            has_parent_entry: false,
            listing_error: None,
            list_state: ListState::default(),
            path_input_state: TextInputState::new(),
            user_input_error: None,
            mouse_over_idx: None,
            container_focus: FocusFlag::new().with_name("filebrowser.container"),
            f_path_input: FocusFlag::new().with_name("filebrowser.path_input"),
            f_list: FocusFlag::new().with_name("filebrowser.list"),
            f_cancel: FocusFlag::new().with_name("filebrowser.cancel"),
            f_confirm: FocusFlag::new().with_name("filebrowser.confirm"),
        };
        state.set_cur_dir(cur_dir);
        state
    }

    /// Lists `dir` and selects its first selectable entry.
    pub fn set_cur_dir(&mut self, dir: PathBuf) {
        self.entries.clear();
        self.listing_error = None;
        self.user_input_error = None;
        self.mouse_over_idx = None;
        self.has_parent_entry = false;

        if let Some(parent) = dir.parent() {
            self.entries.push(DirectoryEntry {
                path: parent.to_path_buf(),
                is_directory: true,
                size_bytes: 0,
            });
            self.has_parent_entry = true;
        }
        match read_directory_entries(&dir) {
            Ok(entries) => self.entries.extend(entries),
            Err(error) => {
                warn!(directory = %dir.display(), %error, "failed to list directory");
                self.listing_error = Some(format!("Cannot read {}: {error}", dir.display()));
            }
        }
        self.cur_dir = dir;

        self.list_state = ListState::default();
        let first = (0..self.entries.len()).find(|idx| !self.is_parent_entry(*idx) && self.can_select_idx(*idx));
        self.set_selected_index(first.or(if self.entries.is_empty() { None } else { Some(0) }));
    }

    /// Returns the directory currently being inspected.
    pub fn cur_dir(&self) -> &Path {
        &self.cur_dir
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Error raised while listing the current directory.
    pub fn listing_error(&self) -> Option<&str> {
        self.listing_error.as_deref()
    }

    /// `true` when `idx` is the synthetic `..` entry.
    pub fn is_parent_entry(&self, idx: usize) -> bool {
        self.has_parent_entry && idx == 0
    }

    /// `true` for directories and files the policy could accept.
    pub fn is_entry_accepted(&self, entry: &DirectoryEntry) -> bool {
        entry.is_directory || self.policy.matches_extension(&entry.file_name())
    }

    fn can_select_idx(&self, idx: usize) -> bool {
        self.entries.get(idx).is_some_and(|entry| self.is_entry_accepted(entry))
    }

    /// Highlights `maybe_idx` when it points at a selectable entry.
    pub fn set_selected_index(&mut self, maybe_idx: Option<usize>) -> Option<&DirectoryEntry> {
        let Some(idx) = maybe_idx else {
            self.list_state.select(None);
            return None;
        };
        if !self.can_select_idx(idx) {
            return None;
        }
        self.user_input_error = None;
        self.list_state.select(Some(idx));
        self.entries.get(idx)
    }

    /// Returns the directory entry currently highlighted in the list.
    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.list_state.selected().and_then(|idx| self.entries.get(idx))
    }

    /// Advances selection to the next valid entry, wrapping as needed.
    pub fn select_next(&mut self) -> Option<&DirectoryEntry> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let start = self.list_state.selected().map(|i| i + 1).unwrap_or(0);
        let proposed = (start..start + len).map(|i| i % len).find(|idx| self.can_select_idx(*idx))?;
        self.set_selected_index(Some(proposed))
    }

    /// Moves selection to the previous valid entry, wrapping when necessary.
    pub fn select_previous(&mut self) -> Option<&DirectoryEntry> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let end = self.list_state.selected().unwrap_or(len) + len;
        let proposed = (0..end).rev().map(|i| i % len).find(|idx| self.can_select_idx(*idx))?;
        self.set_selected_index(Some(proposed))
    }

    /// Provides mutable access to the list widget state for rendering and scrolling.
    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    /// Returns the current scroll offset for the list widget.
    pub fn list_state_offset(&self) -> usize {
        self.list_state.offset()
    }

    /// Stores the index the mouse is currently hovering.
    pub fn set_mouse_over_idx(&mut self, maybe_idx: Option<usize>) {
        self.mouse_over_idx = maybe_idx.filter(|idx| *idx < self.entries.len());
    }

    pub fn mouse_over_idx(&self) -> Option<usize> {
        self.mouse_over_idx
    }

    pub fn path_input_state(&self) -> &TextInputState {
        &self.path_input_state
    }

    /// Returns a mutable reference to the underlying path input widget.
    pub fn path_input_state_mut(&mut self) -> &mut TextInputState {
        &mut self.path_input_state
    }

    pub fn insert_path_char(&mut self, c: char) {
        self.path_input_state.insert_char(c);
        self.user_input_error = None;
    }

    pub fn insert_path_str(&mut self, text: &str) {
        self.path_input_state.insert_str(text.trim());
        self.user_input_error = None;
    }

    pub fn backspace_path_char(&mut self) {
        self.path_input_state.backspace();
        self.user_input_error = None;
    }

    pub fn delete_path_char(&mut self) {
        self.path_input_state.delete();
        self.user_input_error = None;
    }

    /// Indicates whether the typed input names an existing local file or directory.
    pub fn is_path_input_valid(&self) -> bool {
        resolve_user_path(self.path_input_state.input()).is_some_and(|path| path.exists())
    }

    /// `true` when the Open button would do something.
    pub fn can_commit(&self) -> bool {
        if self.path_input_state.is_empty() {
            self.selected_entry().is_some()
        } else {
            self.is_path_input_valid()
        }
    }

    /// Shows or clears the inline error rendered beneath the list.
    pub fn set_user_input_error(&mut self, error: Option<String>) {
        self.user_input_error = error;
    }

    pub fn user_input_error(&self) -> Option<&str> {
        self.user_input_error.as_deref()
    }

    /// Commits the typed path when present, otherwise the highlighted entry.
    ///
    /// Directories are entered in place. Returns `None` and records an inline
    /// error when the input cannot be resolved.
    pub fn commit(&mut self) -> Option<BrowserCommit> {
        if !self.path_input_state.is_empty() {
            return self.commit_path_input();
        }
        let entry = self.selected_entry()?.clone();
        if entry.is_directory {
            self.set_cur_dir(entry.path);
            return Some(BrowserCommit::Navigated);
        }
        Some(BrowserCommit::Chosen(entry.path))
    }

    fn commit_path_input(&mut self) -> Option<BrowserCommit> {
        let input = self.path_input_state.input().trim().to_owned();
        let Some(path) = resolve_user_path(&input) else {
            let message = match Url::parse(&input) {
                Ok(url) if url.scheme() != "file" => "Remote files are not supported",
                _ => "Invalid path or url",
            };
            self.user_input_error = Some(message.to_string());
            return None;
        };

        if path.is_dir() {
            self.path_input_state.clear();
            self.set_cur_dir(path);
            return Some(BrowserCommit::Navigated);
        }
        if path.exists() {
            return Some(BrowserCommit::Chosen(path));
        }
        self.user_input_error = Some("Invalid path or url".to_string());
        None
    }
}

impl HasFocus for FileBrowserState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_path_input);
        builder.leaf_widget(&self.f_list);
        builder.leaf_widget(&self.f_cancel);
        builder.leaf_widget(&self.f_confirm);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("letters")).expect("mkdir");
        File::create(dir.path().join("notes.txt")).expect("txt");
        File::create(dir.path().join("resume.pdf")).expect("pdf");
        dir
    }

    #[test]
    fn lists_parent_then_directories_then_files() {
        let dir = fixture();
        let state = FileBrowserState::new(AcceptPolicy::default(), Some(dir.path().to_path_buf()));
        let names: Vec<String> = state.entries().iter().skip(1).map(DirectoryEntry::file_name).collect();
        assert!(state.is_parent_entry(0));
        assert_eq!(names, vec!["letters", "notes.txt", "resume.pdf"]);
    }

    #[test]
    fn navigation_skips_files_the_policy_rejects() {
        let dir = fixture();
        let mut state = FileBrowserState::new(AcceptPolicy::default(), Some(dir.path().to_path_buf()));
        assert_eq!(state.selected_entry().map(DirectoryEntry::file_name).as_deref(), Some("letters"));

        let next = state.select_next().map(DirectoryEntry::file_name);
        assert_eq!(next.as_deref(), Some("resume.pdf"));
        // wraps past the end back to ".."
        assert!(state.select_next().is_some());
        assert_eq!(state.list_state_mut().selected(), Some(0));
        assert_eq!(state.select_previous().map(DirectoryEntry::file_name).as_deref(), Some("resume.pdf"));
    }

    #[test]
    fn committing_a_directory_enters_it() {
        let dir = fixture();
        let mut state = FileBrowserState::new(AcceptPolicy::default(), Some(dir.path().to_path_buf()));
        assert_eq!(state.commit(), Some(BrowserCommit::Navigated));
        assert_eq!(state.cur_dir(), dir.path().join("letters"));
    }

    #[test]
    fn committing_a_file_chooses_it() {
        let dir = fixture();
        let mut state = FileBrowserState::new(AcceptPolicy::default(), Some(dir.path().to_path_buf()));
        state.select_next();
        assert_eq!(state.commit(), Some(BrowserCommit::Chosen(dir.path().join("resume.pdf"))));
    }

    #[test]
    fn typed_paths_are_validated() {
        let dir = fixture();
        let mut state = FileBrowserState::new(AcceptPolicy::default(), Some(dir.path().to_path_buf()));

        state.insert_path_str("https://example.com/cv.pdf");
        assert_eq!(state.commit(), None);
        assert_eq!(state.user_input_error(), Some("Remote files are not supported"));

        state.path_input_state_mut().clear();
        state.insert_path_str(&dir.path().join("missing.pdf").display().to_string());
        assert!(!state.is_path_input_valid());
        assert_eq!(state.commit(), None);
        assert_eq!(state.user_input_error(), Some("Invalid path or url"));

        state.path_input_state_mut().clear();
        let typed = dir.path().join("notes.txt");
        state.insert_path_str(&typed.display().to_string());
        assert!(state.can_commit());
        assert_eq!(state.commit(), Some(BrowserCommit::Chosen(typed)));
    }

    #[test]
    fn unreadable_start_dir_falls_back() {
        let dir = fixture();
        let missing = dir.path().join("nope");
        let state = FileBrowserState::new(AcceptPolicy::default(), Some(missing.clone()));
        assert_ne!(state.cur_dir(), missing);
    }
}
