//! Selection state owned by the file picker widget.

use std::fmt;

use pdfdrop_types::{DropOutcome, FileRejection, SelectedFile};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::{
    app::{FileSelectCallback, RejectCallback},
    ui::drop_target::{DropGesture, DropTarget},
};

/// The picker's own record of what is selected.
///
/// The selection changes through exactly two transitions: an accepted
/// offer replaces it, and the remove control clears it. Rejected offers
/// leave it untouched and are kept only until the next successful
/// transition so the widget can explain them.
pub struct FilePickerState {
    selected: Option<SelectedFile>,
    rejections: Vec<FileRejection>,
    on_file_select: Option<FileSelectCallback>,
    on_reject: Option<RejectCallback>,

    container_focus: FocusFlag,
    pub f_drop_zone: FocusFlag,
    pub f_remove: FocusFlag,
}

impl fmt::Debug for FilePickerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePickerState")
            .field("selected", &self.selected)
            .field("rejections", &self.rejections)
            .finish_non_exhaustive()
    }
}

impl Default for FilePickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePickerState {
    pub fn new() -> Self {
        Self {
            selected: None,
            rejections: Vec::new(),
            on_file_select: None,
            on_reject: None,
            container_focus: FocusFlag::new().with_name("filepicker.container"),
            f_drop_zone: FocusFlag::new().with_name("filepicker.drop_zone"),
            f_remove: FocusFlag::new().with_name("filepicker.remove"),
        }
    }

    /// Registers the callback notified on every selection change.
    pub fn with_on_file_select(mut self, callback: Option<FileSelectCallback>) -> Self {
        self.on_file_select = callback;
        self
    }

    /// Registers the callback notified for each rejected file.
    pub fn with_on_reject(mut self, callback: Option<RejectCallback>) -> Self {
        self.on_reject = callback;
        self
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Rejections from the most recent offer that accepted nothing.
    pub fn rejections(&self) -> &[FileRejection] {
        &self.rejections
    }

    /// Routes a gesture to the drop collaborator and applies whatever it decided.
    pub fn handle_gesture(&mut self, target: &mut dyn DropTarget, gesture: DropGesture) {
        let Some(outcome) = target.root_event(gesture) else {
            return;
        };
        let accepted = target.accepted_files().first().cloned();
        self.apply_outcome(accepted, outcome);
    }

    fn apply_outcome(&mut self, accepted: Option<SelectedFile>, outcome: DropOutcome) {
        let DropOutcome { rejected, .. } = outcome;
        for rejection in &rejected {
            warn!(file = %rejection.file.name, reason = %rejection, "file rejected");
            if let Some(callback) = self.on_reject.as_mut() {
                callback(rejection);
            }
        }

        match accepted {
            Some(file) => {
                info!(file = %file.name, size_bytes = file.size_bytes, "file selected");
                self.rejections = rejected;
                self.selected = Some(file);
                self.notify_selection();
            }
            None => {
                if !rejected.is_empty() {
                    self.rejections = rejected;
                }
            }
        }
    }

    /// Clears the selection and notifies the caller with `None`.
    pub fn clear_selection(&mut self) {
        self.rejections.clear();
        if self.selected.take().is_none() {
            return;
        }
        info!("selection cleared");
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        if let Some(callback) = self.on_file_select.as_mut() {
            callback(self.selected.as_ref());
        }
    }
}

impl HasFocus for FilePickerState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_drop_zone);
        if self.selected.is_some() {
            builder.leaf_widget(&self.f_remove);
        }
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
    use std::{cell::RefCell, rc::Rc};

    use pdfdrop_types::{CandidateFile, RejectionReason};

    use super::*;

    /// Collaborator that replays a canned outcome for every offer.
    #[derive(Default)]
    struct MockDropTarget {
        outcome: DropOutcome,
        accepted: Vec<SelectedFile>,
        drag_active: bool,
        dialog_requests: usize,
    }

    impl MockDropTarget {
        fn offering(outcome: DropOutcome) -> Self {
            Self {
                outcome,
                ..Default::default()
            }
        }
    }

    impl DropTarget for MockDropTarget {
        fn root_event(&mut self, gesture: DropGesture) -> Option<DropOutcome> {
            match gesture {
                DropGesture::DragEnter | DropGesture::DragLeave => {
                    self.drag_active = gesture == DropGesture::DragEnter;
                    None
                }
                DropGesture::Paste(_) | DropGesture::Chosen(_) => {
                    self.accepted = self.outcome.accepted.clone();
                    Some(self.outcome.clone())
                }
            }
        }

        fn open_file_dialog(&mut self) {
            self.dialog_requests += 1;
        }

        fn accepted_files(&self) -> &[SelectedFile] {
            &self.accepted
        }

        fn is_drag_active(&self) -> bool {
            self.drag_active
        }
    }

    type Calls = Rc<RefCell<Vec<Option<SelectedFile>>>>;

    fn recording_state() -> (FilePickerState, Calls) {
        let calls: Calls = Rc::default();
        let sink = Rc::clone(&calls);
        let state = FilePickerState::new().with_on_file_select(Some(Box::new(move |file: Option<&SelectedFile>| {
            sink.borrow_mut().push(file.cloned());
        })));
        (state, calls)
    }

    fn accepted(name: &str, size: u64) -> DropOutcome {
        DropOutcome {
            accepted: vec![SelectedFile::new(name, size)],
            rejected: Vec::new(),
        }
    }

    fn rejected(name: &str, reason: RejectionReason) -> DropOutcome {
        DropOutcome {
            accepted: Vec::new(),
            rejected: vec![FileRejection {
                file: CandidateFile::new(name, 0),
                reasons: vec![reason],
            }],
        }
    }

    #[test]
    fn accepted_offer_selects_and_notifies() {
        let (mut state, calls) = recording_state();
        let mut target = MockDropTarget::offering(accepted("resume.pdf", 42));

        state.handle_gesture(&mut target, DropGesture::Paste("resume.pdf".into()));

        assert_eq!(state.selected_file(), Some(&SelectedFile::new("resume.pdf", 42)));
        assert_eq!(*calls.borrow(), vec![Some(SelectedFile::new("resume.pdf", 42))]);
    }

    #[test]
    fn rejected_offer_keeps_the_previous_selection() {
        let (mut state, calls) = recording_state();
        state.handle_gesture(&mut MockDropTarget::offering(accepted("resume.pdf", 42)), DropGesture::Chosen(vec![]));

        let rejections: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&rejections);
        let mut state = state.with_on_reject(Some(Box::new(move |rejection: &FileRejection| {
            sink.borrow_mut().push(rejection.to_string());
        })));
        let mut target = MockDropTarget::offering(rejected("cv.docx", RejectionReason::TooMany { count: 2 }));
        state.handle_gesture(&mut target, DropGesture::Paste("cv.docx".into()));

        assert_eq!(state.selected_file().map(|file| file.name.as_str()), Some("resume.pdf"));
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(state.rejections().len(), 1);
        assert_eq!(*rejections.borrow(), vec!["cv.docx: 2 files offered but only one is accepted".to_string()]);
    }

    #[test]
    fn clearing_notifies_with_none_once() {
        let (mut state, calls) = recording_state();
        state.handle_gesture(&mut MockDropTarget::offering(accepted("resume.pdf", 42)), DropGesture::Chosen(vec![]));

        state.clear_selection();
        state.clear_selection();

        assert!(state.selected_file().is_none());
        assert_eq!(*calls.borrow(), vec![Some(SelectedFile::new("resume.pdf", 42)), None]);
    }

    #[test]
    fn hover_gestures_do_not_touch_the_selection() {
        let (mut state, calls) = recording_state();
        let mut target = MockDropTarget::default();

        state.handle_gesture(&mut target, DropGesture::DragEnter);
        assert!(target.is_drag_active());
        state.handle_gesture(&mut target, DropGesture::DragLeave);

        assert!(!target.is_drag_active());
        assert!(state.selected_file().is_none());
        assert!(calls.borrow().is_empty());
        target.open_file_dialog();
        assert_eq!(target.dialog_requests, 1);
    }
}
