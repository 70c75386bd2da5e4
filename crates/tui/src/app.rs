//! Application state for the pdfdrop TUI.
//!
//! `App` owns the picker's selection state, the drop collaborator (which in
//! turn owns the file dialog while it is open) and the focus graph. Components
//! never mutate across those boundaries directly; they return [`Effect`]s that
//! `App::apply_effects` carries out.

use std::{fmt, path::PathBuf};

use pdfdrop_types::{AcceptPolicy, FileRejection, SelectedFile};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::{
    components::file_picker::FilePickerState,
    drop_target::{DropGesture, DropTarget, TerminalDropTarget},
    theme::{self, Theme},
};

/// Called with the new selection, or `None` when it is cleared.
pub type FileSelectCallback = Box<dyn FnMut(Option<&SelectedFile>)>;
/// Called once per rejected file.
pub type RejectCallback = Box<dyn FnMut(&FileRejection)>;

/// Side effects requested by components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Forward a gesture to the drop collaborator.
    Gesture(DropGesture),
    OpenFileDialog,
    CloseFileDialog,
    ClearSelection,
    Quit,
}

/// Configuration for one picker session.
#[derive(Default)]
pub struct RunOptions {
    pub policy: AcceptPolicy,
    /// Theme id or alias; `TUI_THEME` still takes precedence.
    pub preferred_theme: Option<String>,
    /// Directory the file dialog opens in.
    pub start_dir: Option<PathBuf>,
    pub on_file_select: Option<FileSelectCallback>,
    pub on_reject: Option<RejectCallback>,
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("policy", &self.policy)
            .field("preferred_theme", &self.preferred_theme)
            .field("start_dir", &self.start_dir)
            .finish_non_exhaustive()
    }
}

/// Cross-cutting shared context owned by the App.
#[derive(Debug)]
pub struct SharedCtx {
    /// Active UI theme
    pub theme: Box<dyn Theme>,
    /// Canonical id of the active theme
    pub theme_id: &'static str,
}

impl SharedCtx {
    pub fn new(preferred_theme: Option<&str>) -> Self {
        let loaded = theme::load(preferred_theme);
        debug!(theme = loaded.definition.id, "theme loaded");
        Self {
            theme: loaded.theme,
            theme_id: loaded.definition.id,
        }
    }
}

pub struct App {
    /// Shared, cross-cutting context (theme)
    pub ctx: SharedCtx,
    /// Selection owned by the drop zone
    pub picker: FilePickerState,
    /// Drop collaborator and the file dialog it opens
    pub drop_target: TerminalDropTarget,
    /// Focus graph, rebuilt before every render
    pub focus: Focus,
    container_focus: FocusFlag,
    /// Set when the user asked to leave
    pub should_quit: bool,
}

impl App {
    pub fn new(options: RunOptions) -> Self {
        let RunOptions {
            policy,
            preferred_theme,
            start_dir,
            on_file_select,
            on_reject,
        } = options;

        let mut app = Self {
            ctx: SharedCtx::new(preferred_theme.as_deref()),
            picker: FilePickerState::new().with_on_file_select(on_file_select).with_on_reject(on_reject),
            drop_target: TerminalDropTarget::new(policy, start_dir),
            focus: Focus::default(),
            container_focus: FocusFlag::new().with_name("app.container"),
            should_quit: false,
        };
        app.focus = FocusBuilder::build_for(&app);
        app.restore_focus();
        app
    }

    /// Rebuilds the focus graph so structural changes (a file selected, the dialog opened) are reflected.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = FocusBuilder::rebuild_for(self, Some(old_focus));
        if self.focus.focused().is_none() {
            self.restore_focus();
        }
    }

    /// Focuses the dialog's list while it is open, the drop zone otherwise.
    pub fn restore_focus(&mut self) {
        match self.drop_target.file_dialog() {
            Some(dialog) => self.focus.focus(&dialog.f_list),
            None => self.focus.focus(&self.picker.f_drop_zone),
        }
    }

    pub fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    pub fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Gesture(gesture) => {
                self.picker.handle_gesture(&mut self.drop_target, gesture);
            }
            Effect::OpenFileDialog => {
                self.drop_target.open_file_dialog();
                self.rebuild_focus();
                self.restore_focus();
            }
            Effect::CloseFileDialog => {
                self.drop_target.close_file_dialog();
                self.rebuild_focus();
                self.restore_focus();
            }
            Effect::ClearSelection => {
                self.picker.clear_selection();
                self.rebuild_focus();
                self.restore_focus();
            }
            Effect::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// The selection at the time of the call.
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.picker.selected_file()
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        match self.drop_target.file_dialog() {
            Some(dialog) => {
                builder.widget(dialog);
            }
            None => {
                builder.widget(&self.picker);
            }
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
    use super::*;

    #[test]
    fn focus_follows_the_dialog() {
        let mut app = App::new(RunOptions::default());
        assert!(app.picker.f_drop_zone.get());

        app.apply_effect(Effect::OpenFileDialog);
        let dialog_list_focused = app.drop_target.file_dialog().is_some_and(|dialog| dialog.f_list.get());
        assert!(dialog_list_focused);

        app.apply_effect(Effect::CloseFileDialog);
        assert!(app.picker.f_drop_zone.get());
    }

    #[test]
    fn quit_only_sets_the_flag() {
        let mut app = App::new(RunOptions::default());
        app.apply_effect(Effect::Quit);
        assert!(app.should_quit);
        assert!(app.selected_file().is_none());
    }
}
