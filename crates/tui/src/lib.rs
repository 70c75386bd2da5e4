//! # pdfdrop TUI Library
//!
//! A terminal file picker for a single PDF. The user drops a file onto the
//! terminal (delivered as a bracketed paste) or picks one from the built-in
//! file dialog. The picker checks it against an [`AcceptPolicy`], shows its
//! name and size, and lets the user remove it again.
//!
//! ## Architecture
//!
//! The drop zone and the file dialog are components that handle input and
//! render themselves. Anything that changes shared state is returned as an
//! effect and applied by the application state. Deciding which offered files
//! are accepted is delegated to a drop-target collaborator, so the widget
//! only ever sees accepted files and rejections.

mod app;
mod ui;

pub use app::{Effect, FileSelectCallback, RejectCallback, RunOptions};
pub use pdfdrop_types::{AcceptPolicy, FileRejection, RejectionReason, SelectedFile};
pub use ui::components::file_picker::describe_rejection;
pub use ui::drop_target::{DropGesture, DropTarget, TerminalDropTarget};

use anyhow::Result;

/// Runs the picker until the user quits and returns the final selection.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode, drawn to, or
/// restored afterwards.
///
/// # Example
///
/// ```no_run
/// use pdfdrop_tui::{RunOptions, run};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let selection = run(RunOptions::default()).await?;
///     println!("{selection:?}");
///     Ok(())
/// }
/// ```
pub async fn run(options: RunOptions) -> Result<Option<SelectedFile>> {
    ui::runtime::run_app(options).await
}

/// Canonical id for a theme name or alias, if one is registered.
pub fn resolve_theme_id(name: &str) -> Option<&'static str> {
    ui::theme::catalog::resolve(name).map(|definition| definition.id)
}
