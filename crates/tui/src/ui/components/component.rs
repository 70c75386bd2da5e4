//! Component system for the pdfdrop TUI.
//!
//! Components are self-contained UI elements. They read and mutate the state
//! they own through `App`, render themselves into a provided `Rect`, and
//! report anything with wider consequences (opening the file dialog, offering
//! files to the drop collaborator, quitting) back as [`Effect`]s.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::{App, Effect};

/// A trait representing a UI component with its own state and behavior.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: input arrives through `handle_key_events()`,
///    `handle_mouse_events()` and `handle_paste()`
/// 2. **Effects**: the returned effects are applied by `App` after the handler returns
/// 3. **Rendering**: `render()` draws the component into the provided frame area
pub(crate) trait Component {
    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events.
    ///
    /// Hit-testing uses the areas recorded during the last `render()`.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle text delivered by a bracketed paste.
    ///
    /// Terminals deliver files dragged from a desktop file manager this way.
    fn handle_paste(&mut self, _app: &mut App, _text: String) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing,
    /// cursor placement and remembering hit-test areas.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }
}
