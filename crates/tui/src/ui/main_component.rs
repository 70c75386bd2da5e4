use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Clear, Paragraph},
};

use super::components::Component;
use super::components::common::FileBrowserModal;
use super::components::file_picker::FilePickerWidget;
use super::theme::theme_helpers as th;
use super::utils::centered_min_max;
use crate::app::{App, Effect};

/// Root view: the drop zone, the file dialog on top of it when open, and the hint bar.
#[derive(Debug, Default)]
pub struct MainView {
    pub picker_view: FilePickerWidget,
    pub file_dialog_view: FileBrowserModal,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The component receiving input: the dialog while it is open, the drop zone otherwise.
    fn active_view(&mut self, app: &App) -> &mut dyn Component {
        if app.drop_target.file_dialog().is_some() {
            &mut self.file_dialog_view
        } else {
            &mut self.picker_view
        }
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.active_view(app).handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        self.active_view(app).handle_mouse_events(app, mouse)
    }

    fn handle_paste(&mut self, app: &mut App, text: String) -> Vec<Effect> {
        self.active_view(app).handle_paste(app, text)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let [body_area, hints_area] = Layout::vertical([
            Constraint::Min(1),    // Drop zone
            Constraint::Length(1), // Hints bar
        ])
        .areas(area);

        self.picker_view.render(frame, body_area, app);

        if app.drop_target.file_dialog().is_some() {
            render_overlay(frame, app);
            let modal_area = centered_min_max(75, 90, Rect::new(0, 0, 60, 14), Rect::new(0, 0, 120, 40), body_area);
            frame.render_widget(Clear, modal_area);
            self.file_dialog_view.render(frame, modal_area, app);
        }

        let hints_widget = Paragraph::new(Line::from(self.get_hint_spans(app))).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, hints_area);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        if app.drop_target.file_dialog().is_some() {
            hint_spans.extend(self.file_dialog_view.get_hint_spans(app));
        } else {
            hint_spans.extend(self.picker_view.get_hint_spans(app));
        }
        hint_spans.extend(th::build_hint_spans(&*app.ctx.theme, &[(" Ctrl+C", " Quit ")]));
        hint_spans
    }
}

/// Dims everything behind the file dialog.
fn render_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), area);
}
