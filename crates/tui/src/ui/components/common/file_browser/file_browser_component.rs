//! Modal file dialog used when the drop zone is activated.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pdfdrop_types::DirectoryEntry;
use pdfdrop_util::format_size;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::state::{BrowserCommit, FileBrowserState};
use crate::{
    app::{App, Effect},
    ui::{
        components::Component,
        drop_target::DropGesture,
        theme::{
            Theme,
            theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
        },
    },
};

/// Layout helper that stores the resolved rectangles for each render region.
#[derive(Debug, Clone, Default)]
struct FileBrowserLayout {
    header_area: Rect,
    header_inner_area: Rect,
    file_list_area: Rect,
    error_message_area: Rect,
    cancel_button_area: Rect,
    open_button_area: Rect,
}

impl From<&[Rect]> for FileBrowserLayout {
    fn from(layout: &[Rect]) -> Self {
        FileBrowserLayout {
            header_area: layout[0],
            header_inner_area: Rect::default(),
            file_list_area: layout[1],
            error_message_area: layout[2],
            cancel_button_area: layout[3],
            open_button_area: layout[4],
        }
    }
}

/// Controller + renderer for the file dialog.
#[derive(Debug, Clone, Default)]
pub struct FileBrowserModal {
    layout: FileBrowserLayout,
}

impl FileBrowserModal {
    fn render_header(&self, frame: &mut Frame, rect: Rect, theme: &dyn Theme, browser: &FileBrowserState) -> Rect {
        let is_focused = browser.f_path_input.get();
        let title = Line::from(Span::styled("Path", theme.text_secondary_style().add_modifier(Modifier::BOLD)));
        let input_block = block(theme, None, is_focused).title(title);
        let inner_area = input_block.inner(rect);

        let path_input_state = browser.path_input_state();
        let path_query = path_input_state.input();
        let content_line = if path_query.is_empty() && !is_focused {
            Line::from(Span::styled(browser.cur_dir().display().to_string(), theme.text_muted_style()))
        } else {
            Line::from(Span::styled(path_query.to_string(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(content_line).block(input_block), rect);
        if is_focused {
            let cursor_x = inner_area.x.saturating_add(path_input_state.cursor_columns() as u16);
            frame.set_cursor_position((cursor_x, inner_area.y));
        }
        inner_area
    }

    fn render_list(&self, frame: &mut Frame, rect: Rect, theme: &dyn Theme, browser: &mut FileBrowserState) {
        let is_focused = browser.f_list.get();
        let items = list_items(theme, browser);
        let list_block = Block::new().borders(Borders::LEFT).border_style(theme.border_style(is_focused));
        let list = List::new(items).block(list_block).highlight_style(theme.selection_style());
        frame.render_stateful_widget(list, rect, browser.list_state_mut());
    }

    fn render_error_message(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme, browser: &FileBrowserState) {
        if let Some(error_message) = browser.user_input_error().or(browser.listing_error()) {
            frame.render_widget(Paragraph::new(error_message.to_string()).style(theme.status_error()), area);
        }
    }

    fn render_buttons(&self, frame: &mut Frame, theme: &dyn Theme, browser: &FileBrowserState) {
        let options = ButtonRenderOptions::new(true, browser.f_cancel.get(), false, Borders::ALL);
        render_button(frame, self.layout.cancel_button_area, "Cancel", theme, options);

        let options = ButtonRenderOptions::new(browser.can_commit(), browser.f_confirm.get(), false, Borders::ALL);
        render_button(frame, self.layout.open_button_area, "Open", theme, options);
    }

    fn maybe_commit_selection(&self, browser: &mut FileBrowserState) -> Vec<Effect> {
        match browser.commit() {
            Some(BrowserCommit::Chosen(path)) => vec![Effect::CloseFileDialog, Effect::Gesture(DropGesture::Chosen(vec![path]))],
            Some(BrowserCommit::Navigated) | None => Vec::new(),
        }
    }

    fn handle_maybe_button_click(&self, pos: Position, browser: &mut FileBrowserState) -> Vec<Effect> {
        if self.layout.cancel_button_area.contains(pos) {
            return vec![Effect::CloseFileDialog];
        }
        if self.layout.open_button_area.contains(pos) {
            return self.maybe_commit_selection(browser);
        }
        Vec::new()
    }
}

fn list_items(theme: &dyn Theme, browser: &FileBrowserState) -> Vec<ListItem<'static>> {
    let hovered = browser.mouse_over_idx();
    browser
        .entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let item = entry_item(theme, browser, idx, entry);
            if hovered == Some(idx) {
                item.style(theme.selection_style().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect()
}

fn entry_item(theme: &dyn Theme, browser: &FileBrowserState, idx: usize, entry: &DirectoryEntry) -> ListItem<'static> {
    if browser.is_parent_entry(idx) {
        return ListItem::new(Line::from(Span::styled("/..", theme.accent_primary_style())));
    }
    let name = entry.file_name();
    if entry.is_directory {
        return ListItem::new(Line::from(Span::styled(format!("/{name}"), theme.accent_primary_style())));
    }
    let name_style = if browser.is_entry_accepted(entry) {
        theme.text_primary_style()
    } else {
        theme.text_muted_style().add_modifier(Modifier::DIM)
    };
    ListItem::new(Line::from(vec![
        Span::styled(name, name_style),
        Span::styled(format!("  {}", format_size(entry.size_bytes)), theme.text_muted_style()),
    ]))
}

impl Component for FileBrowserModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(browser) = app.drop_target.file_dialog_mut() else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => return vec![Effect::CloseFileDialog],

            KeyCode::Enter | KeyCode::Char(' ') if browser.f_cancel.get() => return vec![Effect::CloseFileDialog],

            KeyCode::Enter if browser.f_path_input.get() => return self.maybe_commit_selection(browser),

            KeyCode::Enter | KeyCode::Char(' ') if browser.f_list.get() || browser.f_confirm.get() => {
                return self.maybe_commit_selection(browser);
            }

            KeyCode::Char(character)
                if browser.f_path_input.get()
                    && !character.is_control()
                    && (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) =>
            {
                browser.insert_path_char(character);
            }

            KeyCode::Backspace if browser.f_path_input.get() => browser.backspace_path_char(),
            KeyCode::Delete if browser.f_path_input.get() => browser.delete_path_char(),
            KeyCode::Left if browser.f_path_input.get() => browser.path_input_state_mut().move_left(),
            KeyCode::Right if browser.f_path_input.get() => browser.path_input_state_mut().move_right(),
            KeyCode::Home if browser.f_path_input.get() => browser.path_input_state_mut().move_home(),
            KeyCode::End if browser.f_path_input.get() => browser.path_input_state_mut().move_end(),

            KeyCode::Backspace if browser.f_list.get() => {
                if let Some(parent) = browser.cur_dir().parent().map(|parent| parent.to_path_buf()) {
                    browser.set_cur_dir(parent);
                }
            }

            KeyCode::Down if browser.f_list.get() => {
                browser.select_next();
            }

            KeyCode::Up if browser.f_list.get() => {
                browser.select_previous();
            }

            KeyCode::Tab => {
                app.focus.next();
            }

            KeyCode::BackTab => {
                app.focus.prev();
            }

            _ => {}
        }

        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let Some(browser) = app.drop_target.file_dialog_mut() else {
            return Vec::new();
        };
        let pos = Position::new(mouse.column, mouse.row);
        let list_area = self.layout.file_list_area;
        let hit_test_list = list_area.contains(pos);
        let idx = hit_test_list.then(|| (pos.y - list_area.y) as usize + browser.list_state_offset());

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Up(MouseButton::Left) => {
                browser.set_mouse_over_idx(idx);
            }
            MouseEventKind::ScrollDown if hit_test_list => {
                browser.list_state_mut().scroll_down_by(1);
            }
            MouseEventKind::ScrollUp if hit_test_list => {
                browser.list_state_mut().scroll_up_by(1);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if hit_test_list {
                    app.focus.focus(&browser.f_list);
                    let already_selected = idx.is_some() && browser.list_state_mut().selected() == idx;
                    if already_selected {
                        return self.maybe_commit_selection(browser);
                    }
                    browser.set_selected_index(idx);
                } else if self.layout.header_area.contains(pos) {
                    let relative_column = mouse.column.saturating_sub(self.layout.header_inner_area.x);
                    let path_input_state = browser.path_input_state_mut();
                    let cursor_index = path_input_state.cursor_index_for_column(relative_column);
                    path_input_state.set_cursor(cursor_index);
                    app.focus.focus(&browser.f_path_input);
                } else {
                    return self.handle_maybe_button_click(pos, browser);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_paste(&mut self, app: &mut App, text: String) -> Vec<Effect> {
        let Some(browser) = app.drop_target.file_dialog_mut() else {
            return Vec::new();
        };
        if browser.f_path_input.get() {
            browser.insert_path_str(&text);
            return Vec::new();
        }
        // A drop onto the open dialog is still a drop.
        vec![Effect::CloseFileDialog, Effect::Gesture(DropGesture::Paste(text))]
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let Some(browser) = app.drop_target.file_dialog_mut() else {
            return;
        };
        let modal_block = block(theme, Some("Open File"), true);
        let mut layout = FileBrowserLayout::from(self.get_preferred_layout(modal_block.inner(rect)).as_slice());
        frame.render_widget(modal_block, rect);

        layout.header_inner_area = self.render_header(frame, layout.header_area, theme, browser);
        self.render_list(frame, layout.file_list_area, theme, browser);
        self.render_error_message(frame, layout.error_message_area, theme, browser);
        self.layout = layout;
        self.render_buttons(frame, theme, browser);
    }

    /// Builds the footer hint line describing the dialog key bindings.
    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let Some(browser) = app.drop_target.file_dialog() else {
            return Vec::new();
        };
        let mut hints = vec![(" Esc", " Cancel "), (" Tab", " Next field ")];
        if browser.f_list.get() {
            hints.push((" ↑/↓", " Navigate "));
            hints.push((" Backspace", " Up a level "));
        }
        if browser.f_list.get() || browser.f_confirm.get() || browser.f_path_input.get() {
            hints.push((" Enter", " Open "));
        }
        build_hint_spans(&*app.ctx.theme, &hints)
    }
}

impl FileBrowserModal {
    /// Calculates the preferred layout for the modal's regions.
    fn get_preferred_layout(&self, area: Rect) -> Vec<Rect> {
        let inner_areas = Layout::vertical([
            Constraint::Length(3), // Path input
            Constraint::Min(3),    // File list
            Constraint::Length(3), // Buttons
        ])
        .split(area);

        let button_areas = Layout::horizontal([
            Constraint::Min(10),    // Error message
            Constraint::Length(10), // Cancel button
            Constraint::Length(1),  // Spacer
            Constraint::Length(10), // Open button
        ])
        .split(inner_areas[2]);

        let error_message = Layout::vertical([
            Constraint::Length(1), // spacer to center the message beside the buttons
            Constraint::Length(1), // error message
        ])
        .split(button_areas[0]);

        vec![
            inner_areas[0],   // Header area
            inner_areas[1],   // File list area
            error_message[1], // Error message area
            button_areas[1],  // Cancel button area
            button_areas[3],  // Open button area
        ]
    }
}
