//! Drop zone that shows either an upload prompt or the selected file.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use pdfdrop_types::{AcceptPolicy, FileRejection, RejectionReason};
use pdfdrop_util::{format_size, truncate_to_width};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{BorderType, Borders, Paragraph, Wrap},
};

use crate::{
    app::{App, Effect},
    ui::{
        components::Component,
        drop_target::{DropGesture, DropTarget},
        theme::{
            Theme,
            theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
        },
    },
};

const ZONE_MAX_WIDTH: u16 = 64;
const ZONE_HEIGHT: u16 = 8;
const ERROR_HEIGHT: u16 = 2;
const FILE_GLYPH: &str = "📄";
const UPLOAD_GLYPH: &str = "⇪";

/// Hit-test areas recorded by the last render.
#[derive(Debug, Clone, Default)]
struct FilePickerLayout {
    zone_area: Rect,
    remove_button_area: Rect,
    error_area: Rect,
}

/// Controller + renderer for the drop zone.
#[derive(Debug, Clone, Default)]
pub struct FilePickerWidget {
    layout: FilePickerLayout,
}

impl FilePickerWidget {
    fn render_empty(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme, policy: &AcceptPolicy) {
        let lines = vec![
            Line::from(Span::styled(UPLOAD_GLYPH, theme.accent_primary_style())),
            Line::default(),
            Line::from(vec![
                Span::styled("Click to upload", theme.accent_emphasis_style()),
                Span::styled(" or drag and drop", theme.text_secondary_style()),
            ]),
            Line::from(Span::styled(accept_caption(policy), theme.text_muted_style())),
        ];
        let [content] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);
    }

    fn render_selected(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let Some(file) = app.picker.selected_file() else {
            return;
        };
        let theme = &*app.ctx.theme;
        let [glyph_area, details_area, button_area] = Layout::horizontal([
            Constraint::Length(4), // File glyph
            Constraint::Min(10),   // Name, size, hint
            Constraint::Length(5), // Remove button
        ])
        .areas(area);

        let [glyph_area] = Layout::vertical([Constraint::Length(1)]).flex(Flex::Center).areas(glyph_area);
        frame.render_widget(Paragraph::new(FILE_GLYPH).alignment(Alignment::Center), glyph_area);

        let name_width = details_area.width.saturating_sub(1) as usize;
        let lines = vec![
            Line::from(Span::styled(
                truncate_to_width(&file.name, name_width),
                theme.text_primary_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Size: ", theme.text_secondary_style()),
                Span::styled(format_size(file.size_bytes), theme.text_primary_style().add_modifier(Modifier::BOLD)),
            ]),
            Line::default(),
            Line::from(Span::styled("Click to select a different file", theme.status_info())),
        ];
        let [details_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(details_area);
        frame.render_widget(Paragraph::new(lines), details_area);

        let [button_area] = Layout::vertical([Constraint::Length(3)]).flex(Flex::Center).areas(button_area);
        let options = ButtonRenderOptions::new(true, app.picker.f_remove.get(), false, Borders::ALL);
        render_button(frame, button_area, "x", theme, options);
        self.layout.remove_button_area = button_area;
    }

    fn render_rejections(&self, frame: &mut Frame, area: Rect, app: &App) {
        let rejections = app.picker.rejections();
        if rejections.is_empty() {
            return;
        }
        let lines: Vec<Line> = rejections
            .iter()
            .map(|rejection| Line::from(Span::styled(describe_rejection(rejection), app.ctx.theme.status_error())))
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    /// Calculates the zone and error areas, centered in `area`.
    fn get_preferred_layout(&self, area: Rect) -> (Rect, Rect) {
        let width = area.width.min(ZONE_MAX_WIDTH);
        let [column] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let [zone_area, error_area] = Layout::vertical([Constraint::Length(ZONE_HEIGHT), Constraint::Length(ERROR_HEIGHT)])
            .flex(Flex::Center)
            .areas(column);
        (zone_area, error_area)
    }
}

/// Caption naming the accepted types and size limit, e.g. `PDF (max 20MB)`.
pub fn accept_caption(policy: &AcceptPolicy) -> String {
    let kinds: Vec<String> = policy
        .accepted_extensions()
        .map(|extension| extension.trim_start_matches('.').to_ascii_uppercase())
        .collect();
    let kinds = if kinds.is_empty() { "Any file".to_string() } else { kinds.join(", ") };
    format!("{kinds} (max {})", format_size(policy.max_size).replace(' ', ""))
}

/// One-line explanation of a rejection with sizes in human units.
pub fn describe_rejection(rejection: &FileRejection) -> String {
    let reasons: Vec<String> = rejection
        .reasons
        .iter()
        .map(|reason| match reason {
            RejectionReason::TooLarge { size, max } => {
                format!("file is {}, larger than the {} limit", format_size(*size), format_size(*max))
            }
            other => other.to_string(),
        })
        .collect();
    format!("{}: {}", rejection.file.name, reasons.join("; "))
}

impl Component for FilePickerWidget {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let remove_focused = app.picker.selected_file().is_some() && app.picker.f_remove.get();
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Delete | KeyCode::Backspace if remove_focused => {
                return vec![Effect::ClearSelection];
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => return vec![Effect::OpenFileDialog],
            KeyCode::Esc | KeyCode::Char('q') => return vec![Effect::Quit],
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position::new(mouse.column, mouse.row);
        let over_zone = self.layout.zone_area.contains(pos);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) if over_zone != app.drop_target.is_drag_active() => {
                let gesture = if over_zone {
                    DropGesture::DragEnter
                } else {
                    DropGesture::DragLeave
                };
                vec![Effect::Gesture(gesture)]
            }
            MouseEventKind::Down(MouseButton::Left) => {
                // The remove button sits inside the zone; it must win the hit test.
                if app.picker.selected_file().is_some() && self.layout.remove_button_area.contains(pos) {
                    app.focus.focus(&app.picker.f_remove);
                    return vec![Effect::ClearSelection];
                }
                if over_zone {
                    app.focus.focus(&app.picker.f_drop_zone);
                    return vec![Effect::OpenFileDialog];
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_paste(&mut self, _app: &mut App, text: String) -> Vec<Effect> {
        vec![Effect::Gesture(DropGesture::Paste(text))]
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let (zone_area, error_area) = self.get_preferred_layout(rect);
        self.layout = FilePickerLayout {
            zone_area,
            error_area,
            remove_button_area: Rect::default(),
        };

        let theme = &*app.ctx.theme;
        let drag_active = app.drop_target.is_drag_active();
        let mut zone_block = block(theme, None, app.picker.f_drop_zone.get()).borders(Borders::ALL);
        if drag_active {
            zone_block = zone_block.border_type(BorderType::Double).border_style(theme.drop_target_style());
        }
        let inner = zone_block.inner(zone_area);
        frame.render_widget(zone_block, zone_area);

        if app.picker.selected_file().is_some() {
            self.render_selected(frame, inner, app);
        } else {
            self.render_empty(frame, inner, theme, app.drop_target.policy());
        }
        self.render_rejections(frame, self.layout.error_area, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hints = vec![(" Enter", " Browse "), (" Tab", " Focus ")];
        if app.picker.selected_file().is_some() {
            hints.push((" Del", " Remove "));
        }
        hints.push((" Esc", " Done "));
        let mut spans = build_hint_spans(&*app.ctx.theme, &hints);
        spans.push(Span::styled(" Drop a file onto the terminal to select it", app.ctx.theme.text_muted_style()));
        spans
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        fs::File,
        path::{Path, PathBuf},
        rc::Rc,
    };

    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use pdfdrop_types::SelectedFile;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{app::RunOptions, ui::main_component::MainView};

    const MIB: u64 = 1024 * 1024;

    type Calls = Rc<RefCell<Vec<Option<SelectedFile>>>>;

    struct Harness {
        app: App,
        view: MainView,
        terminal: Terminal<TestBackend>,
        calls: Calls,
        _dir: tempfile::TempDir,
        root: PathBuf,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let root = dir.path().to_path_buf();
            let calls: Calls = Rc::default();
            let sink = Rc::clone(&calls);
            let options = RunOptions {
                start_dir: Some(root.clone()),
                on_file_select: Some(Box::new(move |file: Option<&SelectedFile>| sink.borrow_mut().push(file.cloned()))),
                ..RunOptions::default()
            };
            let mut harness = Self {
                app: App::new(options),
                view: MainView::default(),
                terminal: Terminal::new(TestBackend::new(80, 20)).expect("terminal"),
                calls,
                _dir: dir,
                root,
            };
            harness.draw();
            harness
        }

        fn fixture(&self, name: &str, size: u64) -> PathBuf {
            let path = self.root.join(name);
            File::create(&path).and_then(|file| file.set_len(size)).expect("create fixture");
            path
        }

        fn draw(&mut self) {
            self.app.rebuild_focus();
            let Self { app, view, terminal, .. } = self;
            terminal
                .draw(|frame| {
                    let area = frame.area();
                    view.render(frame, area, app);
                })
                .expect("draw");
        }

        fn drop_path(&mut self, path: &Path) {
            let effects = self.view.handle_paste(&mut self.app, format!("'{}'", path.display()));
            self.app.apply_effects(effects);
            self.draw();
        }

        fn click(&mut self, column: u16, row: u16) {
            self.mouse(MouseEventKind::Down(MouseButton::Left), column, row);
        }

        fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
            let mouse = MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            };
            let effects = self.view.handle_mouse_events(&mut self.app, mouse);
            self.app.apply_effects(effects);
            self.draw();
        }

        fn paste(&mut self, text: &str) {
            let effects = self.view.handle_paste(&mut self.app, text.to_string());
            self.app.apply_effects(effects);
            self.draw();
        }

        fn zone_center(&self) -> (u16, u16) {
            let zone = self.view.picker_view.layout.zone_area;
            (zone.x + zone.width / 2, zone.y + zone.height / 2)
        }

        fn press(&mut self, code: KeyCode) {
            let key = KeyEvent {
                code,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            };
            let effects = self.view.handle_key_events(&mut self.app, key);
            self.app.apply_effects(effects);
            self.draw();
        }

        fn screen(&self) -> String {
            let buffer = self.terminal.backend().buffer();
            let mut text = String::new();
            for y in 0..buffer.area.height {
                for x in 0..buffer.area.width {
                    text.push_str(buffer[(x, y)].symbol());
                }
                text.push('\n');
            }
            text
        }

        fn find(&self, needle: &str) -> Option<(u16, u16)> {
            let screen = self.screen();
            screen.lines().enumerate().find_map(|(row, line)| {
                let byte = line.find(needle)?;
                let column = line[..byte].chars().count();
                Some((column as u16, row as u16))
            })
        }
    }

    #[test]
    fn dropping_a_15_mib_pdf_selects_it() {
        let mut harness = Harness::new();
        assert!(harness.screen().contains("Click to upload or drag and drop"));
        assert!(harness.screen().contains("PDF (max 20MB)"));

        let path = harness.fixture("resume.pdf", 15 * MIB);
        harness.drop_path(&path);

        let expected = SelectedFile {
            name: "resume.pdf".into(),
            size_bytes: 15_728_640,
            path: Some(path),
        };
        assert_eq!(*harness.calls.borrow(), vec![Some(expected)]);
        let screen = harness.screen();
        assert!(screen.contains("resume.pdf"));
        assert!(screen.contains("Size: 15 MB"));
        assert!(screen.contains("Click to select a different file"));
    }

    #[test]
    fn dropping_a_25_mib_pdf_is_rejected() {
        let mut harness = Harness::new();
        let path = harness.fixture("huge.pdf", 25 * MIB);
        harness.drop_path(&path);

        assert!(harness.calls.borrow().is_empty());
        assert!(harness.app.picker.selected_file().is_none());
        let screen = harness.screen();
        assert!(screen.contains("Click to upload or drag and drop"));
        assert!(screen.contains("huge.pdf: file is 25 MB, larger than the 20 MB limit"));
    }

    #[test]
    fn dropping_a_docx_is_rejected() {
        let mut harness = Harness::new();
        let path = harness.fixture("resume.docx", 1024);
        harness.drop_path(&path);

        assert!(harness.calls.borrow().is_empty());
        assert!(harness.app.picker.selected_file().is_none());
        assert!(harness.screen().contains("Click to upload or drag and drop"));
    }

    #[test]
    fn remove_button_clears_without_opening_the_dialog() {
        let mut harness = Harness::new();
        let path = harness.fixture("resume.pdf", 2048);
        harness.drop_path(&path);

        let button = harness.view.picker_view.layout.remove_button_area;
        assert!(!button.is_empty(), "remove button rendered");
        harness.click(button.x + button.width / 2, button.y + button.height / 2);

        assert_eq!(harness.calls.borrow().len(), 2);
        assert_eq!(harness.calls.borrow()[1], None);
        assert!(harness.app.drop_target.file_dialog().is_none());
        assert!(harness.screen().contains("Click to upload or drag and drop"));
    }

    #[test]
    fn clicking_the_summary_opens_the_dialog_to_replace_the_file() {
        let mut harness = Harness::new();
        let first = harness.fixture("first.pdf", 2048);
        harness.fixture("second.pdf", 4096);
        harness.drop_path(&first);

        let (column, row) = harness.find("Click to select").expect("hint rendered");
        harness.click(column, row);
        assert!(harness.app.drop_target.file_dialog().is_some());
        assert!(harness.screen().contains("Open File"));

        // "first.pdf" is highlighted first; move to "second.pdf" and open it.
        harness.press(KeyCode::Down);
        harness.press(KeyCode::Enter);

        assert!(harness.app.drop_target.file_dialog().is_none());
        let names: Vec<Option<String>> = harness.calls.borrow().iter().map(|file| file.as_ref().map(|f| f.name.clone())).collect();
        assert_eq!(names, vec![Some("first.pdf".to_string()), Some("second.pdf".to_string())]);
        assert!(harness.screen().contains("Size: 4 KB"));
    }

    #[test]
    fn keyboard_reaches_the_remove_button() {
        let mut harness = Harness::new();
        let path = harness.fixture("resume.pdf", 2048);
        harness.drop_path(&path);

        harness.press(KeyCode::Tab);
        assert!(harness.app.picker.f_remove.get());
        harness.press(KeyCode::Delete);

        assert!(harness.app.picker.selected_file().is_none());
        assert_eq!(harness.calls.borrow().last(), Some(&None));
    }

    #[test]
    fn escape_closes_the_dialog_then_quits() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Enter);
        assert!(harness.app.drop_target.file_dialog().is_some());

        harness.press(KeyCode::Esc);
        assert!(harness.app.drop_target.file_dialog().is_none());
        assert!(!harness.app.should_quit);

        harness.press(KeyCode::Esc);
        assert!(harness.app.should_quit);
    }

    #[test]
    fn closing_the_dialog_drops_the_hover_highlight() {
        let mut harness = Harness::new();
        let (column, row) = harness.zone_center();
        harness.mouse(MouseEventKind::Moved, column, row);
        assert!(harness.app.drop_target.is_drag_active());

        harness.click(column, row);
        assert!(harness.app.drop_target.file_dialog().is_some());
        harness.mouse(MouseEventKind::Moved, 0, 19);
        harness.press(KeyCode::Esc);

        assert!(harness.app.drop_target.file_dialog().is_none());
        assert!(!harness.app.drop_target.is_drag_active());
    }

    #[test]
    fn paste_onto_the_open_dialog_is_a_drop() {
        let mut harness = Harness::new();
        let path = harness.fixture("resume.pdf", 2048);
        harness.press(KeyCode::Enter);
        assert!(harness.app.drop_target.file_dialog().is_some_and(|dialog| dialog.f_list.get()));

        harness.paste(&format!("'{}'", path.display()));

        assert!(harness.app.drop_target.file_dialog().is_none());
        assert_eq!(harness.app.picker.selected_file().map(|file| file.name.as_str()), Some("resume.pdf"));
        assert_eq!(harness.calls.borrow().len(), 1);
    }

    #[test]
    fn paste_into_the_path_field_is_typed() {
        let mut harness = Harness::new();
        let path = harness.fixture("resume.pdf", 2048);
        harness.press(KeyCode::Enter);
        harness.press(KeyCode::BackTab);
        assert!(harness.app.drop_target.file_dialog().is_some_and(|dialog| dialog.f_path_input.get()));

        let typed = path.display().to_string();
        harness.paste(&typed);

        let dialog = harness.app.drop_target.file_dialog().expect("dialog stays open");
        assert_eq!(dialog.path_input_state().input(), typed);
        assert!(harness.app.picker.selected_file().is_none());
        assert!(harness.calls.borrow().is_empty());
    }

    #[test]
    fn caption_follows_the_policy() {
        assert_eq!(accept_caption(&AcceptPolicy::default()), "PDF (max 20MB)");
        assert_eq!(accept_caption(&AcceptPolicy::default().with_max_size(512 * 1024)), "PDF (max 512KB)");
    }
}
