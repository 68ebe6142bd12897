use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Frame, layout::Rect};
use tracing::debug;

use super::Component;
use crate::{
    action::Action,
    app::Mode,
    catalog::Catalog,
    config::{Config, key_event_to_string},
    ui::{self, Palette},
    view::{ViewState, project},
};

const SHORT_HINT: &str = "1-3/click: open folder | ?: keys | q: quit";

/// The sidebar and file table, backed by one [`ViewState`].
pub struct Browser {
    catalog: Arc<Catalog>,
    state: ViewState,
    palette: Palette,
    full_hint: String,
    show_help: bool,
    /// Area of the last draw, for mapping mouse clicks.
    area: Rect,
}

impl Browser {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: ViewState::new(),
            palette: Palette::default(),
            full_hint: SHORT_HINT.to_string(),
            show_help: false,
            area: Rect::default(),
        }
    }

    #[cfg(test)]
    fn state(&self) -> &ViewState {
        &self.state
    }

    fn hint(&self) -> &str {
        if self.show_help {
            &self.full_hint
        } else {
            SHORT_HINT
        }
    }
}

/// One `keys: action` pair per binding, sorted by key.
fn describe_bindings(config: &Config) -> String {
    let Some(bindings) = config.keybindings.get(&Mode::Browse) else {
        return SHORT_HINT.to_string();
    };
    let mut pairs: Vec<(String, String)> = bindings
        .iter()
        .map(|(keys, action)| {
            let keys = keys
                .iter()
                .map(key_event_to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let action = match action {
                Action::SelectFolder(folder) => folder.label().to_string(),
                Action::ToggleExpanded(folder) => format!("fold {}", folder.label()),
                other => other.to_string().to_lowercase(),
            };
            (keys, action)
        })
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(keys, action)| format!("{keys}: {action}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

impl Component for Browser {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.palette = Palette::from_styles(&config.styles, Mode::Browse);
        self.full_hint = describe_bindings(&config);
        Ok(())
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let action = ui::sidebar_hit(self.area, mouse.column, mouse.row).map(Action::SelectFolder);
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SelectFolder(folder) => self.state.select_folder(folder),
            Action::ToggleExpanded(folder) => {
                self.state.toggle_expanded(folder);
                debug!("toggled {folder}, expanded {:?}", self.state.expanded());
            }
            Action::Help => self.show_help = !self.show_help,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.area = area;
        let view = project(&self.state, &self.catalog);
        ui::render(&view, &self.palette, self.hint(), area, frame.buffer_mut());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::catalog::FolderId;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn drawn_browser() -> (Browser, Terminal<TestBackend>) {
        let mut browser = Browser::new(Arc::new(Catalog::seed()));
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                browser.draw(frame, area).unwrap();
            })
            .unwrap();
        (browser, terminal)
    }

    #[test]
    fn test_click_on_folder_selects_it() {
        let (mut browser, _terminal) = drawn_browser();
        assert_eq!(
            browser.handle_mouse_event(click(4, 4)).unwrap(),
            Some(Action::SelectFolder(FolderId::Music))
        );
        assert_eq!(browser.handle_mouse_event(click(4, 0)).unwrap(), None);
        assert_eq!(browser.handle_mouse_event(click(60, 4)).unwrap(), None);
    }

    #[test]
    fn test_other_mouse_events_ignored() {
        let (mut browser, _terminal) = drawn_browser();
        let mut event = click(4, 2);
        event.kind = MouseEventKind::Up(MouseButton::Left);
        assert_eq!(browser.handle_mouse_event(event).unwrap(), None);
        event.kind = MouseEventKind::Down(MouseButton::Right);
        assert_eq!(browser.handle_mouse_event(event).unwrap(), None);
    }

    #[test]
    fn test_update_drives_view_state() {
        let mut browser = Browser::new(Arc::new(Catalog::seed()));
        browser.update(Action::SelectFolder(FolderId::Images)).unwrap();
        assert_eq!(browser.state().selected(), FolderId::Images);
        assert!(browser.state().is_expanded(FolderId::Images));

        browser.update(Action::ToggleExpanded(FolderId::Documents)).unwrap();
        assert_eq!(browser.state().selected(), FolderId::Images);
        assert!(!browser.state().is_expanded(FolderId::Documents));

        browser.update(Action::Tick).unwrap();
        assert_eq!(browser.state().selected(), FolderId::Images);
    }

    #[test]
    fn test_help_toggles_footer() {
        let mut browser = Browser::new(Arc::new(Catalog::seed()));
        browser.full_hint = "everything".to_string();
        assert_eq!(browser.hint(), SHORT_HINT);
        browser.update(Action::Help).unwrap();
        assert_eq!(browser.hint(), "everything");
        browser.update(Action::Help).unwrap();
        assert_eq!(browser.hint(), SHORT_HINT);
    }

    #[test]
    fn test_describe_bindings() {
        let config: Config = json5::from_str(
            r#"{ keybindings: { Browse: { "<q>": "Quit", "<2>": { SelectFolder: "images" }, "<Ctrl-t>": { ToggleExpanded: "music" } } } }"#,
        )
        .unwrap();
        assert_eq!(
            describe_bindings(&config),
            "2: Images | ctrl-t: fold Music | q: quit"
        );
    }

    #[test]
    fn test_draw_shows_selected_folder() {
        let (mut browser, mut terminal) = drawn_browser();
        browser.update(Action::SelectFolder(FolderId::Music)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                browser.draw(frame, area).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Summer Mix.mp3"));
        assert!(!text.contains("Meeting Notes.docx"));
    }
}
