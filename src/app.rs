use std::{path::PathBuf, sync::Arc};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::{
    action::Action,
    catalog::Catalog,
    components::{Component, browser::Browser},
    config::Config,
    terminal::{Terminal, events::TermEvent},
};

/// Input modes; each has its own key bindings and styles in the config.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(alias = "browse")]
    Browse,
}

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    components: Vec<Box<dyn Component>>,
    should_quit: bool,
    should_suspend: bool,
    mode: Mode,
    last_tick_key_events: Vec<KeyEvent>,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64, catalog_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::new()?;
        let catalog = match catalog_path.as_ref().or(config.catalog.as_ref()) {
            Some(path) => Catalog::from_path(path)?,
            None => {
                info!("using the built-in catalog");
                Catalog::seed()
            }
        };
        Ok(Self::with_config(config, Arc::new(catalog), tick_rate, frame_rate))
    }

    pub fn with_config(
        config: Config,
        catalog: Arc<Catalog>,
        tick_rate: f64,
        frame_rate: f64,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            config,
            tick_rate,
            frame_rate,
            components: vec![Box::new(Browser::new(catalog))],
            should_quit: false,
            should_suspend: false,
            mode: Mode::Browse,
            last_tick_key_events: Vec::new(),
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Terminal::new()?
            .mouse(true)
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        for component in self.components.iter_mut() {
            component.register_action_handler(self.action_tx.clone())?;
            component.register_config_handler(self.config.clone())?;
            component.init(tui.size()?)?;
        }

        let action_tx = self.action_tx.clone();
        loop {
            self.handle_events(&mut tui).await?;
            self.handle_actions(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                action_tx.send(Action::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Terminal) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };
        let action_tx = self.action_tx.clone();
        match event {
            TermEvent::Closed => action_tx.send(Action::Quit)?,
            TermEvent::Tick => action_tx.send(Action::Tick)?,
            TermEvent::Render => action_tx.send(Action::Render)?,
            TermEvent::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
            TermEvent::Key(key) => self.handle_key_event(key)?,
            _ => {}
        }
        for component in self.components.iter_mut() {
            if let Some(action) = component.handle_events(Some(event.clone()))? {
                action_tx.send(action)?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let key = normalize(key);
        let action_tx = self.action_tx.clone();
        let Some(keymap) = self.config.keybindings.get(&self.mode) else {
            return Ok(());
        };
        match keymap.get(&vec![key]) {
            Some(action) => {
                debug!("got action {action} for key {key:?}");
                action_tx.send(action.clone())?;
                self.last_tick_key_events.clear();
            }
            None => {
                // multi-key sequences are matched against what was typed since the last tick
                self.last_tick_key_events.push(key);
                if let Some(action) = keymap.get(&self.last_tick_key_events) {
                    debug!("got action {action} for sequence");
                    action_tx.send(action.clone())?;
                    self.last_tick_key_events.clear();
                }
            }
        }
        Ok(())
    }

    fn handle_actions(&mut self, tui: &mut Terminal) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                debug!("{action:?}");
            }
            match &action {
                Action::Tick => self.last_tick_key_events.clear(),
                Action::Quit => self.should_quit = true,
                Action::Suspend => self.should_suspend = true,
                Action::Resume => self.should_suspend = false,
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, *w, *h)?,
                Action::Render => self.render(tui)?,
                Action::Error(message) => error!("{message}"),
                _ => {}
            }
            for component in self.components.iter_mut() {
                if let Some(action) = component.update(action.clone())? {
                    self.action_tx.send(action)?
                };
            }
        }
        Ok(())
    }

    fn handle_resize(&mut self, tui: &mut Terminal, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Terminal) -> Result<()> {
        let mut result = Ok(());
        tui.draw(|frame| {
            let area = frame.area();
            for component in self.components.iter_mut() {
                if let Err(err) = component.draw(frame, area) {
                    result = Err(err);
                }
            }
        })?;
        if let Err(err) = result {
            self.action_tx
                .send(Action::Error(format!("Failed to draw: {err:?}")))?;
        }
        Ok(())
    }
}

/// Terminals differ on whether a shifted character also reports SHIFT.
fn normalize(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(_) = key.code {
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    key
}
