//! Terminal events, forwarded from crossterm by a background task.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc::UnboundedSender, time::interval};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::terminal::Terminal;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TermEvent {
    Init,
    Error,
    Closed,
    Tick,
    Render,
    FocusGained,
    FocusLost,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl Terminal {
    pub(super) async fn event_loop(
        event_sender: UnboundedSender<TermEvent>,
        cancellation_token: CancellationToken,
        tick_rate: f64,
        frame_rate: f64,
    ) {
        let mut event_stream = EventStream::new();
        let mut tick_interval = interval(Duration::from_secs_f64(1.0 / tick_rate));
        let mut render_interval = interval(Duration::from_secs_f64(1.0 / frame_rate));

        if event_sender.send(TermEvent::Init).is_err() {
            warn!("event receiver dropped before the event loop started");
            return;
        }

        loop {
            let event = tokio::select! {
                _ = cancellation_token.cancelled() => {
                    break;
                }
                _ = tick_interval.tick() => TermEvent::Tick,
                _ = render_interval.tick() => TermEvent::Render,
                crossterm_event = event_stream.next().fuse() => match crossterm_event {
                    Some(Ok(event)) => match event {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => TermEvent::Key(key),
                        CrosstermEvent::Mouse(mouse) => TermEvent::Mouse(mouse),
                        CrosstermEvent::Resize(x, y) => TermEvent::Resize(x, y),
                        CrosstermEvent::FocusLost => TermEvent::FocusLost,
                        CrosstermEvent::FocusGained => TermEvent::FocusGained,
                        _ => continue,
                    }
                    Some(Err(_)) => TermEvent::Error,
                    None => TermEvent::Closed,
                },
            };
            let closed = matches!(event, TermEvent::Closed);
            if event_sender.send(event).is_err() || closed {
                break;
            }
        }
        cancellation_token.cancel();
    }
}
