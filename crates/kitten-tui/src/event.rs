//! Terminal input merged with the tick and render clocks.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::time::{Interval, MissedTickBehavior};

/// What the event loop reacts to.
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Toast expiry and spinner frames.
    Tick,
    Render,
}

/// Polled directly from the event loop; nothing runs in the background.
pub struct EventReader {
    input: EventStream,
    tick: Interval,
    render: Interval,
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        Self {
            input: EventStream::new(),
            tick: clock(tick_rate),
            render: clock(render_rate),
        }
    }

    /// Wait for the next event. `None` once terminal input has closed.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Some(Event::Tick),
                _ = self.render.tick() => return Some(Event::Render),
                input = self.input.next() => match input {
                    Some(Ok(raw)) => {
                        if let Some(event) = translate(raw) {
                            return Some(event);
                        }
                    }
                    Some(Err(_)) => {}
                    None => return None,
                },
            }
        }
    }
}

/// Key presses and resizes pass; releases, repeats, mouse and focus
/// changes are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
