//! Logs screen: tail of the access or error log.
//!
//! Fetched when the screen is entered, when the kind changes and on `r`.
//! The server only serves logs to local clients; a refusal is shown as a
//! placeholder, not an error.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use kitten_core::{LogKind, LogView};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{error_line, hints_line, panel_block};
use crate::theme;

pub struct LogsScreen {
    focused: bool,
    kind: LogKind,
    view: Option<Arc<LogView>>,
    /// Lines scrolled up from the newest entry.
    scroll_back: usize,
    error: Option<String>,
}

impl LogsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            kind: LogKind::Access,
            view: None,
            scroll_back: 0,
            error: None,
        }
    }

    fn line_count(&self) -> usize {
        match self.view.as_deref() {
            Some(LogView::Lines { lines, .. }) => lines.len(),
            _ => 0,
        }
    }

    fn switch_kind(&mut self, kind: LogKind) -> Option<Action> {
        if kind != self.kind {
            self.kind = kind;
            self.view = None;
            self.scroll_back = 0;
        }
        Some(Action::RequestLogs(kind))
    }

    fn kind_tabs(&self) -> Line<'static> {
        let tab = |kind: LogKind, key: &'static str| {
            let style = if kind == self.kind {
                theme::tab_active().add_modifier(Modifier::UNDERLINED)
            } else {
                theme::tab_inactive()
            };
            vec![
                Span::styled(format!(" {key} "), theme::key_hint_key()),
                Span::styled(kind.to_string(), style),
            ]
        };
        let mut spans = tab(LogKind::Access, "a");
        spans.push(Span::raw("  "));
        spans.extend(tab(LogKind::Error, "e"));
        Line::from(spans)
    }

    fn body(&self, height: usize) -> Paragraph<'static> {
        match self.view.as_deref() {
            None => Paragraph::new("  Loading…").style(Style::default().fg(theme::BORDER_GRAY)),
            Some(LogView::Unavailable { reason, .. }) => Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Logs are only available when the console runs on the proxy host.",
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                )),
                Line::from(Span::styled(
                    format!("  Server said: {reason}"),
                    Style::default().fg(theme::BORDER_GRAY),
                )),
            ]),
            Some(LogView::Lines { lines, .. }) if lines.is_empty() => {
                Paragraph::new("  (empty)").style(Style::default().fg(theme::BORDER_GRAY))
            }
            Some(LogView::Lines { lines, .. }) => {
                let end = lines
                    .len()
                    .saturating_sub(self.scroll_back)
                    .max(height.min(lines.len()));
                let start = end.saturating_sub(height);
                let visible: Vec<Line<'static>> = lines[start..end]
                    .iter()
                    .map(|l| Line::from(Span::styled(l.clone(), theme::table_row())))
                    .collect();
                Paragraph::new(visible)
            }
        }
    }
}

impl Component for LogsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let max_back = self.line_count().saturating_sub(1);
        let action = match key.code {
            KeyCode::Char('a') => self.switch_kind(LogKind::Access),
            KeyCode::Char('e') => self.switch_kind(LogKind::Error),
            KeyCode::Char('r') => Some(Action::RequestLogs(self.kind)),
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_back = (self.scroll_back + 1).min(max_back);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_back = self.scroll_back.saturating_sub(1);
                None
            }
            KeyCode::Char('g') => {
                self.scroll_back = max_back;
                None
            }
            KeyCode::Char('G') => {
                self.scroll_back = 0;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            // A late reply for the other log is dropped.
            Action::LogsUpdated(view) if view.kind() == self.kind => {
                self.view = Some(Arc::clone(view));
                self.scroll_back = self.scroll_back.min(self.line_count().saturating_sub(1));
            }
            Action::PanelError { message, .. } => self.error.clone_from(message),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Logs · {} ({}) ", self.kind, self.line_count());
        let block = panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // kind tabs
            Constraint::Min(1),    // lines
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(self.kind_tabs()), layout[0]);
        frame.render_widget(self.body(usize::from(layout[1].height)), layout[1]);
        frame.render_widget(Paragraph::new(error_line(self.error.as_deref())), layout[2]);
        frame.render_widget(
            Paragraph::new(hints_line(&[
                ("j/k", "scroll  "),
                ("g/G", "oldest/newest  "),
                ("r", "refresh"),
            ])),
            layout[3],
        );
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Logs"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rendered(screen: &LogsScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 12)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn switching_kind_requests_that_log() {
        let mut screen = LogsScreen::new();
        let action = screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(matches!(action, Some(Action::RequestLogs(LogKind::Error))));
        assert_eq!(screen.kind, LogKind::Error);
    }

    #[test]
    fn stale_kind_is_ignored() {
        let mut screen = LogsScreen::new();
        screen
            .update(&Action::LogsUpdated(Arc::new(LogView::Lines {
                kind: LogKind::Error,
                lines: vec!["boom".into()],
            })))
            .unwrap();
        assert!(screen.view.is_none());
    }

    #[test]
    fn forbidden_renders_placeholder() {
        let mut screen = LogsScreen::new();
        screen
            .update(&Action::LogsUpdated(Arc::new(LogView::Unavailable {
                kind: LogKind::Access,
                reason: "Forbidden".into(),
            })))
            .unwrap();
        let text = rendered(&screen);
        assert!(text.contains("only available"));
        assert!(text.contains("Server said: Forbidden"));
    }

    #[test]
    fn shows_newest_lines() {
        let mut screen = LogsScreen::new();
        let lines = (1..=50).map(|n| format!("line {n:02}")).collect();
        screen
            .update(&Action::LogsUpdated(Arc::new(LogView::Lines {
                kind: LogKind::Access,
                lines,
            })))
            .unwrap();
        let text = rendered(&screen);
        assert!(text.contains("line 50"));
        assert!(!text.contains("line 01"));

        screen.handle_key_event(key(KeyCode::Char('g'))).unwrap();
        assert!(rendered(&screen).contains("line 01"));
    }
}
