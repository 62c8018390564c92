//! Diagnostics screen: engine health checks, fetched on entry and on `r`.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use kitten_core::Diagnostics;

use crate::action::Action;
use crate::component::Component;
use crate::screens::{error_line, hints_line, panel_block};
use crate::theme;

/// "3s", "2m 5s"; sub-second ages round to whole seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn format_age(secs: f64) -> String {
    let whole = Duration::from_secs(secs.max(0.0).round() as u64);
    humantime::format_duration(whole).to_string()
}

fn check_line(label: &str, ok: bool, ok_text: &str, bad_text: &str) -> Line<'static> {
    let (mark, text, color) = if ok {
        ("✓", ok_text, theme::SUCCESS_GREEN)
    } else {
        ("✗", bad_text, theme::ERROR_RED)
    };
    Line::from(vec![
        Span::styled(format!("  {mark} "), Style::default().fg(color)),
        Span::styled(format!("{label:<20}"), theme::label()),
        Span::styled(text.to_owned(), Style::default().fg(color)),
    ])
}

fn value_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(format!("{label:<20}"), theme::label()),
        Span::styled(value, theme::value()),
    ])
}

pub struct DiagnosticsScreen {
    focused: bool,
    diagnostics: Option<Arc<Diagnostics>>,
    error: Option<String>,
}

impl DiagnosticsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            diagnostics: None,
            error: None,
        }
    }

    fn lines(diag: &Diagnostics) -> Vec<Line<'static>> {
        let stats_age = diag
            .stats_age_sec
            .map_or_else(|| "never".to_owned(), |secs| format!("{} ago", format_age(secs)));

        vec![
            Line::from(""),
            check_line("Configuration", diag.config_valid, "valid", "invalid"),
            check_line("Engine", diag.running, "running", "stopped"),
            check_line("Proxy port", diag.port_open, "accepting", "closed"),
            check_line("Port availability", diag.port_available, "free", "in use"),
            Line::from(""),
            value_line("Last stats", stats_age),
            value_line("Blacklist entries", diag.blacklist_entries.to_string()),
            value_line("List files", diag.list_files.to_string()),
        ]
    }
}

impl Component for DiagnosticsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => Ok(Some(Action::RequestDiagnostics)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DiagnosticsUpdated(diag) => self.diagnostics = Some(Arc::clone(diag)),
            Action::PanelError { message, .. } => self.error.clone_from(message),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(" Diagnostics ", self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let body = match &self.diagnostics {
            Some(diag) => Paragraph::new(Self::lines(diag)),
            None => Paragraph::new("  Loading diagnostics…")
                .style(Style::default().fg(theme::BORDER_GRAY)),
        };
        frame.render_widget(body, layout[0]);
        frame.render_widget(Paragraph::new(error_line(self.error.as_deref())), layout[1]);
        frame.render_widget(Paragraph::new(hints_line(&[("r", "refresh")])), layout[2]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Diagnostics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn age_rounds_to_seconds() {
        assert_eq!(format_age(0.4), "0s");
        assert_eq!(format_age(2.6), "3s");
        assert_eq!(format_age(125.0), "2m 5s");
    }

    #[test]
    fn missing_stats_age_reads_never() {
        let diag = Diagnostics {
            running: true,
            port_open: true,
            ..Diagnostics::default()
        };
        let rendered = text(&DiagnosticsScreen::lines(&diag));
        assert!(rendered.contains("never"));
        assert!(rendered.contains("running"));
        assert!(rendered.contains("invalid"));
    }
}
