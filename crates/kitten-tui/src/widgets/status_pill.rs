//! Engine status pill: ● RUNNING / ○ STOPPED with the server's message.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use kitten_core::ProxyStatus;

use crate::theme;

/// Pill for the last polled status. `None` means no status has arrived yet.
pub fn status_pill(status: Option<&ProxyStatus>) -> Line<'static> {
    let Some(status) = status else {
        return Line::from(Span::styled(
            " ◐ UNKNOWN ",
            Style::default().fg(theme::ELECTRIC_YELLOW),
        ));
    };

    let (label, color) = if status.running {
        (" ● RUNNING ", theme::SUCCESS_GREEN)
    } else {
        (" ○ STOPPED ", theme::ERROR_RED)
    };

    let mut spans = vec![Span::styled(
        label,
        Style::default()
            .fg(theme::BG_DARK)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )];
    if !status.message.is_empty() {
        spans.push(Span::styled(
            format!("  {}", status.message),
            Style::default().fg(theme::DIM_WHITE),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn running_shows_message() {
        let status = ProxyStatus {
            running: true,
            message: "Proxy running on 127.0.0.1:8881".into(),
            pid: None,
        };
        assert_eq!(
            text(&status_pill(Some(&status))),
            " ● RUNNING   Proxy running on 127.0.0.1:8881"
        );
    }

    #[test]
    fn stopped_without_message() {
        let status = ProxyStatus {
            running: false,
            message: String::new(),
            pid: None,
        };
        assert_eq!(text(&status_pill(Some(&status))), " ○ STOPPED ");
    }

    #[test]
    fn missing_status_is_unknown() {
        assert_eq!(text(&status_pill(None)), " ◐ UNKNOWN ");
    }
}
