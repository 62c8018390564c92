//! Dashboard: engine status, connection counters, throughput and the
//! traffic graph.
//!
//! ┌─ Engine ───────────────────────────────────────────────────────────┐
//! │ ● RUNNING  message                                                 │
//! ├─ Connections ─────────────────────────┬─ Efficiency ───────────────┤
//! │ total  allowed  blocked  errors       │ ██████████░░ 87.5%          │
//! ├─ Throughput ──────────────────────────┴────────────────────────────┤
//! │ ↓ 1.5 Mb/s  ↑ 220 Kb/s  totals, averages                           │
//! │ ⣀⡠⠔⠊ traffic graph                                                 │
//! └────────────────────────────────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

use kitten_core::{Command, ProxyStatus, Stats, TelemetryRing, format_size, format_speed};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screens::{error_line, hints_line, panel_block};
use crate::theme;
use crate::widgets::status_pill::status_pill;
use crate::widgets::traffic_graph::TrafficGraph;

pub struct DashboardScreen {
    focused: bool,
    status: Option<Arc<ProxyStatus>>,
    stats: Option<Arc<Stats>>,
    telemetry: Arc<TelemetryRing>,
    error: Option<String>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            status: None,
            stats: None,
            telemetry: Arc::new(TelemetryRing::default()),
            error: None,
        }
    }

    fn render_engine(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(" Engine ", self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            status_pill(self.status.as_deref()),
            error_line(self.error.as_deref()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_counters(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(" Connections ", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(stats) = &self.stats else {
            frame.render_widget(
                Paragraph::new("  No statistics yet")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        };

        let counter = |label: &'static str, value: u64, color| {
            vec![
                Span::styled(format!("  {label} "), theme::label()),
                Span::styled(
                    value.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]
        };

        let mut first = counter("Total", stats.total_connections, theme::NEON_CYAN);
        first.extend(counter("Allowed", stats.allowed_connections, theme::SUCCESS_GREEN));
        let mut second = counter("Blocked", stats.blocked_connections, theme::CORAL);
        second.extend(counter("Errors", stats.error_connections, theme::ERROR_RED));

        let method = stats.fragment_method.as_deref().unwrap_or("—");
        let lines = vec![
            Line::from(first),
            Line::from(second),
            Line::from(vec![
                Span::styled("  Fragment method ", theme::label()),
                Span::styled(method.to_owned(), theme::value()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_efficiency(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(" Efficiency ", false);
        let efficiency = self.stats.as_ref().map_or(0.0, |s| s.efficiency);
        let ratio = (efficiency / 100.0).clamp(0.0, 1.0);
        let color = if efficiency >= 80.0 {
            theme::SUCCESS_GREEN
        } else if efficiency >= 50.0 {
            theme::ELECTRIC_YELLOW
        } else {
            theme::CORAL
        };

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(color).bg(theme::BG_HIGHLIGHT))
            .ratio(ratio)
            .label(format!("{efficiency:.1}%"));
        frame.render_widget(gauge, area);
    }

    fn throughput_title(&self) -> Line<'static> {
        let (down, up) = self
            .telemetry
            .latest()
            .map_or((0.0, 0.0), |s| (s.download_bps, s.upload_bps));

        Line::from(vec![
            Span::styled(" Throughput ", theme::title_style()),
            Span::styled("── ", Style::default().fg(theme::BORDER_GRAY)),
            Span::styled(
                format!("↓ {}", format_speed(down)),
                Style::default().fg(theme::DOWNLOAD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("↑ {} ", format_speed(up)),
                Style::default().fg(theme::UPLOAD),
            ),
        ])
    }

    fn totals_line(&self) -> Line<'static> {
        let Some(stats) = &self.stats else {
            return Line::from("");
        };
        Line::from(vec![
            Span::styled("  received ", theme::label()),
            Span::styled(format_size(stats.traffic_in), theme::value()),
            Span::styled("  sent ", theme::label()),
            Span::styled(format_size(stats.traffic_out), theme::value()),
            Span::styled("  avg ", theme::label()),
            Span::styled(
                format!("↓ {}", format_speed(stats.avg_speed_in_bps)),
                Style::default().fg(theme::DOWNLOAD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("↑ {}", format_speed(stats.avg_speed_out_bps)),
                Style::default().fg(theme::UPLOAD),
            ),
        ])
    }

    fn render_traffic(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(self.throughput_title(), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);
        frame.render_widget(Paragraph::new(self.totals_line()), layout[0]);
        frame.render_widget(TrafficGraph::new(&self.telemetry), layout[1]);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('s') => Ok(Some(Action::Execute(Command::StartProxy))),
            KeyCode::Char('x') => Ok(Some(Action::ShowConfirm(ConfirmAction::StopProxy))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StatusUpdated(status) => self.status = Some(Arc::clone(status)),
            Action::StatsUpdated(stats) => self.stats = Some(Arc::clone(stats)),
            Action::TelemetryUpdated(ring) => self.telemetry = Arc::clone(ring),
            Action::PanelError { message, .. } => self.error.clone_from(message),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(4), // engine
            Constraint::Length(5), // counters + efficiency
            Constraint::Min(6),    // throughput graph
            Constraint::Length(1), // hints
        ])
        .split(area);

        self.render_engine(frame, layout[0]);

        let middle =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(layout[1]);
        self.render_counters(frame, middle[0]);
        self.render_efficiency(frame, middle[1]);

        self.render_traffic(frame, layout[2]);

        frame.render_widget(
            Paragraph::new(hints_line(&[("s", "start  "), ("x", "stop  ")])),
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
        "Dashboard"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use kitten_core::TelemetrySample;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn screen_text(screen: &DashboardScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
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
    fn stop_asks_for_confirmation() {
        let mut screen = DashboardScreen::new();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ConfirmAction::StopProxy))
        ));
    }

    #[test]
    fn renders_counters_and_latest_speed() {
        let mut screen = DashboardScreen::new();
        let stats = Stats {
            total_connections: 42,
            allowed_connections: 40,
            blocked_connections: 1,
            error_connections: 1,
            efficiency: 95.2,
            speed_in_bps: 1500.0,
            speed_out_bps: 250_000.0,
            ..Stats::default()
        };
        let mut ring = TelemetryRing::default();
        ring.push(TelemetrySample::new(1500.0, 250_000.0));

        screen.update(&Action::StatsUpdated(Arc::new(stats))).unwrap();
        screen.update(&Action::TelemetryUpdated(Arc::new(ring))).unwrap();

        let text = screen_text(&screen);
        assert!(text.contains("Total 42"));
        assert!(text.contains("↓ 1.5 Kb/s"));
        assert!(text.contains("↑ 250 Kb/s"));
        assert!(text.contains("95.2%"));
    }

    #[test]
    fn panel_error_shows_and_clears() {
        let mut screen = DashboardScreen::new();
        screen
            .update(&Action::PanelError {
                screen: crate::screen::ScreenId::Dashboard,
                message: Some("Proxy failed to start".into()),
            })
            .unwrap();
        assert!(screen_text(&screen).contains("Proxy failed to start"));

        screen
            .update(&Action::PanelError {
                screen: crate::screen::ScreenId::Dashboard,
                message: None,
            })
            .unwrap();
        assert!(!screen_text(&screen).contains("Proxy failed to start"));
    }
}
