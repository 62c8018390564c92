//! Application core: event loop, section controller, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use kitten_core::{Command, Console, LogKind};

use crate::action::{
    Action, ConfirmAction, Notification, NotificationLevel, origin_screen, success_message,
};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::host::{HostAction, HostShell, LARGE_WINDOW_SIZE};
use crate::screen::{EntryRefresh, ScreenId};
use crate::screens::{centered_rect, create_screens};
use crate::theme;
use crate::tui::Tui;

/// Toasts disappear after this long.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    /// The one section currently shown.
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    /// True until the bootstrap sequence has finished, successfully or not.
    loading: bool,
    throbber: ThrobberState,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    console: Console,
    host: Box<dyn HostShell>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    /// Last reported engine state, for the status bar.
    engine_running: Option<bool>,
    /// Log fetched when the Logs section is entered.
    log_kind: LogKind,
}

impl App {
    pub fn new(console: Console, host: Box<dyn HostShell>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            active_screen: ScreenId::default(),
            screens: create_screens().into_iter().collect(),
            running: true,
            loading: true,
            throbber: ThrobberState::default(),
            help_visible: false,
            action_tx,
            action_rx,
            console,
            host,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
            engine_running: None,
            log_kind: LogKind::Access,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        self.focus_only(self.active_screen);
        Ok(())
    }

    /// Run the main event loop until the operator quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.init_screens()?;

        let console = self.console.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(console, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.loading {
            return Ok(match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            });
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // Forms and text fields own the keyboard while open
        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='6')) => {
                let n = u8::try_from(c).unwrap_or(b'0') - b'0';
                if let Some(target) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (_, KeyCode::F(11)) => return Ok(Some(Action::Host(HostAction::ToggleFullscreen))),
            (_, KeyCode::F(10)) => {
                let (w, h) = LARGE_WINDOW_SIZE;
                return Ok(Some(Action::Host(HostAction::SetWindowSize(w, h))));
            }
            (_, KeyCode::F(9)) => return Ok(Some(Action::Host(HostAction::ResetWindow))),

            _ => {}
        }

        screen.handle_key_event(key)
    }

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                if self.loading {
                    self.throbber.calc_next();
                }
            }

            Action::BootstrapFinished(summary) => {
                self.loading = false;
                for failure in &summary.failures {
                    warn!(%failure, "bootstrap fetch failed");
                }
                if !summary.failures.is_empty() {
                    self.action_tx.send(Action::Notify(Notification::warning(format!(
                        "Control plane partly unavailable ({} failed)",
                        summary.failures.len()
                    ))))?;
                } else if !summary.stats_available {
                    self.action_tx.send(Action::Notify(Notification::info(
                        "Waiting for the first stats sample",
                    )))?;
                }
            }

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // Data updates go to ALL screens so they stay in sync
            Action::StatusUpdated(status) => {
                self.engine_running = Some(status.running);
                self.broadcast(action)?;
            }
            Action::ConfigUpdated(_)
            | Action::ListsUpdated(_)
            | Action::StatsUpdated(_)
            | Action::TelemetryUpdated(_)
            | Action::DiagnosticsUpdated(_)
            | Action::LogsUpdated(_) => self.broadcast(action)?,

            Action::PanelError { screen, .. } => {
                if let Some(target) = self.screens.get_mut(screen) {
                    if let Some(follow_up) = target.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // ── Command pipeline ──────────────────────────────────────
            Action::Execute(cmd) => self.execute_command(cmd.clone()),
            Action::RequestDiagnostics => self.request_diagnostics(),
            Action::RequestLogs(kind) => self.request_logs(*kind),

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_command(confirm.into_command());
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::Host(host_action) => host_action.apply(self.host.as_mut()),
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Section controller ───────────────────────────────────────────

    fn focus_only(&mut self, target: ScreenId) {
        for (id, screen) in &mut self.screens {
            screen.set_focused(*id == target);
        }
    }

    /// Deactivate every other section, activate `target`, then run its
    /// entry fetch.
    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        self.focus_only(target);
        self.active_screen = target;

        match target.entry_refresh() {
            Some(EntryRefresh::Diagnostics) => self.request_diagnostics(),
            Some(EntryRefresh::Logs) => self.request_logs(self.log_kind),
            None => {}
        }
    }

    // ── Command execution ────────────────────────────────────────────

    /// Spawn a command. The result lands as a panel hint on the screen
    /// that issued it plus a toast.
    fn execute_command(&self, cmd: Command) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        let screen = origin_screen(&cmd);
        let success = success_message(&cmd);

        tokio::spawn(async move {
            match console.execute(cmd).await {
                Ok(_) => {
                    let _ = tx.send(Action::PanelError {
                        screen,
                        message: None,
                    });
                    let _ = tx.send(Action::Notify(Notification::success(success)));
                }
                Err(e) => {
                    warn!(error = %e, "command execution failed");
                    let _ = tx.send(Action::PanelError {
                        screen,
                        message: Some(e.to_string()),
                    });
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    fn request_diagnostics(&self) {
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let message = match console.refresh_diagnostics().await {
                Ok(()) => None,
                Err(e) => {
                    warn!(error = %e, "diagnostics fetch failed");
                    Some(format!("Diagnostics unavailable: {e}"))
                }
            };
            let _ = tx.send(Action::PanelError {
                screen: ScreenId::Diagnostics,
                message,
            });
        });
    }

    fn request_logs(&mut self, kind: LogKind) {
        self.log_kind = kind;
        let console = self.console.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let message = match console.refresh_logs(kind).await {
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, %kind, "log fetch failed");
                    Some(format!("Could not load {kind} log: {e}"))
                }
            };
            let _ = tx.send(Action::PanelError {
                screen: ScreenId::Logs,
                message,
            });
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays, last = topmost
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
        if self.loading {
            self.render_loading(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(self.active_screen.index());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let engine = match self.engine_running {
            Some(true) => Span::styled("● engine running", Style::default().fg(theme::SUCCESS_GREEN)),
            Some(false) => Span::styled("○ engine stopped", Style::default().fg(theme::ERROR_RED)),
            None => Span::styled("◐ connecting", Style::default().fg(theme::ELECTRIC_YELLOW)),
        };

        let polled = self
            .console
            .store()
            .last_poll()
            .and_then(|t| Utc::now().signed_duration_since(t).to_std().ok())
            .map_or_else(
                || "no stats yet".to_owned(),
                |age| {
                    let secs = Duration::from_secs(age.as_secs());
                    format!("stats {} ago", humantime::format_duration(secs))
                },
            );

        let line = Line::from(vec![
            Span::raw(" "),
            engine,
            Span::styled(
                format!(" │ {} │ {polled}", self.console.config().control_url),
                theme::key_hint(),
            ),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let dialog = centered_rect(50, 5, area);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" BlackKitten ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);
        let throbber = Throbber::default()
            .label(" Loading configuration, lists and status…")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, rows[0], &mut self.throbber.clone());
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("   {}", self.console.config().control_url),
                theme::key_hint(),
            )),
            rows[1],
        );
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered_rect(56, 20, area);
        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let heading = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().fg(theme::NEON_CYAN)))
        };
        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            heading("  Navigation"),
            entry("1-6", "Jump to section"),
            entry("Tab", "Next section"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("Esc", "Close form / dialog"),
            Line::from(""),
            heading("  Engine & data"),
            entry("s / x", "Start / stop proxy (dashboard)"),
            entry("Space", "Toggle list"),
            entry("a e d", "Add / edit / delete"),
            entry("r", "Refresh section"),
            Line::from(""),
            heading("  Window"),
            entry("F11", "Toggle fullscreen"),
            entry("F10 / F9", "Large window / reset size"),
            Line::from(""),
            Line::from(Span::styled(
                "                        Esc or ? to close",
                theme::key_hint(),
            )),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = centered_rect(50, 5, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16.min(area.height);

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.clone(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
