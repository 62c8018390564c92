//! Settings screen: connection, language, advanced fragmentation options
//! and custom domains. Each section saves on its own.
//!
//! Navigation mode moves between fields; Enter on a text field starts
//! editing it, on a toggle or selector it changes the value. The draft is
//! reloaded from every config refresh unless it has unsaved edits.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use strum::IntoEnumIterator;

use kitten_core::command::parse_port;
use kitten_core::{Command, DomainMatching, FragmentMethod, ProxyConfig, SettingsDraft};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{
    error_line, hints_line, panel_block, render_input_field, selector_line, toggle_line,
};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsField {
    Host,
    Port,
    Language,
    FragmentMethod,
    DomainMatching,
    AutoBlacklist,
    NoBlacklist,
    CustomDomains,
}

/// Group of fields saved by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Connection,
    Language,
    Advanced,
    CustomDomains,
}

impl SettingsField {
    const ALL: [Self; 8] = [
        Self::Host,
        Self::Port,
        Self::Language,
        Self::FragmentMethod,
        Self::DomainMatching,
        Self::AutoBlacklist,
        Self::NoBlacklist,
        Self::CustomDomains,
    ];

    fn section(self) -> Section {
        match self {
            Self::Host | Self::Port => Section::Connection,
            Self::Language => Section::Language,
            Self::FragmentMethod
            | Self::DomainMatching
            | Self::AutoBlacklist
            | Self::NoBlacklist => Section::Advanced,
            Self::CustomDomains => Section::CustomDomains,
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Self::Host | Self::Port | Self::Language | Self::CustomDomains
        )
    }
}

fn next_variant<T: IntoEnumIterator + PartialEq + Copy>(current: T) -> T {
    let all: Vec<T> = T::iter().collect();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

/// Editable copy of the server config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Draft {
    host: String,
    port: String,
    language: String,
    fragment_method: FragmentMethod,
    domain_matching: DomainMatching,
    auto_blacklist: bool,
    no_blacklist: bool,
    custom_domains: String,
}

impl Draft {
    fn from_config(config: &ProxyConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.to_string(),
            language: config.language.clone(),
            fragment_method: config.fragment_method,
            domain_matching: config.domain_matching,
            auto_blacklist: config.auto_blacklist && !config.no_blacklist,
            no_blacklist: config.no_blacklist,
            custom_domains: config.custom_domains.join("\n"),
        }
    }
}

pub struct SettingsScreen {
    focused: bool,
    config: Option<Arc<ProxyConfig>>,
    draft: Draft,
    active: usize,
    editing: bool,
    dirty: bool,
    error: Option<String>,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            config: None,
            draft: Draft::default(),
            active: 0,
            editing: false,
            dirty: false,
            error: None,
        }
    }

    fn active_field(&self) -> SettingsField {
        SettingsField::ALL[self.active]
    }

    fn reload(&mut self) {
        if let Some(config) = &self.config {
            self.draft = Draft::from_config(config);
        }
        self.dirty = false;
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.active_field() {
            SettingsField::Host => Some(&mut self.draft.host),
            SettingsField::Port => Some(&mut self.draft.port),
            SettingsField::Language => Some(&mut self.draft.language),
            SettingsField::CustomDomains => Some(&mut self.draft.custom_domains),
            _ => None,
        }
    }

    /// Change a toggle or selector. Turning on "no blacklist" clears
    /// automatic blacklisting, which stays locked until it is turned off.
    fn change_value(&mut self) {
        let field = self.active_field();
        let draft = &mut self.draft;
        match field {
            SettingsField::FragmentMethod => {
                draft.fragment_method = next_variant(draft.fragment_method);
            }
            SettingsField::DomainMatching => {
                draft.domain_matching = next_variant(draft.domain_matching);
            }
            SettingsField::AutoBlacklist if !draft.no_blacklist => {
                draft.auto_blacklist = !draft.auto_blacklist;
            }
            SettingsField::NoBlacklist => {
                draft.no_blacklist = !draft.no_blacklist;
                if draft.no_blacklist {
                    draft.auto_blacklist = false;
                }
            }
            _ => return,
        }
        self.dirty = true;
    }

    /// Build the request for the section holding the focused field.
    fn save_section(&mut self) -> Option<Action> {
        let draft = &self.draft;
        let cmd = match self.active_field().section() {
            Section::Connection => match parse_port(&draft.port) {
                Ok(port) => Command::SaveConnection {
                    host: draft.host.trim().to_owned(),
                    port,
                },
                Err(e) => {
                    self.error = Some(e.to_string());
                    return None;
                }
            },
            Section::Language => Command::SaveLanguage(draft.language.trim().to_owned()),
            Section::Advanced => Command::SaveSettings(SettingsDraft {
                fragment_method: draft.fragment_method,
                domain_matching: draft.domain_matching,
                auto_blacklist: draft.auto_blacklist,
                no_blacklist: draft.no_blacklist,
            }),
            Section::CustomDomains => Command::SaveCustomDomains(draft.custom_domains.clone()),
        };

        if let Err(e) = cmd.validate() {
            self.error = Some(e.to_string());
            return None;
        }
        self.error = None;
        self.dirty = false;
        Some(Action::Execute(cmd))
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let multiline = self.active_field() == SettingsField::CustomDomains;
        match key.code {
            KeyCode::Esc => self.editing = false,
            KeyCode::Enter if multiline => {
                if let Some(text) = self.active_text_mut() {
                    text.push('\n');
                }
            }
            KeyCode::Enter => self.editing = false,
            KeyCode::Backspace => {
                if let Some(text) = self.active_text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.active_text_mut() {
                    text.push(c);
                }
            }
            _ => return,
        }
        self.dirty = true;
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn is_active(&self, field: SettingsField) -> bool {
        self.focused && self.active_field() == field
    }

    fn render_advanced(&self, frame: &mut Frame, area: Rect) {
        let draft = &self.draft;
        let mode = self
            .config
            .as_ref()
            .and_then(|c| c.mode.clone())
            .unwrap_or_else(|| "—".to_owned());

        let lines = vec![
            Line::from(Span::styled("  Advanced", theme::section())),
            selector_line(
                "Fragment method",
                draft.fragment_method.as_ref(),
                self.is_active(SettingsField::FragmentMethod),
            ),
            selector_line(
                "Domain matching",
                draft.domain_matching.as_ref(),
                self.is_active(SettingsField::DomainMatching),
            ),
            toggle_line(
                "Automatic blacklist",
                draft.auto_blacklist,
                self.is_active(SettingsField::AutoBlacklist),
                draft.no_blacklist,
            ),
            toggle_line(
                "No blacklist (fragment everything)",
                draft.no_blacklist,
                self.is_active(SettingsField::NoBlacklist),
                false,
            ),
            Line::from(vec![
                Span::styled("  Mode ", theme::label()),
                Span::styled(mode, Style::default().fg(theme::BORDER_GRAY)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_custom_domains(&self, frame: &mut Frame, area: Rect) {
        let active = self.is_active(SettingsField::CustomDomains);
        let editing = active && self.editing;
        let block = Block::default()
            .title(" Custom domains ")
            .title_style(if active {
                Style::default().fg(theme::NEON_CYAN)
            } else {
                theme::label()
            })
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let mut text = self.draft.custom_domains.clone();
        if editing {
            text.push('\u{2588}');
        }
        frame.render_widget(
            Paragraph::new(text)
                .style(theme::value())
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }

    fn hints(&self) -> Line<'static> {
        if self.editing {
            return hints_line(&[("Enter", "done / newline  "), ("Esc", "stop editing")]);
        }
        hints_line(&[
            ("j/k", "field  "),
            ("Enter", "edit/change  "),
            ("s", "save section  "),
            ("r", "revert  "),
            ("b", "open blacklist"),
        ])
    }
}

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing {
            self.handle_edit_key(key);
            return Ok(None);
        }

        let count = SettingsField::ALL.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.active = (self.active + 1) % count,
            KeyCode::Char('k') | KeyCode::Up => self.active = (self.active + count - 1) % count,
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.active_field().is_text() {
                    self.editing = true;
                } else {
                    self.change_value();
                }
            }
            KeyCode::Char('s') => return Ok(self.save_section()),
            KeyCode::Char('r') => {
                self.reload();
                self.error = None;
            }
            KeyCode::Char('b') => return Ok(Some(Action::Execute(Command::OpenBlacklist))),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ConfigUpdated(config) => {
                self.config = Some(Arc::clone(config));
                if !self.dirty {
                    self.reload();
                }
            }
            Action::PanelError { message, .. } => self.error.clone_from(message),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.dirty {
            " Settings (unsaved) "
        } else {
            " Settings "
        };
        let block = panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(4), // host + port
            Constraint::Length(4), // language
            Constraint::Length(6), // advanced
            Constraint::Min(3),    // custom domains
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let connection =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(layout[0]);
        let host_active = self.is_active(SettingsField::Host);
        render_input_field(
            frame,
            connection[0],
            "Host",
            &self.draft.host,
            host_active,
            host_active && self.editing,
        );
        let port_active = self.is_active(SettingsField::Port);
        render_input_field(
            frame,
            connection[1],
            "Port",
            &self.draft.port,
            port_active,
            port_active && self.editing,
        );

        let language_active = self.is_active(SettingsField::Language);
        render_input_field(
            frame,
            layout[1],
            "Language (auto or locale code)",
            &self.draft.language,
            language_active,
            language_active && self.editing,
        );

        self.render_advanced(frame, layout[2]);
        self.render_custom_domains(frame, layout[3]);

        frame.render_widget(Paragraph::new(error_line(self.error.as_deref())), layout[4]);
        frame.render_widget(Paragraph::new(self.hints()), layout[5]);
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.editing = false;
        }
    }

    fn id(&self) -> &'static str {
        "Settings"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(config: ProxyConfig) -> SettingsScreen {
        let mut screen = SettingsScreen::new();
        screen.set_focused(true);
        screen.update(&Action::ConfigUpdated(Arc::new(config))).unwrap();
        screen
    }

    fn focus(screen: &mut SettingsScreen, field: SettingsField) {
        screen.active = SettingsField::ALL.iter().position(|f| *f == field).unwrap();
    }

    #[test]
    fn no_blacklist_forces_auto_off_on_save() {
        let mut screen = loaded(ProxyConfig {
            auto_blacklist: true,
            ..ProxyConfig::default()
        });
        focus(&mut screen, SettingsField::NoBlacklist);
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        // Auto stays locked while no-blacklist is on.
        focus(&mut screen, SettingsField::AutoBlacklist);
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(!screen.draft.auto_blacklist);

        let action = screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        match action {
            Some(Action::Execute(Command::SaveSettings(draft))) => {
                assert!(draft.no_blacklist);
                assert!(!draft.auto_blacklist);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn connection_save_validates_port() {
        let mut screen = loaded(ProxyConfig::default());
        focus(&mut screen, SettingsField::Port);
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(screen.captures_input());
        for _ in 0..6 {
            screen.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        for c in "70000".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(!screen.captures_input());

        let action = screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        assert!(action.is_none());
        assert_eq!(
            screen.error.as_deref(),
            Some("port: must be between 1 and 65535")
        );
    }

    #[test]
    fn connection_save_sends_host_and_port() {
        let mut screen = loaded(ProxyConfig {
            host: "127.0.0.1".into(),
            port: 8881,
            ..ProxyConfig::default()
        });
        focus(&mut screen, SettingsField::Host);
        let action = screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        match action {
            Some(Action::Execute(cmd)) => assert_eq!(
                cmd,
                Command::SaveConnection {
                    host: "127.0.0.1".into(),
                    port: 8881
                }
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn custom_domains_accept_newlines() {
        let mut screen = loaded(ProxyConfig::default());
        focus(&mut screen, SettingsField::CustomDomains);
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        for code in [
            KeyCode::Char('a'),
            KeyCode::Char('.'),
            KeyCode::Char('i'),
            KeyCode::Enter,
            KeyCode::Char('b'),
        ] {
            screen.handle_key_event(key(code)).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Esc)).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Char('s'))).unwrap();
        match action {
            Some(Action::Execute(Command::SaveCustomDomains(text))) => {
                assert_eq!(text, "a.i\nb");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn refresh_keeps_unsaved_edits() {
        let mut screen = loaded(ProxyConfig {
            host: "127.0.0.1".into(),
            ..ProxyConfig::default()
        });
        focus(&mut screen, SettingsField::DomainMatching);
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(screen.draft.domain_matching, DomainMatching::Loose);

        screen
            .update(&Action::ConfigUpdated(Arc::new(ProxyConfig {
                host: "0.0.0.0".into(),
                ..ProxyConfig::default()
            })))
            .unwrap();
        assert_eq!(screen.draft.domain_matching, DomainMatching::Loose);
        assert_eq!(screen.draft.host, "127.0.0.1");

        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(screen.draft.host, "0.0.0.0");
        assert_eq!(screen.draft.domain_matching, DomainMatching::Strict);
    }
}
