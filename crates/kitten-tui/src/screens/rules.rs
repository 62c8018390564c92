//! Rules screen: ordered per-domain rules. Append and delete only; the
//! server's order is shown as-is.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table},
};
use strum::IntoEnumIterator;

use kitten_core::{Command, FragmentMethod, Rule, RuleAction};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screens::{
    Selection, centered_rect, error_line, hints_line, panel_block, selector_line,
};
use crate::theme;

/// Label for a rule's method override.
fn method_label(method: Option<FragmentMethod>) -> String {
    method.map_or_else(|| "default".to_owned(), |m| m.to_string())
}

/// Step through `None → random → sni → None`.
fn cycle_method(method: Option<FragmentMethod>, forward: bool) -> Option<FragmentMethod> {
    let mut options: Vec<Option<FragmentMethod>> = vec![None];
    options.extend(FragmentMethod::iter().map(Some));
    let idx = options.iter().position(|m| *m == method).unwrap_or(0);
    let next = if forward {
        (idx + 1) % options.len()
    } else {
        (idx + options.len() - 1) % options.len()
    };
    options[next]
}

fn cycle_action(action: RuleAction, forward: bool) -> RuleAction {
    let all: Vec<RuleAction> = RuleAction::iter().collect();
    let idx = all.iter().position(|a| *a == action).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

#[derive(Debug, Clone, Default)]
struct RuleForm {
    pattern: String,
    action: RuleAction,
    method: Option<FragmentMethod>,
    field_idx: usize,
    error: Option<String>,
}

impl RuleForm {
    const FIELD_COUNT: usize = 3;

    fn cycle(&mut self, forward: bool) {
        match self.field_idx {
            1 => self.action = cycle_action(self.action, forward),
            2 => self.method = cycle_method(self.method, forward),
            _ => {}
        }
    }

    fn rule(&self) -> Rule {
        Rule {
            pattern: self.pattern.trim().to_owned(),
            action: self.action,
            fragment_method: self.method,
        }
    }
}

pub struct RulesScreen {
    focused: bool,
    rules: Vec<Rule>,
    selection: Selection,
    form: Option<RuleForm>,
    error: Option<String>,
}

impl RulesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            rules: Vec::new(),
            selection: Selection::default(),
            form: None,
            error: None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => {
                form.field_idx = (form.field_idx + 1) % RuleForm::FIELD_COUNT;
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.field_idx =
                    (form.field_idx + RuleForm::FIELD_COUNT - 1) % RuleForm::FIELD_COUNT;
            }
            KeyCode::Enter => {
                let cmd = Command::AddRule(form.rule());
                if let Err(e) = cmd.validate() {
                    form.error = Some(e.to_string());
                    return None;
                }
                self.form = None;
                return Some(Action::Execute(cmd));
            }
            KeyCode::Left => form.cycle(false),
            KeyCode::Right | KeyCode::Char(' ') if form.field_idx != 0 => form.cycle(true),
            KeyCode::Backspace if form.field_idx == 0 => {
                form.pattern.pop();
            }
            KeyCode::Char(c) if form.field_idx == 0 && !c.is_whitespace() => {
                form.pattern.push(c);
            }
            _ => {}
        }
        None
    }

    #[allow(clippy::unused_self)]
    fn render_form(&self, frame: &mut Frame, area: Rect, form: &RuleForm) {
        let overlay = centered_rect(52, 9, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .title(" Add Rule ")
            .title_style(
                Style::default()
                    .fg(theme::ELECTRIC_YELLOW)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let pattern_active = form.field_idx == 0;
        let pattern_label = if pattern_active {
            Style::default()
                .fg(theme::ELECTRIC_YELLOW)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::label()
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(if pattern_active { "▸ " } else { "  " }, pattern_label),
                Span::styled(format!("{:<18}", "Pattern"), pattern_label),
                Span::styled(form.pattern.clone(), theme::value()),
                Span::styled(if pattern_active { "\u{2588}" } else { "" }, theme::value()),
            ]),
            selector_line("Action", form.action.as_ref(), form.field_idx == 1),
            selector_line("Fragment method", &method_label(form.method), form.field_idx == 2),
            Line::from(""),
            error_line(form.error.as_deref()),
            hints_line(&[
                ("Tab", "next  "),
                ("←/→", "change  "),
                ("Enter", "add  "),
                ("Esc", "cancel"),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for RulesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let len = self.rules.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.selection.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.selection.move_by(-1, len),
            KeyCode::Char('g') => self.selection.select(0, len),
            KeyCode::Char('G') => self.selection.select(len.saturating_sub(1), len),
            KeyCode::Char('a') => self.form = Some(RuleForm::default()),
            KeyCode::Char('d') => {
                let index = self.selection.index();
                if let Some(rule) = self.rules.get(index) {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::RemoveRule {
                        index,
                        rule: rule.clone(),
                    })));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ConfigUpdated(config) => {
                self.rules.clone_from(&config.rules);
                self.selection.clamp(self.rules.len());
            }
            Action::PanelError { message, .. } => self.error.clone_from(message),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(format!(" Rules ({}) ", self.rules.len()), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let header = Row::new(vec![
            Cell::from("#").style(theme::table_header()),
            Cell::from("Pattern").style(theme::table_header()),
            Cell::from("Action").style(theme::table_header()),
            Cell::from("Method").style(theme::table_header()),
        ]);

        let selected_idx = self.selection.index();
        let rows: Vec<Row> = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let action_color = match rule.action {
                    RuleAction::Auto => theme::NEON_CYAN,
                    RuleAction::Force => theme::CORAL,
                    RuleAction::Bypass => theme::SUCCESS_GREEN,
                };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}", i + 1)),
                    Cell::from(rule.pattern.clone()).style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(rule.action.to_string()).style(Style::default().fg(action_color)),
                    Cell::from(method_label(rule.fragment_method)),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Min(24),
            Constraint::Length(8),
            Constraint::Length(9),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.selection.state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        frame.render_widget(Paragraph::new(error_line(self.error.as_deref())), layout[1]);
        frame.render_widget(
            Paragraph::new(hints_line(&[
                ("j/k", "navigate  "),
                ("a", "add  "),
                ("d", "delete"),
            ])),
            layout[2],
        );

        if let Some(form) = &self.form {
            self.render_form(frame, area, form);
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Rules"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use kitten_core::ProxyConfig;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn method_cycle_includes_default() {
        assert_eq!(cycle_method(None, true), Some(FragmentMethod::Random));
        assert_eq!(cycle_method(Some(FragmentMethod::Sni), true), None);
        assert_eq!(cycle_method(None, false), Some(FragmentMethod::Sni));
    }

    #[test]
    fn add_form_builds_rule() {
        let mut screen = RulesScreen::new();
        screen.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        for c in "*.example.com".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        match action {
            Some(Action::Execute(Command::AddRule(rule))) => assert_eq!(
                rule,
                Rule {
                    pattern: "*.example.com".into(),
                    action: RuleAction::Force,
                    fragment_method: Some(FragmentMethod::Sni),
                }
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_pattern_is_rejected_in_form() {
        let mut screen = RulesScreen::new();
        screen.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(action.is_none());
        assert!(screen.captures_input());
        assert_eq!(
            screen.form.as_ref().unwrap().error.as_deref(),
            Some("pattern: must not be empty")
        );
    }

    #[test]
    fn rules_come_from_config() {
        let mut screen = RulesScreen::new();
        let config = ProxyConfig {
            rules: vec![Rule {
                pattern: "youtube.com".into(),
                action: RuleAction::Force,
                fragment_method: None,
            }],
            ..ProxyConfig::default()
        };
        screen.update(&Action::ConfigUpdated(Arc::new(config))).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ConfirmAction::RemoveRule { index: 0, ref rule }))
                if rule.pattern == "youtube.com" && rule.action == RuleAction::Force
        ));
    }
}
