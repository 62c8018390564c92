//! Lists screen: unlock-list inventory with toggle, create, edit and delete.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use kitten_core::command::validate_list_name;
use kitten_core::{Command, DomainList};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screens::{Selection, centered_rect, error_line, hints_line, panel_block};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Domains,
}

/// Create/edit overlay. Editing keeps the name fixed.
#[derive(Debug, Clone)]
struct ListForm {
    editing: Option<String>,
    name: String,
    domains: String,
    field: FormField,
    error: Option<String>,
}

impl ListForm {
    fn create() -> Self {
        Self {
            editing: None,
            name: String::new(),
            domains: String::new(),
            field: FormField::Name,
            error: None,
        }
    }

    fn edit(list: &DomainList) -> Self {
        Self {
            editing: Some(list.name.clone()),
            name: list.name.clone(),
            domains: list.domains.join("\n"),
            field: FormField::Domains,
            error: None,
        }
    }

    fn active_text(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::Domains => &mut self.domains,
        }
    }

    fn next_field(&mut self) {
        if self.editing.is_none() {
            self.field = match self.field {
                FormField::Name => FormField::Domains,
                FormField::Domains => FormField::Name,
            };
        }
    }

    /// Validate and build the command, or record why not.
    fn submit(&mut self) -> Option<Command> {
        let name = self.name.trim().to_owned();
        if let Err(e) = validate_list_name(&name) {
            self.error = Some(e.to_string());
            return None;
        }
        let domains = self.domains.clone();
        Some(match self.editing {
            Some(_) => Command::EditList { name, domains },
            None => Command::CreateList { name, domains },
        })
    }
}

pub struct ListsScreen {
    focused: bool,
    lists: Arc<Vec<DomainList>>,
    selection: Selection,
    form: Option<ListForm>,
    error: Option<String>,
}

impl ListsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            lists: Arc::new(Vec::new()),
            selection: Selection::default(),
            form: None,
            error: None,
        }
    }

    fn selected(&self) -> Option<&DomainList> {
        self.lists.get(self.selection.index())
    }

    fn enabled_count(&self) -> usize {
        self.lists.iter().filter(|l| l.enabled).count()
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            let cmd = form.submit()?;
            self.form = None;
            return Some(Action::Execute(cmd));
        }

        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::BackTab => form.next_field(),
            KeyCode::Enter => match form.field {
                FormField::Name => form.next_field(),
                FormField::Domains => form.domains.push('\n'),
            },
            KeyCode::Backspace => {
                form.active_text().pop();
            }
            KeyCode::Char(c) => {
                let accept = form.field == FormField::Domains || !c.is_whitespace();
                if accept {
                    form.active_text().push(c);
                }
            }
            _ => {}
        }
        None
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &ListForm) {
        let overlay = centered_rect(56, 18, area);
        frame.render_widget(Clear, overlay);

        let title = match &form.editing {
            Some(name) => format!(" Edit {name} "),
            None => " New List ".to_owned(),
        };
        let block = Block::default()
            .title(title)
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

        let layout = Layout::vertical([
            Constraint::Length(1), // name
            Constraint::Length(1), // domains label
            Constraint::Min(3),    // domains text
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let label_style = |field| {
            if form.field == field {
                Style::default()
                    .fg(theme::ELECTRIC_YELLOW)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::label()
            }
        };
        let cursor = |field| if form.field == field { "\u{2588}" } else { "" };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Name     ", label_style(FormField::Name)),
                Span::styled(form.name.clone(), theme::value()),
                Span::styled(cursor(FormField::Name), theme::value()),
            ])),
            layout[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                " Domains (one per line)",
                label_style(FormField::Domains),
            )),
            layout[1],
        );

        let domains = format!("{}{}", form.domains, cursor(FormField::Domains));
        let text_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        frame.render_widget(
            Paragraph::new(domains)
                .style(theme::value())
                .wrap(Wrap { trim: false })
                .block(text_block),
            layout[2],
        );

        frame.render_widget(Paragraph::new(error_line(form.error.as_deref())), layout[3]);
        frame.render_widget(
            Paragraph::new(hints_line(&[
                ("Tab", "field  "),
                ("Ctrl+S", "save  "),
                ("Esc", "cancel"),
            ])),
            layout[4],
        );
    }
}

impl Component for ListsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let len = self.lists.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.selection.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.selection.move_by(-1, len),
            KeyCode::Char('g') => self.selection.select(0, len),
            KeyCode::Char('G') => self.selection.select(len.saturating_sub(1), len),
            KeyCode::Char(' ') => {
                if let Some(list) = self.selected() {
                    return Ok(Some(Action::Execute(Command::ToggleList {
                        name: list.name.clone(),
                        enabled: !list.enabled,
                    })));
                }
            }
            KeyCode::Char('a') => self.form = Some(ListForm::create()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(list) = self.selected() {
                    self.form = Some(ListForm::edit(list));
                }
            }
            KeyCode::Char('d') => {
                if let Some(list) = self.selected() {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::RemoveList {
                        name: list.name.clone(),
                    })));
                }
            }
            KeyCode::Char('o') => return Ok(Some(Action::Execute(Command::OpenUnlocked))),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ListsUpdated(lists) => {
                self.lists = Arc::clone(lists);
                self.selection.clamp(self.lists.len());
            }
            Action::PanelError { message, .. } => self.error.clone_from(message),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Lists ({}) · {} enabled ",
            self.lists.len(),
            self.enabled_count()
        );
        let block = panel_block(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Domains").style(theme::table_header()),
            Cell::from("State").style(theme::table_header()),
        ]);

        let selected_idx = self.selection.index();
        let rows: Vec<Row> = self
            .lists
            .iter()
            .enumerate()
            .map(|(i, list)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let (state, state_style) = if list.enabled {
                    ("● on", Style::default().fg(theme::SUCCESS_GREEN))
                } else {
                    ("○ off", Style::default().fg(theme::BORDER_GRAY))
                };
                Row::new(vec![
                    Cell::from(format!("{prefix}{}", list.name))
                        .style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(list.count.to_string()),
                    Cell::from(state).style(state_style),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(8),
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
                ("Space", "toggle  "),
                ("a", "add  "),
                ("e", "edit  "),
                ("d", "delete  "),
                ("o", "open folder"),
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
        "Lists"
    }
}
