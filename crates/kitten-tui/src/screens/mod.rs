//! Screen implementations. Each screen is a top-level Component.

pub mod dashboard;
pub mod diagnostics;
pub mod lists;
pub mod logs;
pub mod rules;
pub mod settings;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, TableState},
};

use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// Create one component per section, in tab-bar order.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (ScreenId::Lists, Box::new(lists::ListsScreen::new())),
        (ScreenId::Rules, Box::new(rules::RulesScreen::new())),
        (ScreenId::Settings, Box::new(settings::SettingsScreen::new())),
        (
            ScreenId::Diagnostics,
            Box::new(diagnostics::DiagnosticsScreen::new()),
        ),
        (ScreenId::Logs, Box::new(logs::LogsScreen::new())),
    ]
}

// ── Shared rendering helpers ──────────────────────────────────────────

/// Rounded panel frame used by every screen.
pub fn panel_block(title: impl Into<Line<'static>>, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// Key hint line from `(key, description)` pairs.
pub fn hints_line(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2 + 1);
    spans.push(Span::raw(" "));
    for (key, desc) in pairs {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled(*desc, theme::key_hint()));
    }
    Line::from(spans)
}

/// Inline error next to the control that failed; blank when clear.
pub fn error_line(message: Option<&str>) -> Line<'static> {
    match message {
        Some(msg) => Line::from(vec![
            Span::styled("  ✗ ", theme::error_hint().add_modifier(Modifier::BOLD)),
            Span::styled(msg.to_owned(), theme::error_hint()),
        ]),
        None => Line::from(""),
    }
}

/// Rect of at most `width` x `height`, centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Labelled single-line input box, three rows plus the label.
pub fn render_input_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    editing: bool,
) {
    if area.height < 3 {
        return;
    }

    let label_style = if active {
        Style::default().fg(theme::NEON_CYAN)
    } else {
        theme::label()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("  {label}"), label_style)),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let border_color = if active {
        theme::ELECTRIC_PURPLE
    } else {
        theme::BORDER_GRAY
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
    let inner = block.inner(block_area);
    frame.render_widget(block, block_area);

    let text = if editing {
        format!("{value}\u{2588}")
    } else {
        value.to_owned()
    };
    frame.render_widget(Paragraph::new(Span::styled(text, theme::value())), inner);
}

/// `[✓] label` checkbox line.
pub fn toggle_line(label: &str, value: bool, active: bool, disabled: bool) -> Line<'static> {
    let marker = if value { "[\u{2713}]" } else { "[ ]" };
    let marker_style = if disabled {
        Style::default().fg(theme::BORDER_GRAY)
    } else if active {
        Style::default().fg(theme::ELECTRIC_PURPLE)
    } else if value {
        Style::default().fg(theme::SUCCESS_GREEN)
    } else {
        Style::default().fg(theme::BORDER_GRAY)
    };
    Line::from(vec![
        Span::styled(if active { "▸ " } else { "  " }, marker_style),
        Span::styled(format!("{marker} "), marker_style),
        Span::styled(label.to_owned(), field_label_style(active, disabled)),
    ])
}

/// `label  ◂ value ▸` selector line.
pub fn selector_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let arrow_style = if active {
        Style::default().fg(theme::ELECTRIC_PURPLE)
    } else {
        Style::default().fg(theme::BORDER_GRAY)
    };
    Line::from(vec![
        Span::styled(if active { "▸ " } else { "  " }, arrow_style),
        Span::styled(format!("{label:<18}"), field_label_style(active, false)),
        Span::styled("\u{25C2} ", arrow_style),
        Span::styled(value.to_owned(), theme::value()),
        Span::styled(" \u{25B8}", arrow_style),
    ])
}

fn field_label_style(active: bool, disabled: bool) -> Style {
    if disabled {
        Style::default().fg(theme::BORDER_GRAY)
    } else if active {
        Style::default()
            .fg(theme::ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD)
    } else {
        theme::label()
    }
}

// ── Table selection ───────────────────────────────────────────────────

/// Cursor over a table whose rows are replaced wholesale on refresh.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    pub state: TableState,
}

impl Selection {
    pub fn index(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn select(&mut self, idx: usize, len: usize) {
        if len == 0 {
            self.state.select(None);
        } else {
            self.state.select(Some(idx.min(len - 1)));
        }
    }

    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let next = (self.index() as isize + delta).clamp(0, len as isize - 1);
        self.select(next as usize, len);
    }

    /// Keep the cursor on a valid row after the data changed.
    pub fn clamp(&mut self, len: usize) {
        self.select(self.index(), len);
    }
}
