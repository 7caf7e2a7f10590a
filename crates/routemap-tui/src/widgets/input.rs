//! Single-line text field used by the search and URL overlays.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::theme;

/// What a key did to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Changed,
    Submit,
    Cancel,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TextInput {
    title: &'static str,
    hint: &'static str,
    value: String,
}

impl TextInput {
    pub fn new(title: &'static str, hint: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            hint,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        match key.code {
            KeyCode::Enter => InputOutcome::Submit,
            KeyCode::Esc => InputOutcome::Cancel,
            KeyCode::Backspace => {
                if self.value.pop().is_some() {
                    InputOutcome::Changed
                } else {
                    InputOutcome::Ignored
                }
            }
            // Ctrl+U clears the line, as in a shell
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    InputOutcome::Ignored
                } else {
                    self.value.clear();
                    InputOutcome::Changed
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                InputOutcome::Changed
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Draw as a bordered box of height 3 at the top of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(4).min(72);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let field = Rect::new(x, area.y + 1, width, 3.min(area.height));

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(theme::title_style())
            .title_bottom(Line::from(Span::styled(
                format!(" {} ", self.hint),
                theme::key_hint(),
            )))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(field);
        frame.render_widget(Clear, field);
        frame.render_widget(block, field);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(self.value.as_str(), Style::default().fg(theme::DIM_WHITE)),
                Span::styled("▏", Style::default().fg(theme::ELECTRIC_PURPLE)),
            ])),
            inner,
        );
    }
}
