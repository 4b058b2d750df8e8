//! Forecast request form
//!
//! Four fields and a submit button. The component owns only the focus; the
//! field values live in `PredictionState` and are edited through Actions.

use crate::action::Action;
use crate::component::Component;
use crate::model::{Method, PredictionState, TimeFrame};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Focusable elements of the form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Keyword,
    TimeFrame,
    Method,
    DaysToPredict,
    Submit,
}

impl FormField {
    pub fn all() -> [FormField; 5] {
        [
            FormField::Keyword,
            FormField::TimeFrame,
            FormField::Method,
            FormField::DaysToPredict,
            FormField::Submit,
        ]
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> FormField {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> FormField {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Keyword => "Keyword",
            FormField::TimeFrame => "Time Frame",
            FormField::Method => "Method",
            FormField::DaysToPredict => "Days to Predict",
            FormField::Submit => "Predict",
        }
    }

    /// Whether printable keys edit this field
    pub fn is_text(&self) -> bool {
        matches!(self, FormField::Keyword | FormField::DaysToPredict)
    }
}

#[derive(Default)]
pub struct FormComponent {
    pub focus: FormField,
}

impl FormComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a typed character is accepted by the focused field
    ///
    /// The horizon behaves like a numeric input and only takes digits.
    pub fn accepts(&self, c: char) -> bool {
        match self.focus {
            FormField::Keyword => !c.is_control(),
            FormField::DaysToPredict => c.is_ascii_digit(),
            _ => false,
        }
    }

    fn handle_text_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Backspace => Some(Action::FieldBackspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ClearField)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.accepts(c) {
                    Some(Action::FieldInput(c))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn handle_choice_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevOption),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => Some(Action::NextOption),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        }
    }

    pub fn draw_with_state(&self, frame: &mut Frame, area: Rect, state: &PredictionState) {
        let inner_width = area.width.saturating_sub(4) as usize;
        let lines = build_form_lines(self.focus, state, inner_width);

        let border_color = if state.loading() { Color::DarkGray } else { Color::Cyan };
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(" Forecast Request ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

impl Component for FormComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Enter => Some(Action::Submit),
            _ if self.focus.is_text() => self.handle_text_key(key),
            KeyCode::Char(' ') if self.focus == FormField::Submit => Some(Action::Submit),
            _ if self.focus == FormField::Submit => match key.code {
                KeyCode::Char('?') => Some(Action::OpenHelp),
                KeyCode::Char('q') => Some(Action::OpenQuitDialog),
                _ => None,
            },
            _ => self.handle_choice_key(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextField => self.focus = self.focus.next(),
            Action::PrevField => self.focus = self.focus.prev(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the prediction state, so the App calls draw_with_state
        Ok(())
    }
}

/// Keep the end of `text` that fits in `max_width` columns
///
/// The cursor sits at the end of the field, so the tail is what matters.
pub fn visible_tail(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    &text[start..]
}

fn label_line(field: FormField, focus: FormField) -> Line<'static> {
    let style = if field == focus {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(field.label().to_string(), style))
}

fn text_value_line(value: &str, placeholder: &str, focused: bool, width: usize) -> Line<'static> {
    let prompt = Span::styled("> ", Style::default().fg(Color::Cyan));
    if value.is_empty() && !focused {
        return Line::from(vec![
            prompt,
            Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)),
        ]);
    }

    // Room for the prompt and the cursor
    let shown = visible_tail(value, width.saturating_sub(3));
    let mut spans = vec![
        prompt,
        Span::styled(
            shown.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn choice_line<T: PartialEq + Copy>(
    options: &[T],
    selected: T,
    label: fn(&T) -> &'static str,
    focused: bool,
) -> Line<'static> {
    let mut spans = Vec::new();
    if focused {
        spans.push(Span::styled("‹ ", Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::raw("  "));
    }
    for option in options {
        let (marker, style) = if *option == selected {
            ("● ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("○ ", Style::default().fg(Color::White))
        };
        spans.push(Span::styled(format!("{}{}  ", marker, label(option)), style));
    }
    if focused {
        spans.push(Span::styled("›", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn button_line(loading: bool, focused: bool) -> Line<'static> {
    let text = if loading { "[ Predicting... ]" } else { "[ Predict ]" };
    let style = if loading {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(text.to_string(), style)).centered()
}

/// Every line of the form panel, top to bottom
pub fn build_form_lines(focus: FormField, state: &PredictionState, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        label_line(FormField::Keyword, focus),
        text_value_line(
            state.keyword(),
            "Enter keyword...",
            focus == FormField::Keyword,
            width,
        ),
        label_line(FormField::TimeFrame, focus),
        choice_line(
            &TimeFrame::all(),
            state.time_frame(),
            TimeFrame::label,
            focus == FormField::TimeFrame,
        ),
        label_line(FormField::Method, focus),
        choice_line(
            &Method::all(),
            state.method(),
            Method::label,
            focus == FormField::Method,
        ),
        label_line(FormField::DaysToPredict, focus),
        text_value_line(
            state.days_to_predict(),
            "",
            focus == FormField::DaysToPredict,
            width,
        ),
        Line::from(""),
        button_line(state.loading(), focus == FormField::Submit),
    ];

    if !state.error().is_empty() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled(
                state.error().to_string(),
                Style::default().fg(Color::Red),
            ))
            .centered(),
        );
    }

    lines
}
