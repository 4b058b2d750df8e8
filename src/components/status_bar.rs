//! Header and help bar

use crate::components::form::FormField;
use crate::model::{PredictionState, ServiceHealth};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Title, service endpoint and reachability, request status
pub fn draw_header(
    frame: &mut Frame,
    area: Rect,
    endpoint: &str,
    service: &ServiceHealth,
    state: &PredictionState,
) {
    let service_color = match service {
        ServiceHealth::Up(_) => Color::Green,
        ServiceHealth::Down => Color::Red,
        ServiceHealth::Unknown | ServiceHealth::Checking => Color::DarkGray,
    };

    let line = Line::from(vec![
        Span::styled(
            " forecast-tui ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::raw(endpoint.to_string()),
        Span::raw(" "),
        Span::styled(format!("({})", service.label()), Style::default().fg(service_color)),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{} ", state.status().status_icon())),
        Span::styled(
            format!("#{}", state.generation()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Shortcut hints for the current focus
pub fn help_text(focus: FormField, loading: bool) -> &'static str {
    if loading {
        return " Esc  Cancel request   PgUp/PgDn  Scroll   F1  Help";
    }
    if focus.is_text() {
        " Tab  Next field   Enter  Predict   Ctrl+u  Clear   Esc  Quit   F1  Help"
    } else {
        " Tab  Next field   ←/→  Change   Enter  Predict   ?  Help   q  Quit"
    }
}

pub fn draw_help_bar(frame: &mut Frame, area: Rect, focus: FormField, loading: bool) {
    let help = Paragraph::new(Line::from(Span::styled(
        help_text(focus, loading),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Left)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_text_mentions_cancel_while_loading() {
        assert!(help_text(FormField::Keyword, true).contains("Cancel"));
        assert!(help_text(FormField::Keyword, false).contains("Ctrl+u"));
        assert!(help_text(FormField::Method, false).contains("←/→"));
    }
}
