//! Historical and forecast series
//!
//! Each section is shown only when its series is non-empty, rows in the
//! order the service sent them.

use crate::action::Action;
use crate::component::Component;
use crate::model::forecast::ForecastRows;
use crate::model::{ForecastPoint, PredictionState, RequestStatus};
use anyhow::Result;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const PAGE: usize = 10;

#[derive(Default)]
pub struct ResultsComponent {
    pub scroll_offset: usize,
    pub show_bands: bool,
}

impl ResultsComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top, for a fresh set of results
    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn draw_with_state(&mut self, frame: &mut Frame, area: Rect, state: &PredictionState) {
        let lines = build_result_lines(state, self.show_bands);
        let total = lines.len();
        let visible_height = area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let title = match state.settled_at() {
            Some(at) if *state.status() == RequestStatus::Succeeded => {
                format!(" Results ({}) ", at.format("%H:%M:%S"))
            }
            _ => " Results ".to_string(),
        };

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue))
                    .title(title)
                    .title_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }
}

impl Component for ResultsComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            Action::ScrollDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            Action::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(PAGE),
            Action::PageDown => self.scroll_offset = self.scroll_offset.saturating_add(PAGE),
            Action::ToggleBands => self.show_bands = !self.show_bands,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the prediction state, so the App calls draw_with_state
        Ok(())
    }
}

fn section(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    points: &[ForecastPoint],
    rows: ForecastRows<'_>,
    show_bands: bool,
) {
    if points.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));

    for (point, row) in points.iter().zip(rows) {
        let mut spans = vec![Span::raw(row)];
        if show_bands {
            spans.push(Span::styled(
                format!("  {}", point.band_label()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }
}

/// Lines for the results panel
pub fn build_result_lines(state: &PredictionState, show_bands: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    section(
        &mut lines,
        "Historical Data",
        state.historical(),
        state.historical_rows(),
        show_bands,
    );
    section(
        &mut lines,
        "Forecast Results",
        state.forecast(),
        state.forecast_rows(),
        show_bands,
    );

    if lines.is_empty() {
        let hint = match state.status() {
            RequestStatus::Idle => "Enter a keyword and press Enter to predict",
            RequestStatus::Pending => "Predicting...",
            RequestStatus::Succeeded => "The service returned no data points",
            RequestStatus::Failed(_) => "",
        };
        if !hint.is_empty() {
            lines.push(Line::from(Span::styled(
                hint.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines
}
