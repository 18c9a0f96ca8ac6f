use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::GameState;

const SEPARATOR: &str = " │ ";

/// Supplemental values displayed by the HUD row.
#[derive(Debug, Clone)]
pub struct HudInfo<'a> {
    /// Best final score of this session.
    pub best_score: u32,
    pub theme: &'a Theme,
}

/// Renders the single status line.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, info: &HudInfo<'_>) {
    let fields = [
        ("Score", "S", state.score().to_string()),
        ("Length", "L", state.snake().len().to_string()),
        ("Speed", "V", format!("{}ms", state.tick_interval_ms())),
        ("Best", "B", info.best_score.max(state.score()).to_string()),
    ];

    let compact = info_width(&fields, false) > usize::from(area.width);
    frame.render_widget(
        Paragraph::new(info_line(&fields, compact, info.theme)).alignment(Alignment::Center),
        area,
    );
}

fn info_line(fields: &[(&str, &str, String)], compact: bool, theme: &Theme) -> Line<'static> {
    let label_style = Style::default().fg(theme.hud_label);
    let value_style = Style::default().fg(theme.hud_value);
    let mut spans = Vec::with_capacity(fields.len() * 3);

    for (index, (label, short, value)) in fields.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        let label = if compact { short } else { label };
        spans.push(Span::styled(format!("{label}: "), label_style));
        spans.push(Span::styled(value.clone(), value_style));
    }

    Line::from(spans)
}

fn info_width(fields: &[(&str, &str, String)], compact: bool) -> usize {
    let separators = SEPARATOR.width() * fields.len().saturating_sub(1);
    let labels: usize = fields
        .iter()
        .map(|(label, short, value)| {
            let label = if compact { short } else { label };
            label.width() + ": ".width() + value.width()
        })
        .sum();

    separators + labels
}
