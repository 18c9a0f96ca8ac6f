use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{CELL_WIDTH, Theme};
use crate::game::{GameState, Phase};
use crate::snake::Cell;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Glyph drawn for one grid cell (two terminal columns).
pub const GLYPH_CELL: &str = "██";

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState, hud_info: &HudInfo<'_>) {
    let area = frame.area();
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    render_hud(frame, hud_area, state, hud_info);

    let theme = hud_info.theme;
    let field = field_rect(play_area, state.grid_size());
    let block = Block::bordered()
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().bg(theme.play_bg));
    let inner = block.inner(field);
    frame.render_widget(block, field);

    render_food(frame, inner, state, theme);
    render_snake(frame, inner, state, theme);

    match state.phase() {
        Phase::Idle => render_start_menu(frame, play_area, hud_info.best_score, theme),
        Phase::Ended => render_game_over_menu(
            frame,
            play_area,
            state.score(),
            hud_info.best_score,
            state.end_reason(),
            theme,
        ),
        Phase::Running => {}
    }
}

/// Bordered play field for a `grid_size` board, centred in `area`.
#[must_use]
pub fn field_rect(area: Rect, grid_size: u16) -> Rect {
    let width = grid_size
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid_size.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, state: &GameState, theme: &Theme) {
    let Some(food) = state.food() else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, state.grid_size(), food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_CELL, Style::new().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, state: &GameState, theme: &Theme) {
    let head = state.snake().head();
    let buffer = frame.buffer_mut();

    for segment in state.snake().segments() {
        let Some((x, y)) = logical_to_terminal(inner, state.grid_size(), *segment) else {
            continue;
        };

        let style = if *segment == head {
            Style::new()
                .fg(theme.snake_head)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(theme.snake_body)
        };
        buffer.set_string(x, y, GLYPH_CELL, style);
    }
}

/// Maps a board cell to the terminal position of its left column.
///
/// Returns `None` for cells off the board or clipped by a small terminal.
#[must_use]
pub fn logical_to_terminal(inner: Rect, grid_size: u16, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within_bounds(grid_size) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
