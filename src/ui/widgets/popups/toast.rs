use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const SLIDE_MS: u128 = 300;

/// Columns the toast sits right of its resting place: slides in after it
/// appears, slides out before the deadline 🌊
fn slide_offset(width: u16, since_start_ms: u128, until_deadline_ms: u128) -> u16 {
    let travel = f32::from(width);
    if since_start_ms < SLIDE_MS {
        let t = since_start_ms as f32 / SLIDE_MS as f32;
        let ease = 1.0 - (1.0 - t).powi(3); // Cubic Out
        (travel * (1.0 - ease)) as u16
    } else if until_deadline_ms < SLIDE_MS {
        let t = (SLIDE_MS - until_deadline_ms) as f32 / SLIDE_MS as f32;
        (travel * t.powi(3)) as u16 // Cubic In
    } else {
        0
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };
    let theme = &app.theme;
    let now = Instant::now();
    let screen = f.area();

    // Auto-dismiss handled in App::on_tick()
    let width = (toast.message.width() as u16 + 6).min(screen.width.saturating_sub(4));
    let offset = slide_offset(
        width,
        now.duration_since(toast.start_time).as_millis(),
        toast.deadline.saturating_duration_since(now).as_millis(),
    );
    let x = screen.width.saturating_sub(width + 1) + offset; // Top-right
    if x >= screen.width {
        return;
    }

    let visible_area = Rect::new(x, 1, width, 3).intersection(screen);
    if visible_area.is_empty() {
        return;
    }
    f.render_widget(Clear, visible_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.blue))
        .style(Style::default().bg(Color::Reset));
    let style = Style::default().fg(theme.blue).add_modifier(Modifier::BOLD);

    let text = Paragraph::new(Line::from(Span::styled(toast.message.as_str(), style)))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(text, visible_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_in_hold_and_out() {
        assert_eq!(slide_offset(20, 0, 2000), 20);
        assert_eq!(slide_offset(20, 1000, 1000), 0);
        assert_eq!(slide_offset(20, 1900, 0), 20);
        assert!(slide_offset(20, 150, 1850) < 10);
    }
}
