use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub fn render_progress(f: &mut Frame, area: Rect, app: &mut App) {
    let gauge_area_rect = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(area)[1];
    app.hit.progress = Some(gauge_area_rect);

    let theme = &app.theme;
    let duration = app.session.duration();
    let ratio = if duration.is_finite() && duration > 0.0 {
        app.session.current_time() / duration
    } else {
        0.0
    };

    let width = usize::from(gauge_area_rect.width);
    let occupied_width = (width as f64 * ratio.clamp(0.0, 1.0)) as usize;
    let fill_style = Style::default().fg(theme.magenta);
    let empty_style = Style::default().fg(theme.surface);

    let bar_spans: Vec<Span> = (0..width)
        .map(|i| {
            if i < occupied_width {
                if i == occupied_width.saturating_sub(1) {
                    // Playhead knob
                    Span::styled("●", fill_style)
                } else {
                    Span::styled("━", fill_style)
                }
            } else {
                Span::styled("─", empty_style)
            }
        })
        .collect();

    let gauge_p = Paragraph::new(Line::from(bar_spans))
        .alignment(Alignment::Left)
        .block(Block::default().style(Style::default().bg(Color::Reset)));
    f.render_widget(gauge_p, gauge_area_rect);
}

pub fn render_time(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let display = app.session.time_display();
    let time_str = format!("{}  /  {}", display.elapsed, display.remaining);
    let time_label = Paragraph::new(time_str)
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.overlay));
    f.render_widget(time_label, area);
}
