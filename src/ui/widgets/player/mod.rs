use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub mod controls;
pub mod info;
pub mod progress;

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;

    // --- MUSIC CARD ---
    let music_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Line::from(Span::styled(
            " Now Playing ",
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        )))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(theme.blue))
        .style(Style::default().bg(Color::Reset));

    let inner = music_block.inner(area);
    f.render_widget(music_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 0: Elastic spacer
            Constraint::Length(3), // 1: Info
            Constraint::Length(1), // 2: Gauge
            Constraint::Length(1), // 3: Time
            Constraint::Length(3), // 4: Controls
        ])
        .split(inner);

    info::render(f, chunks[1], app);
    progress::render_time(f, chunks[3], app);

    // Transport hides with the controls; any activity brings it back
    if app.session.controls_visible() {
        progress::render_progress(f, chunks[2], app);
        controls::render(f, chunks[4], app);
    } else {
        let hint = Paragraph::new(Span::styled(
            "move the mouse or press a key",
            Style::default()
                .fg(app.theme.surface)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        f.render_widget(hint, chunks[4]);
    }
}
