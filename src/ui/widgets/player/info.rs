use crate::app::App;
use crate::ui::utils::truncate;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let width = usize::from(area.width.saturating_sub(2));

    let position = app
        .current_track
        .map(|i| format!("Track {} of {}", i + 1, app.album.tracks.len()))
        .unwrap_or_default();
    let subtitle = if app.album.artist.is_empty() {
        app.album.title.clone()
    } else {
        format!("{} · {}", app.album.artist, app.album.title)
    };

    let lines = vec![
        Line::from(Span::styled(
            truncate(app.current_title(), width),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(&subtitle, width),
            Style::default().fg(theme.cyan),
        )),
        Line::from(Span::styled(position, Style::default().fg(theme.overlay))),
    ];

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
