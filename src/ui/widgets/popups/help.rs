use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let k = &app.keys;
    let pair = |a: &str, b: &str| format!("{}/{}", k.display(a), k.display(b));

    // 🎹 WhichKey-style floating popup
    let lyrics_keys: Vec<(String, &str, &str)> = vec![
        (pair(&k.nav_down, &k.nav_up), "📜", "Select line"),
        (k.display(&k.seek_to_line), "🎤", "Jump to line"),
        (k.display(&k.clear_selection), "✖", "Clear selection"),
        (pair(&k.scroll_down, &k.scroll_up), "📖", "Scroll page"),
        (k.display(&k.toggle_lyrics), "👁", "Show/hide lyrics"),
    ];

    let global_keys: Vec<(String, &str, &str)> = vec![
        (k.display(&k.play_pause), "▶️", "Play/Pause"),
        (k.display(&k.next_track), "⏭️", "Next track"),
        (k.display(&k.prev_track), "⏮️", "Previous / restart"),
        (pair(&k.seek_backward, &k.seek_forward), "⏩", "Seek ±5s"),
        (pair(&k.volume_up, &k.volume_down), "🔊", "Volume"),
        (k.display(&k.shuffle), "🔀", "Shuffle"),
        (k.display(&k.repeat), "🔁", "Repeat"),
        (k.display(&k.quit), "🚪", "Quit"),
    ];

    let row = |key: &str, icon: &str, desc: &str, color: Color| {
        Line::from(vec![
            Span::styled(
                format!(" {:<7} ", key),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   ", Style::default().fg(theme.overlay)),
            Span::raw(format!("{} ", icon)),
            Span::styled(desc.to_string(), Style::default().fg(theme.text)),
        ])
    };

    let mut lines: Vec<Line> = lyrics_keys
        .iter()
        .map(|(key, icon, desc)| row(key, icon, desc, theme.yellow))
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "────── Global ──────",
        Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.extend(
        global_keys
            .iter()
            .map(|(key, icon, desc)| row(key, icon, desc, theme.green)),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Hold ⏮/⏭ with the mouse to rewind",
        Style::default().fg(theme.overlay),
    )));

    // Calculate popup size - fit content exactly 📏
    let content_width = lyrics_keys
        .iter()
        .chain(global_keys.iter())
        .map(|(key, _icon, desc)| 2 + key.len().max(7) + 3 + 3 + desc.len())
        .max()
        .unwrap_or(20)
        .max(36);

    let max_height = f.area().height.saturating_sub(4);
    let popup_height = (lines.len() as u16 + 2).min(max_height); // +2 for borders
    let popup_width = (content_width as u16 + 4).min(f.area().width.saturating_sub(2));

    // Position at bottom-right
    let popup_x = f.area().width.saturating_sub(popup_width + 1);
    let popup_y = f.area().height.saturating_sub(popup_height + 2);
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let popup = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.blue))
            .title(" Lyrics ")
            .title_alignment(Alignment::Left)
            .style(Style::default().bg(Color::Reset)),
    );
    f.render_widget(popup, popup_area);
}
