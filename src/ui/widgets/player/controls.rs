use crate::app::App;
use crate::player::RepeatMode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const BUTTON_COLS: u16 = 7;
const GAP_COLS: u16 = 2;
const TOGGLE_COLS: u16 = 5;
const VOLUME_BAR_COLS: usize = 20; // Fixed width for clean look

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    // Split Controls Area: Top for Buttons, Bottom for Volume
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Volume Bar
        ])
        .split(area);

    // One cell per button so clicks map back to them
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(TOGGLE_COLS), // 1: Shuffle
            Constraint::Length(GAP_COLS),
            Constraint::Length(BUTTON_COLS), // 3: Prev
            Constraint::Length(GAP_COLS),
            Constraint::Length(BUTTON_COLS), // 5: Play
            Constraint::Length(GAP_COLS),
            Constraint::Length(BUTTON_COLS), // 7: Next
            Constraint::Length(GAP_COLS),
            Constraint::Length(TOGGLE_COLS), // 9: Repeat
            Constraint::Fill(1),
        ])
        .split(chunks[0]);

    app.hit.shuffle = Some(cells[1]);
    app.hit.prev = Some(cells[3]);
    app.hit.play = Some(cells[5]);
    app.hit.next = Some(cells[7]);
    app.hit.repeat = Some(cells[9]);

    let theme = &app.theme;
    let btn_style = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let on = Style::default().fg(theme.green);
    let off = Style::default().fg(theme.surface);

    let play_icon = if app.session.is_playing() { "⏸" } else { "▶" };
    // A held button turns magenta while it rewinds
    let held = |dir| {
        if app.held_rewind == Some(dir) && app.session.is_rewinding() {
            Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD)
        } else {
            btn_style
        }
    };

    let shuffle_style = if app.session.playlist().is_shuffled() { on } else { off };
    let repeat = app.session.playlist().repeat();
    let repeat_spans = match repeat {
        RepeatMode::One => vec![
            Span::styled("🔂", on),
            Span::styled("1", on.add_modifier(Modifier::BOLD)),
        ],
        RepeatMode::All => vec![Span::styled("🔁", on)],
        RepeatMode::None => vec![Span::styled("🔁", off)],
    };

    let centered = |line: Line<'static>| Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(centered(Line::from(Span::styled("🔀", shuffle_style))), cells[1]);
    f.render_widget(
        centered(Line::from(Span::styled("⏮", held(crate::sync::SeekDirection::Backward)))),
        cells[3],
    );
    f.render_widget(centered(Line::from(Span::styled(play_icon, btn_style))), cells[5]);
    f.render_widget(
        centered(Line::from(Span::styled("⏭", held(crate::sync::SeekDirection::Forward)))),
        cells[7],
    );
    f.render_widget(centered(Line::from(repeat_spans)), cells[9]);

    // Volume Bar (Bottom)
    let vol_ratio = f64::from(app.session.volume()) / 100.0;
    let filled_width = (VOLUME_BAR_COLS as f64 * vol_ratio).round() as usize;

    let mut bar_spans = vec![Span::styled("- ", Style::default().fg(theme.overlay))];
    for i in 0..VOLUME_BAR_COLS {
        if i < filled_width {
            bar_spans.push(Span::styled("━", Style::default().fg(theme.magenta)));
        } else {
            bar_spans.push(Span::styled("─", Style::default().fg(theme.surface)));
        }
    }
    bar_spans.push(Span::styled(" +", Style::default().fg(theme.overlay)));

    f.render_widget(centered(Line::from(bar_spans)), chunks[2]);
}
