use crate::app::App;
use crate::lyrics::gap_at;
use crate::sync::{OpacityMode, ScrollContainer};
use crate::ui::theme::Theme;
use crate::ui::viewport::{Row, ROW_PX};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

const INTERLUDE_DOTS: usize = 3;

// Relative widths of the placeholder bars while synced lines load
const SKELETON_WIDTHS: [f32; 5] = [0.55, 0.8, 0.4, 0.7, 0.6];

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let lyrics_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Line::from(Span::styled(
            " Lyrics ",
            Style::default()
                .fg(app.theme.magenta)
                .add_modifier(Modifier::BOLD),
        )))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(app.theme.magenta))
        .style(Style::default().bg(Color::Reset));

    let lyrics_block = match app.slot.authorship().filter(|_| !app.has_synced_lyrics()) {
        // Karaoke sets carry the credit as their last line already
        Some(credit) => lyrics_block.title_bottom(
            Line::from(Span::styled(
                format!(" {credit} "),
                Style::default()
                    .fg(app.theme.overlay)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
        ),
        None => lyrics_block,
    };

    let inner = lyrics_block.inner(area);
    f.render_widget(lyrics_block, area);

    // Layout follows the panel size; the synchronizer catches up next frame
    app.session.container_mut().resize(inner.width, inner.height);
    app.hit.lyrics = Some(inner);

    let theme = &app.theme;
    let body = if app.slot.is_loading() {
        if app.slot.has_synced_hint() {
            skeleton(inner, theme)
        } else {
            message("\nFetching Lyrics...", Style::default().fg(theme.yellow))
        }
    } else if app.has_synced_lyrics() {
        karaoke(inner.height, app)
    } else if app.slot.plain_text().is_some() {
        plain(inner.height, app)
    } else {
        message("\nNo Lyrics Found", Style::default().fg(theme.overlay))
    };

    let widget = Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(Block::default().style(Style::default().bg(Color::Reset)));
    f.render_widget(widget, inner);
}

fn message(text: &str, style: Style) -> Text<'static> {
    Text::styled(text.to_string(), style)
}

fn skeleton(area: Rect, theme: &Theme) -> Text<'static> {
    let usable = f32::from(area.width.saturating_sub(4));
    let lines = (0..area.height)
        .map(|row| {
            if row % 2 == 0 {
                return Line::from("");
            }
            let ratio = SKELETON_WIDTHS[usize::from(row / 2) % SKELETON_WIDTHS.len()];
            let width = (usable * ratio) as usize;
            Line::from(Span::styled(
                "▂".repeat(width),
                Style::default().fg(theme.surface),
            ))
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn line_style(theme: &Theme, mode: OpacityMode, index: usize, active: Option<usize>) -> Style {
    match mode {
        OpacityMode::UserScrolling => Style::default().fg(theme.text),
        OpacityMode::Seeking => Style::default().fg(theme.overlay),
        OpacityMode::Normal => {
            let Some(active) = active else {
                return Style::default().fg(theme.text).add_modifier(Modifier::DIM);
            };
            match index.abs_diff(active) {
                0..=2 => Style::default().fg(theme.text),
                3..=4 => Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::DIM),
                5..=6 => Style::default().fg(theme.overlay),
                _ => Style::default().fg(theme.surface),
            }
        }
    }
}

fn interlude_dots(theme: &Theme, progress: f64) -> Line<'static> {
    let lit = ((progress * INTERLUDE_DOTS as f64).floor() as usize + 1).min(INTERLUDE_DOTS);
    let spans = (0..INTERLUDE_DOTS)
        .flat_map(|i| {
            let style = if i < lit {
                Style::default().fg(theme.green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.overlay)
            };
            [Span::styled("•", style), Span::raw(" ")]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn karaoke(height: u16, app: &App) -> Text<'static> {
    let theme = &app.theme;
    let session = &app.session;
    let viewport = session.container();
    let lines = session.lines();
    let active = session.active_line();
    let mode = session.opacity();
    let gap = gap_at(lines, session.current_time()).filter(|_| session.is_playing());
    let top_row = viewport.top_row();

    let rows = (0..height)
        .map(|offset| match viewport.visible_row(offset) {
            Some(Row::Text { line, text }) => {
                let first_row = viewport
                    .line_box(*line)
                    .is_some_and(|b| (b.top / ROW_PX).round() as usize == top_row + usize::from(offset));
                let is_selected = app.lyrics_selected == Some(*line);
                let is_active = active == Some(*line);

                let (style, marker) = if is_selected {
                    // User-selected line (j/k navigation)
                    (
                        Style::default()
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                            .fg(theme.yellow),
                        "▶ ",
                    )
                } else if is_active {
                    (
                        Style::default()
                            .add_modifier(Modifier::BOLD)
                            .fg(theme.green),
                        "● ",
                    )
                } else {
                    (line_style(theme, mode, *line, active), "  ")
                };
                let marker = if first_row { marker } else { "  " };
                Line::from(vec![
                    Span::styled(marker, style.remove_modifier(Modifier::UNDERLINED)),
                    Span::styled(text.clone(), style),
                    Span::raw("  "),
                ])
            }
            Some(Row::Spacer { after }) => match gap {
                Some(g) if g.after == *after => interlude_dots(theme, g.progress(session.current_time())),
                _ => Line::from(""),
            },
            None => Line::from(""),
        })
        .collect::<Vec<_>>();
    Text::from(rows)
}

fn plain(height: u16, app: &App) -> Text<'static> {
    let style = Style::default().fg(app.theme.text);
    let viewport = app.session.container();
    let rows = (0..height)
        .map(|offset| match viewport.visible_row(offset) {
            Some(Row::Text { text, .. }) => Line::from(Span::styled(text.clone(), style)),
            _ => Line::from(""),
        })
        .collect::<Vec<_>>();
    Text::from(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_by_distance_only_in_normal_mode() {
        let theme = Theme::default();
        assert_eq!(
            line_style(&theme, OpacityMode::Normal, 9, Some(2)).fg,
            Some(theme.surface)
        );
        assert_eq!(
            line_style(&theme, OpacityMode::UserScrolling, 9, Some(2)),
            Style::default().fg(theme.text)
        );
        assert_eq!(
            line_style(&theme, OpacityMode::Seeking, 3, Some(2)).fg,
            Some(theme.overlay)
        );
    }

    #[test]
    fn test_interlude_dots_fill_up() {
        let theme = Theme::default();
        let lit = |p: f64| {
            interlude_dots(&theme, p)
                .spans
                .iter()
                .filter(|s| s.style.fg == Some(theme.green))
                .count()
        };
        assert_eq!(lit(0.0), 1);
        assert_eq!(lit(0.5), 2);
        assert_eq!(lit(1.0), 3);
    }
}
