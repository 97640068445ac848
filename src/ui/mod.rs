pub mod components;
pub mod layout;
pub mod theme;
pub mod utils;
pub mod viewport;
pub mod widgets;

pub use theme::Theme;

use crate::app::{App, HitAreas};
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

// Below this width lyrics stack under the card
const WIDE_MODE_COLS: u16 = 90;

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.hit = HitAreas::default();

    // 1. Layout
    let main_layout = layout::get_main_layout(area);
    let content_layout = layout::get_content_layout(
        main_layout.body_area,
        app.session.lyrics_shown(),
        area.width >= WIDE_MODE_COLS,
    );

    // 2. Player card and lyrics
    widgets::player::render(f, content_layout.player, app);
    if let Some(lyrics_area) = content_layout.lyrics {
        components::lyrics::render(f, lyrics_area, app);
    }

    // 3. Footer Hint (if no popup active)
    if !app.show_keyhints {
        let theme = &app.theme;
        let hint = Line::from(vec![
            Span::styled(
                format!(" {} ", app.keys.display(&app.keys.toggle_keyhints)),
                Style::default()
                    .fg(theme.overlay)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("keys", Style::default().fg(theme.overlay)),
        ]);
        let footer = Paragraph::new(hint).alignment(Alignment::Right);
        f.render_widget(footer, main_layout.footer_area);
    }

    // 4. Popups (Overlays)
    widgets::popups::render(f, app);
}
