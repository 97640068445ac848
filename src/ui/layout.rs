use ratatui::layout::{Constraint, Direction, Layout, Rect};

// Player card height when stacked under the lyrics
const STACKED_PLAYER_HEIGHT: u16 = 10;

pub struct MainLayout {
    pub body_area: Rect,
    pub footer_area: Rect,
}

pub fn get_main_layout(area: Rect) -> MainLayout {
    // Footer needs 1 line at the bottom always.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    MainLayout {
        body_area: chunks[0],
        footer_area: chunks[1],
    }
}

pub struct ContentLayout {
    pub player: Rect,
    pub lyrics: Option<Rect>,
}

pub fn get_content_layout(area: Rect, show_lyrics: bool, wide_mode: bool) -> ContentLayout {
    if !show_lyrics {
        return ContentLayout {
            player: area,
            lyrics: None,
        };
    }

    if wide_mode {
        // Side by side: Lyrics Dominant
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Min(20)])
            .split(area);
        ContentLayout {
            player: chunks[0],
            lyrics: Some(chunks[1]),
        }
    } else {
        // Stack: lyrics on top, compact card below
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(STACKED_PLAYER_HEIGHT),
            ])
            .split(area);
        ContentLayout {
            player: chunks[1],
            lyrics: Some(chunks[0]),
        }
    }
}
