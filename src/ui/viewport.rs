use super::utils::wrap_text;
use crate::lyrics::LyricsLine;
use crate::sync::{LineBox, ScrollBehavior, ScrollContainer};

/// Scroll units per terminal row. The synchronizer works in these.
pub const ROW_PX: f64 = 20.0;

/// Columns kept free for the "● " marker on either side of centered text.
const MARKER_COLS: u16 = 4;

/// One laid-out terminal row of the transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Text { line: usize, text: String },
    /// Blank row after a karaoke line (`None`: before the first one).
    /// Interlude dots are drawn here.
    Spacer { after: Option<usize> },
}

#[derive(Debug, Clone, Default, PartialEq)]
enum Content {
    #[default]
    Empty,
    Karaoke(Vec<String>),
    Plain(Vec<String>),
}

/// The lyrics panel as a scroll container: lines are wrapped to the panel
/// width and stacked into rows, `ROW_PX` units each.
#[derive(Debug, Clone, Default)]
pub struct TerminalViewport {
    width: u16,
    height: u16,
    content: Content,
    rows: Vec<Row>,
    boxes: Vec<LineBox>,
    top: f64,
}

impl TerminalViewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn set_lines(&mut self, lines: &[LyricsLine]) {
        self.content = Content::Karaoke(lines.iter().map(|l| l.text.clone()).collect());
        self.relayout();
    }

    pub fn set_plain(&mut self, text: &str) {
        self.content = Content::Plain(text.lines().map(str::to_string).collect());
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.content = Content::Empty;
        self.top = 0.0;
        self.relayout();
    }

    pub fn is_karaoke(&self) -> bool {
        matches!(self.content, Content::Karaoke(_))
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns `true` when the size changed and the rows were rebuilt.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.relayout();
        true
    }

    fn relayout(&mut self) {
        let wrap_width = usize::from(self.width.saturating_sub(MARKER_COLS).max(1));
        self.rows.clear();
        self.boxes.clear();

        match &self.content {
            Content::Empty => {}
            Content::Karaoke(texts) => {
                self.rows.push(Row::Spacer { after: None });
                for (line, text) in texts.iter().enumerate() {
                    let first = self.rows.len();
                    for part in wrap_text(text, wrap_width) {
                        self.rows.push(Row::Text { line, text: part });
                    }
                    self.boxes.push(LineBox {
                        top: first as f64 * ROW_PX,
                        height: (self.rows.len() - first) as f64 * ROW_PX,
                    });
                    self.rows.push(Row::Spacer { after: Some(line) });
                }
            }
            Content::Plain(texts) => {
                for (line, text) in texts.iter().enumerate() {
                    let first = self.rows.len();
                    for part in wrap_text(text, wrap_width) {
                        self.rows.push(Row::Text { line, text: part });
                    }
                    self.boxes.push(LineBox {
                        top: first as f64 * ROW_PX,
                        height: (self.rows.len() - first) as f64 * ROW_PX,
                    });
                }
            }
        }
        self.top = self.top.clamp(0.0, self.max_scroll_top());
    }

    /// Bottom padding so the last lines can reach the reading position.
    fn padding_rows(&self) -> usize {
        if self.is_karaoke() {
            usize::from(self.height / 2)
        } else {
            0
        }
    }

    pub fn top_row(&self) -> usize {
        (self.top / ROW_PX).round().max(0.0) as usize
    }

    /// Row at `offset` from the top of the panel; `None` past the content.
    pub fn visible_row(&self, offset: u16) -> Option<&Row> {
        self.rows.get(self.top_row() + usize::from(offset))
    }

    /// Lyric line under a panel row, for click-to-seek.
    pub fn line_at(&self, offset: u16) -> Option<usize> {
        match self.visible_row(offset)? {
            Row::Text { line, .. } => Some(*line),
            Row::Spacer { .. } => None,
        }
    }

    /// User scroll by whole rows. Returns whether the position moved.
    pub fn scroll_rows(&mut self, delta: i32) -> bool {
        let before = self.top;
        let target = (self.top_row() as f64 + f64::from(delta)) * ROW_PX;
        self.top = target.clamp(0.0, self.max_scroll_top());
        (self.top - before).abs() > f64::EPSILON
    }

    /// Scrolls just enough to bring `index` fully into view.
    pub fn reveal(&mut self, index: usize) -> bool {
        let Some(b) = self.boxes.get(index).copied() else {
            return false;
        };
        let client = self.client_height();
        let target = if b.top < self.top {
            b.top
        } else if b.top + b.height > self.top + client {
            b.top + b.height - client
        } else {
            return false;
        };
        let before = self.top;
        self.top = target.clamp(0.0, self.max_scroll_top());
        (self.top - before).abs() > f64::EPSILON
    }
}

impl ScrollContainer for TerminalViewport {
    fn scroll_top(&self) -> f64 {
        self.top
    }

    fn client_height(&self) -> f64 {
        f64::from(self.height) * ROW_PX
    }

    fn scroll_height(&self) -> f64 {
        (self.rows.len() + self.padding_rows()) as f64 * ROW_PX
    }

    fn line_box(&self, index: usize) -> Option<LineBox> {
        self.boxes.get(index).copied()
    }

    // A terminal cannot animate a scroll on its own; the eased strategy
    // drives smooth motion frame by frame instead.
    fn scroll_to(&mut self, top: f64, _behavior: ScrollBehavior) {
        self.top = top.clamp(0.0, self.max_scroll_top());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<LyricsLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LyricsLine::new(*t, i as f64 * 5.0))
            .collect()
    }

    #[test]
    fn test_karaoke_layout_rows_and_boxes() {
        let mut v = TerminalViewport::new(14, 10);
        v.set_lines(&lines(&["short", "a longer line", "end"]));

        // spacer, "short", spacer, two wrapped rows, spacer, "end", spacer
        assert_eq!(v.line_box(0), Some(LineBox { top: 20.0, height: 20.0 }));
        assert_eq!(v.line_box(1), Some(LineBox { top: 60.0, height: 40.0 }));
        assert_eq!(v.line_box(2), Some(LineBox { top: 120.0, height: 20.0 }));
        assert_eq!(v.scroll_height(), (8 + 5) as f64 * ROW_PX);
        assert_eq!(v.visible_row(0), Some(&Row::Spacer { after: None }));
        assert_eq!(v.line_at(4), Some(1));
        assert_eq!(v.line_at(2), None);
    }

    #[test]
    fn test_scroll_clamps_and_reports_motion() {
        let mut v = TerminalViewport::new(20, 4);
        v.set_plain("one\ntwo\nthree\nfour\nfive\nsix");
        assert_eq!(v.max_scroll_top(), 2.0 * ROW_PX);

        assert!(v.scroll_rows(5));
        assert_eq!(v.scroll_top(), 40.0);
        assert!(!v.scroll_rows(1));
        assert_eq!(v.line_at(0), Some(2));

        v.scroll_to(-30.0, ScrollBehavior::Smooth);
        assert_eq!(v.scroll_top(), 0.0);
    }

    #[test]
    fn test_reveal_brings_line_into_view() {
        let mut v = TerminalViewport::new(20, 3);
        v.set_plain("a\nb\nc\nd\ne\nf");
        assert!(v.reveal(4));
        assert_eq!(v.top_row(), 2);
        assert!(!v.reveal(3));
        assert!(v.reveal(0));
        assert_eq!(v.top_row(), 0);
    }
}
