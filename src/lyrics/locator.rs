use super::LyricsLine;

/// A paused playhead this close to the first line does not light it up yet.
const PAUSED_LEAD_IN: f64 = 0.05;

/// Index of the line being sung at `current_time`, if any.
///
/// A line owns `[start, end)` where `end` is its own `end_time`, else the next
/// line's start. The last line owns everything after its start, `end_time`
/// included, so the transcript never un-highlights at the very end.
pub fn active_line_index(
    lines: &[LyricsLine],
    current_time: f64,
    is_playing: bool,
    suppress: bool,
) -> Option<usize> {
    if suppress || !current_time.is_finite() {
        return None;
    }
    let first = lines.first()?;
    if current_time < first.start_time {
        return None;
    }
    if !is_playing && current_time <= first.start_time + PAUSED_LEAD_IN {
        return None;
    }

    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        if current_time < line.start_time {
            // Sorted by start: nothing further can match
            return None;
        }
        if i == last {
            return Some(i);
        }
        let end = line.end_time.unwrap_or(lines[i + 1].start_time);
        if current_time < end {
            return Some(i);
        }
    }
    None
}

/// A stretch of time with no active line, rendered as progress dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Line the gap follows; `None` for the lead-in before the first line.
    pub after: Option<usize>,
    pub from: f64,
    pub until: f64,
}

impl Gap {
    /// 0.0 at the start of the gap, 1.0 when the next line begins.
    pub fn progress(&self, current_time: f64) -> f64 {
        let span = self.until - self.from;
        if span <= 0.0 {
            return 1.0;
        }
        ((current_time - self.from) / span).clamp(0.0, 1.0)
    }
}

/// The gap containing `current_time`, if the playhead sits in one.
pub fn gap_at(lines: &[LyricsLine], current_time: f64) -> Option<Gap> {
    let first = lines.first()?;
    if current_time < first.start_time {
        return Some(Gap {
            after: None,
            from: 0.0,
            until: first.start_time,
        });
    }
    lines.windows(2).enumerate().find_map(|(i, pair)| {
        let end = pair[0].end_time?;
        let next = pair[1].start_time;
        (end < next && current_time >= end && current_time < next).then_some(Gap {
            after: Some(i),
            from: end,
            until: next,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<LyricsLine> {
        vec![
            LyricsLine::new("one", 5.0).with_end(8.0),
            LyricsLine::new("two", 8.0).with_end(10.0),
            LyricsLine::new("three", 12.0),
            LyricsLine::new("four", 15.0).with_end(17.0),
        ]
    }

    #[test]
    fn test_nothing_before_first_line() {
        let l = lines();
        for t in [0.0, 1.0, 4.99] {
            assert_eq!(active_line_index(&l, t, true, false), None);
        }
    }

    #[test]
    fn test_boundary_belongs_to_next_line() {
        let l = lines();
        assert_eq!(active_line_index(&l, 7.99, true, false), Some(0));
        assert_eq!(active_line_index(&l, 8.0, true, false), Some(1));
    }

    #[test]
    fn test_gap_after_explicit_end() {
        let l = lines();
        assert_eq!(active_line_index(&l, 11.0, true, false), None);
        assert_eq!(active_line_index(&l, 12.0, true, false), Some(2));

        let gap = gap_at(&l, 11.0).unwrap();
        assert_eq!(gap.after, Some(1));
        assert!((gap.progress(11.0) - 0.5).abs() < 1e-9);
        assert_eq!(gap_at(&l, 9.0), None);
    }

    #[test]
    fn test_last_line_stays_active_past_end() {
        let l = lines();
        for t in [15.0, 17.0, 300.0] {
            assert_eq!(active_line_index(&l, t, true, false), Some(3));
        }
    }

    #[test]
    fn test_paused_lead_in_and_suppression() {
        let l = lines();
        assert_eq!(active_line_index(&l, 5.03, false, false), None);
        assert_eq!(active_line_index(&l, 5.03, true, false), Some(0));
        assert_eq!(active_line_index(&l, 6.0, false, false), Some(0));
        assert_eq!(active_line_index(&l, 6.0, true, true), None);
        assert_eq!(active_line_index(&[], 6.0, true, false), None);
        assert_eq!(active_line_index(&l, f64::NAN, true, false), None);
    }

    #[test]
    fn test_lead_in_gap() {
        let gap = gap_at(&lines(), 2.5).unwrap();
        assert_eq!(gap.after, None);
        assert!((gap.progress(2.5) - 0.5).abs() < 1e-9);
    }
}
