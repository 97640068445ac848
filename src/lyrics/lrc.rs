use super::LyricsLine;

/// Parses `[mm:ss.xx] text` content into lines ordered by start time.
///
/// Tag lines such as `[ar:Artist]` are skipped. A line carrying several
/// stamps (`[00:10.00][01:20.00] chorus`) is emitted once per stamp.
pub fn parse_lrc(content: &str) -> Vec<LyricsLine> {
    let mut lines = Vec::new();
    for raw in content.lines() {
        let mut rest = raw.trim();
        let mut stamps = Vec::new();
        while rest.starts_with('[') {
            let Some(close) = rest.find(']') else { break };
            match parse_timestamp(&rest[1..close]) {
                Some(secs) => stamps.push(secs),
                None => break,
            }
            rest = &rest[close + 1..];
        }
        let text = rest.trim();
        for start in stamps {
            lines.push(LyricsLine::new(text, start));
        }
    }
    // Stable, so equal stamps keep file order
    lines.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    lines
}

/// `mm:ss`, `mm:ss.x`, `mm:ss.xx` or `mm:ss.xxx` to seconds.
fn parse_timestamp(ts: &str) -> Option<f64> {
    let (min, sec) = ts.split_once(':')?;
    let min: u64 = min.trim().parse().ok()?;
    let (whole, frac) = match sec.split_once('.') {
        Some((w, f)) => (w, f),
        None => (sec, ""),
    };
    let whole: u64 = whole.parse().ok()?;
    let millis: u64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<u64>().ok()? * 100,
        2 => frac.parse::<u64>().ok()? * 10,
        3 => frac.parse().ok()?,
        _ => frac.get(..3)?.parse().ok()?,
    };
    Some((min * 60_000 + whole * 1000 + millis) as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lrc() {
        let content = "[ar:Someone]\n[00:12.50] first\n[00:15.1]second\n\n[01:02.345] third";
        let lines = parse_lrc(content);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[0].start_time, 12.5);
        assert_eq!(lines[1].start_time, 15.1);
        assert_eq!(lines[2].start_time, 62.345);
    }

    #[test]
    fn test_repeated_stamps_are_sorted() {
        let lines = parse_lrc("[00:30.00][00:05.00] chorus\n[00:10.00] verse");
        let starts: Vec<f64> = lines.iter().map(|l| l.start_time).collect();
        assert_eq!(starts, vec![5.0, 10.0, 30.0]);
        assert_eq!(lines[0].text, "chorus");
        assert_eq!(lines[2].text, "chorus");
    }

    #[test]
    fn test_bad_timestamps() {
        assert_eq!(parse_timestamp("xx:10"), None);
        assert_eq!(parse_timestamp("10"), None);
        assert_eq!(parse_timestamp("00:07"), Some(7.0));
    }
}
