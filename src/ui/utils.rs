use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Safely truncate string to max display columns, appending "…" if truncated 🛡️
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let room = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        used += w;
        out.push(ch);
    }
    out + "…"
}

/// Greedy word wrap by display width. Words longer than a row are split.
/// Always returns at least one row.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_w = 0;

    for word in s.split_whitespace() {
        let w = word.width();
        if current_w > 0 && current_w + 1 + w > width {
            rows.push(std::mem::take(&mut current));
            current_w = 0;
        }
        if w > width {
            for ch in word.chars() {
                let cw = ch.width().unwrap_or(0);
                if current_w > 0 && current_w + cw > width {
                    rows.push(std::mem::take(&mut current));
                    current_w = 0;
                }
                current.push(ch);
                current_w += cw;
            }
            continue;
        }
        if current_w > 0 {
            current.push(' ');
            current_w += 1;
        }
        current.push_str(word);
        current_w += w;
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_width() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        // Wide chars count double
        assert_eq!(truncate("日本語の歌", 5), "日本…");
    }

    #[test]
    fn test_wrap_words_and_long_words() {
        assert_eq!(wrap_text("la la land", 5), vec!["la la", "land"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
