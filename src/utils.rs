//! Pure utility functions with no side effects
//!
//! Helpers for measuring terminal text and formatting durations.

use unicode_width::UnicodeWidthChar;

/// Display width of a string, excluding ANSI escape sequences and control characters
pub fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if !c.is_control() {
            width += c.width().unwrap_or(0);
        }
    }
    width
}

/// Format a duration in milliseconds as a compact age: "just now", "Xm", "Xh Ym", "Xd Yh"
pub fn format_age(ms: i64) -> String {
    let seconds = (ms.max(0) / 1000) as u64;
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let mins = (seconds % 3600) / 60;

    if seconds < 60 {
        "just now".to_string()
    } else if days > 0 {
        if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        }
    } else if hours > 0 {
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("#12"), 3);
        assert_eq!(display_width("\x1b[31m#12\x1b[0m"), 3);
        assert_eq!(display_width("\x1b[38;2;223;110;0m#5 → #7\x1b[0m"), 7);
        assert_eq!(display_width("\x1b[?25l\r\x1b[2K#1\n"), 2);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(5_000), "just now");
        assert_eq!(format_age(-5), "just now");
        assert_eq!(format_age(90_000), "1m");
        assert_eq!(format_age(3_600_000), "1h");
        assert_eq!(format_age(5_400_000), "1h 30m");
        assert_eq!(format_age(86_400_000), "1d");
        assert_eq!(format_age(90_000_000), "1d 1h");
    }
}
