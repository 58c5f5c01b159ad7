//! ANSI escape sequence constants and helpers
//!
//! This module centralizes all terminal escape sequences used throughout
//! the application, providing readable names for raw control codes.

// === Line Control ===

/// Return to the start of the current line
pub const CARRIAGE_RETURN: &str = "\r";

/// Erase the whole current line (EL 2)
pub const CLEAR_LINE: &str = "\x1b[2K";

/// Hide the cursor while the status line is up
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show the cursor again
pub const CURSOR_SHOW: &str = "\x1b[?25h";

// === Text Styles ===

/// Bold text
pub const BOLD: &str = "\x1b[1m";

/// Reset all text attributes
pub const RESET: &str = "\x1b[0m";

// === Color Helpers ===

/// 24-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend toward `other`; `t` is clamped to 0.0..=1.0
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Set foreground color using a 24-bit RGB value
#[inline]
pub fn fg_rgb(color: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", color.0, color.1, color.2)
}

// === Named Colors ===

pub mod color {
    use super::Rgb;

    /// Kotlin orange, top of the badge gradient
    pub const KOTLIN_ORANGE: Rgb = Rgb(223, 110, 0);

    /// Kotlin purple, bottom of the badge gradient
    pub const KOTLIN_PURPLE: Rgb = Rgb(90, 73, 173);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fg_rgb() {
        assert_eq!(fg_rgb(Rgb(1, 2, 3)), "\x1b[38;2;1;2;3m");
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = color::KOTLIN_ORANGE;
        let b = color::KOTLIN_PURPLE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 7.0), b);
        assert_eq!(Rgb(0, 0, 0).lerp(Rgb(200, 100, 50), 0.5), Rgb(100, 50, 25));
    }
}
