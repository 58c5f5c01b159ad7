//! Single-line status segment
//!
//! Redraws one terminal line in place: a "K" badge followed by the rank text,
//! painted with an orange-to-purple gradient and pushed to the right edge.

use std::io::Write;

use anyhow::Result;

use super::escape::{self, color, fg_rgb, BOLD, RESET};
use super::RankSink;
use crate::utils::display_width;

/// Badge drawn before the rank
const BADGE: &str = "K";

/// Width used when the terminal size is unknown
const FALLBACK_COLS: u16 = 80;

/// Paint each visible character with its position along the gradient
pub fn gradient(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let steps = chars.len().saturating_sub(1).max(1) as f32;

    let mut out = String::new();
    for (i, c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            out.push(*c);
            continue;
        }
        let shade = color::KOTLIN_ORANGE.lerp(color::KOTLIN_PURPLE, i as f32 / steps);
        out.push_str(&fg_rgb(shade));
        out.push(*c);
    }
    out.push_str(RESET);
    out
}

/// Styled segment for `text`, without positioning
pub fn render_segment(text: &str) -> String {
    format!("{}{} {}  ", BOLD, gradient(BADGE), gradient(text))
}

/// Redraws the status segment in place on a terminal
pub struct StatusLine<W: Write> {
    out: W,
    cols: Option<u16>,
    shown: bool,
}

impl<W: Write> StatusLine<W> {
    /// Status line sized to the current terminal
    pub fn new(out: W) -> Self {
        Self {
            out,
            cols: None,
            shown: false,
        }
    }

    /// Status line with a fixed width
    #[cfg(test)]
    pub fn with_cols(out: W, cols: u16) -> Self {
        Self {
            out,
            cols: Some(cols),
            shown: false,
        }
    }

    fn cols(&self) -> u16 {
        self.cols.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(cols, _)| cols)
                .unwrap_or(FALLBACK_COLS)
        })
    }

    /// Leave the line in place and give the cursor back
    pub fn finish(&mut self) -> Result<()> {
        if self.shown {
            writeln!(self.out, "{}", escape::CURSOR_SHOW)?;
            self.out.flush()?;
            self.shown = false;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RankSink for StatusLine<W> {
    fn show(&mut self, text: &str) -> Result<()> {
        let segment = render_segment(text);
        let pad = (self.cols() as usize).saturating_sub(display_width(&segment));

        write!(
            self.out,
            "{}{}{}{:pad$}{}",
            escape::CURSOR_HIDE,
            escape::CARRIAGE_RETURN,
            escape::CLEAR_LINE,
            "",
            segment,
            pad = pad
        )?;
        self.out.flush()?;
        self.shown = true;
        Ok(())
    }
}

/// One plain line per update, for pipes and logs
pub struct PlainLine<W: Write> {
    out: W,
}

impl<W: Write> PlainLine<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RankSink for PlainLine<W> {
    fn show(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }
}
