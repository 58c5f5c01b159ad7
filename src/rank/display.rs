//! Display text for a rank

use std::fmt;

/// Transition arrow between the old and new rank
pub const ARROW: char = '\u{2192}';

/// ASCII stand-in for [`ARROW`]
pub const ASCII_ARROW: &str = "->";

/// How a rank transition is drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrowStyle {
    #[default]
    Unicode,
    Ascii,
}

impl ArrowStyle {
    /// Pick a style from the locale environment
    pub fn detect() -> Self {
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty());
        Self::for_locale(locale.as_deref())
    }

    /// Style for a locale string such as `en_US.UTF-8`
    pub fn for_locale(locale: Option<&str>) -> Self {
        match locale {
            Some(locale) => {
                let lower = locale.to_lowercase();
                if lower.contains("utf-8") || lower.contains("utf8") {
                    Self::Unicode
                } else {
                    Self::Ascii
                }
            }
            None => Self::Ascii,
        }
    }
}

/// What the status segment shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankDisplay {
    /// Current rank, no change to report
    Current(u32),
    /// Rank moved since the previous successful fetch
    Changed { from: u32, to: u32 },
}

impl RankDisplay {
    /// Display for a freshly parsed rank given the previously cached one.
    ///
    /// No transition is shown when nothing was cached before.
    pub fn after_fetch(previous: u32, current: u32) -> Self {
        if current != previous && previous != 0 {
            Self::Changed {
                from: previous,
                to: current,
            }
        } else {
            Self::Current(current)
        }
    }

    /// The rank being displayed now
    pub fn rank(&self) -> u32 {
        match self {
            Self::Current(rank) => *rank,
            Self::Changed { to, .. } => *to,
        }
    }

    pub fn render(&self, style: ArrowStyle) -> String {
        match self {
            Self::Current(rank) => format!("#{}", rank),
            Self::Changed { from, to } => match style {
                ArrowStyle::Unicode => format!("#{} {} #{}", from, ARROW, to),
                ArrowStyle::Ascii => format!("#{} {} #{}", from, ASCII_ARROW, to),
            },
        }
    }
}

impl fmt::Display for RankDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(ArrowStyle::Unicode))
    }
}
