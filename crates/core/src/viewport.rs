//! Responsive breakpoints for product images.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period after the last window resize before images are re-selected.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Smallest width (CSS pixels) that uses the tablet variant.
pub const TABLET_MIN_WIDTH: u32 = 768;

/// Smallest width (CSS pixels) that uses the desktop variant.
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

/// Viewport size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl Breakpoint {
    /// Classify a viewport width.
    #[must_use]
    pub const fn for_width(width: u32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Self::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    /// Lowercase name, as used in CSS classes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_width_edges() {
        assert_eq!(Breakpoint::for_width(0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::for_width(767), Breakpoint::Mobile);
        assert_eq!(Breakpoint::for_width(768), Breakpoint::Tablet);
        assert_eq!(Breakpoint::for_width(1023), Breakpoint::Tablet);
        assert_eq!(Breakpoint::for_width(1024), Breakpoint::Desktop);
        assert_eq!(Breakpoint::for_width(u32::MAX), Breakpoint::Desktop);
    }

    #[test]
    fn test_default_is_desktop() {
        assert_eq!(Breakpoint::default(), Breakpoint::Desktop);
    }

    #[test]
    fn test_debounce_is_250ms() {
        assert_eq!(RESIZE_DEBOUNCE.as_millis(), 250);
    }
}
