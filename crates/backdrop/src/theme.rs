//! Colour themes.
//!
//! The host owns the theme switch and calls
//! [`Backdrop::set_theme`](crate::backdrop::Backdrop::set_theme) directly when
//! it changes. Dark and light recolour the scene; monochrome hides the
//! background entirely without tearing it down.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;
use crate::math::rgb_hex;

/// Teal used for shapes, icons and highlighted nodes on dark backgrounds.
pub const TEAL: u32 = 0x0092A2;
/// Deeper teal used on light backgrounds and for graph connections.
pub const DEEP_TEAL: u32 = 0x017481;
/// Pale teal for idle graph nodes.
pub const MIST: u32 = 0x81B7B6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Monochrome,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Monochrome];

    /// The theme after this one in the toggle cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Monochrome,
            Theme::Monochrome => Theme::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Monochrome => "monochrome",
        }
    }

    /// Whether the background is drawn at all under this theme.
    pub fn shows_background(self) -> bool {
        !matches!(self, Theme::Monochrome)
    }

    pub fn is_light(self) -> bool {
        matches!(self, Theme::Light)
    }

    /// Colour of the floating shapes and the swarm.
    pub fn accent(self) -> [f32; 3] {
        if self.is_light() {
            rgb_hex(DEEP_TEAL)
        } else {
            rgb_hex(TEAL)
        }
    }

    /// HSL ranges for particle colours: `(hue_min, hue_span, saturation, lightness)`.
    pub fn particle_hsl(self) -> (f32, f32, f32, f32) {
        if self.is_light() {
            (0.6, 0.2, 0.7, 0.8)
        } else {
            (0.5, 0.2, 0.8, 0.6)
        }
    }

    /// Clear colour behind the scene (sRGB-encoded RGBA).
    pub fn clear_color(self) -> [f64; 4] {
        match self {
            Theme::Light => [0.94, 0.96, 0.97, 1.0],
            Theme::Dark | Theme::Monochrome => [0.02, 0.04, 0.06, 1.0],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Theme {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "monochrome" => Ok(Theme::Monochrome),
            other => Err(BackdropError::Config(format!("unknown theme '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_theme() {
        let mut theme = Theme::Dark;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(theme);
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Dark);
        assert_eq!(seen, Theme::ALL.to_vec());
    }

    #[test]
    fn parse_and_display_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>().unwrap(), theme);
        }
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn only_monochrome_hides_background() {
        assert!(Theme::Dark.shows_background());
        assert!(Theme::Light.shows_background());
        assert!(!Theme::Monochrome.shows_background());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Theme::Monochrome).unwrap();
        assert_eq!(json, "\"monochrome\"");
        let back: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(back, Theme::Light);
    }
}
