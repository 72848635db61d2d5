use std::fmt;
use std::str::FromStr;

/// `localStorage` key holding the chosen theme.
pub const STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// A stored choice wins; otherwise fall back to the media preference.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored.and_then(|s| s.parse().ok()) {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_owned())),
        }
    }
}

/// Fill colours for the glyph rain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RainPalette {
    pub overlay: String,
    pub glyph: String,
}

impl RainPalette {
    pub fn for_theme(theme: Theme, fade_alpha: f64) -> Self {
        match theme {
            Theme::Dark => Self {
                overlay: format!("rgba(0, 0, 0, {fade_alpha})"),
                glyph: "#a78bfa".to_owned(),
            },
            Theme::Light => Self {
                overlay: format!("rgba(255, 255, 255, {fade_alpha})"),
                glyph: "#8b5cf6".to_owned(),
            },
        }
    }
}
