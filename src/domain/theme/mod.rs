//! Theme domain: visual theme selection and its persisted preference.

pub mod prefs;

pub use prefs::Preferences;

use serde::{Deserialize, Serialize};

/// Visual theme. The stored value is the CSS class applied to the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Default,
    HighContrast,
    Colorblind,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Default, Theme::HighContrast, Theme::Colorblind];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "",
            Theme::HighContrast => "theme-high-contrast",
            Theme::Colorblind => "theme-colorblind",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::HighContrast => "High Contrast",
            Theme::Colorblind => "Colorblind Friendly",
        }
    }

    /// Lenient parse: anything unrecognised maps to [`Theme::Default`].
    pub fn from_stored(value: &str) -> Self {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == value.trim())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Theme {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Theme::from_stored(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_values() {
        assert_eq!(Theme::Default.as_str(), "");
        assert_eq!(Theme::from_stored("theme-colorblind"), Theme::Colorblind);
        assert_eq!(Theme::from_stored("theme-high-contrast"), Theme::HighContrast);
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        assert_eq!(Theme::from_stored("theme-neon"), Theme::Default);
        let t: Theme = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(t, Theme::Default);
    }

    #[test]
    fn test_serde_uses_stored_value() {
        assert_eq!(
            serde_json::to_string(&Theme::HighContrast).unwrap(),
            "\"theme-high-contrast\""
        );
    }
}
