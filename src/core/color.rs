use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    /// Hex form of [`Color::DEFAULT_CATEGORY`].
    pub const DEFAULT_CATEGORY_HEX: &'static str = "#9e9e9e";

    /// Fallback for categories the color source does not know.
    pub const DEFAULT_CATEGORY: Self = Self::rgb(158.0 / 255.0, 158.0 / 255.0, 158.0 / 255.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(input: &str) -> SyncResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
            6 => digits.to_owned(),
            _ => {
                return Err(SyncError::InvalidData(format!(
                    "color `{input}` must be #rgb or #rrggbb"
                )));
            }
        };

        let channel = |range: std::ops::Range<usize>| -> SyncResult<f64> {
            let raw = expanded.get(range).ok_or_else(|| {
                SyncError::InvalidData(format!("color `{input}` is not ascii hex"))
            })?;
            u8::from_str_radix(raw, 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|_| SyncError::InvalidData(format!("color `{input}` is not hex")))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn validate(self) -> SyncResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SyncError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Category key to display color, looked up case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryColorMap {
    colors: HashMap<String, Color>,
    default_color: Color,
}

impl Default for CategoryColorMap {
    fn default() -> Self {
        Self::new(Color::DEFAULT_CATEGORY)
    }
}

impl CategoryColorMap {
    #[must_use]
    pub fn new(default_color: Color) -> Self {
        Self {
            colors: HashMap::new(),
            default_color,
        }
    }

    /// Builds a map from collaborator-supplied hex strings.
    ///
    /// Entries that fail to parse keep the default color.
    #[must_use]
    pub fn from_hex_entries<'a, I>(entries: I, default_color: Color) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = Self::new(default_color);
        for (category, hex) in entries {
            match Color::from_hex(hex) {
                Ok(color) => map.insert(category, color),
                Err(err) => warn!(category, error = %err, "ignoring unparsable category color"),
            }
        }
        map
    }

    pub fn insert(&mut self, category: &str, color: Color) {
        self.colors.insert(category.to_lowercase(), color);
    }

    #[must_use]
    pub fn color_for(&self, category: &str) -> Color {
        self.colors
            .get(&category.to_lowercase())
            .copied()
            .unwrap_or(self.default_color)
    }

    #[must_use]
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{CategoryColorMap, Color};

    #[test]
    fn hex_parsing_accepts_short_and_long_forms() {
        let long = Color::from_hex("#ff8000").expect("long hex");
        assert_relative_eq!(long.red, 1.0);
        assert_relative_eq!(long.green, 128.0 / 255.0);
        assert_relative_eq!(long.blue, 0.0);

        let short = Color::from_hex("f80").expect("short hex");
        assert_relative_eq!(short.green, 136.0 / 255.0);

        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn default_category_matches_its_hex_form() {
        let parsed = Color::from_hex(Color::DEFAULT_CATEGORY_HEX).expect("default hex");
        assert_eq!(parsed, Color::DEFAULT_CATEGORY);
        assert_eq!(CategoryColorMap::default().default_color(), parsed);
    }

    #[test]
    fn lookup_ignores_case_and_falls_back_to_default() {
        let map = CategoryColorMap::from_hex_entries(
            [("Groceries", "#00ff00"), ("rent", "not-a-color")],
            Color::DEFAULT_CATEGORY,
        );

        assert_eq!(map.color_for("GROCERIES"), Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(map.color_for("rent"), Color::DEFAULT_CATEGORY);
        assert_eq!(map.color_for("travel"), Color::DEFAULT_CATEGORY);
        assert_eq!(map.len(), 1);
    }
}
