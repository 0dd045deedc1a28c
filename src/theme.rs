use crate::error::BoxPressError;
use crate::types::Color;
use crate::units::{hex_to_intensity, to_px};
use std::collections::BTreeMap;

// A palette entry is either a flat value ("black" -> "#000") or a map of
// intensity steps ("blue" -> { "500" -> "#3b82f6", ... }).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEntry {
    Scalar(String),
    Scaled(BTreeMap<String, String>),
}

// A type-scale entry carries its line height when the scale defines one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSizeEntry {
    Size(String),
    SizeWithLineHeight(String, String),
}

/// The design-token source: palette, type scale, radius scale. Injected once
/// at pipeline start and never mutated, so tests can substitute a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub colors: BTreeMap<String, PaletteEntry>,
    pub font_size: BTreeMap<String, FontSizeEntry>,
    pub border_radius: BTreeMap<String, String>,
}

impl Theme {
    pub fn has_color(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    /// Resolves a palette name plus optional intensity to a color. Any
    /// recoverable miss (unknown name, keyed entry addressed without an
    /// intensity, unknown intensity step) falls back to the palette's
    /// "white" entry. Only malformed hex data is fatal.
    pub fn resolve_color(
        &self,
        name: &str,
        intensity: Option<&str>,
    ) -> Result<Color, BoxPressError> {
        match self.colors.get(name) {
            Some(PaletteEntry::Scalar(value)) => color_from_hex(value),
            Some(PaletteEntry::Scaled(steps)) => {
                let Some(intensity) = intensity else {
                    return self.fallback_white();
                };
                match steps.get(intensity) {
                    Some(value) => color_from_hex(value),
                    None => self.fallback_white(),
                }
            }
            None => self.fallback_white(),
        }
    }

    fn fallback_white(&self) -> Result<Color, BoxPressError> {
        match self.colors.get("white") {
            Some(PaletteEntry::Scalar(value)) => color_from_hex(value),
            // A theme without a white entry still needs a paintable fallback.
            _ => Ok(Color::WHITE),
        }
    }

    /// Font size and line height in pixels for a type-scale key. A scale
    /// entry without line-height metadata falls back to the base step
    /// (1rem / 1.5rem).
    pub fn font_size(&self, key: &str) -> Option<(f32, f32)> {
        match self.font_size.get(key)? {
            FontSizeEntry::SizeWithLineHeight(size, line_height) => {
                Some((to_px(size), to_px(line_height)))
            }
            FontSizeEntry::Size(_) => Some((to_px("1rem"), to_px("1.5rem"))),
        }
    }

    /// Corner radius in pixels for a radius-scale key.
    pub fn corner_radius(&self, key: &str) -> Option<f32> {
        self.border_radius.get(key).map(|value| to_px(value))
    }
}

fn color_from_hex(value: &str) -> Result<Color, BoxPressError> {
    let [r, g, b] = hex_to_intensity(value)?;
    Ok(Color::rgb(r, g, b))
}

fn scaled(steps: &[(&str, &str)]) -> PaletteEntry {
    PaletteEntry::Scaled(
        steps
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

impl Default for Theme {
    fn default() -> Self {
        let mut colors = BTreeMap::new();
        colors.insert("black".to_string(), PaletteEntry::Scalar("#000".to_string()));
        colors.insert("white".to_string(), PaletteEntry::Scalar("#fff".to_string()));
        colors.insert(
            "slate".to_string(),
            scaled(&[
                ("50", "#f8fafc"),
                ("100", "#f1f5f9"),
                ("200", "#e2e8f0"),
                ("300", "#cbd5e1"),
                ("400", "#94a3b8"),
                ("500", "#64748b"),
                ("600", "#475569"),
                ("700", "#334155"),
                ("800", "#1e293b"),
                ("900", "#0f172a"),
            ]),
        );
        colors.insert(
            "gray".to_string(),
            scaled(&[
                ("50", "#f9fafb"),
                ("100", "#f3f4f6"),
                ("200", "#e5e7eb"),
                ("300", "#d1d5db"),
                ("400", "#9ca3af"),
                ("500", "#6b7280"),
                ("600", "#4b5563"),
                ("700", "#374151"),
                ("800", "#1f2937"),
                ("900", "#111827"),
            ]),
        );
        colors.insert(
            "red".to_string(),
            scaled(&[
                ("50", "#fef2f2"),
                ("100", "#fee2e2"),
                ("200", "#fecaca"),
                ("300", "#fca5a5"),
                ("400", "#f87171"),
                ("500", "#ef4444"),
                ("600", "#dc2626"),
                ("700", "#b91c1c"),
                ("800", "#991b1b"),
                ("900", "#7f1d1d"),
            ]),
        );
        colors.insert(
            "yellow".to_string(),
            scaled(&[
                ("50", "#fefce8"),
                ("100", "#fef9c3"),
                ("200", "#fef08a"),
                ("300", "#fde047"),
                ("400", "#facc15"),
                ("500", "#eab308"),
                ("600", "#ca8a04"),
                ("700", "#a16207"),
                ("800", "#854d0e"),
                ("900", "#713f12"),
            ]),
        );
        colors.insert(
            "green".to_string(),
            scaled(&[
                ("50", "#f0fdf4"),
                ("100", "#dcfce7"),
                ("200", "#bbf7d0"),
                ("300", "#86efac"),
                ("400", "#4ade80"),
                ("500", "#22c55e"),
                ("600", "#16a34a"),
                ("700", "#15803d"),
                ("800", "#166534"),
                ("900", "#14532d"),
            ]),
        );
        colors.insert(
            "blue".to_string(),
            scaled(&[
                ("50", "#eff6ff"),
                ("100", "#dbeafe"),
                ("200", "#bfdbfe"),
                ("300", "#93c5fd"),
                ("400", "#60a5fa"),
                ("500", "#3b82f6"),
                ("600", "#2563eb"),
                ("700", "#1d4ed8"),
                ("800", "#1e40af"),
                ("900", "#1e3a8a"),
            ]),
        );
        colors.insert(
            "indigo".to_string(),
            scaled(&[
                ("50", "#eef2ff"),
                ("100", "#e0e7ff"),
                ("200", "#c7d2fe"),
                ("300", "#a5b4fc"),
                ("400", "#818cf8"),
                ("500", "#6366f1"),
                ("600", "#4f46e5"),
                ("700", "#4338ca"),
                ("800", "#3730a3"),
                ("900", "#312e81"),
            ]),
        );

        let mut font_size = BTreeMap::new();
        let mut insert_size = |key: &str, size: &str, line_height: &str| {
            font_size.insert(
                key.to_string(),
                FontSizeEntry::SizeWithLineHeight(size.to_string(), line_height.to_string()),
            );
        };
        insert_size("xs", "0.75rem", "1rem");
        insert_size("sm", "0.875rem", "1.25rem");
        insert_size("base", "1rem", "1.5rem");
        insert_size("lg", "1.125rem", "1.75rem");
        insert_size("xl", "1.25rem", "1.75rem");
        insert_size("2xl", "1.5rem", "2rem");
        insert_size("3xl", "1.875rem", "2.25rem");
        insert_size("4xl", "2.25rem", "2.5rem");
        insert_size("5xl", "3rem", "1");

        let mut border_radius = BTreeMap::new();
        let mut insert_radius = |key: &str, value: &str| {
            border_radius.insert(key.to_string(), value.to_string());
        };
        insert_radius("none", "0px");
        insert_radius("sm", "0.125rem");
        insert_radius("DEFAULT", "0.25rem");
        insert_radius("md", "0.375rem");
        insert_radius("lg", "0.5rem");
        insert_radius("xl", "0.75rem");
        insert_radius("2xl", "1rem");
        insert_radius("3xl", "1.5rem");
        insert_radius("full", "9999px");

        Self {
            colors,
            font_size,
            border_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_white() {
        let theme = Theme::default();
        assert_eq!(
            theme.resolve_color("nonexistent", None).unwrap(),
            Color::WHITE
        );
    }

    #[test]
    fn keyed_entry_without_intensity_falls_back_to_white() {
        let theme = Theme::default();
        assert_eq!(theme.resolve_color("gray", None).unwrap(), Color::WHITE);
    }

    #[test]
    fn keyed_entry_with_unknown_intensity_falls_back_to_white() {
        let theme = Theme::default();
        assert_eq!(
            theme.resolve_color("gray", Some("550")).unwrap(),
            Color::WHITE
        );
    }

    #[test]
    fn keyed_entry_resolves_its_step() {
        let theme = Theme::default();
        let blue = theme.resolve_color("blue", Some("500")).unwrap();
        assert!((blue.r - 0x3b as f32 / 255.0).abs() < 1e-6);
        assert!((blue.g - 0x82 as f32 / 255.0).abs() < 1e-6);
        assert!((blue.b - 0xf6 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn scalar_entries_resolve_directly() {
        let theme = Theme::default();
        assert_eq!(theme.resolve_color("black", None).unwrap(), Color::BLACK);
        // A custom flat entry resolves directly too, not only black/white.
        let mut custom = Theme::default();
        custom.colors.insert(
            "brand".to_string(),
            PaletteEntry::Scalar("#112233".to_string()),
        );
        let brand = custom.resolve_color("brand", None).unwrap();
        assert!((brand.r - 0x11 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn malformed_hex_in_palette_is_fatal() {
        let mut theme = Theme::default();
        theme.colors.insert(
            "broken".to_string(),
            PaletteEntry::Scalar("#abcd".to_string()),
        );
        assert!(matches!(
            theme.resolve_color("broken", None),
            Err(BoxPressError::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn missing_white_entry_still_yields_a_fallback() {
        let theme = Theme {
            colors: BTreeMap::new(),
            font_size: BTreeMap::new(),
            border_radius: BTreeMap::new(),
        };
        assert_eq!(theme.resolve_color("anything", None).unwrap(), Color::WHITE);
    }

    #[test]
    fn type_scale_resolves_in_pixels() {
        let theme = Theme::default();
        assert_eq!(theme.font_size("base"), Some((16.0, 24.0)));
        assert_eq!(theme.font_size("2xl"), Some((24.0, 32.0)));
        assert_eq!(theme.font_size("missing"), None);
    }

    #[test]
    fn type_scale_entry_without_line_height_uses_base_step() {
        let mut theme = Theme::default();
        theme.font_size.insert(
            "odd".to_string(),
            FontSizeEntry::Size("2rem".to_string()),
        );
        assert_eq!(theme.font_size("odd"), Some((16.0, 24.0)));
    }

    #[test]
    fn radius_scale_resolves_in_pixels() {
        let theme = Theme::default();
        assert_eq!(theme.corner_radius("md"), Some(6.0));
        assert_eq!(theme.corner_radius("DEFAULT"), Some(4.0));
        assert_eq!(theme.corner_radius("missing"), None);
    }
}
