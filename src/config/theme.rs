//! Design tokens, rendered as CSS custom properties

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Which palette the page uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Follow `prefers-color-scheme`
    #[default]
    System,
    Light,
    Dark,
}

/// A semantic token with an optional dark-mode override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeValue {
    pub default: String,
    #[serde(rename = "_dark", default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
}

impl ModeValue {
    fn new(default: &str, dark: &str) -> Self {
        Self {
            default: default.to_string(),
            dark: Some(dark.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontsConfig {
    pub heading: String,
    pub body: String,
}

/// Tokens that refer to other tokens and can differ between light and dark
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticTokens {
    pub colors: IndexMap<String, ModeValue>,
    pub radii: IndexMap<String, ModeValue>,
    pub shadows: IndexMap<String, ModeValue>,
}

/// Theme configuration
///
/// Raw scales (`colors`, `radii`, `shadows`, `fonts`) become
/// `--<group>-<name>` variables. Semantic token values that name a scale
/// entry (`gray.800`, `lg`) become `var(...)` references, anything else is
/// used verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub initial_color_mode: ColorMode,
    /// Colour palettes keyed by name, then by shade
    pub colors: IndexMap<String, IndexMap<String, String>>,
    pub radii: IndexMap<String, String>,
    pub shadows: IndexMap<String, String>,
    pub fonts: FontsConfig,
    pub semantic_tokens: SemanticTokens,
}

const SYSTEM_FONTS: &str = "'Inter', system-ui, -apple-system, Segoe UI, Roboto, sans-serif";

fn scale(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let mut colors = IndexMap::new();
        colors.insert(
            "brand".to_string(),
            scale(&[
                ("50", "#f4f6ff"),
                ("100", "#e5e9ff"),
                ("200", "#cbd4ff"),
                ("300", "#a9b6ff"),
                ("400", "#7e8bff"),
                ("500", "#5663f2"),
                ("600", "#434ecc"),
                ("700", "#343ca3"),
                ("800", "#262c7a"),
                ("900", "#1b205c"),
            ]),
        );
        colors.insert(
            "gray".to_string(),
            scale(&[
                ("50", "#f7fafc"),
                ("100", "#edf2f7"),
                ("200", "#e2e8f0"),
                ("300", "#cbd5e0"),
                ("400", "#a0aec0"),
                ("500", "#718096"),
                ("600", "#4a5568"),
                ("700", "#2d3748"),
                ("800", "#1a202c"),
                ("900", "#171923"),
            ]),
        );

        let semantic_colors = [
            ("bg.surface", "gray.50", "gray.900"),
            ("bg.elevated", "white", "gray.800"),
            ("text.primary", "gray.800", "gray.100"),
            ("text.muted", "gray.600", "gray.300"),
            ("brand.solid", "brand.600", "brand.400"),
            ("brand.subtle", "brand.50", "brand.900"),
            ("border.muted", "gray.200", "gray.700"),
        ]
        .iter()
        .map(|(name, light, dark)| (name.to_string(), ModeValue::new(light, dark)))
        .collect();

        let mut semantic_radii = IndexMap::new();
        semantic_radii.insert("card".to_string(), ModeValue::new("lg", "lg"));
        let mut semantic_shadows = IndexMap::new();
        semantic_shadows.insert("elevation.1".to_string(), ModeValue::new("sm", "dark-lg"));

        Self {
            initial_color_mode: ColorMode::System,
            colors,
            radii: scale(&[
                ("sm", "6px"),
                ("md", "10px"),
                ("lg", "16px"),
                ("xl", "24px"),
                ("2xl", "32px"),
            ]),
            shadows: scale(&[
                ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
                ("lg", "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)"),
                (
                    "dark-lg",
                    "rgba(0, 0, 0, 0.1) 0px 0px 0px 1px, rgba(0, 0, 0, 0.2) 0px 5px 10px, rgba(0, 0, 0, 0.4) 0px 15px 40px",
                ),
            ]),
            fonts: FontsConfig {
                heading: SYSTEM_FONTS.to_string(),
                body: SYSTEM_FONTS.to_string(),
            },
            semantic_tokens: SemanticTokens {
                colors: semantic_colors,
                radii: semantic_radii,
                shadows: semantic_shadows,
            },
        }
    }
}

impl ThemeConfig {
    /// Render the tokens as a stylesheet defining CSS custom properties on `:root`
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");

        for (palette, shades) in &self.colors {
            for (shade, value) in shades {
                let _ = writeln!(css, "  --colors-{}-{}: {};", css_name(palette), shade, value);
            }
        }
        for (name, value) in &self.radii {
            let _ = writeln!(css, "  --radii-{}: {};", css_name(name), value);
        }
        for (name, value) in &self.shadows {
            let _ = writeln!(css, "  --shadows-{}: {};", css_name(name), value);
        }
        let _ = writeln!(css, "  --fonts-heading: {};", self.fonts.heading);
        let _ = writeln!(css, "  --fonts-body: {};", self.fonts.body);

        let use_dark = self.initial_color_mode == ColorMode::Dark;
        css.push_str(&self.semantic_block(use_dark));
        css.push_str(match self.initial_color_mode {
            ColorMode::System => "  color-scheme: light dark;\n",
            ColorMode::Light => "  color-scheme: light;\n",
            ColorMode::Dark => "  color-scheme: dark;\n",
        });
        css.push_str("}\n");

        if self.initial_color_mode == ColorMode::System {
            css.push_str("@media (prefers-color-scheme: dark) {\n  :root {\n");
            for line in self.semantic_block(true).lines() {
                let _ = writeln!(css, "  {}", line);
            }
            css.push_str("  }\n}\n");
        }

        css
    }

    /// Custom properties for every semantic token in one colour mode
    fn semantic_block(&self, dark: bool) -> String {
        let groups = [
            ("colors", &self.semantic_tokens.colors),
            ("radii", &self.semantic_tokens.radii),
            ("shadows", &self.semantic_tokens.shadows),
        ];

        let mut block = String::new();
        for (group, tokens) in groups {
            for (name, value) in tokens {
                let raw = match (&value.dark, dark) {
                    (Some(dark_value), true) => dark_value,
                    _ => &value.default,
                };
                let _ = writeln!(
                    block,
                    "  --{}-{}: {};",
                    group,
                    css_name(name),
                    self.resolve(group, raw)
                );
            }
        }
        block
    }

    /// Turn a reference to a scale entry into a `var(...)`
    fn resolve(&self, group: &str, value: &str) -> String {
        let known = match group {
            "colors" => value
                .split_once('.')
                .and_then(|(palette, shade)| self.colors.get(palette)?.get(shade))
                .is_some(),
            "radii" => self.radii.contains_key(value),
            "shadows" => self.shadows.contains_key(value),
            _ => false,
        };

        if known {
            format!("var(--{}-{})", group, css_name(value))
        } else {
            value.to_string()
        }
    }
}

/// Token names use dots for nesting; CSS variables use dashes
fn css_name(name: &str) -> String {
    name.replace('.', "-")
}
