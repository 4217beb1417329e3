//! Configuration module

mod site;
mod theme;

pub use site::{HighlightConfig, MarkdownConfig, ServerConfig, SiteConfig};
pub use theme::{ColorMode, FontsConfig, ModeValue, SemanticTokens, ThemeConfig};
