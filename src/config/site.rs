//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ThemeConfig;
use crate::content::{LoadPolicy, DEFAULT_HIGHLIGHT_THEME};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // Directory
    /// Holds `pages/` and `posts/`
    pub content_dir: String,
    /// Served at the site root (images, favicons, ...)
    pub static_dir: String,
    /// Output of `generate`
    pub public_dir: String,

    // Home page
    /// Page file used for the hero; the first page when unset
    pub home_page: Option<String>,
    pub default_hero_image: String,

    // Content
    pub load_policy: LoadPolicy,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Caching
    /// Seconds a shared cache may serve listing and detail pages before
    /// revalidating
    pub revalidate: u64,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Marquee".to_string(),
            description: "Hybrid static, revalidated and dynamic pages from markdown".to_string(),
            language: "en".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            home_page: None,
            default_hero_image: "/uploads/home-hero-01.jpeg".to_string(),

            load_policy: LoadPolicy::FailFast,
            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),

            revalidate: 60,

            server: ServerConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: DEFAULT_HIGHLIGHT_THEME.to_string(),
        }
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Render raw HTML in markdown as escaped text instead of injecting it
    pub escape_html: bool,
}

/// Development/production server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.revalidate, 60);
        assert_eq!(config.load_policy, LoadPolicy::FailFast);
        assert!(config.highlight.enable);
        assert!(!config.markdown.escape_html);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Acme
content_dir: site-content
load_policy: lenient
revalidate: 300
home_page: landing.md
server:
  port: 8080
markdown:
  escape_html: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Acme");
        assert_eq!(config.content_dir, "site-content");
        assert_eq!(config.load_policy, LoadPolicy::Lenient);
        assert_eq!(config.revalidate, 300);
        assert_eq!(config.home_page.as_deref(), Some("landing.md"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.markdown.escape_html);
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn test_load_reports_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, "revalidate: soon\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("_config.yml"));
    }
}
