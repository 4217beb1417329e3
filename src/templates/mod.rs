//! Built-in site templates using Tera template engine
//!
//! All templates are embedded directly in the binary. Rendered markdown is
//! inserted with `| safe`; everything else goes through Tera's HTML escaping.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Page, Post};
use crate::helpers;

/// Heading shown on the home page when there is no page to take it from
const WELCOME: &str = "Welcome";

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
    config: ConfigData,
    theme_css: String,
    default_hero_image: String,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Register all templates
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("posts.html", include_str!("site/posts.html")),
            ("post.html", include_str!("site/post.html")),
            ("preview.html", include_str!("site/preview.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("error.html", include_str!("site/error.html")),
            // Partials
            (
                "partials/styles.html",
                include_str!("site/partials/styles.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("display_date", display_date_filter);
        tera.register_filter("machine_date", machine_date_filter);

        Ok(Self {
            tera,
            config: ConfigData::from(config),
            theme_css: config.theme.to_css(),
            default_hero_image: config.default_hero_image.clone(),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Home page: hero built from `home`, or the default hero when there is no page
    pub fn home(&self, home: Option<&Page>) -> Result<String> {
        let mut context = self.base_context();
        context.insert("hero", &HeroData::new(home, &self.default_hero_image));
        self.render("home.html", &context)
    }

    /// Blog listing; `posts` is rendered in the order given
    pub fn post_list(&self, posts: &[Post]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &summaries(posts));
        self.render("posts.html", &context)
    }

    /// A single post
    pub fn post(&self, post: &Post) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", post);
        self.render("post.html", &context)
    }

    /// Draft preview index
    pub fn preview(&self, posts: &[Post]) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &summaries(posts));
        self.render("preview.html", &context)
    }

    pub fn not_found(&self) -> Result<String> {
        self.render("not_found.html", &self.base_context())
    }

    pub fn error(&self) -> Result<String> {
        self.render("error.html", &self.base_context())
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("config", &self.config);
        context.insert("theme_css", &self.theme_css);
        context
    }
}

/// Pick the page used for the home hero: the configured file, else the first page
pub fn pick_home_page<'a>(pages: &'a [Page], home_page: Option<&str>) -> Option<&'a Page> {
    match home_page {
        Some(name) => pages
            .iter()
            .find(|p| p.source_file_name == name)
            .or_else(|| {
                tracing::warn!("Home page {:?} not found, using the first page", name);
                pages.first()
            }),
        None => pages.first(),
    }
}

fn summaries(posts: &[Post]) -> Vec<PostSummary> {
    posts.iter().map(PostSummary::from).collect()
}

/// Tera filter: post date for display
fn display_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("display_date", "value", String, value);
    Ok(tera::Value::String(helpers::display_date(&s)))
}

/// Tera filter: post date for `datetime` attributes
fn machine_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("machine_date", "value", String, value);
    Ok(tera::Value::String(helpers::machine_date(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeroData {
    pub title: String,
    pub alt: String,
    pub image: String,
    pub excerpt: Option<String>,
}

impl HeroData {
    pub fn new(page: Option<&Page>, default_image: &str) -> Self {
        match page {
            Some(page) => Self {
                title: page.title.clone(),
                alt: page.title.clone(),
                image: page
                    .hero_image
                    .clone()
                    .filter(|image| !image.is_empty())
                    .unwrap_or_else(|| default_image.to_string()),
                excerpt: page.excerpt.clone(),
            },
            None => Self {
                title: WELCOME.to_string(),
                alt: "Hero".to_string(),
                image: default_image.to_string(),
                excerpt: None,
            },
        }
    }
}

/// Listing entry; leaves out the rendered body
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: Option<String>,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.date.clone(),
            excerpt: post.excerpt.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&SiteConfig::default()).unwrap()
    }

    fn post(slug: &str, title: &str, date: &str) -> Post {
        let mut post = Post::new(slug.to_string(), title.to_string(), date.to_string());
        post.html = "<p>Body <em>text</em></p>".to_string();
        post
    }

    #[test]
    fn test_home_without_pages() {
        let html = renderer().home(None).unwrap();
        assert!(html.contains("<h1 class=\"hero-title\">Welcome</h1>"));
        // Tera escapes slashes in attribute values
        assert!(html.contains("src=\"&#x2F;uploads&#x2F;home-hero-01.jpeg\""));
        assert!(html.contains("alt=\"Hero\""));
        assert!(html.contains("Get Started"));
        assert!(!html.contains("<p class=\"hero-excerpt\">"));
        assert!(html.contains("--colors-brand-500"));
    }

    #[test]
    fn test_layout_shell() {
        let html = renderer().not_found().unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<meta name=\"description\""));
        assert!(html.contains(":root {"));
        assert!(!html.contains("<nav"));
    }

    #[test]
    fn test_home_with_page() {
        let mut page = Page::new("home.md".to_string(), "Acme & Co".to_string());
        page.excerpt = Some("We build things".to_string());
        page.hero_image = Some("/uploads/custom.jpg".to_string());

        let html = renderer().home(Some(&page)).unwrap();
        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains("<p class=\"hero-excerpt\">We build things</p>"));
        assert!(html.contains("src=\"&#x2F;uploads&#x2F;custom.jpg\""));
    }

    #[test]
    fn test_post_list_renders_in_given_order() {
        let posts = vec![
            post("june", "June news", "2024-06-01"),
            post("january", "January news", "2024-01-01"),
        ];
        let html = renderer().post_list(&posts).unwrap();
        let june = html.find("June news").unwrap();
        let january = html.find("January news").unwrap();
        assert!(june < january);
        assert!(html.contains("href=\"/posts/june\""));
        assert!(!html.contains("<em>text</em>"));
    }

    #[test]
    fn test_empty_post_list() {
        let html = renderer().post_list(&[]).unwrap();
        assert!(html.contains(">Blog</h2>"));
        assert!(!html.contains("class=\"post-link\""));
    }

    #[test]
    fn test_post_injects_html_unescaped() {
        let html = renderer()
            .post(&post("hello", "Hello <World>", "2024-01-01"))
            .unwrap();
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("<article class=\"prose\"><p>Body <em>text</em></p></article>"));
        assert!(html.contains("Mon Jan 01 2024"));
        assert!(html.contains("datetime=\"2024-01-01\""));
    }

    #[test]
    fn test_preview_and_error_pages() {
        let r = renderer();
        let html = r.preview(&[post("draft", "Draft", "2024-02-02")]).unwrap();
        assert!(html.contains("Preview (SSR)"));
        assert!(html.contains("href=\"/preview/draft\""));
        assert!(r.not_found().unwrap().contains("404"));
        assert!(r.error().unwrap().contains("Something went wrong"));
    }

    #[test]
    fn test_pick_home_page() {
        let pages = vec![
            Page::new("about.md".to_string(), "About".to_string()),
            Page::new("landing.md".to_string(), "Landing".to_string()),
        ];
        assert_eq!(pick_home_page(&pages, None).unwrap().title, "About");
        assert_eq!(
            pick_home_page(&pages, Some("landing.md")).unwrap().title,
            "Landing"
        );
        assert!(pick_home_page(&[], None).is_none());
    }

    #[test]
    fn test_pick_home_page_falls_back_when_configured_page_is_missing() {
        let pages = vec![
            Page::new("about.md".to_string(), "About".to_string()),
            Page::new("landing.md".to_string(), "Landing".to_string()),
        ];
        assert_eq!(
            pick_home_page(&pages, Some("missing.md")).unwrap().title,
            "About"
        );
        assert!(pick_home_page(&[], Some("missing.md")).is_none());
    }
}
