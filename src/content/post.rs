//! Post and Page models

use serde::{Deserialize, Serialize};

/// Title used when front-matter does not provide one
pub const UNTITLED: &str = "Untitled";

/// Fields shared by posts and pages
pub trait ContentItem {
    /// Identity within its collection (slug for posts, file name for pages)
    fn key(&self) -> &str;
    fn title(&self) -> &str;
    fn excerpt(&self) -> Option<&str>;
    /// Markdown source with front-matter stripped
    fn raw_body(&self) -> &str;
    /// HTML rendered from [`raw_body`](Self::raw_body)
    fn html(&self) -> &str;
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date as written in front-matter (ISO 8601)
    pub date: String,

    /// Short summary shown on the listing page
    pub excerpt: Option<String>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub html: String,

    /// File name without the `.md` extension
    pub slug: String,

    /// Stable identifier, equal to the slug
    pub id: String,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: String, title: String, date: String) -> Self {
        Self {
            title,
            date,
            excerpt: None,
            raw: String::new(),
            html: String::new(),
            id: slug.clone(),
            slug,
        }
    }
}

impl ContentItem for Post {
    fn key(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn excerpt(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    fn raw_body(&self) -> &str {
        &self.raw
    }

    fn html(&self) -> &str {
        &self.html
    }
}

/// A standalone page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page title
    pub title: String,

    pub excerpt: Option<String>,

    /// Background image for the hero section
    pub hero_image: Option<String>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub html: String,

    /// Name of the markdown file the page was loaded from
    pub source_file_name: String,
}

impl Page {
    /// Create a new page with minimal required fields
    pub fn new(source_file_name: String, title: String) -> Self {
        Self {
            title,
            excerpt: None,
            hero_image: None,
            raw: String::new(),
            html: String::new(),
            source_file_name,
        }
    }
}

impl ContentItem for Page {
    fn key(&self) -> &str {
        &self.source_file_name
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn excerpt(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    fn raw_body(&self) -> &str {
        &self.raw
    }

    fn html(&self) -> &str {
        &self.html
    }
}

/// Sort posts by date descending (newest first)
///
/// Dates are compared as strings, which orders ISO 8601 dates correctly.
/// The sort is stable, so posts sharing a date keep their relative order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}
