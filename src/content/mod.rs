//! Content module - markdown loading, rendering and the page/post repository

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod repository;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use loader::{LoadPolicy, Loaded};
pub use markdown::{render_markdown, MarkdownRenderer, DEFAULT_HIGHLIGHT_THEME};
pub use post::{sort_newest_first, ContentItem, Page, Post, UNTITLED};
pub use repository::{ContentRepository, PAGES_DIR, POSTS_DIR};
