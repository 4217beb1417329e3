//! Content repository - typed, read-only access to pages and posts

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

use super::loader::{self, LoadPolicy, Loaded, MarkdownFile, MARKDOWN_EXTENSION};
use super::post::UNTITLED;
use super::{ContentError, MarkdownRenderer, Page, Post};

/// Subdirectory of the content root holding pages
pub const PAGES_DIR: &str = "pages";
/// Subdirectory of the content root holding posts
pub const POSTS_DIR: &str = "posts";

/// Loads pages and posts from `<content_root>/pages` and `<content_root>/posts`
///
/// Nothing is cached: every call re-reads the directory and re-renders the
/// markdown, so the repository is safe to call on every request.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    content_root: PathBuf,
    renderer: MarkdownRenderer,
    policy: LoadPolicy,
}

impl ContentRepository {
    /// Create a repository with the default renderer and fail-fast loading
    pub fn new<P: AsRef<Path>>(content_root: P) -> Self {
        Self::with_options(content_root, MarkdownRenderer::default(), LoadPolicy::default())
    }

    pub fn with_options<P: AsRef<Path>>(
        content_root: P,
        renderer: MarkdownRenderer,
        policy: LoadPolicy,
    ) -> Self {
        Self {
            content_root: content_root.as_ref().to_path_buf(),
            renderer,
            policy,
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.content_root.join(PAGES_DIR)
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.content_root.join(POSTS_DIR)
    }

    /// Load all pages along with any files skipped by the load policy
    pub fn load_pages(&self) -> Result<Loaded<Page>, ContentError> {
        let files = loader::load_markdown_directory(&self.pages_dir(), self.policy)?;
        let pages = files.map(|file| self.build_page(file));
        tracing::debug!("Loaded {} pages", pages.items.len());
        Ok(pages)
    }

    /// Load all posts along with any files skipped by the load policy
    pub fn load_posts(&self) -> Result<Loaded<Post>, ContentError> {
        let files = loader::load_markdown_directory(&self.posts_dir(), self.policy)?;
        let posts = files.map(|file| self.build_post(file));
        tracing::debug!("Loaded {} posts", posts.items.len());
        Ok(posts)
    }

    /// All pages, in file name order
    pub fn get_all_pages(&self) -> Result<Vec<Page>, ContentError> {
        Ok(self.load_pages()?.items)
    }

    /// All posts, in file name order; use
    /// [`sort_newest_first`](super::sort_newest_first) before display
    pub fn get_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        Ok(self.load_posts()?.items)
    }

    /// Find a post by slug, or `None` if no file has that name
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        Ok(self
            .get_all_posts()?
            .into_iter()
            .find(|post| post.slug == slug))
    }

    /// Find a page by the name of its source file
    pub fn get_page(&self, source_file_name: &str) -> Result<Option<Page>, ContentError> {
        Ok(self
            .get_all_pages()?
            .into_iter()
            .find(|page| page.source_file_name == source_file_name))
    }

    fn build_page(&self, file: MarkdownFile) -> Page {
        let fm = &file.front_matter;
        let title = fm.title().unwrap_or_else(|| UNTITLED.to_string());

        let mut page = Page::new(file.file_name.clone(), title);
        page.excerpt = fm.excerpt();
        page.hero_image = fm.hero_image();
        page.html = self.renderer.render(&file.body);
        page.raw = file.body;
        page
    }

    fn build_post(&self, file: MarkdownFile) -> Post {
        let fm = &file.front_matter;
        let slug = file
            .file_name
            .strip_suffix(MARKDOWN_EXTENSION)
            .unwrap_or(&file.file_name)
            .to_string();
        let title = fm.title().unwrap_or_else(|| UNTITLED.to_string());
        // Undated posts sort as newest
        let date = fm.date().unwrap_or_else(now_iso8601);

        let mut post = Post::new(slug, title, date);
        post.excerpt = fm.excerpt();
        post.html = self.renderer.render(&file.body);
        post.raw = file.body;
        post
    }
}

/// Current UTC time as `2024-01-01T12:00:00.000Z`
fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
