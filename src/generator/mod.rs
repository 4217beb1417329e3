//! Generator module - writes the site as static HTML files
//!
//! Produces the same pages the server renders on request, except the preview
//! routes, which only exist on the server.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{sort_newest_first, Page, Post};
use crate::templates::{pick_home_page, TemplateRenderer};
use crate::Site;

/// Static site generator using the built-in templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new(&site.config)?;

        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        // Ensure public directory exists
        fs::create_dir_all(&self.site.public_dir)?;

        // Copy static assets (images, etc.)
        self.copy_static_assets()?;

        // Sort posts by date (newest first)
        let mut sorted_posts: Vec<_> = posts.to_vec();
        sort_newest_first(&mut sorted_posts);

        let home = pick_home_page(pages, self.site.config.home_page.as_deref());
        self.write_page("index.html", &self.renderer.home(home)?)?;
        self.write_page("posts/index.html", &self.renderer.post_list(&sorted_posts)?)?;
        self.generate_post_pages(&sorted_posts)?;
        self.write_page("404.html", &self.renderer.not_found()?)?;

        Ok(())
    }

    fn generate_post_pages(&self, posts: &[Post]) -> Result<()> {
        for post in posts {
            if matches!(post.slug.as_str(), "" | "." | "..") {
                tracing::warn!("Skipping post with unusable slug {:?}", post.slug);
                continue;
            }

            let html = self.renderer.post(post)?;
            self.write_page(&format!("posts/{}/index.html", post.slug), &html)?;
        }

        Ok(())
    }

    /// Write a rendered page below the public directory
    fn write_page(&self, relative: &str, html: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy the static directory into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);
            copy_file(path, &dest)?;
        }

        Ok(())
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map_err(|e| anyhow!("Failed to copy {:?} to {:?}: {}", from, to, e))?;
    Ok(())
}
