//! Create a new post

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;

use crate::content::{loader::MARKDOWN_EXTENSION, POSTS_DIR};
use crate::Site;

/// Create a post file named after `slug`, or the slugified title
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = site.content_dir.join(POSTS_DIR);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}{}", slug, MARKDOWN_EXTENSION));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut front_matter = IndexMap::new();
    front_matter.insert("title", title.to_string());
    front_matter.insert("date", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
    let content = format!("---\n{}---\n", serde_yaml::to_string(&front_matter)?);

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}
