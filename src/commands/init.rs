//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{PAGES_DIR, POSTS_DIR};
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: Marquee
description: Hybrid static, revalidated and dynamic pages from markdown
language: en

# Directory
content_dir: content
static_dir: static
public_dir: public

# Home page
# home_page: home.md
default_hero_image: /uploads/home-hero-01.jpeg

# Content
# fail_fast aborts a load on the first broken file, lenient skips it
load_policy: fail_fast
highlight:
  enable: true
  theme: base16-ocean.dark
markdown:
  escape_html: false

# Seconds shared caches may serve listing and post pages before revalidating
revalidate: 60

server:
  host: 127.0.0.1
  port: 4000

theme:
  initial_color_mode: system
"#;

const HOME_PAGE: &str = r#"---
title: Welcome to Marquee
excerpt: Markdown in, marketing site out.
hero_image: /uploads/home-hero-01.jpeg
---

Edit `content/pages/home.md` to change this page.
"#;

const FIRST_POST: &str = r#"---
title: Hello World
date: "2024-01-01"
excerpt: The first post on this site.
---

# Hi

Posts live in `content/posts`. The file name becomes the URL.
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    let content_dir = target_dir.join("content");
    fs::create_dir_all(content_dir.join(PAGES_DIR))?;
    fs::create_dir_all(content_dir.join(POSTS_DIR))?;
    fs::create_dir_all(target_dir.join("static").join("uploads"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    write_if_missing(&content_dir.join(PAGES_DIR).join("home.md"), HOME_PAGE)?;
    write_if_missing(&content_dir.join(POSTS_DIR).join("hello-world.md"), FIRST_POST)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}
