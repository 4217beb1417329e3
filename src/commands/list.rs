//! List site content

use anyhow::Result;

use crate::content::sort_newest_first;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str, json: bool) -> Result<()> {
    let output = render(site, content_type, json)?;
    print!("{}", output);
    Ok(())
}

/// Build the listing text (or JSON) for a content type
pub fn render(site: &Site, content_type: &str, json: bool) -> Result<String> {
    let repo = site.repository();
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let mut posts = repo.get_all_posts()?;
            sort_newest_first(&mut posts);
            if json {
                out = serde_json::to_string_pretty(&posts)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Posts ({}):\n", posts.len()));
                for post in posts {
                    out.push_str(&format!("  {} - {} [{}]\n", post.date, post.title, post.slug));
                }
            }
        }
        "page" | "pages" => {
            let pages = repo.get_all_pages()?;
            if json {
                out = serde_json::to_string_pretty(&pages)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Pages ({}):\n", pages.len()));
                for page in pages {
                    out.push_str(&format!("  {} [{}]\n", page.title, page.source_file_name));
                }
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with_posts() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        let posts = site.content_dir.join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("old.md"), "---\ntitle: Old\ndate: \"2023-05-01\"\n---\n").unwrap();
        fs::write(posts.join("new.md"), "---\ntitle: New\ndate: \"2024-05-01\"\n---\n").unwrap();
        (tmp, site)
    }

    #[test]
    fn test_list_posts_newest_first() {
        let (_tmp, site) = site_with_posts();
        let out = render(&site, "posts", false).unwrap();
        assert!(out.starts_with("Posts (2):\n"));
        assert!(out.find("New").unwrap() < out.find("Old").unwrap());
        assert!(out.contains("  2024-05-01 - New [new]\n"));
    }

    #[test]
    fn test_list_posts_json() {
        let (_tmp, site) = site_with_posts();
        let out = render(&site, "post", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["slug"], "new");
        assert_eq!(value[1]["title"], "Old");
    }

    #[test]
    fn test_list_pages_when_missing() {
        let (_tmp, site) = site_with_posts();
        assert_eq!(render(&site, "pages", false).unwrap(), "Pages (0):\n");
    }

    #[test]
    fn test_unknown_type() {
        let (_tmp, site) = site_with_posts();
        assert!(render(&site, "tags", false).is_err());
    }
}
