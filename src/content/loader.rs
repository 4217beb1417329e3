//! Markdown loader - reads a content directory into front-matter and body pairs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, FrontMatter};

/// Extension a file must have to be loaded
pub const MARKDOWN_EXTENSION: &str = ".md";

/// What to do when one file in a directory cannot be read or parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Abort the whole directory load on the first failure
    #[default]
    FailFast,
    /// Skip the failing file and report it in [`Loaded::skipped`]
    Lenient,
}

/// A markdown file split into front-matter and body
#[derive(Debug, Clone)]
pub struct MarkdownFile {
    pub front_matter: FrontMatter,
    pub body: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Result of loading a directory: what loaded, and what was skipped under
/// [`LoadPolicy::Lenient`]
#[derive(Debug)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub skipped: Vec<ContentError>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Loaded<T> {
    /// Convert every loaded item, keeping the skipped errors
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Loaded<U> {
        Loaded {
            items: self.items.into_iter().map(f).collect(),
            skipped: self.skipped,
        }
    }

    /// Apply the load policy to a failure
    fn absorb(&mut self, policy: LoadPolicy, err: ContentError) -> Result<(), ContentError> {
        match policy {
            LoadPolicy::FailFast => Err(err),
            LoadPolicy::Lenient => {
                tracing::warn!("Skipping {:?}: {}", err.path(), err);
                self.skipped.push(err);
                Ok(())
            }
        }
    }
}

/// Load every markdown file directly inside `dir`
///
/// A missing directory loads as empty. Files are returned in file name order.
pub fn load_markdown_directory(
    dir: &Path,
    policy: LoadPolicy,
) -> Result<Loaded<MarkdownFile>, ContentError> {
    let mut loaded = Loaded::default();

    if !dir.exists() {
        tracing::debug!("Content directory {:?} does not exist", dir);
        return Ok(loaded);
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                loaded.absorb(
                    policy,
                    ContentError::ListDirectory {
                        path,
                        source: e.into(),
                    },
                )?;
                continue;
            }
        };

        if !is_markdown_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        // Symlinks are resolved only once the name qualifies
        let is_file = if entry.path_is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(meta) => meta.is_file(),
                Err(source) => {
                    loaded.absorb(
                        policy,
                        ContentError::Read {
                            path: entry.path().to_path_buf(),
                            source,
                        },
                    )?;
                    continue;
                }
            }
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            continue;
        }

        match load_markdown_file(entry.path()) {
            Ok(file) => {
                tracing::debug!("Loaded {:?}", entry.path());
                loaded.items.push(file);
            }
            Err(e) => loaded.absorb(policy, e)?,
        }
    }

    Ok(loaded)
}

/// Read a single markdown file and split off its front-matter
pub fn load_markdown_file(path: &Path) -> Result<MarkdownFile, ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (front_matter, body) =
        FrontMatter::parse(&content).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(MarkdownFile {
        front_matter,
        body: body.to_string(),
        file_name,
        path: path.to_path_buf(),
    })
}

/// Check if a file name is a markdown file
pub fn is_markdown_file(file_name: &str) -> bool {
    file_name.ends_with(MARKDOWN_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded =
            load_markdown_directory(&tmp.path().join("nope"), LoadPolicy::FailFast).unwrap();
        assert!(loaded.items.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_only_markdown_files_are_loaded() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.md"), "---\ntitle: B\n---\nbody b").unwrap();
        fs::write(tmp.path().join("a.md"), "body a").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();
        fs::write(tmp.path().join("draft.md.bak"), "ignored").unwrap();
        fs::create_dir(tmp.path().join("nested.md")).unwrap();
        fs::write(tmp.path().join("nested.md").join("deep.md"), "ignored").unwrap();

        let loaded = load_markdown_directory(tmp.path(), LoadPolicy::FailFast).unwrap();
        let names: Vec<_> = loaded.items.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
        assert_eq!(loaded.items[0].body, "body a");
        assert!(loaded.items[0].front_matter.is_empty());
        assert_eq!(loaded.items[1].front_matter.title(), Some("B".to_string()));
        assert_eq!(loaded.items[1].body, "body b");
    }

    #[test]
    fn test_fail_fast_aborts_on_bad_front_matter() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.md"), "fine").unwrap();
        fs::write(tmp.path().join("bad.md"), "---\ntitle: [oops\n---\n").unwrap();

        let err = load_markdown_directory(tmp.path(), LoadPolicy::FailFast).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
        assert!(err.path().ends_with("bad.md"));
    }

    #[test]
    fn test_lenient_skips_bad_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.md"), "fine").unwrap();
        fs::write(tmp.path().join("bad.md"), "---\ntitle: [oops\n---\n").unwrap();
        fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();

        let loaded = load_markdown_directory(tmp.path(), LoadPolicy::Lenient).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].file_name, "good.md");
        assert_eq!(loaded.skipped.len(), 2);
        assert!(loaded
            .skipped
            .iter()
            .any(|e| matches!(e, ContentError::Read { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_markdown_dangling_symlink_is_ignored() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.md"), "fine").unwrap();
        symlink(tmp.path().join("gone.png"), tmp.path().join("cover.png")).unwrap();

        let loaded = load_markdown_directory(tmp.path(), LoadPolicy::FailFast).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].file_name, "good.md");
    }

    #[cfg(unix)]
    #[test]
    fn test_markdown_symlinks_are_followed() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("source.txt"), "---\ntitle: Linked\n---\n").unwrap();
        symlink(tmp.path().join("source.txt"), tmp.path().join("linked.md")).unwrap();
        symlink(tmp.path().join("gone.md"), tmp.path().join("dangling.md")).unwrap();

        let err = load_markdown_directory(tmp.path(), LoadPolicy::FailFast).unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
        assert!(err.path().ends_with("dangling.md"));

        let loaded = load_markdown_directory(tmp.path(), LoadPolicy::Lenient).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].file_name, "linked.md");
        assert_eq!(loaded.items[0].front_matter.title(), Some("Linked".to_string()));
        assert_eq!(loaded.skipped.len(), 1);
    }

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file("post.md"));
        assert!(!is_markdown_file("post.markdown"));
        assert!(!is_markdown_file("post.MD"));
        assert!(!is_markdown_file("post.md.txt"));
    }
}
