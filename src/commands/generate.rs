//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::Generator;
use crate::{Site, CONFIG_FILE};

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    // Load content
    let repo = site.repository();
    let posts = repo.load_posts()?;
    let pages = repo.load_pages()?;

    let skipped = posts.skipped.len() + pages.skipped.len();
    if skipped > 0 {
        tracing::warn!("Skipped {} files that could not be loaded", skipped);
    }
    tracing::info!(
        "Loaded {} posts and {} pages",
        posts.items.len(),
        pages.items.len()
    );

    let generator = Generator::new(site)?;
    generator.generate(&posts.items, &pages.items)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch content, static files and config, regenerating on change
///
/// Configuration changes are picked up by reloading the site from disk.
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&site.content_dir, &site.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // Output lands in public/, which may sit inside a watched tree
                let relevant = events
                    .iter()
                    .filter(|e| !e.path.starts_with(&site.public_dir))
                    .inspect(|e| tracing::info!("File changed: {}", e.path.display()))
                    .count();
                if relevant == 0 {
                    continue;
                }

                let result = Site::new(&site.base_dir).and_then(|fresh| run(&fresh));
                match result {
                    Ok(()) => tracing::info!("Regenerated successfully"),
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}
