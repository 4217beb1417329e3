//! CLI entry point for marquee

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "A server-rendered marketing site and blog built from markdown content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name (without extension) to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Render every page to static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the site, rendering pages on each request
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.host from the config)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Remove the generated public folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (post, page)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "marquee=debug,info"
    } else {
        "marquee=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            marquee::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let site = marquee::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            marquee::commands::new::create_post(&site, &title, slug.as_deref())?;
        }

        Commands::Generate { watch } => {
            let site = marquee::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || marquee::commands::generate::watch(&site))
                    .await??;
            }
        }

        Commands::Serve { port, ip } => {
            let site = marquee::Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.host.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            marquee::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = marquee::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let site = marquee::Site::new(&base_dir)?;
            marquee::commands::list::run(&site, &r#type, json)?;
        }

        Commands::Version => {
            println!("marquee version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
