use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use offers_feed::config::Config;
use offers_feed::feed::FeedFormat;
use offers_feed::panel::{DocumentHost, FeedPanel};
use offers_feed::pipeline::{build_http_client, load_feed};

/// Atomically write a file using write-to-temp-then-rename pattern.
/// A page server never sees a partially written fragment.
fn atomic_write(dst: &Path, content: &[u8]) -> Result<()> {
    // Randomized temp filename so a stale temp from a crashed run never collides
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions or disk space",
                temp_path.display()
            )
        })?;

    temp_file.write_all(content).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to write to temporary file '{}': disk may be full",
            temp_path.display()
        )
    })?;

    temp_file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to sync temporary file '{}' to disk", temp_path.display())
    })?;

    drop(temp_file);

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        std::fs::remove_file(dst).with_context(|| {
            let _ = std::fs::remove_file(&temp_path);
            format!("Failed to remove existing '{}' before replace", dst.display())
        })?;
    }

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}': check permissions",
            temp_path.display(),
            dst.display()
        )
    })?;

    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "offers-feed",
    about = "Render the latest social posts panel from the group's feed"
)]
struct Args {
    /// Configuration file (TOML). Missing file means built-in defaults.
    #[arg(long, value_name = "FILE", default_value = "offers-feed.toml")]
    config: PathBuf,

    /// Write the fragment here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Render the expanded list instead of the preview
    #[arg(long)]
    expanded: bool,

    /// Use the secondary language string table
    #[arg(long)]
    secondary: bool,

    /// Override the configured feed format
    #[arg(long, value_enum)]
    format: Option<FeedFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the fragment, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if args.secondary {
        config.primary_language = false;
    }
    if let Some(format) = args.format {
        config.format = format;
    }

    let client = build_http_client().context("Failed to create HTTP client")?;

    // Fetch and parse failures become the error state, not a process error
    let outcome = load_feed(&client, &config).await;

    let strings = config.strings();
    let mut panel = FeedPanel::new(
        DocumentHost::new(),
        config.render_context(&strings),
        config.preview_limit,
    );
    panel.show(outcome);
    if args.expanded {
        panel.toggle();
    }
    let html = panel.into_host().to_html();

    match &args.output {
        Some(path) => {
            atomic_write(path, html.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = html.len(), "Wrote feed panel");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
