use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use widget_core::{memory_page::InMemoryPage, HostPage, RunOutcome, WeatherWidget};

mod config;

use config::load_settings;

/// Runs the weather widget once against a page fixture and prints the page.
#[derive(Parser, Debug)]
struct Args {
    /// TOML settings file (defaults to ./widget.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cookie header of the page, e.g. "__uzmaj3=abc; theme=dark"
    #[arg(long)]
    cookie: Option<String>,
    /// JSON file with the page's embedded __NEXT_DATA__ document
    #[arg(long)]
    next_data: Option<PathBuf>,
    /// Build the page without the link list container
    #[arg(long)]
    no_anchor: bool,
    /// Number of clicks to simulate on the toggle link
    #[arg(long, default_value_t = 0)]
    toggles: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let selector = settings.selector()?;

    let mut page = InMemoryPage::new();
    if let Some(cookie) = args.cookie {
        page = page.with_cookie(cookie);
    }
    if let Some(path) = &args.next_data {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read next data '{}'", path.display()))?;
        let data: Value = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse next data '{}'", path.display()))?;
        page = page.with_next_data(data);
    }
    if !args.no_anchor {
        page = page.with_anchor_for(&selector);
    }
    let page = Arc::new(page);

    let widget = WeatherWidget::new(settings, HostPage::from_page(page.clone()))?;
    match widget.run().await {
        RunOutcome::Mounted(mut mounted) => {
            println!(
                "mounted for group {} with {} forecast cards",
                mounted.group(),
                mounted.cards().len()
            );
            for _ in 0..args.toggles {
                mounted.toggle().await?;
                println!("panel is now {:?}", mounted.visibility());
            }
        }
        RunOutcome::Aborted(reason) => {
            println!("widget not mounted: {}", reason.message());
        }
    }

    print!("{}", page.render_markup());
    Ok(())
}
