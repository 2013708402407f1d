use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use pixsearch::api_client::{ImageSearch, PixabayClient};
use pixsearch::config::config::{Config, API_KEY_ENV};
use pixsearch::page::PageModel;
use pixsearch::render;
use pixsearch::session::SearchSession;
use pixsearch::table_display::{display_gallery, display_toasts};
use pixsearch::tui_app::run_tui_app;
use pixsearch::utils::logging;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "pixsearch", version, about = "Search Pixabay photos from the terminal")]
struct Cli {
    /// Query to run immediately (required with --classic)
    query: Option<String>,

    /// Print results as a table instead of starting the interactive UI
    #[arg(long)]
    classic: bool,

    /// Pages to fetch in classic mode
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Write the resulting gallery as an HTML page (classic mode)
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Override the API key from the config file
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Initialize configuration with a wizard
    #[arg(long)]
    init_config: bool,

    /// Write the default configuration file with comments
    #[arg(long)]
    generate_config: bool,
}

fn build_client(config: &Config) -> Result<Arc<dyn ImageSearch>> {
    if config.api.key.trim().is_empty() {
        bail!(
            "No Pixabay API key configured. Set {} or run `pixsearch --init-config`.",
            API_KEY_ENV
        );
    }

    let client = match config.api.timeout() {
        Some(timeout) => PixabayClient::with_timeout(&config.api.base_url, &config.api.key, timeout)?,
        None => PixabayClient::new(&config.api.base_url, &config.api.key),
    };
    Ok(Arc::new(client))
}

async fn run_classic(cli: &Cli, config: &Config) -> Result<()> {
    let Some(query) = cli.query.as_deref() else {
        bail!("--classic needs a QUERY argument");
    };

    let client = build_client(config)?;
    let mut session =
        SearchSession::new(client).with_strict_validation(config.search.strict_validation);
    let mut page = PageModel::new();

    println!("{}", format!("Searching for: {}", query.trim()).cyan());
    page.form.set_value(query);
    session.submit_search(&mut page, query).await;

    for _ in 1..cli.pages {
        if session.load_more(&mut page).await.is_none() {
            break;
        }
    }

    display_toasts(page.toasts.drain(), &config.display.icons);
    display_gallery(&page.gallery);

    if let Some(path) = &cli.export {
        let doc = render::gallery_document(&session.state().query, &page.gallery);
        std::fs::write(path, doc)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{}", format!("Gallery written to {}", path.display()).green());
    }

    Ok(())
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;
    println!("Configuration file created at: {:?}", path);
    println!("Edit this file to customize pixsearch.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let config = Config::init_wizard()?;
        println!("\nConfiguration initialized successfully!");
        if !config.display.use_glyphs {
            println!("Note: Simple mode enabled (ASCII icons)");
        }
        return Ok(());
    }

    if cli.generate_config {
        return generate_config();
    }

    let log_buffer = if cli.classic {
        logging::init_stderr_tracing();
        None
    } else {
        Some(logging::init_tracing())
    };

    let mut config = Config::load()?;
    if let Some(key) = cli.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config.api.key = key.trim().to_string();
    }

    if cli.classic {
        return run_classic(&cli, &config).await;
    }

    let client = build_client(&config)?;
    run_tui_app(client, config, log_buffer, cli.query).await
}
