//! Treemap Explorer - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use treemap_app::{init_logging, write_scene, Session, SessionOutput, TreemapApp};
use treemap_common::Point;
use treemap_config::{Config, ConfigLoader};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `treemap_charts=trace`
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one dataset to SVG
    Render {
        /// Dataset key, the configured default if omitted
        #[arg(short, long)]
        dataset: Option<String>,
        /// SVG output file
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also write a PNG preview to this file
        #[arg(long)]
        png: Option<PathBuf>,
        /// Hover the pointer over this chart point, as `x,y`
        #[arg(long)]
        pointer: Option<Point>,
    },
    /// Render every configured dataset
    RenderAll {
        /// Output directory, the configured one if omitted
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Read commands from stdin and re-render after each one
    Interactive {
        /// SVG file rewritten after every change
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show or toggle the saved theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Validate the configuration and print the datasets
    CheckConfig {
        /// Also write the effective configuration (file, defaults and
        /// environment overrides) here, as YAML, TOML or JSON by extension
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ThemeAction {
    /// Switch between light and dark
    Toggle,
    /// Print the current theme
    Show,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ConfigLoader::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let _guard = init_logging(&config.logging, args.log_level.as_deref())?;

    info!("Starting Treemap Explorer");

    let app = TreemapApp::new(config, args.config.clone())?;

    match args.command {
        Command::Render {
            dataset,
            out,
            png,
            pointer,
        } => {
            let state = app.render(dataset.as_deref(), pointer).await?;
            let key = state.active_dataset().unwrap_or_default().to_string();
            let (default_svg, default_png) = app.output_paths(&key);
            let svg = out.unwrap_or(default_svg);
            let png = png.or(default_png);

            write_scene(&state.view(), &svg, png.as_deref())?;
            println!("{}", svg.display());
        }
        Command::RenderAll { out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| app.config().output.directory.clone());
            let outcomes = app.render_all(&out_dir).await;

            let mut failed = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(path) => println!("{}", path.display()),
                    Err(e) => {
                        failed += 1;
                        error!(dataset = %outcome.dataset, "Render failed: {}", e);
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} datasets failed to render", outcomes.len());
            }
        }
        Command::Interactive { out } => {
            let config = app.config();
            let svg = out.unwrap_or_else(|| config.output.directory.join("interactive.svg"));
            let png = config
                .output
                .png_preview
                .then(|| config.output.directory.join("interactive.png"));

            let session = Session::new(
                Arc::new(app),
                SessionOutput {
                    svg: Some(svg),
                    png,
                },
                tokio::io::stdout(),
            );
            let state = session.run(BufReader::new(tokio::io::stdin())).await?;
            info!(dataset = ?state.active_dataset(), theme = %state.theme(), "Session finished");
        }
        Command::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Toggle => {
                let theme = app.toggle_theme();
                println!("{theme} {}", theme.toggle_icon());
            }
            ThemeAction::Show => {
                let theme = app.initial_theme();
                println!("{theme} {}", theme.toggle_icon());
            }
        },
        Command::CheckConfig { write } => {
            let config = app.config();
            println!("configuration OK");
            for dataset in &config.datasets {
                let marker = if dataset.key == config.default_dataset { "*" } else { " " };
                println!("{marker} {:<12} {}", dataset.key, dataset.url);
            }
            if let Some(path) = write {
                ConfigLoader::save(&path, &config)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("{}", path.display());
            }
        }
    }

    info!("Treemap Explorer has shut down");
    Ok(())
}
