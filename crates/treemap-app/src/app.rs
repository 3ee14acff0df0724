//! Application services: configuration, fetching, theme persistence and
//! writing rendered output.

use crate::error::AppResult;
use crate::state::{AppState, Effect, LoadTicket, Message};
use crate::theme_store::ThemeStore;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use treemap_charts::{
    CachedFetcher, Chart, DatasetFetcher, PngPreviewRenderer, Scene, SceneRenderer,
    SourceFetcher, SvgRenderer,
};
use treemap_common::{Point, Result, Theme, TreemapError};
use treemap_config::{Config, ConfigCache, ConfigLoader, DatasetConfig, FetchConfig};

/// Outcome of rendering one dataset in [`TreemapApp::render_all`].
#[derive(Debug)]
pub struct RenderOutcome {
    /// Dataset key.
    pub dataset: String,
    /// Written SVG path, or why rendering failed.
    pub result: AppResult<PathBuf>,
}

/// Shared application services.
pub struct TreemapApp {
    config: ConfigCache,
    source: Option<PathBuf>,
    fetcher: Arc<dyn DatasetFetcher>,
}

impl TreemapApp {
    /// Creates the app with the fetcher described by the configuration.
    ///
    /// `source` is the file the configuration came from, reread by [`TreemapApp::reload`].
    pub fn new(config: Config, source: Option<PathBuf>) -> AppResult<Self> {
        let fetcher = build_fetcher(&config.fetch)?;
        Ok(Self::with_fetcher(config, fetcher).with_source(source))
    }

    /// Creates the app with a custom fetcher.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn DatasetFetcher>) -> Self {
        Self {
            config: ConfigCache::new(config),
            source: None,
            fetcher,
        }
    }

    /// Sets the file [`TreemapApp::reload`] rereads. Without one, reloading
    /// goes through the usual discovery.
    #[must_use]
    pub fn with_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> Arc<Config> {
        self.config.get()
    }

    /// Rereads the configuration and drops cached datasets, so the next load
    /// fetches fresh documents. Fetch settings take effect on restart.
    pub fn reload(&self) -> AppResult<Arc<Config>> {
        let config = match &self.source {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        self.config.update(config);
        self.fetcher.clear_cache();
        tracing::info!("Configuration reloaded");
        Ok(self.config.get())
    }

    /// Store of the theme preference.
    pub fn theme_store(&self) -> ThemeStore {
        ThemeStore::from_config(&self.config.get().theme)
    }

    /// Saved theme, or the configured system default.
    pub fn initial_theme(&self) -> Theme {
        self.theme_store()
            .initial_theme(self.config.get().theme.system_default)
    }

    /// Fresh state in the initial theme.
    pub fn initial_state(&self) -> AppState {
        AppState::new(&self.config.get(), self.initial_theme())
    }

    /// A configured dataset, or the default one.
    pub fn dataset(&self, key: Option<&str>) -> AppResult<DatasetConfig> {
        let config = self.config.get();
        let key = key.unwrap_or(&config.default_dataset);
        config
            .dataset(key)
            .cloned()
            .ok_or_else(|| TreemapError::UnknownDataset(key.to_string()).into())
    }

    /// Fetches a dataset and builds its chart.
    pub async fn load_chart(&self, dataset: &DatasetConfig) -> Result<Chart> {
        let body = self.fetcher.fetch(dataset).await?;
        Chart::from_config(dataset.clone(), &body, &self.config.get().layout)
    }

    /// Runs the load of a ticket and wraps the outcome as a message.
    pub async fn load(&self, ticket: LoadTicket) -> Message {
        let result = self.load_chart(&ticket.dataset).await;
        Message::DatasetLoaded { ticket, result }
    }

    /// Saves the theme, logging instead of failing.
    pub fn persist_theme(&self, theme: Theme) {
        if let Err(e) = self.theme_store().save(theme) {
            tracing::error!(%theme, error = %e, "Failed to save theme preference");
        }
    }

    /// State after loading one dataset and, optionally, hovering a chart point.
    pub async fn render(&self, key: Option<&str>, pointer: Option<Point>) -> AppResult<AppState> {
        let dataset = self.dataset(key)?;
        let mut state = self.initial_state();

        for effect in state.update(Message::SelectDataset(dataset.key)) {
            if let Effect::Fetch(ticket) = effect {
                let chart = self.load_chart(&ticket.dataset).await?;
                state.update(Message::DatasetLoaded {
                    ticket,
                    result: Ok(chart),
                });
            }
        }

        if let Some(pointer) = pointer {
            state.update(Message::PointerMove {
                pointer,
                origin: Point::default(),
            });
        }
        Ok(state)
    }

    /// Renders every configured dataset into `out_dir`, fetching concurrently.
    pub async fn render_all(&self, out_dir: &Path) -> Vec<RenderOutcome> {
        let config = self.config.get();
        let theme = self.initial_theme();

        let jobs = config.datasets.iter().map(|dataset| async move {
            let result = self.render_one(dataset, theme, out_dir).await;
            if let Err(e) = &result {
                tracing::error!(dataset = %dataset.key, error = %e, "Failed to render dataset");
            }
            RenderOutcome {
                dataset: dataset.key.clone(),
                result,
            }
        });

        join_all(jobs).await
    }

    async fn render_one(&self, dataset: &DatasetConfig, theme: Theme, out_dir: &Path) -> AppResult<PathBuf> {
        let chart = self.load_chart(dataset).await?;
        let config = self.config.get();
        let scene = Scene::compose(&chart, theme, None, &config.labels);

        let svg = out_dir.join(format!("{}.svg", dataset.key));
        let png = config
            .output
            .png_preview
            .then(|| out_dir.join(format!("{}.png", dataset.key)));
        write_scene(&scene, &svg, png.as_deref())?;
        Ok(svg)
    }

    /// Flips the saved theme and returns the new one.
    pub fn toggle_theme(&self) -> Theme {
        let mut state = self.initial_state();
        for effect in state.update(Message::ToggleTheme) {
            if let Effect::PersistTheme(theme) = effect {
                self.persist_theme(theme);
            }
        }
        state.theme()
    }

    /// Default SVG and PNG paths of a dataset under the output directory.
    pub fn output_paths(&self, key: &str) -> (PathBuf, Option<PathBuf>) {
        let config = self.config.get();
        let dir = &config.output.directory;
        let png = config
            .output
            .png_preview
            .then(|| dir.join(format!("{key}.png")));
        (dir.join(format!("{key}.svg")), png)
    }
}

/// The dataset fetcher described by the fetch configuration: file or HTTP by
/// URL scheme, behind a TTL cache unless caching is disabled.
pub fn build_fetcher(config: &FetchConfig) -> AppResult<Arc<dyn DatasetFetcher>> {
    let source = SourceFetcher::new(config)?;
    if config.cache_ttl_seconds == 0 || config.cache_capacity == 0 {
        return Ok(Arc::new(source));
    }
    Ok(Arc::new(CachedFetcher::from_config(source, config)))
}

/// Writes the SVG page and, if asked, the PNG preview of a scene.
pub fn write_scene(scene: &Scene, svg_path: &Path, png_path: Option<&Path>) -> AppResult<()> {
    write_output(svg_path, &SvgRenderer::new().render(scene)?)?;
    if let Some(png_path) = png_path {
        write_output(png_path, &PngPreviewRenderer::new().render(scene)?)?;
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
    Ok(())
}
