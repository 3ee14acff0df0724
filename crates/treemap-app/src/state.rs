//! Explicit application state and its message-driven update function.
//!
//! Every dataset selection takes a fresh load generation. A load result only
//! applies if its ticket still carries the current generation, so a slow
//! response for an earlier selection can never replace a newer one.

use treemap_charts::{Chart, NodeId, Scene, TooltipPositioner, TooltipView};
use treemap_common::{Point, Result, Theme, TooltipPosition};
use treemap_config::{Config, DatasetConfig, LabelConfig};

/// Identifies one dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    /// Generation the load was started in.
    pub generation: u64,
    /// Dataset being loaded.
    pub dataset: DatasetConfig,
}

/// Something that happened.
#[derive(Debug)]
pub enum Message {
    /// The theme toggle was pressed.
    ToggleTheme,
    /// A dataset was picked by key.
    SelectDataset(String),
    /// A load started by [`Effect::Fetch`] finished.
    DatasetLoaded {
        /// Ticket of the load.
        ticket: LoadTicket,
        /// Built chart, or why it could not be built.
        result: Result<Chart>,
    },
    /// The pointer moved over the page.
    PointerMove {
        /// Pointer position in client coordinates.
        pointer: Point,
        /// Chart container origin in client coordinates.
        origin: Point,
    },
    /// The pointer left the chart.
    PointerOut,
}

/// Work the caller has to run after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and build the ticket's dataset, then send [`Message::DatasetLoaded`].
    Fetch(LoadTicket),
    /// Save the theme preference.
    PersistTheme(Theme),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hover {
    node: NodeId,
    position: TooltipPosition,
}

/// The whole state of the page.
#[derive(Debug)]
pub struct AppState {
    theme: Theme,
    chart: Option<Chart>,
    hover: Option<Hover>,
    generation: u64,
    loading: Option<String>,
    datasets: Vec<DatasetConfig>,
    positioner: TooltipPositioner,
    labels: LabelConfig,
    canvas: (f64, f64),
}

impl AppState {
    /// Empty state: no chart yet, the given theme.
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        let mut state = Self {
            theme,
            chart: None,
            hover: None,
            generation: 0,
            loading: None,
            datasets: Vec::new(),
            positioner: TooltipPositioner::default(),
            labels: LabelConfig::default(),
            canvas: (0.0, 0.0),
        };
        state.reconfigure(config);
        state
    }

    /// Picks up a new configuration. The current chart stays until the next load.
    pub fn reconfigure(&mut self, config: &Config) {
        self.datasets.clone_from(&config.datasets);
        self.positioner = TooltipPositioner::new(config.tooltip.offset);
        self.labels = config.labels.clone();
        self.canvas = (f64::from(config.layout.width), f64::from(config.layout.height));
    }

    /// Applies a message and returns the effects to run.
    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::ToggleTheme => {
                self.theme = self.theme.toggled();
                tracing::info!(theme = %self.theme, "Theme toggled");
                vec![Effect::PersistTheme(self.theme)]
            }
            Message::SelectDataset(key) => {
                let Some(dataset) = self.datasets.iter().find(|d| d.key == key).cloned() else {
                    tracing::warn!(dataset = %key, "Ignoring unknown dataset");
                    return Vec::new();
                };
                self.generation += 1;
                self.loading = Some(key);
                tracing::debug!(dataset = %dataset.key, generation = self.generation, "Dataset selected");
                vec![Effect::Fetch(LoadTicket {
                    generation: self.generation,
                    dataset,
                })]
            }
            Message::DatasetLoaded { ticket, result } => {
                if ticket.generation != self.generation {
                    tracing::info!(
                        dataset = %ticket.dataset.key,
                        generation = ticket.generation,
                        current = self.generation,
                        "Discarding stale dataset load"
                    );
                    return Vec::new();
                }
                self.loading = None;
                match result {
                    Ok(chart) => {
                        tracing::info!(dataset = %ticket.dataset.key, "Dataset loaded");
                        self.chart = Some(chart);
                        self.hover = None;
                    }
                    Err(e) => {
                        tracing::error!(dataset = %ticket.dataset.key, error = %e, "Dataset load failed, keeping previous chart");
                    }
                }
                Vec::new()
            }
            Message::PointerMove { pointer, origin } => {
                let local = Point::new(pointer.x - origin.x, pointer.y - origin.y);
                self.hover = self
                    .chart
                    .as_ref()
                    .and_then(|chart| chart.leaf_at(local))
                    .map(|node| Hover {
                        node,
                        position: self.positioner.position(pointer, origin),
                    });
                Vec::new()
            }
            Message::PointerOut => {
                self.hover = None;
                Vec::new()
            }
        }
    }

    /// Scene of the current state.
    #[must_use]
    pub fn view(&self) -> Scene {
        match &self.chart {
            Some(chart) => Scene::compose(chart, self.theme, self.tooltip(), &self.labels),
            None => Scene::blank(self.canvas.0, self.canvas.1, self.theme, &self.labels),
        }
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Chart on display.
    #[must_use]
    pub const fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    /// Key of the dataset on display.
    #[must_use]
    pub fn active_dataset(&self) -> Option<&str> {
        self.chart.as_ref().map(|c| c.dataset.key.as_str())
    }

    /// Key of the dataset being loaded, if any.
    #[must_use]
    pub fn loading(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    /// Current load generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Visible tooltip.
    #[must_use]
    pub fn tooltip(&self) -> Option<TooltipView> {
        let chart = self.chart.as_ref()?;
        self.hover
            .map(|hover| TooltipView::for_node(chart, hover.node, hover.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemap_charts::LayoutOptions;
    use treemap_common::test_utils::{assert_approx_eq, dataset_fixtures};
    use treemap_common::TreemapError;

    fn config() -> Config {
        Config::default()
    }

    fn chart(ticket: &LoadTicket) -> Chart {
        let json = if ticket.dataset.key == "movies" {
            dataset_fixtures::movies_json()
        } else {
            dataset_fixtures::games_json()
        };
        Chart::from_slice(ticket.dataset.clone(), json.as_bytes(), LayoutOptions::default(), Vec::new())
            .unwrap()
    }

    fn select(state: &mut AppState, key: &str) -> LoadTicket {
        match state.update(Message::SelectDataset(key.to_string())).pop() {
            Some(Effect::Fetch(ticket)) => ticket,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    fn loaded(state: &mut AppState, ticket: LoadTicket) {
        let result = Ok(chart(&ticket));
        state.update(Message::DatasetLoaded { ticket, result });
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut state = AppState::new(&config(), Theme::Light);
        assert_eq!(
            state.update(Message::ToggleTheme),
            vec![Effect::PersistTheme(Theme::Dark)]
        );
        assert_eq!(state.theme(), Theme::Dark);
        assert_eq!(state.view().theme, Theme::Dark);
    }

    #[test]
    fn test_select_issues_ticket_with_fresh_generation() {
        let mut state = AppState::new(&config(), Theme::Light);
        let first = select(&mut state, "games");
        let second = select(&mut state, "movies");
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(state.loading(), Some("movies"));
    }

    #[test]
    fn test_unknown_dataset_is_ignored() {
        let mut state = AppState::new(&config(), Theme::Light);
        assert!(state.update(Message::SelectDataset("nope".into())).is_empty());
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut state = AppState::new(&config(), Theme::Light);
        let games = select(&mut state, "games");
        let movies = select(&mut state, "movies");

        loaded(&mut state, movies);
        loaded(&mut state, games);
        assert_eq!(state.active_dataset(), Some("movies"));
    }

    #[test]
    fn test_failed_load_keeps_previous_chart() {
        let mut state = AppState::new(&config(), Theme::Light);
        let games = select(&mut state, "games");
        loaded(&mut state, games);

        let movies = select(&mut state, "movies");
        state.update(Message::DatasetLoaded {
            result: Err(TreemapError::dataset_load("movies", "HTTP 500")),
            ticket: movies,
        });
        assert_eq!(state.active_dataset(), Some("games"));
        assert_eq!(state.loading(), None);
        assert_eq!(state.view().tiles.len(), 5);
    }

    #[test]
    fn test_pointer_move_shows_and_hides_tooltip() {
        let mut state = AppState::new(&config(), Theme::Light);
        let games = select(&mut state, "games");
        loaded(&mut state, games);

        let chart = state.chart().unwrap();
        let first = chart.treemap.leaves()[0];
        let centre = chart.treemap.rect(first).center();
        let origin = Point::new(10.0, 10.0);
        let pointer = Point::new(centre.x + origin.x, centre.y + origin.y);

        state.update(Message::PointerMove { pointer, origin });
        let tooltip = state.tooltip().unwrap();
        assert_eq!(tooltip.content.name, "Wii Sports");
        assert_approx_eq(tooltip.position.left, centre.x + 8.0, 1e-9);
        assert_approx_eq(tooltip.position.top, centre.y + 8.0, 1e-9);

        state.update(Message::PointerOut);
        assert!(state.tooltip().is_none());
    }

    #[test]
    fn test_pointer_outside_tiles_hides_tooltip() {
        let mut state = AppState::new(&config(), Theme::Light);
        let games = select(&mut state, "games");
        loaded(&mut state, games);

        state.update(Message::PointerMove {
            pointer: Point::new(-50.0, -50.0),
            origin: Point::new(0.0, 0.0),
        });
        assert!(state.tooltip().is_none());
    }

    #[test]
    fn test_view_before_first_load_is_blank() {
        let state = AppState::new(&config(), Theme::Dark);
        let scene = state.view();
        assert!(scene.tiles.is_empty());
        assert!((scene.width - 1100.0).abs() < f64::EPSILON);
    }
}
