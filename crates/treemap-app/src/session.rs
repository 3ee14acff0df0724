//! Interactive session: line commands in, a re-rendered page after every change.
//!
//! The session loop owns the [`AppState`]. Fetches run as tasks in a
//! [`JoinSet`] and their messages are applied as they finish, so the loop is
//! the only writer of state and results may arrive in any order.

use crate::app::{write_scene, TreemapApp};
use crate::error::AppResult;
use crate::state::{AppState, Effect, Message};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use treemap_charts::SvgRenderer;
use treemap_common::{Point, TreemapError};

/// A parsed session command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `dataset <key>`: switch datasets.
    Dataset(String),
    /// `theme`: toggle the theme.
    Theme,
    /// `hover <x> <y>`: move the pointer to a chart point.
    Hover(Point),
    /// `out`: move the pointer off the chart.
    Out,
    /// `show`: print the current page.
    Show,
    /// `reload`: reread the configuration and reload the dataset.
    Reload,
    /// `quit`: end the session.
    Quit,
}

impl FromStr for Command {
    type Err = TreemapError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let invalid = || TreemapError::Config(format!("invalid command '{}'", line.trim()));
        let command = match words.next().ok_or_else(invalid)? {
            "dataset" => Self::Dataset(words.next().ok_or_else(invalid)?.to_string()),
            "theme" => Self::Theme,
            "hover" => {
                let mut coord = || -> Result<f64, TreemapError> {
                    words.next().and_then(|w| w.parse().ok()).ok_or_else(invalid)
                };
                let x = coord()?;
                let y = coord()?;
                Self::Hover(Point::new(x, y))
            }
            "out" => Self::Out,
            "show" => Self::Show,
            "reload" => Self::Reload,
            "quit" | "exit" => Self::Quit,
            _ => return Err(invalid()),
        };
        if words.next().is_some() {
            return Err(invalid());
        }
        Ok(command)
    }
}

/// Where the session writes after every change.
#[derive(Debug, Clone, Default)]
pub struct SessionOutput {
    /// SVG file rewritten after every state change.
    pub svg: Option<PathBuf>,
    /// PNG preview rewritten alongside the SVG.
    pub png: Option<PathBuf>,
}

/// A running interactive session.
pub struct Session<W> {
    app: Arc<TreemapApp>,
    state: AppState,
    output: SessionOutput,
    writer: W,
    loads: JoinSet<Message>,
}

impl<W: AsyncWrite + Unpin> Session<W> {
    /// Creates a session. Nothing is loaded until [`Session::run`].
    pub fn new(app: Arc<TreemapApp>, output: SessionOutput, writer: W) -> Self {
        let state = app.initial_state();
        Self {
            app,
            state,
            output,
            writer,
            loads: JoinSet::new(),
        }
    }

    /// Loads the default dataset, then handles commands until `quit` or end of
    /// input. At end of input, loads still in flight are waited for.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> AppResult<AppState> {
        let default = self.app.config().default_dataset.clone();
        self.dispatch(Message::SelectDataset(default));

        let mut lines = input.lines();
        let mut input_open = true;
        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(command) => self.handle(command).await?,
                        Err(e) => {
                            tracing::warn!(error = %e, "Ignoring command");
                            self.reply(&format!("error: {e}")).await?;
                        }
                    },
                    None => input_open = false,
                },
                Some(joined) = self.loads.join_next(), if !self.loads.is_empty() => match joined {
                    Ok(message) => self.dispatch(message),
                    Err(e) => tracing::error!(error = %e, "Dataset load task failed"),
                },
                else => break,
            }
        }

        tracing::debug!(generation = self.state.generation(), "Session ended");
        Ok(self.state)
    }

    async fn handle(&mut self, command: Command) -> AppResult<()> {
        match command {
            Command::Dataset(key) => self.dispatch(Message::SelectDataset(key)),
            Command::Theme => self.dispatch(Message::ToggleTheme),
            Command::Hover(pointer) => self.dispatch(Message::PointerMove {
                pointer,
                origin: Point::default(),
            }),
            Command::Out => self.dispatch(Message::PointerOut),
            Command::Show => {
                let svg = SvgRenderer::new().render_to_string(&self.state.view())?;
                self.writer.write_all(svg.as_bytes()).await?;
                self.writer.flush().await?;
            }
            Command::Reload => match self.app.reload() {
                Ok(config) => {
                    self.state.reconfigure(&config);
                    // a load still in flight is the latest selection
                    let key = self
                        .state
                        .loading()
                        .or_else(|| self.state.active_dataset())
                        .map_or_else(|| config.default_dataset.clone(), str::to_string);
                    self.dispatch(Message::SelectDataset(key));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to reload configuration");
                    self.reply(&format!("error: {e}")).await?;
                }
            },
            Command::Quit => {}
        }
        Ok(())
    }

    /// Applies a message, runs its effects and re-renders.
    fn dispatch(&mut self, message: Message) {
        for effect in self.state.update(message) {
            match effect {
                Effect::Fetch(ticket) => {
                    let app = Arc::clone(&self.app);
                    self.loads.spawn(async move { app.load(ticket).await });
                }
                Effect::PersistTheme(theme) => self.app.persist_theme(theme),
            }
        }
        self.render();
    }

    fn render(&self) {
        let Some(svg) = &self.output.svg else {
            return;
        };
        if let Err(e) = write_scene(&self.state.view(), svg, self.output.png.as_deref()) {
            tracing::error!(error = %e, "Failed to write session output");
        }
    }

    async fn reply(&mut self, line: &str) -> AppResult<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
