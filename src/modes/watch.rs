//! Watch mode: evolve in a terminal UI
//!
//! Runs the same generation loop as training, but one paced tick at a time so
//! each episode can be watched. Users can control playback speed, pause, and
//! quit; quitting is the stop signal for the running episode.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=max)
//! - Q/Esc/Ctrl+C: Quit
//!
//! # Example
//!
//! ```rust,ignore
//! use flappy_evo::config::AppConfig;
//! use flappy_evo::game::StopSignal;
//! use flappy_evo::modes::{TrainConfig, WatchMode};
//! use flappy_evo::neuro::{default_device, InferenceBackend};
//!
//! let config = TrainConfig::from_app(AppConfig::default());
//! let mut watch_mode =
//!     WatchMode::<InferenceBackend>::new(config, default_device(), StopSignal::new())?;
//! watch_mode.run().await?;
//! ```

use anyhow::{Context, Result, anyhow};
use burn::tensor::backend::Backend;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::{
    io::{Stderr, stderr},
    time::Duration,
};
use tokio::time::{Interval, interval};
use tracing::info;

use super::train::{TrainConfig, seeded_rng};
use crate::driver::{EpisodeEnd, EvolutionDriver, NetworkArena};
use crate::evolution::{GenerationReport, Population, RunEnd, RunSummary};
use crate::game::{ArenaSnapshot, StopSignal};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Overlay, Renderer};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// A third of the configured tick rate
    Slow,
    /// The configured tick rate
    Normal,
    /// Four times the configured tick rate
    Fast,
    /// As fast as the timer allows (1 ms per tick)
    Max,
}

impl PlaybackSpeed {
    /// Get the tick interval for this speed
    pub fn tick_interval(&self, ticks_per_second: u32) -> Duration {
        let hz = match self {
            Self::Slow => (ticks_per_second / 3).max(1),
            Self::Normal => ticks_per_second.max(1),
            Self::Fast => ticks_per_second.saturating_mul(4).max(1),
            Self::Max => return Duration::from_millis(1),
        };
        Duration::from_secs_f64(1.0 / hz as f64)
    }

    /// Next faster setting, saturating at `Max`
    pub fn faster(self) -> Self {
        match self {
            Self::Slow => Self::Normal,
            Self::Normal => Self::Fast,
            Self::Fast | Self::Max => Self::Max,
        }
    }

    /// Next slower setting, saturating at `Slow`
    pub fn slower(self) -> Self {
        match self {
            Self::Max => Self::Fast,
            Self::Fast => Self::Normal,
            Self::Normal | Self::Slow => Self::Slow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Max => "Max",
        }
    }
}

/// Evolution with a live view of every episode
pub struct WatchMode<B: Backend> {
    driver: EvolutionDriver<B>,
    population: Population,

    /// Episode of the current generation, `None` once evolution has stopped
    arena: Option<NetworkArena<B>>,

    /// Last frame of the final episode, kept on screen after evolution stops
    final_snapshot: Option<ArenaSnapshot>,

    stop: StopSignal,
    renderer: Renderer,
    input: InputHandler,
    metrics: GameMetrics,

    max_generations: usize,
    ticks_per_second: u32,
    evaluated: usize,
    last_report: Option<GenerationReport>,
    outcome: Option<RunEnd>,

    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
}

impl<B: Backend> WatchMode<B> {
    /// Create the initial population and start its first episode
    pub fn new(config: TrainConfig, device: B::Device, stop: StopSignal) -> Result<Self> {
        let mut rng = seeded_rng(config.seed);
        let population_rng = StdRng::seed_from_u64(rng.gen());

        let mut population = Population::new(config.evolution.clone(), population_rng)?;
        let mut driver = EvolutionDriver::new(
            config.game.clone(),
            config.evolution.network.clone(),
            device,
            rng,
        )
        .with_target_score(config.target_score);

        population.begin_generation();
        let arena = driver.start_episode(population.generation(), population.genomes_mut())?;

        Ok(Self {
            driver,
            population,
            arena: Some(arena),
            final_snapshot: None,
            stop,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            metrics: GameMetrics::new(),
            max_generations: config.evolution.max_generations,
            ticks_per_second: config.game.ticks_per_second,
            evaluated: 0,
            last_report: None,
            outcome: None,
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
        })
    }

    /// Run the watch loop
    ///
    /// Sets up the terminal, runs the main loop, and cleans up on exit.
    pub async fn run(&mut self) -> Result<RunSummary> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result?;
        Ok(self.summary())
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval(self.ticks_per_second));

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.advance()?;
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update(self.paused);
                    terminal.draw(|frame| {
                        self.render_frame(frame);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.quit()?;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance the running episode by one tick
    fn advance(&mut self) -> Result<()> {
        let Some(arena) = self.arena.as_mut() else {
            return Ok(());
        };

        let report = arena.tick(&self.stop);
        if !report.stopped {
            self.metrics.on_tick();
        }
        let end = if report.stopped {
            EpisodeEnd::Stopped
        } else if self.driver.target_reached(arena) {
            arena.halt();
            EpisodeEnd::TargetScore
        } else {
            EpisodeEnd::Extinct
        };

        if arena.is_finished() {
            self.end_generation(end)?;
        }

        Ok(())
    }

    /// Report the finished episode and start the next generation if any
    fn end_generation(&mut self, end: EpisodeEnd) -> Result<()> {
        let arena = self
            .arena
            .take()
            .ok_or_else(|| anyhow!("no episode is running"))?;
        let snapshot = arena.snapshot();

        let episode = self
            .driver
            .finish_episode(arena, self.population.genomes_mut(), end);
        self.metrics.on_episode_end(&episode);
        self.evaluated += 1;

        let outcome = episode.end.outcome();
        let verdict = self.population.conclude_generation(
            outcome,
            self.evaluated,
            self.max_generations,
        )?;
        if verdict.report.is_some() {
            self.last_report = verdict.report;
        }

        match verdict.end {
            Some(RunEnd::Aborted) => {
                info!(generation = episode.generation, "stop requested, ending evolution");
                self.outcome = Some(RunEnd::Aborted);
                self.final_snapshot = Some(snapshot);
                self.should_quit = true;
            }
            Some(end) => {
                self.outcome = Some(end);
                self.final_snapshot = Some(snapshot);
            }
            None => self.start_next_episode()?,
        }

        Ok(())
    }

    fn start_next_episode(&mut self) -> Result<()> {
        self.population.begin_generation();
        let arena = self
            .driver
            .start_episode(self.population.generation(), self.population.genomes_mut())?;
        self.arena = Some(arena);
        Ok(())
    }

    /// Request a stop and let the running episode observe it
    fn quit(&mut self) -> Result<()> {
        self.stop.request();
        if self.arena.is_some() {
            self.advance()?;
        }
        self.should_quit = true;
        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input.handle_key_event(key) {
                KeyAction::Quit => self.quit()?,
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::Step if self.paused => self.advance()?,
                KeyAction::Step => {}
                KeyAction::Speed(speed) => self.change_speed(speed, tick_timer),
                KeyAction::SpeedUp => self.change_speed(self.speed.faster(), tick_timer),
                KeyAction::SlowDown => self.change_speed(self.speed.slower(), tick_timer),
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn change_speed(&mut self, new_speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        *tick_timer = interval(self.speed.tick_interval(self.ticks_per_second));
    }

    fn render_frame(&self, frame: &mut ratatui::Frame) {
        let snapshot = match (&self.arena, &self.final_snapshot) {
            (Some(arena), _) => arena.snapshot(),
            (None, Some(snapshot)) => snapshot.clone(),
            (None, None) => return,
        };

        let overlay = Overlay {
            speed: self.speed.as_str(),
            paused: self.paused || self.outcome.is_some(),
            last_best_fitness: self.last_report.as_ref().map(|r| r.best_fitness),
        };

        self.renderer.render(frame, &snapshot, &self.metrics, overlay);
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            end: self.outcome.unwrap_or(RunEnd::Aborted),
            generations: self.evaluated,
            winner: self.population.best().cloned(),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
