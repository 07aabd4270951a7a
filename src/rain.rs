// Copyright (c) 2026 rezky_nightky

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::RainConfig,
    error::{ConfigError, RainError},
    field::DropField,
    frame::Frame,
    runtime::RenderMode,
    terminal::{Surface, Wake},
    weather::Weather,
};

/// Longest single wait on the surface, so a stop flag raised by a signal
/// handler is seen within one slice.
const WAIT_SLICE: Duration = Duration::from_millis(20);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RainStats {
    pub ticks: u64,
    pub spawned: u64,
    pub expired: u64,
    pub intensity: u8,
}

pub struct Rain {
    field: DropField,
    weather: Weather,
    frame: Frame,
    rng: StdRng,
    mode: RenderMode,
    interval: Duration,
    duration: Option<Duration>,
    state: LoopState,
    stats: RainStats,
}

impl Rain {
    pub fn new(config: &RainConfig, width: u16, height: u16) -> Result<Self, ConfigError> {
        let field = DropField::new(
            width,
            height,
            config.shapes,
            config.colors.clone(),
            config.monochrome,
        )?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let weather = Weather::new(config.intensity);

        Ok(Self {
            field,
            frame: Frame::new(width, height),
            stats: RainStats {
                intensity: weather.intensity(),
                ..RainStats::default()
            },
            weather,
            rng,
            mode: config.mode,
            interval: config.interval,
            duration: config.duration,
            state: LoopState::Running,
        })
    }

    #[allow(dead_code)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[allow(dead_code)]
    pub fn field(&self) -> &DropField {
        &self.field
    }

    #[allow(dead_code)]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[allow(dead_code)]
    pub fn stats(&self) -> RainStats {
        self.stats
    }

    /// One simulation tick: advance, forecast, spawn, compose.
    pub fn step(&mut self) {
        let expired = self.field.advance();
        let intensity = self.weather.tick(&mut self.rng);
        self.field.spawn(intensity as usize, &mut self.rng);
        self.field.compose(&mut self.frame);

        self.stats.ticks += 1;
        self.stats.expired += expired as u64;
        self.stats.spawned += intensity as u64;
        self.stats.intensity = intensity;
    }

    /// Runs until `stop` is raised, the duration elapses or drawing fails.
    /// The surface is restored exactly once on every one of those paths.
    pub fn run<S: Surface>(
        &mut self,
        surface: &mut S,
        stop: &AtomicBool,
    ) -> Result<RainStats, RainError> {
        if self.state != LoopState::Running {
            return Ok(self.stats);
        }

        tracing::info!(
            width = self.field.width(),
            height = self.field.height(),
            intensity = self.weather.intensity(),
            mode = self.mode.label(),
            "rain started"
        );

        let result = self.run_ticks(surface, stop);

        self.state = LoopState::Stopping;
        let restored = surface.restore().map_err(RainError::Terminal);
        self.state = LoopState::Stopped;

        match &result {
            Ok(()) => tracing::info!(
                ticks = self.stats.ticks,
                spawned = self.stats.spawned,
                intensity = self.stats.intensity,
                "rain stopped"
            ),
            Err(e) => tracing::error!(error = %e, ticks = self.stats.ticks, "rain aborted"),
        }

        result?;
        restored?;
        Ok(self.stats)
    }

    fn run_ticks<S: Surface>(&mut self, surface: &mut S, stop: &AtomicBool) -> Result<(), RainError> {
        let (w, h) = surface.size().map_err(RainError::Terminal)?;
        if (w, h) != (self.field.width(), self.field.height()) {
            self.resize(w, h);
        }

        let started = Instant::now();
        loop {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            if self.duration.is_some_and(|d| started.elapsed() >= d) {
                tracing::info!("duration elapsed");
                break;
            }

            self.step();

            if stop.load(Ordering::SeqCst) {
                break;
            }
            surface
                .present(&mut self.frame, self.mode)
                .map_err(RainError::Render)?;

            if stop.load(Ordering::SeqCst) {
                break;
            }
            if self.sleep(surface, stop)? {
                break;
            }
        }
        Ok(())
    }

    /// Waits out the frame interval. Returns true when interrupted.
    fn sleep<S: Surface>(&mut self, surface: &mut S, stop: &AtomicBool) -> Result<bool, RainError> {
        let deadline = Instant::now() + self.interval;
        loop {
            if stop.load(Ordering::SeqCst) {
                return Ok(true);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match surface
                .wait(remaining.min(WAIT_SLICE))
                .map_err(RainError::Terminal)?
            {
                Wake::Interrupt => {
                    stop.store(true, Ordering::SeqCst);
                    return Ok(true);
                }
                Wake::Resize(w, h) => self.resize(w, h),
                Wake::Timeout => {}
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        match self.field.resize(width, height) {
            Ok(()) => {
                self.frame = Frame::new(width, height);
                tracing::debug!(width, height, drops = self.field.len(), "resized");
            }
            Err(e) => tracing::warn!(error = %e, "ignoring resize"),
        }
    }
}
