// Copyright (c) 2026 rezky_nightky

use rand::Rng;

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;
pub const FORECAST_WINDOW: u32 = 100;

/// Frame counter plus the number of drops spawned per tick. Every
/// `FORECAST_WINDOW` ticks the intensity takes a clamped random step.
#[derive(Clone, Debug)]
pub struct Weather {
    tick_counter: u32,
    intensity: u8,
}

impl Weather {
    pub fn new(intensity: u8) -> Self {
        Self {
            tick_counter: 0,
            intensity: intensity.clamp(MIN_INTENSITY, MAX_INTENSITY),
        }
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    #[allow(dead_code)]
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u8 {
        self.tick_counter += 1;
        if self.tick_counter >= FORECAST_WINDOW {
            self.tick_counter = 0;
            let before = self.intensity;
            self.intensity = if rng.random_bool(0.5) {
                self.intensity.saturating_add(1)
            } else {
                self.intensity.saturating_sub(1)
            }
            .clamp(MIN_INTENSITY, MAX_INTENSITY);

            if self.intensity != before {
                tracing::debug!(from = before, to = self.intensity, "intensity changed");
            }
        }
        self.intensity
    }
}
