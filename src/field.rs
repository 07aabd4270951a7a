// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    seq::IndexedRandom,
    Rng,
};

use crate::{
    error::ConfigError,
    frame::Frame,
    palette::DropColor,
    raindrop::{DropState, Raindrop},
};

/// Every drop currently on screen.
pub struct DropField {
    width: u16,
    height: u16,
    shapes: &'static [char],
    colors: Vec<DropColor>,
    monochrome: bool,
    drops: Vec<Raindrop>,
    rand_col: Uniform<u16>,
    order: Vec<usize>,
}

impl DropField {
    pub fn new(
        width: u16,
        height: u16,
        shapes: &'static [char],
        colors: Vec<DropColor>,
        monochrome: bool,
    ) -> Result<Self, ConfigError> {
        if shapes.is_empty() {
            return Err(ConfigError::EmptyShapes);
        }
        if colors.is_empty() && !monochrome {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self {
            width,
            height,
            shapes,
            colors,
            monochrome,
            drops: Vec::new(),
            rand_col: column_range(width, height)?,
            order: Vec::new(),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    #[allow(dead_code)]
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn spawn<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) {
        self.drops.reserve(n);
        for _ in 0..n {
            let col = self.rand_col.sample(rng);
            let glyph = self.shapes.choose(rng).copied().unwrap_or('|');
            let color = if self.monochrome {
                None
            } else {
                self.colors.choose(rng).copied()
            };

            let mut d = Raindrop::new(col, glyph, color);
            if d.state(self.height) == DropState::Splashing {
                d.splash();
            }
            self.drops.push(d);
        }
    }

    /// Moves every drop down one row and drops the ones that reached the
    /// floor. Returns how many expired.
    pub fn advance(&mut self) -> usize {
        let height = self.height;
        let before = self.drops.len();
        self.drops.retain_mut(|d| d.fall(height));
        before - self.drops.len()
    }

    /// Paints the field onto a freshly cleared frame. Drops are drawn in
    /// (row, column) order; at a shared cell the most recently spawned wins.
    pub fn compose(&mut self, frame: &mut Frame) {
        frame.clear();

        self.order.clear();
        self.order.extend(0..self.drops.len());
        let drops = &self.drops;
        self.order.sort_by_key(|&i| (drops[i].row, drops[i].col));

        for &i in &self.order {
            let d = &self.drops[i];
            frame.set(d.col, d.row, d.cell(self.monochrome));
        }
    }

    /// Adopts a new grid size. Drops that no longer fit, or that now sit at or
    /// past the floor, are discarded.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), ConfigError> {
        self.rand_col = column_range(width, height)?;
        self.width = width;
        self.height = height;
        self.drops
            .retain(|d| d.col < width && d.state(height) != DropState::Expired);
        for d in &mut self.drops {
            if d.state(height) == DropState::Splashing {
                d.splash();
            }
        }
        Ok(())
    }
}

/// A grid needs a floor row below at least one visible row.
fn column_range(width: u16, height: u16) -> Result<Uniform<u16>, ConfigError> {
    if width == 0 || height < 2 {
        return Err(ConfigError::InvalidSize { width, height });
    }
    Uniform::new(0, width).map_err(|_| ConfigError::InvalidSize { width, height })
}
