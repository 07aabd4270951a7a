// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::palette::DropColor;
use crate::shapes::SPLASH;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropState {
    Falling,
    Splashing,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Raindrop {
    pub col: u16,
    pub row: u16,
    pub glyph: char,
    pub color: Option<DropColor>,
    splashed: bool,
}

impl Raindrop {
    pub fn new(col: u16, glyph: char, color: Option<DropColor>) -> Self {
        Self {
            col,
            row: 0,
            glyph,
            color,
            splashed: false,
        }
    }

    #[allow(dead_code)]
    pub fn is_splashed(&self) -> bool {
        self.splashed
    }

    /// Lifecycle derived from the row alone. Splash happens one row above the
    /// floor (`height - 2`), expiry at the floor (`height - 1`) and below.
    pub fn state(&self, height: u16) -> DropState {
        let floor = height.saturating_sub(1);
        if self.row >= floor {
            DropState::Expired
        } else if self.row + 1 == floor {
            DropState::Splashing
        } else {
            DropState::Falling
        }
    }

    /// Moves one row down. Returns false once the drop has expired.
    pub fn fall(&mut self, height: u16) -> bool {
        self.row = self.row.saturating_add(1);
        match self.state(height) {
            DropState::Expired => false,
            DropState::Splashing => {
                self.splash();
                true
            }
            DropState::Falling => true,
        }
    }

    /// One-way switch to the splash glyph.
    pub fn splash(&mut self) {
        if !self.splashed {
            self.glyph = SPLASH;
            self.splashed = true;
        }
    }

    pub fn cell(&self, monochrome: bool) -> Cell {
        let (fg, bold) = match self.color {
            Some(c) if !monochrome => c.style(),
            _ => (None, false),
        };
        Cell {
            ch: self.glyph,
            fg,
            bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splashes_one_row_above_floor_then_expires() {
        let mut d = Raindrop::new(3, '|', None);
        assert_eq!(d.state(5), DropState::Falling);

        assert!(d.fall(5));
        assert!(d.fall(5));
        assert_eq!(d.row, 2);
        assert_eq!(d.glyph, '|');

        assert!(d.fall(5));
        assert_eq!(d.row, 3);
        assert_eq!(d.state(5), DropState::Splashing);
        assert_eq!(d.glyph, SPLASH);
        assert!(d.is_splashed());

        assert!(!d.fall(5));
        assert_eq!(d.state(5), DropState::Expired);
    }

    #[test]
    fn single_row_grid_expires_on_first_fall() {
        let mut d = Raindrop::new(0, '|', None);
        assert_eq!(d.state(1), DropState::Expired);
        assert!(!d.fall(1));
        assert_eq!(d.glyph, '|');
    }

    #[test]
    fn two_row_grid_spawns_straight_into_splash_row() {
        let d = Raindrop::new(0, '|', None);
        assert_eq!(d.state(2), DropState::Splashing);
    }

    #[test]
    fn monochrome_cells_carry_no_color() {
        let d = Raindrop::new(0, '|', Some(DropColor::BrightBlue));
        let c = d.cell(true);
        assert_eq!(c.fg, None);
        assert!(!c.bold);
        assert!(d.cell(false).fg.is_some());
    }
}
