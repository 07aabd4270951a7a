// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Character grid the rain is composited onto before it is flushed.
///
/// Clearing is O(painted cells): each generation remembers which cells it
/// wrote, and cells stamped with an older generation read back as blank.
/// Generation 0 is never current.
/// Cells painted in the previous generation are reported dirty on clear so a
/// differential flush erases them.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    gen: u32,
    cell_gen: Vec<u32>,
    painted: Vec<usize>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        let gen = 1u32;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
            gen,
            cell_gen: vec![0; len],
            painted: Vec::new(),
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        let painted = std::mem::take(&mut self.painted);
        for &i in &painted {
            self.mark_dirty(i);
        }
        self.painted = painted;
        self.painted.clear();

        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| {
            if self.cell_gen[i] == self.gen {
                &self.cells[i]
            } else {
                &Cell::BLANK
            }
        })
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            Cell::BLANK
        }
    }

    /// Cells of row `y`, left to right.
    pub fn row(&self, y: u16) -> impl Iterator<Item = Cell> + '_ {
        let w = self.width as usize;
        let start = y.min(self.height) as usize * w;
        let end = if y < self.height { start + w } else { start };
        (start..end).map(move |i| self.cell_at_index(i))
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let fresh = self.cell_gen[i] != self.gen;
        let cur = if fresh { Cell::BLANK } else { self.cells[i] };
        if fresh {
            self.painted.push(i);
            self.cell_gen[i] = self.gen;
        }
        if cur == cell {
            self.cells[i] = cell;
            return;
        }

        self.cells[i] = cell;
        self.mark_dirty(i);
    }

    fn mark_dirty(&mut self, i: usize) {
        if !self.dirty_all && self.dirty_map.get(i).copied() == Some(false) {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char) -> Cell {
        Cell {
            ch,
            fg: None,
            bold: false,
        }
    }

    #[test]
    fn clear_makes_cells_effectively_blank() {
        let mut f = Frame::new(2, 2);
        f.set(0, 0, glyph('x'));
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn clear_reports_previously_painted_cells_dirty() {
        let mut f = Frame::new(3, 3);
        f.clear_dirty();
        f.set(1, 2, glyph('|'));
        f.clear_dirty();

        f.clear();
        assert_eq!(f.dirty_indices(), &[7]);
        assert!(f.get(1, 2).unwrap().is_blank());
    }

    #[test]
    fn repainting_same_cell_after_clear_stays_single_dirty_entry() {
        let mut f = Frame::new(3, 3);
        f.clear_dirty();
        f.set(0, 0, glyph('|'));
        f.clear_dirty();

        f.clear();
        f.set(0, 0, glyph('o'));
        assert_eq!(f.dirty_indices(), &[0]);
        assert_eq!(f.get(0, 0).unwrap().ch, 'o');
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut f = Frame::new(2, 2);
        f.set(2, 0, glyph('x'));
        f.set(0, 2, glyph('x'));
        assert!(f.get(2, 0).is_none());
        assert!((0..2).all(|y| f.row(y).all(|c| c.is_blank())));
    }

    #[test]
    fn row_yields_width_cells() {
        let mut f = Frame::new(4, 2);
        f.set(3, 1, glyph('o'));
        let chars: String = f.row(1).map(|c| c.ch).collect();
        assert_eq!(chars, "   o");
        assert_eq!(f.row(5).count(), 0);
    }
}
