// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::runtime::RenderMode;

/// Why a [`Surface::wait`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    Timeout,
    Interrupt,
    Resize(u16, u16),
}

/// The screen the render loop draws to.
pub trait Surface {
    fn size(&self) -> Result<(u16, u16)>;

    /// Flushes `frame` so the screen shows exactly its cells.
    fn present(&mut self, frame: &mut Frame, mode: RenderMode) -> Result<()>;

    /// Blocks for at most `timeout`, returning early on interrupt or resize.
    fn wait(&mut self, timeout: Duration) -> Result<Wake>;

    /// Gives the terminal back to the shell. Only the first call has effect.
    fn restore(&mut self) -> Result<()>;
}

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }
}

#[derive(Clone, Copy, Default)]
struct Pen {
    fg: Option<Color>,
    bold: bool,
}

impl Pen {
    fn apply<W: Write>(&mut self, out: &mut W, fg: Option<Color>, bold: bool) -> Result<()> {
        if fg != self.fg {
            out.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.fg = fg;
        }
        if bold != self.bold {
            out.queue(SetAttribute(if bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = bold;
        }
        Ok(())
    }
}

/// Turns frames into escape sequences on any writer.
pub struct Renderer<W: Write> {
    out: W,
    last: Option<LastFrame>,
    run_buf: String,
    row_dirty: Vec<Vec<usize>>,
    touched_rows: Vec<u16>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            run_buf: String::with_capacity(64),
            row_dirty: Vec::new(),
            touched_rows: Vec::new(),
        }
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn draw(&mut self, frame: &mut Frame, mode: RenderMode) -> Result<()> {
        let size_changed = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);

        match mode {
            RenderMode::Full => self.draw_full(frame, true),
            RenderMode::Diff => {
                let total_cells = frame.width as usize * frame.height as usize;
                let dirty_is_large =
                    total_cells > 0 && frame.dirty_indices().len() >= (total_cells / 3);
                if size_changed || frame.is_dirty_all() || dirty_is_large {
                    self.draw_full(frame, size_changed)
                } else {
                    self.draw_dirty(frame)
                }
            }
        }
    }

    /// Rewrites every row as a blank-padded line, left to right.
    fn draw_full(&mut self, frame: &mut Frame, erase: bool) -> Result<()> {
        if erase {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let needs_new_last = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);
        if needs_new_last {
            self.last = Some(LastFrame::new(frame.width, frame.height));
        }
        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };

        let mut pen = Pen::default();
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;

        let width = frame.width as usize;
        for y in 0..frame.height {
            self.out.queue(cursor::MoveTo(0, y))?;
            self.run_buf.clear();
            for (x, cell) in frame.row(y).enumerate() {
                if cell.fg != pen.fg || cell.bold != pen.bold {
                    if !self.run_buf.is_empty() {
                        self.out.queue(Print(self.run_buf.as_str()))?;
                        self.run_buf.clear();
                    }
                    pen.apply(&mut self.out, cell.fg, cell.bold)?;
                }
                self.run_buf.push(cell.ch);
                last.cells[y as usize * width + x] = cell;
            }
            if !self.run_buf.is_empty() {
                self.out.queue(Print(self.run_buf.as_str()))?;
            }
        }

        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    /// Writes only dirty cells that differ from what is on screen, batching
    /// horizontal runs that share a style.
    fn draw_dirty(&mut self, frame: &mut Frame) -> Result<()> {
        let Some(last) = self.last.as_mut() else {
            return Ok(());
        };

        let mut pen = Pen::default();
        let mut cur_pos: Option<(u16, u16)> = None;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;

        let width_usize = frame.width as usize;
        if self.row_dirty.len() != frame.height as usize {
            self.row_dirty = vec![Vec::new(); frame.height as usize];
        }
        for r in &mut self.row_dirty {
            r.clear();
        }
        self.touched_rows.clear();

        for &idx in frame.dirty_indices() {
            let y = (idx / width_usize) as u16;
            if y >= frame.height {
                continue;
            }
            let b = &mut self.row_dirty[y as usize];
            if b.is_empty() {
                self.touched_rows.push(y);
            }
            b.push(idx);
        }
        self.touched_rows.sort_unstable();

        for &y0 in &self.touched_rows {
            let b = &mut self.row_dirty[y0 as usize];
            b.sort_unstable();
            let mut i = 0usize;
            while i < b.len() {
                let idx0 = b[i];
                let cell0 = frame.cell_at_index(idx0);
                if last.cells[idx0] == cell0 {
                    i += 1;
                    continue;
                }
                last.cells[idx0] = cell0;

                let x0 = (idx0 % width_usize) as u16;
                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut run_len: u16 = 1;
                let mut last_idx_in_run = idx0;
                let mut j = i + 1;

                while j < b.len() {
                    let idx1 = b[j];
                    if idx1 != last_idx_in_run + 1 {
                        break;
                    }
                    let cell1 = frame.cell_at_index(idx1);
                    if last.cells[idx1] == cell1 || cell1.fg != cell0.fg || cell1.bold != cell0.bold
                    {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    last.cells[idx1] = cell1;
                    run_len = run_len.saturating_add(1);
                    last_idx_in_run = idx1;
                    j += 1;
                }

                if cur_pos != Some((x0, y0)) {
                    self.out.queue(cursor::MoveTo(x0, y0))?;
                }
                pen.apply(&mut self.out, cell0.fg, cell0.bold)?;
                self.out.queue(Print(self.run_buf.as_str()))?;

                let next_x = x0.saturating_add(run_len);
                cur_pos = (next_x < frame.width).then_some((next_x, y0));
                i = j;
            }
        }

        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

/// The real terminal: raw mode, alternate screen and a hidden cursor for as
/// long as it is held.
pub struct Terminal {
    renderer: Renderer<Stdout>,
    restored: bool,
}

impl Terminal {
    pub fn query_size() -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        tracing::debug!("terminal acquired");
        Ok(Self {
            renderer: Renderer::new(out),
            restored: false,
        })
    }
}

impl Surface for Terminal {
    fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    fn present(&mut self, frame: &mut Frame, mode: RenderMode) -> Result<()> {
        self.renderer.draw(frame, mode)
    }

    fn wait(&mut self, timeout: Duration) -> Result<Wake> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if !event::poll(remaining)? {
                return Ok(Wake::Timeout);
            }
            match event::read()? {
                Event::Key(k)
                    if k.kind == KeyEventKind::Press
                        && k.code == KeyCode::Char('c')
                        && k.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    return Ok(Wake::Interrupt);
                }
                Event::Resize(w, h) => return Ok(Wake::Resize(w, h)),
                _ => {}
            }
        }
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let out = self.renderer.writer_mut();
        let cleared = (|| {
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(ResetColor)?;
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            out.queue(cursor::MoveTo(0, 0))?;
            out.flush()
        })();
        restore_terminal_best_effort();
        tracing::debug!("terminal restored");
        cleared
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR_ALL: &str = "\x1b[2J";

    fn glyph(ch: char) -> Cell {
        Cell {
            ch,
            fg: Some(Color::DarkBlue),
            bold: false,
        }
    }

    fn take(r: &mut Renderer<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(r.writer_mut())).unwrap()
    }

    #[test]
    fn first_diff_draw_erases_and_writes_every_row() {
        let mut r = Renderer::new(Vec::new());
        let mut f = Frame::new(4, 2);
        f.set(2, 1, glyph('|'));
        r.draw(&mut f, RenderMode::Diff).unwrap();

        let s = take(&mut r);
        assert!(s.contains(CLEAR_ALL));
        assert!(s.contains("\x1b[1;1H    "));
        assert!(s.contains("\x1b[2;1H  "));
        assert!(s.contains('|'));
        assert!(!f.is_dirty_all());
    }

    #[test]
    fn diff_draw_only_touches_changed_cells() {
        let mut r = Renderer::new(Vec::new());
        let mut f = Frame::new(8, 4);
        f.set(1, 0, glyph('|'));
        r.draw(&mut f, RenderMode::Diff).unwrap();
        take(&mut r);

        f.clear();
        f.set(1, 1, glyph('o'));
        r.draw(&mut f, RenderMode::Diff).unwrap();

        let s = take(&mut r);
        assert!(!s.contains(CLEAR_ALL));
        // Old glyph erased at (1, 0), new one drawn at (1, 1).
        assert!(s.contains("\x1b[1;2H "));
        assert!(s.contains("\x1b[2;2H"));
        assert!(s.contains('o'));
        assert!(!s.contains('|'));
    }

    #[test]
    fn diff_draw_of_unchanged_frame_writes_no_glyphs() {
        let mut r = Renderer::new(Vec::new());
        let mut f = Frame::new(8, 4);
        f.set(3, 2, glyph('|'));
        r.draw(&mut f, RenderMode::Diff).unwrap();
        take(&mut r);

        f.clear();
        f.set(3, 2, glyph('|'));
        r.draw(&mut f, RenderMode::Diff).unwrap();
        let s = take(&mut r);
        assert!(!s.contains('|'));
        assert!(!s.contains("H"));
    }

    #[test]
    fn full_draw_erases_every_frame() {
        let mut r = Renderer::new(Vec::new());
        let mut f = Frame::new(3, 3);
        for _ in 0..3 {
            f.clear();
            f.set(0, 0, glyph('|'));
            r.draw(&mut f, RenderMode::Full).unwrap();
            let s = take(&mut r);
            assert_eq!(s.matches(CLEAR_ALL).count(), 1);
            assert!(s.contains("\x1b[3;1H   "));
        }
    }

    #[test]
    fn resized_frame_forces_full_redraw() {
        let mut r = Renderer::new(Vec::new());
        let mut f = Frame::new(3, 3);
        r.draw(&mut f, RenderMode::Diff).unwrap();
        take(&mut r);

        let mut f = Frame::new(5, 2);
        f.clear_dirty();
        r.draw(&mut f, RenderMode::Diff).unwrap();
        assert!(take(&mut r).contains(CLEAR_ALL));
    }
}
