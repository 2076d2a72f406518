//! Terminal renderer
//!
//! Rasterizes a `RenderSnapshot` into a grid of character cells, then
//! pushes the grid to the terminal in one synchronized update. The
//! rasterizing half is pure so it can be tested without a terminal.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};
use glam::Vec2;

use crate::sim::{Aabb, GamePhase, RenderSnapshot, Tint};

/// Maps world space onto a `cols × rows` cell grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub world: Vec2,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world: Vec2) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            world,
        }
    }

    /// World units per cell on each axis
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.world.x / self.cols as f32,
            self.world.y / self.rows as f32,
        )
    }

    /// Centre of cell `(col, row)` in world coordinates
    pub fn cell_to_world(&self, col: u16, row: u16) -> Vec2 {
        let cell = self.cell_size();
        Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y)
    }

    /// Cell range covered by `rect`, clipped to the grid. `None` if off screen.
    fn cells_of(&self, rect: &Aabb) -> Option<(u16, u16, u16, u16)> {
        let cell = self.cell_size();
        let x0 = (rect.left() / cell.x).floor().max(0.0);
        let y0 = (rect.top() / cell.y).floor().max(0.0);
        let x1 = (rect.right() / cell.x).ceil().min(self.cols as f32);
        let y1 = (rect.bottom() / cell.y).ceil().min(self.rows as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

struct Palette {
    sky: Color,
    ground: Color,
    player: Color,
    obstacle: Color,
    cloud: Color,
    text: Color,
}

fn palette(tint: Tint) -> Palette {
    match tint {
        Tint::Day => Palette {
            sky: Color::Rgb { r: 235, g: 235, b: 235 },
            ground: Color::Rgb { r: 90, g: 90, b: 90 },
            player: Color::Rgb { r: 40, g: 40, b: 40 },
            obstacle: Color::Rgb { r: 30, g: 120, b: 40 },
            cloud: Color::Rgb { r: 170, g: 170, b: 170 },
            text: Color::Black,
        },
        Tint::Night => Palette {
            sky: Color::Rgb { r: 20, g: 20, b: 30 },
            ground: Color::Rgb { r: 160, g: 160, b: 160 },
            player: Color::Rgb { r: 220, g: 220, b: 220 },
            obstacle: Color::Rgb { r: 90, g: 200, b: 110 },
            cloud: Color::Rgb { r: 80, g: 80, b: 100 },
            text: Color::White,
        },
    }
}

/// One frame's worth of cells
#[derive(Debug, Clone)]
pub struct Frame {
    pub cols: u16,
    pub rows: u16,
    pub background: Color,
    cells: Vec<Cell>,
}

impl Frame {
    fn new(cols: u16, rows: u16, background: Color, fill: Color) -> Self {
        Self {
            cols,
            rows,
            background,
            cells: vec![Cell { ch: ' ', fg: fill }; cols as usize * rows as usize],
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize])
    }

    fn set(&mut self, col: u16, row: u16, ch: char, fg: Color) {
        if col < self.cols && row < self.rows {
            self.cells[row as usize * self.cols as usize + col as usize] = Cell { ch, fg };
        }
    }

    fn fill(&mut self, view: &Viewport, rect: &Aabb, ch: char, fg: Color) {
        if let Some((x0, y0, x1, y1)) = view.cells_of(rect) {
            for row in y0..y1 {
                for col in x0..x1 {
                    self.set(col, row, ch, fg);
                }
            }
        }
    }

    /// Write `text` centred on `row`
    fn text_centered(&mut self, row: u16, text: &str, fg: Color) {
        let len = text.chars().count() as u16;
        let start = self.cols.saturating_sub(len) / 2;
        for (i, ch) in text.chars().enumerate() {
            self.set(start + i as u16, row, ch, fg);
        }
    }

    fn text_at(&mut self, col: u16, row: u16, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set(col + i as u16, row, ch, fg);
        }
    }

    /// Row as a plain string (for tests and logs)
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.get(col, row).map(|c| c.ch))
            .collect()
    }
}

/// Rasterize a snapshot onto `view`
pub fn draw(snap: &RenderSnapshot, view: &Viewport) -> Frame {
    let colors = palette(snap.tint);
    let mut frame = Frame::new(view.cols, view.rows, colors.sky, colors.text);

    for cloud in &snap.decorations {
        frame.fill(view, cloud, '~', colors.cloud);
    }
    for segment in &snap.ground {
        frame.fill(view, segment, '▒', colors.ground);
    }
    for cactus in &snap.obstacles {
        frame.fill(view, cactus, '#', colors.obstacle);
    }

    // Legs alternate with the run cycle; a jump shows a solid body
    let body = if snap.player_airborne || snap.player_frame % 2 == 0 {
        '█'
    } else {
        '▓'
    };
    frame.fill(view, &snap.player, body, colors.player);

    frame.text_at(0, 0, &snap.hud(), colors.text);

    if !snap.banner.is_empty() {
        let first = view.rows / 3;
        for (i, line) in snap.banner.iter().enumerate() {
            frame.text_centered(first + i as u16, line, colors.text);
        }
    }

    if let Some(button) = &snap.restart_button {
        frame.fill(view, button, ' ', colors.text);
        let row = (button.center().y / view.cell_size().y) as u16;
        frame.text_centered(row, "[ Restart ]", colors.text);
    }

    if snap.phase == GamePhase::Paused {
        frame.text_at(0, view.rows.saturating_sub(1), "paused", colors.text);
    }

    frame
}

/// Terminal output with diffing against the last presented frame
pub struct Renderer<W: Write> {
    out: W,
    prev: Option<Frame>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, prev: None }
    }

    /// Forget the last frame, forcing a full redraw (after a resize)
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn present(&mut self, frame: Frame) -> io::Result<()> {
        let full = match &self.prev {
            Some(prev) => {
                prev.cols != frame.cols
                    || prev.rows != frame.rows
                    || prev.background != frame.background
            }
            None => true,
        };

        queue!(self.out, BeginSynchronizedUpdate, SetBackgroundColor(frame.background))?;

        let mut last_fg = None;
        for row in 0..frame.rows {
            for col in 0..frame.cols {
                let Some(cell) = frame.get(col, row) else {
                    continue;
                };
                if !full && self.prev.as_ref().and_then(|p| p.get(col, row)) == Some(cell) {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(col, row))?;
                if last_fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev = Some(frame);
        Ok(())
    }
}
