use crate::error::GameError;
use crate::snake::Direction;
use crate::{Cell, GridInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

type ScreenPos = (u16, u16);

/// Terminal columns used by one grid cell; characters are about twice as tall as wide.
const CELL_COLS: u16 = 2;

const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };
// Never printed, so the first present() redraws everything
const UNDRAWN: Glyph = Glyph { ch: '\0', color: Color::Reset };

/// What occupies a grid cell when drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Paint {
    Food,
    Head(Direction),
    Body,
    Crash,
}

impl Paint {
    fn glyphs(self) -> [Glyph; 2] {
        let (ch, color) = match self {
            Paint::Food => ('O', Color::White),
            Paint::Head(dir) => (dir.head_char(), Color::Red),
            Paint::Body => ('█', Color::DarkRed),
            Paint::Crash => ('X', Color::Red),
        };
        [Glyph { ch, color }, Glyph { ch, color }]
    }
}

/// Drawing surface for one frame: clear, draw, present.
pub trait Canvas {
    fn clear(&mut self);
    fn fill_cell(&mut self, cell: Cell, paint: Paint);
    fn draw_status(&mut self, text: &str);
    fn present(&mut self) -> Result<(), GameError>;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

/// Character grid holding the bordered board plus one status row below it.
#[derive(Clone)]
pub struct ScreenBuffer {
    grid_width: GridInt,
    grid_height: GridInt,
    cols: u16,
    rows: u16,
    screen: Vec<Glyph>,
}

impl ScreenBuffer {
    fn new(grid_width: GridInt, grid_height: GridInt, fill: Glyph) -> Self {
        let (cols, rows) = board_size(grid_width, grid_height);
        let screen = vec![fill; cols as usize * rows as usize];
        ScreenBuffer { grid_width, grid_height, cols, rows, screen }
    }

    #[cfg(test)]
    pub fn get(&self, pos: ScreenPos) -> Option<Glyph> {
        self.index(pos).map(|i| self.screen[i])
    }

    fn put(&mut self, pos: ScreenPos, glyph: Glyph) {
        if let Some(i) = self.index(pos) {
            self.screen[i] = glyph;
        }
    }

    fn clear_board(&mut self) {
        self.screen.iter_mut().for_each(|g| *g = BLANK);

        let border = |ch| Glyph { ch, color: Color::DarkGrey };
        let end_x = self.cols - 1;
        let end_y = self.rows - 2;

        for x in 0..self.cols {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.put((x, 0), border(ch));
            self.put((x, end_y), border(ch));
        }

        for y in 1..end_y {
            self.put((0, y), border('|'));
            self.put((end_x, y), border('|'));
        }
    }

    fn paint_cell(&mut self, cell: Cell, paint: Paint) {
        let (x, y) = cell;
        if x < 0 || y < 0 || x >= self.grid_width || y >= self.grid_height {
            return;
        }

        let origin = (1 + x as u16 * CELL_COLS, 1 + y as u16);
        for (i, glyph) in paint.glyphs().iter().enumerate() {
            self.put((origin.0 + i as u16, origin.1), *glyph);
        }
    }

    fn write_status(&mut self, text: &str) {
        let y = self.rows - 1;
        for (x, ch) in text.chars().take(self.cols as usize).enumerate() {
            self.put((x as u16, y), Glyph { ch, color: Color::White });
        }
    }

    /// Positions whose glyph differs from `previous`.
    fn changes<'a>(&'a self, previous: &'a ScreenBuffer) -> impl Iterator<Item = (ScreenPos, Glyph)> + 'a {
        let cols = self.cols;
        self.screen.iter()
            .zip(previous.screen.iter())
            .enumerate()
            .filter(|(_, (now, before))| now != before)
            .map(move |(i, (now, _))| (((i % cols as usize) as u16, (i / cols as usize) as u16), *now))
    }

    fn index(&self, pos: ScreenPos) -> Option<usize> {
        if pos.0 < self.cols && pos.1 < self.rows {
            Some(self.cols as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }
}

/// Terminal columns and rows needed for a grid: border on every side, status row below.
pub fn board_size(grid_width: GridInt, grid_height: GridInt) -> ScreenPos {
    let cols = grid_width.max(0) as u32 * CELL_COLS as u32 + 2;
    let rows = grid_height.max(0) as u32 + 3;
    (clamp_u16(cols), clamp_u16(rows))
}

fn clamp_u16(v: u32) -> u16 {
    v.min(u16::MAX as u32) as u16
}

pub struct TermManager {
    stdout: Stdout,
    front: ScreenBuffer,
    back: ScreenBuffer,
    active: bool,
}

impl TermManager {
    pub fn new(grid_width: GridInt, grid_height: GridInt) -> Result<Self, GameError> {
        let (needed_cols, needed_rows) = board_size(grid_width, grid_height);
        let (cols, rows) = terminal::size()?;

        if cols < needed_cols || rows < needed_rows {
            return Err(GameError::TerminalTooSmall { cols, rows, needed_cols, needed_rows });
        }

        Ok(TermManager {
            stdout: stdout(),
            front: ScreenBuffer::new(grid_width, grid_height, UNDRAWN),
            back: ScreenBuffer::new(grid_width, grid_height, BLANK),
            active: false,
        })
    }

    pub fn setup(&mut self) -> Result<(), GameError> {
        execute!(self.stdout, EnterAlternateScreen, terminal::Clear(ClearType::All))?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.active = true;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), GameError> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }

    /// Drains every pending key press without blocking.
    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>, GameError> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

impl Canvas for TermManager {
    fn clear(&mut self) {
        self.back.clear_board();
    }

    fn fill_cell(&mut self, cell: Cell, paint: Paint) {
        self.back.paint_cell(cell, paint);
    }

    fn draw_status(&mut self, text: &str) {
        self.back.write_status(text);
    }

    fn present(&mut self) -> Result<(), GameError> {
        for ((x, y), glyph) in self.back.changes(&self.front) {
            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                style::SetForegroundColor(glyph.color),
                style::Print(glyph.ch)
            )?;
        }

        self.front.screen.copy_from_slice(&self.back.screen);
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Errors here have nowhere to go; the explicit restore() reports them
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars_in_row(buf: &ScreenBuffer, row: u16, from: u16, len: u16) -> String {
        (from..from + len).map(|x| buf.get((x, row)).unwrap().ch).collect()
    }

    #[test]
    fn board_size_adds_border_and_status_row() {
        assert_eq!(board_size(32, 24), (66, 27));
        assert_eq!(board_size(1, 1), (4, 4));
    }

    #[test]
    fn clear_draws_a_border() {
        let mut buf = ScreenBuffer::new(3, 2, BLANK);
        buf.clear_board();

        assert_eq!(chars_in_row(&buf, 0, 0, 8), "+------+");
        assert_eq!(chars_in_row(&buf, 1, 0, 8), "|      |");
        assert_eq!(chars_in_row(&buf, 3, 0, 8), "+------+");
        assert_eq!(chars_in_row(&buf, 4, 0, 8), "        ");
    }

    #[test]
    fn cells_are_two_columns_inside_the_border() {
        let mut buf = ScreenBuffer::new(3, 2, BLANK);
        buf.clear_board();
        buf.paint_cell((1, 0), Paint::Head(Direction::Right));
        buf.paint_cell((2, 1), Paint::Food);

        assert_eq!(chars_in_row(&buf, 1, 1, 6), "  >>  ");
        assert_eq!(chars_in_row(&buf, 2, 1, 6), "    OO");
        assert_eq!(buf.get((3, 1)).unwrap().color, Color::Red);
    }

    #[test]
    fn out_of_grid_cells_are_ignored() {
        let mut buf = ScreenBuffer::new(3, 2, BLANK);
        buf.clear_board();
        let before = buf.clone();

        buf.paint_cell((3, 0), Paint::Body);
        buf.paint_cell((-1, 1), Paint::Body);
        assert_eq!(buf.changes(&before).count(), 0);
    }

    #[test]
    fn status_text_is_clipped_to_the_board_width() {
        let mut buf = ScreenBuffer::new(1, 1, BLANK);
        buf.write_status("Score: 12");
        assert_eq!(chars_in_row(&buf, 3, 0, 4), "Scor");
    }

    #[test]
    fn changes_only_reports_modified_glyphs() {
        let mut buf = ScreenBuffer::new(3, 2, BLANK);
        buf.clear_board();
        let before = buf.clone();
        buf.paint_cell((0, 1), Paint::Body);

        let changed: Vec<ScreenPos> = buf.changes(&before).map(|(pos, _)| pos).collect();
        assert_eq!(changed, vec![(1, 2), (2, 2)]);
    }
}
