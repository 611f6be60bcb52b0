//! ANSI terminal backend

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use log::warn;

use duet_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Character screen drawn inside a box on a terminal
pub struct TerminalDisplay<W: Write> {
    out: W,
    cells: [[u8; SCREEN_COLS]; SCREEN_ROWS],
    inverted: [Option<(u8, u8)>; SCREEN_ROWS],
}

impl TerminalDisplay<Stdout> {
    /// Take over stdout: clear it and hide the cursor
    pub fn stdout() -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(out, Clear(ClearType::All), Hide)?;
        Ok(Self::new(out))
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cells: [[b' '; SCREEN_COLS]; SCREEN_ROWS],
            inverted: [None; SCREEN_ROWS],
        }
    }

    #[cfg(test)]
    fn get_ref(&self) -> &W {
        &self.out
    }

    /// Give the cursor back and clear any attributes
    pub fn restore(&mut self) -> io::Result<()> {
        execute!(self.out, SetAttribute(Attribute::Reset), Show)
    }

    fn draw_frame(&mut self) -> io::Result<()> {
        let border = format!("+{}+", "-".repeat(SCREEN_COLS));
        queue!(
            self.out,
            MoveTo(0, 0),
            Print(&border),
            Clear(ClearType::UntilNewLine),
            Print("\r\n")
        )?;

        for row in 0..SCREEN_ROWS {
            let text: String = self.cells[row].iter().map(|&c| c as char).collect();
            queue!(self.out, Print('|'))?;
            match self.inverted[row] {
                Some((start, end)) if start < end => {
                    let (start, end) = (start as usize, end as usize);
                    queue!(
                        self.out,
                        Print(&text[..start]),
                        SetAttribute(Attribute::Reverse),
                        Print(&text[start..end]),
                        SetAttribute(Attribute::Reset),
                        Print(&text[end..])
                    )?;
                }
                _ => queue!(self.out, Print(&text))?,
            }
            queue!(
                self.out,
                Print('|'),
                Clear(ClearType::UntilNewLine),
                Print("\r\n")
            )?;
        }

        queue!(
            self.out,
            Print(&border),
            Clear(ClearType::UntilNewLine),
            Print("\r\n")
        )?;
        self.out.flush()
    }
}

impl<W: Write> DisplayBackend for TerminalDisplay<W> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.cells = [[b' '; SCREEN_COLS]; SCREEN_ROWS];
        self.inverted = [None; SCREEN_ROWS];
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let row = row as usize;
        let col = col as usize;
        if row >= SCREEN_ROWS || col >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        for (cell, byte) in self.cells[row][col..].iter_mut().zip(text.bytes()) {
            *cell = if byte.is_ascii_graphic() || byte == b' ' {
                byte
            } else {
                b'?'
            };
        }
        Ok(())
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        let row = row as usize;
        if row >= SCREEN_ROWS || start_col > end_col || end_col as usize > SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.inverted[row] = Some((start_col, end_col));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.draw_frame().map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn is_ready(&self) -> bool {
        true
    }
}

impl<W: Write> Drop for TerminalDisplay<W> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Terminal restore failed: {}", e);
        }
    }
}
