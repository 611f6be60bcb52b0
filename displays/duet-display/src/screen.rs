//! Screen buffer types
//!
//! A character grid sized for a 128x64 OLED with a 6x8 font. Demo views
//! work in pixels; `plot` maps a pixel onto the cell that covers it.

/// Number of character rows
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns
pub const SCREEN_COLS: usize = 21;

/// Pixel width of one character cell
pub const CELL_WIDTH_PX: i16 = 6;

/// Pixel height of one character cell
pub const CELL_HEIGHT_PX: i16 = 8;

/// Text-mode screen buffer
///
/// Cells only ever hold printable ASCII, so every row is valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    cells: [[u8; SCREEN_COLS]; SCREEN_ROWS],
    /// Inverted region per row (start_col, end_col)
    highlights: [Option<(u8, u8)>; SCREEN_ROWS],
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

fn printable(c: u8) -> u8 {
    if c.is_ascii_graphic() || c == b' ' {
        c
    } else {
        b'?'
    }
}

impl Screen {
    /// Create a new blank screen
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; SCREEN_COLS]; SCREEN_ROWS],
            highlights: [None; SCREEN_ROWS],
        }
    }

    /// Blank every cell and drop all highlights
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Replace a row with `text`, truncated to the row width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if row < SCREEN_ROWS {
            self.cells[row] = [b' '; SCREEN_COLS];
            self.put(row, 0, text);
        }
    }

    /// Write `text` over a row starting at `col`
    ///
    /// Columns left or right of the screen are clipped, so text may
    /// start off-screen.
    pub fn put(&mut self, row: usize, col: i16, text: &str) {
        if row >= SCREEN_ROWS {
            return;
        }
        for (i, byte) in text.bytes().enumerate() {
            let c = col + i as i16;
            if (0..SCREEN_COLS as i16).contains(&c) {
                self.cells[row][c as usize] = printable(byte);
            }
        }
    }

    /// Write `text` centred on a row
    pub fn put_centered(&mut self, row: usize, text: &str) {
        let len = text.len().min(SCREEN_COLS) as i16;
        self.put(row, (SCREEN_COLS as i16 - len) / 2, text);
    }

    /// Fill `len` cells of a row with `c`
    pub fn fill(&mut self, row: usize, col: usize, len: usize, c: u8) {
        if row >= SCREEN_ROWS {
            return;
        }
        let end = (col + len).min(SCREEN_COLS);
        for cell in self.cells[row].iter_mut().take(end).skip(col) {
            *cell = printable(c);
        }
    }

    /// Draw `c` in the cell covering pixel (`x`, `y`)
    ///
    /// Returns false when the pixel is off-screen.
    pub fn plot(&mut self, x: i16, y: i16, c: u8) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let col = (x / CELL_WIDTH_PX) as usize;
        let row = (y / CELL_HEIGHT_PX) as usize;
        if col >= SCREEN_COLS || row >= SCREEN_ROWS {
            return false;
        }
        self.cells[row][col] = printable(c);
        true
    }

    /// Character at a cell
    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.cells
            .get(row)
            .and_then(|line| line.get(col))
            .map(|&b| b as char)
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|line| core::str::from_utf8(line).ok())
    }

    /// Set highlight (invert) region for a row
    pub fn set_highlight(&mut self, row: usize, start_col: u8, end_col: u8) {
        if row < SCREEN_ROWS {
            self.highlights[row] = Some((start_col, end_col.min(SCREEN_COLS as u8)));
        }
    }

    /// Get highlight region for a row
    pub fn get_highlight(&self, row: usize) -> Option<(u8, u8)> {
        self.highlights.get(row).copied().flatten()
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .map(|line| core::str::from_utf8(line).unwrap_or(""))
    }

    /// Get number of rows
    pub const fn rows(&self) -> usize {
        SCREEN_ROWS
    }

    /// Get number of columns
    pub const fn cols(&self) -> usize {
        SCREEN_COLS
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line);
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_line_truncates() {
        let mut screen = Screen::new();
        screen.set_line(0, "0123456789abcdefghijklmnop");
        assert_eq!(screen.get_line(0), Some("0123456789abcdefghijk"));
        assert_eq!(screen.get_line(SCREEN_ROWS), None);
    }

    #[test]
    fn test_put_clips_left_edge() {
        let mut screen = Screen::new();
        screen.put(3, -2, "abcd");
        assert_eq!(screen.get_line(3).unwrap().trim_end(), "cd");
    }

    #[test]
    fn test_put_centered() {
        let mut screen = Screen::new();
        screen.put_centered(4, "NOW");
        assert_eq!(screen.get_line(4).unwrap().find("NOW"), Some(9));
    }

    #[test]
    fn test_plot_maps_pixels_to_cells() {
        let mut screen = Screen::new();
        assert!(screen.plot(20, 32, b'O'));
        assert_eq!(screen.cell(4, 3), Some('O'));

        assert!(!screen.plot(-5, 32, b'O'));
        assert!(!screen.plot(127, 32, b'O'));
        assert!(!screen.plot(20, 64, b'O'));
    }

    #[test]
    fn test_non_ascii_replaced() {
        let mut screen = Screen::new();
        screen.set_line(1, "é");
        assert!(screen.get_line(1).unwrap().starts_with("??"));
    }

    #[test]
    fn test_fill_and_clear() {
        let mut screen = Screen::new();
        screen.fill(1, 18, 10, b'=');
        assert_eq!(screen.get_line(1).unwrap().trim_start(), "===");
        screen.set_highlight(1, 0, 30);
        assert_eq!(screen.get_highlight(1), Some((0, SCREEN_COLS as u8)));

        screen.clear();
        assert_eq!(screen, Screen::new());
    }
}
