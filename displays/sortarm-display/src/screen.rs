//! Screen buffer
//!
//! Character buffer sized for the brick LCD using its default font.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows on the brick LCD
pub const SCREEN_ROWS: usize = 7;

/// Number of character columns on the brick LCD
pub const SCREEN_COLS: usize = 22;

/// Maximum characters per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// Screen buffer for the controller's text UI
///
/// Row 0 is conventionally the title. At most one row is highlighted.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    highlighted: Option<usize>,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlighted: None,
            dirty: true,
        }
    }

    /// Clear all rows and the highlight
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.highlighted = None;
        self.dirty = true;
    }

    /// Set the content of a row, truncating to the line width
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        line.clear();
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    /// Get the content of a row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Highlight a single row, replacing any previous highlight
    pub fn highlight(&mut self, row: usize) {
        if row < SCREEN_ROWS {
            self.highlighted = Some(row);
            self.dirty = true;
        }
    }

    /// Currently highlighted row
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// All rows, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Whether any row contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    /// Push the buffer to a backend and mark it clean
    ///
    /// Rows beyond the backend's height are dropped.
    pub fn render_to<B: DisplayBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<(), DisplayError> {
        let (_, rows) = backend.dimensions();
        backend.clear()?;
        for (row, line) in self.lines.iter().enumerate().take(rows as usize) {
            if line.is_empty() && self.highlighted != Some(row) {
                continue;
            }
            backend.draw_line(row as u8, line.as_str(), self.highlighted == Some(row))?;
        }
        backend.flush()?;
        self.dirty = false;
        Ok(())
    }
}

impl core::fmt::Debug for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.lines()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        drawn: [(bool, usize); SCREEN_ROWS],
        flushes: u32,
        rows: u8,
    }

    impl DisplayBackend for Recorder {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.drawn = [(false, 0); SCREEN_ROWS];
            Ok(())
        }

        fn draw_text(&mut self, row: u8, _col: u8, text: &str) -> Result<(), DisplayError> {
            if row >= self.rows {
                return Err(DisplayError::InvalidCoordinates);
            }
            self.drawn[row as usize].1 = text.len();
            Ok(())
        }

        fn invert_region(&mut self, row: u8, _start: u8, _end: u8) -> Result<(), DisplayError> {
            self.drawn[row as usize].0 = true;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (SCREEN_COLS as u8, self.rows)
        }
    }

    #[test]
    fn test_long_lines_truncate() {
        let mut screen = Screen::new();
        screen.set_line(1, "Set Color For: Zone 12345");
        assert_eq!(screen.line(1).map(str::len), Some(LINE_LEN));
    }

    #[test]
    fn test_out_of_range_row_ignored() {
        let mut screen = Screen::new();
        screen.set_line(SCREEN_ROWS, "nope");
        screen.highlight(SCREEN_ROWS);
        assert_eq!(screen.highlighted(), None);
        assert!(!screen.contains("nope"));
    }

    #[test]
    fn test_render_marks_highlight_and_flushes() {
        let mut screen = Screen::new();
        screen.set_line(0, "Main Menu");
        screen.set_line(1, "Start");
        screen.set_line(2, "Stop");
        screen.highlight(2);

        let mut backend = Recorder {
            drawn: [(false, 0); SCREEN_ROWS],
            flushes: 0,
            rows: SCREEN_ROWS as u8,
        };
        screen.render_to(&mut backend).unwrap();

        assert!(!screen.is_dirty());
        assert_eq!(backend.flushes, 1);
        assert_eq!(backend.drawn[0], (false, 9));
        assert_eq!(backend.drawn[2], (true, 4));
    }

    #[test]
    fn test_render_skips_rows_backend_lacks() {
        let mut screen = Screen::new();
        for row in 0..SCREEN_ROWS {
            screen.set_line(row, "x");
        }
        let mut backend = Recorder {
            drawn: [(false, 0); SCREEN_ROWS],
            flushes: 0,
            rows: 4,
        };
        assert!(screen.render_to(&mut backend).is_ok());
    }
}
