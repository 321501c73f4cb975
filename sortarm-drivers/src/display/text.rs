//! In-memory text display
//!
//! Keeps the last flushed frame and the titles of recent frames, so tests
//! can check what the operator would have seen.

use heapless::{HistoryBuffer, String};
use sortarm_display::{DisplayBackend, DisplayError, LINE_LEN, SCREEN_COLS, SCREEN_ROWS};

/// Frame titles remembered
pub const TITLE_HISTORY: usize = 32;

type Line = String<LINE_LEN>;

/// Text display backed by memory
pub struct TextDisplay {
    pending: [Line; SCREEN_ROWS],
    shown: [Line; SCREEN_ROWS],
    pending_inverted: Option<u8>,
    shown_inverted: Option<u8>,
    titles: HistoryBuffer<Line, TITLE_HISTORY>,
    flushes: u32,
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDisplay {
    pub fn new() -> Self {
        Self {
            pending: core::array::from_fn(|_| String::new()),
            shown: core::array::from_fn(|_| String::new()),
            pending_inverted: None,
            shown_inverted: None,
            titles: HistoryBuffer::new(),
            flushes: 0,
        }
    }

    /// Row of the last flushed frame
    pub fn line(&self, row: usize) -> &str {
        self.shown.get(row).map_or("", |line| line.as_str())
    }

    /// Inverted row of the last flushed frame
    pub fn inverted_row(&self) -> Option<u8> {
        self.shown_inverted
    }

    /// Whether the last flushed frame contains `needle`
    pub fn shows(&self, needle: &str) -> bool {
        self.shown.iter().any(|line| line.contains(needle))
    }

    /// Titles of recent frames, oldest first
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.oldest_ordered().map(|title| title.as_str())
    }

    /// How many recent frames had `title`
    pub fn frames_titled(&self, title: &str) -> usize {
        self.titles().filter(|t| *t == title).count()
    }

    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl DisplayBackend for TextDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for line in &mut self.pending {
            line.clear();
        }
        self.pending_inverted = None;
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let line = self
            .pending
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        if col as usize >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        while line.len() < col as usize {
            let _ = line.push(' ');
        }
        line.truncate(col as usize);
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }

    fn invert_region(&mut self, row: u8, _start_col: u8, _end_col: u8) -> Result<(), DisplayError> {
        if row as usize >= SCREEN_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.pending_inverted = Some(row);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.shown.clone_from(&self.pending);
        self.shown_inverted = self.pending_inverted;
        self.titles.write(self.pending[0].clone());
        self.flushes += 1;
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_publishes_frame() {
        let mut display = TextDisplay::new();
        display.draw_line(0, "Paused", false).unwrap();
        display.draw_line(3, "Center: Resume", true).unwrap();
        assert!(!display.shows("Paused"));

        display.flush().unwrap();
        assert_eq!(display.line(0), "Paused");
        assert_eq!(display.inverted_row(), Some(3));
        assert_eq!(display.frames_titled("Paused"), 1);
    }

    #[test]
    fn test_draw_at_column_pads() {
        let mut display = TextDisplay::new();
        display.draw_text(1, 3, "abc").unwrap();
        display.flush().unwrap();
        assert_eq!(display.line(1), "   abc");
    }

    #[test]
    fn test_out_of_range_row() {
        let mut display = TextDisplay::new();
        assert_eq!(
            display.draw_text(SCREEN_ROWS as u8, 0, "x"),
            Err(DisplayError::InvalidCoordinates)
        );
    }
}
