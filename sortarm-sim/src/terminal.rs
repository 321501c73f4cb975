//! Terminal display
//!
//! Draws each flushed frame to stdout inside a box the size of the brick's
//! screen. The highlighted row is marked in the left gutter. Frames
//! identical to the previous one are skipped.

use std::io::Write;

use sortarm_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

#[derive(Default)]
pub struct TerminalDisplay {
    pending: [String; SCREEN_ROWS],
    inverted: Option<u8>,
    last_frame: String,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(&self) -> String {
        let border = format!("+{}+\n", "-".repeat(SCREEN_COLS + 1));
        let mut frame = border.clone();
        for (row, line) in self.pending.iter().enumerate() {
            let mark = if self.inverted == Some(row as u8) { '>' } else { ' ' };
            frame.push_str(&format!("|{}{:<width$}|\n", mark, line, width = SCREEN_COLS));
        }
        frame.push_str(&border);
        frame
    }
}

impl DisplayBackend for TerminalDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for line in &mut self.pending {
            line.clear();
        }
        self.inverted = None;
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let line = self
            .pending
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        let col = col as usize;
        if col >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        let mut chars: Vec<char> = line.chars().collect();
        chars.resize(col, ' ');
        chars.extend(text.chars().take(SCREEN_COLS - col));
        *line = chars.into_iter().collect();
        Ok(())
    }

    fn invert_region(&mut self, row: u8, _start_col: u8, _end_col: u8) -> Result<(), DisplayError> {
        if row as usize >= SCREEN_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.inverted = Some(row);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let frame = self.frame();
        if frame != self.last_frame {
            let mut out = std::io::stdout().lock();
            out.write_all(frame.as_bytes())
                .and_then(|_| out.flush())
                .map_err(|_| DisplayError::Communication)?;
            self.last_frame = frame;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
