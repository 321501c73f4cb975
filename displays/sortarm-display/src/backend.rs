//! Text display backend
//!
//! What the controller needs from a screen: character cells on fixed rows,
//! row highlighting, and an explicit flush so a frame appears at once.

/// Display failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The device did not accept the frame
    Communication,
    /// Row or column off the screen
    InvalidCoordinates,
}

/// A character display
///
/// Drawing goes to a back buffer; nothing is visible until `flush`.
pub trait DisplayBackend {
    /// Blank the back buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write `text` starting at character cell (`row`, `col`)
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Highlight columns `start_col..end_col` of `row`
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Make the back buffer visible
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// (columns, rows)
    fn dimensions(&self) -> (u8, u8);

    /// Write a whole row from column 0, highlighted across the full width
    /// when `inverted`
    fn draw_line(&mut self, row: u8, text: &str, inverted: bool) -> Result<(), DisplayError> {
        self.draw_text(row, 0, text)?;
        if !inverted {
            return Ok(());
        }
        let (cols, _) = self.dimensions();
        self.invert_region(row, 0, cols)
    }
}
