//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Brand blue used for headers and the tab bar.
pub const BRAND_BLUE: Color = Color::Rgb(37, 48, 163);
/// Completed days and finished progress bars.
pub const DONE_GREEN: Color = Color::Rgb(50, 205, 50);
/// Progress bars still in flight.
pub const PROGRESS_BLUE: Color = Color::Rgb(86, 125, 210);
/// Past days, read-only.
pub const MUTED_GREY: Color = Color::Rgb(110, 110, 110);
/// Inline validation errors.
pub const ERROR_RED: Color = Color::Rgb(255, 107, 107);
