//! Output formatting and display system
//!
//! Provides colored and plain terminal renderings of run progress,
//! result summaries, and the stored-result history table.

mod colored;
mod formatter;

pub use colored::ColoredFormatter;
pub use formatter::{OutputFormatter, PlainFormatter};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color preference
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new())
        } else {
            Box::new(PlainFormatter::new())
        }
    }
}
