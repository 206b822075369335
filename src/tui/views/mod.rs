//! # View Layer
//!
//! Rendering of the dashboard. The renderer is generic over a
//! [`RenderStream`](crate::tui::io::RenderStream) so tests can capture its
//! output without a terminal.

mod terminal_renderer;

pub use terminal_renderer::TerminalRenderer;

use crate::tui::models::ViewModel;
use anyhow::Result;

/// Rendering operations the controller depends on.
pub trait ViewRenderer {
    /// Put the terminal into dashboard mode (raw, alternate screen).
    fn initialize(&mut self) -> Result<()>;

    /// Draw the whole dashboard from the current model state.
    fn render_full(&mut self, model: &ViewModel) -> Result<()>;

    /// Track a terminal resize.
    fn update_size(&mut self, width: u16, height: u16);

    /// Restore the terminal to its normal state.
    fn cleanup(&mut self) -> Result<()>;
}
