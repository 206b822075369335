//! # Terminal I/O Abstraction
//!
//! The controller and renderer never touch the terminal directly; they go
//! through the [`EventStream`] and [`RenderStream`] traits. Production
//! implementations wrap crossterm, test implementations replay scripted
//! events and record what would have been drawn.

use anyhow::Result;
use crossterm::event::Event;
use std::io::Write;
use std::time::Duration;

pub mod mock;
pub mod terminal;

pub use mock::{rendered_text, MockEventStream, MockRenderStream, RenderCommand, RenderLog};
pub use terminal::{TerminalEventStream, TerminalRenderStream};

/// Terminal size as (width, height) in cells.
pub type TerminalSize = (u16, u16);

/// Source of input events.
pub trait EventStream: Send {
    /// Check whether an event is available within the timeout.
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event. Call only after `poll` returned true.
    fn read(&mut self) -> Result<Event>;
}

/// Sink for rendering operations.
///
/// Text goes through the `Write` supertrait; cursor and screen control go
/// through the dedicated methods so mocks can record them structurally.
pub trait RenderStream: Write + Send {
    fn clear_screen(&mut self) -> Result<()>;

    /// Move the cursor to (column, row).
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()>;

    fn hide_cursor(&mut self) -> Result<()>;

    fn show_cursor(&mut self) -> Result<()>;

    fn size(&self) -> Result<TerminalSize>;

    fn enter_alternate_screen(&mut self) -> Result<()>;

    fn leave_alternate_screen(&mut self) -> Result<()>;

    fn enable_raw_mode(&mut self) -> Result<()>;

    fn disable_raw_mode(&mut self) -> Result<()>;
}
