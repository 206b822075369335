//! Mock I/O implementations for tests.
//!
//! `MockEventStream` replays a scripted event sequence; `MockRenderStream`
//! records every render operation into a shared log that the test keeps a
//! handle to, so assertions can run after the controller finishes.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::event::Event;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted event source.
pub struct MockEventStream {
    events: VecDeque<Event>,
}

impl MockEventStream {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }
}

impl EventStream for MockEventStream {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted events left"))
    }
}

/// One recorded render operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    ClearScreen,
    MoveCursor(u16, u16),
    HideCursor,
    ShowCursor,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    EnableRawMode,
    DisableRawMode,
    Write(Vec<u8>),
}

/// Shared log of render operations.
pub type RenderLog = Arc<Mutex<Vec<RenderCommand>>>;

/// Collect everything written to the stream as one string, ignoring
/// cursor and screen control.
pub fn rendered_text(log: &RenderLog) -> String {
    let log = log.lock().expect("render log poisoned");
    let mut text = String::new();
    for command in log.iter() {
        if let RenderCommand::Write(bytes) = command {
            text.push_str(&String::from_utf8_lossy(bytes));
        }
    }
    text
}

/// Recording render sink with a fixed pretend size.
pub struct MockRenderStream {
    log: RenderLog,
    size: TerminalSize,
}

impl MockRenderStream {
    pub fn new() -> Self {
        Self::with_size(80, 24)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            size: (width, height),
        }
    }

    /// Handle the test keeps for post-run assertions.
    pub fn log_handle(&self) -> RenderLog {
        Arc::clone(&self.log)
    }

    fn record(&self, command: RenderCommand) {
        self.log.lock().expect("render log poisoned").push(command);
    }
}

impl Default for MockRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MockRenderStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.record(RenderCommand::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl RenderStream for MockRenderStream {
    fn clear_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::ClearScreen);
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.record(RenderCommand::MoveCursor(x, y));
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::HideCursor);
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::ShowCursor);
        Ok(())
    }

    fn size(&self) -> Result<TerminalSize> {
        Ok(self.size)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::EnterAlternateScreen);
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::LeaveAlternateScreen);
        Ok(())
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::EnableRawMode);
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::DisableRawMode);
        Ok(())
    }
}
