//! Terminal renderer for the four-pane dashboard.
//!
//! Screen layout, top to bottom: save form, delete form, statistics,
//! entries listing, status line. Each pane carries its own alert row so
//! feedback stays next to the control that caused it.

use anyhow::Result;
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::QueueableCommand;
use std::io::Write;

use super::ViewRenderer;
use crate::tui::events::{AlertKind, InputField, Pane};
use crate::tui::io::RenderStream;
use crate::tui::models::{Alert, ViewModel};

const STATUS_LINE: &str = " Tab field | Enter submit | ^R reload | ^S stats | ^C quit ";

const KEY_LABEL: &str = " Key:   ";
const VALUE_LABEL: &str = " Value: ";

/// Row assignments for a given terminal height.
///
/// The three forms have fixed heights; the entries body absorbs whatever
/// is left above the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    save_title: u16,
    save_key: u16,
    save_value: u16,
    save_alert: u16,
    delete_title: u16,
    delete_key: u16,
    delete_alert: u16,
    stats_title: u16,
    stats_counters: u16,
    stats_body: u16,
    stats_body_rows: u16,
    stats_alert: u16,
    entries_title: u16,
    entries_body: u16,
    entries_body_rows: u16,
    entries_alert: u16,
    status: u16,
}

impl Layout {
    /// Smallest terminal the full layout fits in.
    const MIN_HEIGHT: u16 = 18;

    fn compute(height: u16) -> Option<Self> {
        if height < Self::MIN_HEIGHT {
            return None;
        }
        let stats_body_rows = 3;
        let entries_body = 14;
        let entries_alert = height - 2;
        Some(Self {
            save_title: 0,
            save_key: 1,
            save_value: 2,
            save_alert: 3,
            delete_title: 4,
            delete_key: 5,
            delete_alert: 6,
            stats_title: 7,
            stats_counters: 8,
            stats_body: 9,
            stats_body_rows,
            stats_alert: 12,
            entries_title: 13,
            entries_body,
            entries_body_rows: entries_alert - entries_body,
            entries_alert,
            status: height - 1,
        })
    }
}

/// Draws the dashboard through an injected render stream.
pub struct TerminalRenderer<RS: RenderStream> {
    stream: RS,
    width: u16,
    height: u16,
}

impl<RS: RenderStream> TerminalRenderer<RS> {
    pub fn with_render_stream(stream: RS) -> Result<Self> {
        let (width, height) = stream.size()?;
        Ok(Self {
            stream,
            width,
            height,
        })
    }

    /// Size as the renderer currently believes it to be.
    pub fn terminal_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn draw_line(&mut self, row: u16, text: &str) -> Result<()> {
        self.stream.move_cursor(0, row)?;
        write!(self.stream, "{}", clip(text, self.width as usize))?;
        Ok(())
    }

    fn draw_title(&mut self, row: u16, title: &str) -> Result<()> {
        let mut line = format!("── {title} ");
        while line.chars().count() < self.width as usize {
            line.push('─');
        }
        self.stream.move_cursor(0, row)?;
        self.stream.queue(SetAttribute(Attribute::Bold))?;
        write!(self.stream, "{}", clip(&line, self.width as usize))?;
        self.stream.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn draw_input(&mut self, row: u16, label: &str, value: &str, focused: bool) -> Result<()> {
        self.stream.move_cursor(0, row)?;
        let marker = if focused { "›" } else { " " };
        write!(
            self.stream,
            "{marker}{label}{}",
            clip(value, (self.width as usize).saturating_sub(label.len() + 1))
        )?;
        Ok(())
    }

    fn draw_alert(&mut self, row: u16, alert: Option<&Alert>) -> Result<()> {
        self.stream.move_cursor(0, row)?;
        if let Some(alert) = alert {
            let (color, symbol) = match alert.kind {
                AlertKind::Success => (Color::Green, '✔'),
                AlertKind::Error => (Color::Red, '✘'),
            };
            let text = clip(&alert.message, (self.width as usize).saturating_sub(4));
            self.stream.queue(SetForegroundColor(color))?;
            write!(self.stream, "  {symbol} {text}")?;
            self.stream.queue(ResetColor)?;
        }
        Ok(())
    }

    fn draw_block(&mut self, top: u16, rows: u16, text: &str) -> Result<()> {
        let mut lines = text.lines();
        for offset in 0..rows {
            self.stream.move_cursor(0, top + offset)?;
            if let Some(line) = lines.next() {
                write!(self.stream, " {}", clip(line, (self.width as usize).saturating_sub(1)))?;
            }
        }
        Ok(())
    }

    fn draw_status(&mut self, row: u16) -> Result<()> {
        self.stream.move_cursor(0, row)?;
        let mut line = STATUS_LINE.to_string();
        while line.chars().count() < self.width as usize {
            line.push(' ');
        }
        self.stream.queue(SetAttribute(Attribute::Reverse))?;
        write!(self.stream, "{}", clip(&line, self.width as usize))?;
        self.stream.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    /// Park the terminal cursor at the end of the focused input.
    fn position_cursor(&mut self, layout: &Layout, model: &ViewModel) -> Result<()> {
        let (row, label_len) = match model.focused() {
            InputField::SaveKey => (layout.save_key, KEY_LABEL.len()),
            InputField::SaveValue => (layout.save_value, VALUE_LABEL.len()),
            InputField::DeleteKey => (layout.delete_key, KEY_LABEL.len()),
        };
        let text_len = model.input(model.focused()).chars().count();
        let x = (1 + label_len + text_len).min(self.width.saturating_sub(1) as usize) as u16;
        self.stream.move_cursor(x, row)?;
        self.stream.show_cursor()?;
        Ok(())
    }
}

impl<RS: RenderStream> ViewRenderer for TerminalRenderer<RS> {
    fn initialize(&mut self) -> Result<()> {
        self.stream.enable_raw_mode()?;
        self.stream.enter_alternate_screen()?;
        self.stream.hide_cursor()?;
        self.stream.clear_screen()?;
        Ok(())
    }

    fn render_full(&mut self, model: &ViewModel) -> Result<()> {
        self.stream.hide_cursor()?;
        self.stream.clear_screen()?;

        let layout = match Layout::compute(self.height) {
            Some(layout) => layout,
            None => {
                self.draw_line(0, "Terminal too small for the dashboard")?;
                self.stream.flush()?;
                return Ok(());
            }
        };

        self.draw_title(layout.save_title, "Save Entry")?;
        self.draw_input(
            layout.save_key,
            KEY_LABEL,
            model.input(InputField::SaveKey),
            model.focused() == InputField::SaveKey,
        )?;
        self.draw_input(
            layout.save_value,
            VALUE_LABEL,
            model.input(InputField::SaveValue),
            model.focused() == InputField::SaveValue,
        )?;
        self.draw_alert(layout.save_alert, model.alert(Pane::Save))?;

        self.draw_title(layout.delete_title, "Delete Entry")?;
        self.draw_input(
            layout.delete_key,
            KEY_LABEL,
            model.input(InputField::DeleteKey),
            model.focused() == InputField::DeleteKey,
        )?;
        self.draw_alert(layout.delete_alert, model.alert(Pane::Delete))?;

        self.draw_title(layout.stats_title, "Statistics")?;
        self.draw_line(
            layout.stats_counters,
            &format!(
                " Requests: {}    Entries: {}",
                model.total_requests_display(),
                model.database_size_display()
            ),
        )?;
        self.draw_block(layout.stats_body, layout.stats_body_rows, model.stats_display())?;
        self.draw_alert(layout.stats_alert, model.alert(Pane::Stats))?;

        self.draw_title(layout.entries_title, "Entries")?;
        self.draw_block(
            layout.entries_body,
            layout.entries_body_rows,
            model.entries_display(),
        )?;
        self.draw_alert(layout.entries_alert, model.alert(Pane::Entries))?;

        self.draw_status(layout.status)?;

        self.position_cursor(&layout, model)?;
        self.stream.flush()?;
        Ok(())
    }

    fn update_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn cleanup(&mut self) -> Result<()> {
        self.stream.show_cursor()?;
        self.stream.leave_alternate_screen()?;
        self.stream.disable_raw_mode()?;
        self.stream.flush()?;
        Ok(())
    }
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
