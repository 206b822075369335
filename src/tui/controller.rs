//! # Application Controller
//!
//! Owns the event loop. Key events become command events through the
//! keymap, command events mutate the view model or start background API
//! requests, and completed requests come back through the service channel
//! to be folded into the model. A render happens whenever the model says
//! it is dirty.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::Event;

use crate::cmd_args::CommandLineArgs;
use crate::config;
use crate::tui::commands::KeymapRegistry;
use crate::tui::events::CommandEvent;
use crate::tui::io::{EventStream, RenderStream, TerminalEventStream, TerminalRenderStream};
use crate::tui::models::{FollowUp, ViewModel};
use crate::tui::services::{ApiEvent, ApiService};
use crate::tui::views::{TerminalRenderer, ViewRenderer};

/// How long one poll for terminal input may block the loop.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Orchestrates model, view and services.
pub struct AppController<ES: EventStream, RS: RenderStream> {
    view_model: ViewModel,
    renderer: TerminalRenderer<RS>,
    keymap: KeymapRegistry,
    api: ApiService,
    event_stream: ES,
    should_quit: bool,
}

impl AppController<TerminalEventStream, TerminalRenderStream<std::io::Stdout>> {
    /// Production constructor wired to the real terminal.
    pub fn new(cmd_args: CommandLineArgs) -> Result<Self> {
        Self::with_io_streams(
            cmd_args,
            TerminalEventStream::new(),
            TerminalRenderStream::new(),
        )
    }
}

impl<ES: EventStream, RS: RenderStream> AppController<ES, RS> {
    /// Constructor with injected I/O streams, used by tests.
    pub fn with_io_streams(
        cmd_args: CommandLineArgs,
        event_stream: ES,
        render_stream: RS,
    ) -> Result<Self> {
        let profile_path = config::get_profile_path();
        let mut profile = config::resolve_profile(cmd_args.profile(), &profile_path)?;
        if let Some(server) = cmd_args.server() {
            profile = config::ConnectionProfile::with_server(profile.name(), server);
        }
        tracing::info!(
            "profile '{}' from '{}', server {}",
            profile.name(),
            profile_path,
            profile.server()
        );

        Ok(Self {
            view_model: ViewModel::new(),
            renderer: TerminalRenderer::with_render_stream(render_stream)?,
            keymap: KeymapRegistry::new(),
            api: ApiService::new(&profile)?,
            event_stream,
            should_quit: false,
        })
    }

    /// Run the dashboard until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        self.renderer.initialize()?;

        // The "page load" fetch: populate the listing once at startup.
        self.api.spawn_list();

        while !self.should_quit {
            if self.event_stream.poll(POLL_INTERVAL)? {
                match self.event_stream.read()? {
                    Event::Key(key) => {
                        tracing::debug!("key event: {key:?}");
                        for event in self.keymap.process_key(key, self.view_model.focused()) {
                            self.apply_command_event(event);
                        }
                    }
                    Event::Resize(width, height) => {
                        self.renderer.update_size(width, height);
                        self.renderer.render_full(&self.view_model)?;
                    }
                    _ => {}
                }
            }

            while let Some(event) = self.api.try_recv() {
                self.apply_api_event(event);
            }

            self.view_model.expire_alerts(Instant::now());

            if self.view_model.take_dirty() {
                self.renderer.render_full(&self.view_model)?;
            }

            // Let spawned request tasks make progress on single-threaded
            // runtimes.
            tokio::task::yield_now().await;
        }

        self.renderer.cleanup()
    }

    fn apply_command_event(&mut self, event: CommandEvent) {
        match event {
            CommandEvent::InsertCharRequested { ch } => self.view_model.insert_char(ch),
            CommandEvent::DeleteCharRequested => self.view_model.delete_char(),
            CommandEvent::FocusNextRequested => self.view_model.focus_next(),
            CommandEvent::FocusPreviousRequested => self.view_model.focus_previous(),
            CommandEvent::SaveRequested => {
                // Validation failures raise their alert in the model and
                // never reach the network.
                if let Some((key, value)) = self.view_model.prepare_save() {
                    self.api.spawn_save(key, value);
                }
            }
            CommandEvent::DeleteEntryRequested => {
                if let Some(key) = self.view_model.prepare_delete() {
                    self.api.spawn_delete(key);
                }
            }
            CommandEvent::RefreshEntriesRequested => self.api.spawn_list(),
            CommandEvent::FetchStatsRequested => self.api.spawn_stats(),
            CommandEvent::QuitRequested => {
                tracing::info!("quit requested");
                self.should_quit = true;
            }
        }
    }

    fn apply_api_event(&mut self, event: ApiEvent) {
        let follow_up = match event {
            ApiEvent::SaveCompleted(result) => self.view_model.apply_save_result(result),
            ApiEvent::EntriesLoaded(result) => self.view_model.apply_entries_result(result),
            ApiEvent::DeleteCompleted(result) => self.view_model.apply_delete_result(result),
            ApiEvent::StatsLoaded(result) => self.view_model.apply_stats_result(result),
        };
        if follow_up == FollowUp::RefreshEntries {
            self.api.spawn_list();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::io::{rendered_text, MockEventStream, MockRenderStream};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key_press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl_press(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    #[tokio::test]
    async fn test_run_quits_on_ctrl_c() {
        let events = MockEventStream::new(vec![ctrl_press('c')]);
        let render = MockRenderStream::new();
        let args = CommandLineArgs::parse_from(["keyline", "--server", "http://127.0.0.1:1/api"]);
        let mut app = AppController::with_io_streams(args, events, render).unwrap();
        app.run().await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_typed_characters_reach_the_focused_input() {
        let events = MockEventStream::new(vec![
            key_press(KeyCode::Char('a')),
            key_press(KeyCode::Char('b')),
            ctrl_press('c'),
        ]);
        let render = MockRenderStream::new();
        let log = render.log_handle();
        let args = CommandLineArgs::parse_from(["keyline", "--server", "http://127.0.0.1:1/api"]);
        let mut app = AppController::with_io_streams(args, events, render).unwrap();
        app.run().await.unwrap();
        assert!(rendered_text(&log).contains(" Key:   ab"));
    }

    #[tokio::test]
    async fn test_resize_triggers_redraw() {
        let events = MockEventStream::new(vec![Event::Resize(100, 30), ctrl_press('c')]);
        let render = MockRenderStream::new();
        let args = CommandLineArgs::parse_from(["keyline", "--server", "http://127.0.0.1:1/api"]);
        let mut app = AppController::with_io_streams(args, events, render).unwrap();
        app.run().await.unwrap();
        assert_eq!(app.renderer.terminal_size(), (100, 30));
    }
}
