//! # keyline - Terminal Dashboard for a Key-Value Store
//!
//! An interactive terminal client that drives a remote key-value store
//! over its HTTP API: save entries, browse the full listing, delete keys
//! and watch aggregate statistics, with transient per-pane alerts for
//! every outcome.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   CommandEvent   ┌──────────────┐   apply_*    ┌─────────┐
//! │   Keymap    │─────────────────▶│  Controller  │─────────────▶│  Model  │
//! │ (commands)  │                  │ (event loop) │              │ (state) │
//! └─────────────┘                  └──────┬───────┘              └────┬────┘
//!                                         │ spawn                    │
//!                                         ▼                          ▼
//!                                  ┌──────────────┐           ┌────────────┐
//!                                  │ API service  │           │  Renderer  │
//!                                  │ (reqwest +   │           │ (crossterm │
//!                                  │  channel)    │           │  via RS)   │
//!                                  └──────────────┘           └────────────┘
//! ```
//!
//! Completed HTTP requests flow back into the controller through an mpsc
//! channel, so the UI loop never waits on the network.

pub mod cmd_args;
pub mod config;
pub mod logging;
pub mod tui;

pub use tui::AppController;
