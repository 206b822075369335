//! # Dashboard TUI
//!
//! Terminal front end for the key-value store. The pieces follow an
//! MVVM-ish split:
//!
//! ```text
//! key events ──▶ commands ──▶ CommandEvent ──▶ controller ──▶ models
//!                                                 │              │
//!                                                 ▼              ▼
//!                                          services::http     views
//!                                          (async, channel)  (render)
//! ```
//!
//! The controller is the only piece that touches more than one neighbor;
//! everything else is independently testable.

pub mod commands;
pub mod controller;
pub mod events;
pub mod io;
pub mod models;
pub mod services;
pub mod views;

pub use controller::AppController;
