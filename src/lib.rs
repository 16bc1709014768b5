//! clipdeck - pick stock clips in the terminal and render them into a video
//!
//! This library holds the clip selection model, the HTTP client for the
//! search / render backend, configuration, and the TUI state and rendering.

pub mod api;
pub mod clip;
pub mod config;
pub mod logging;
pub mod player;
pub mod ui;
