//! # UI Module
//!
//! Terminal user interface for clipdeck.
//!
//! ## Components
//!
//! - [`App`] - state (board, inputs, focus, status, last result)
//! - [`mod@render`] - full state-to-view projection, redrawn every frame
//! - [`theme`] - built-in color themes
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ CLIPDECK  http://localhost:8000                  │
//! ├─────────────────────────────────────────────────┤
//! │ Keyword: cats_                                   │
//! ├──────────────────────────┬──────────────────────┤
//! │ [ 2] cats_1234.mp4 ...   │ Options              │
//! │ [  ] cats_5678.mp4 ...   │  layout/script/font  │
//! │ [ 1] cats_9012.mp4 ...   ├──────────────────────┤
//! │                          │ Final video          │
//! ├──────────────────────────┴──────────────────────┤
//! │ status line                                      │
//! │ key hints                                        │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The number in brackets is the clip's position in the rendered video.

pub mod app;
pub mod render;
pub mod theme;

pub use app::{Action, App, AppEvent};
pub use render::{render, ScreenLayout};
