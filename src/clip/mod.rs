//! # Clip Module
//!
//! Client-side model of a clip search session.
//!
//! ## Overview
//!
//! - [`ClipBoard`] - the current clip list and the ordered selection
//! - [`GenerationOptions`] / [`GenerationRequest`] - what gets submitted to
//!   the render endpoint
//! - [`Layout`] - output frame orientation
//!
//! ## Invariants
//!
//! Every selected index points into the current clip list. Replacing the clip
//! list always clears the selection, and toggles outside the list are
//! rejected with [`ClipError::IndexOutOfRange`].
//!
//! ## Selection order
//!
//! The selection is kept in insertion order, which is the playback order of
//! the generated video:
//!
//! ```text
//! clips:     [a.mp4, b.mp4, c.mp4]
//! toggle(2)  -> [2]
//! toggle(0)  -> [2, 0]      clips="c.mp4,a.mp4"  order="2,0"
//! toggle(2)  -> [0]
//! ```

pub mod board;
pub mod error;
pub mod request;

pub use board::ClipBoard;
pub use error::{ClipError, ClipResult};
pub use request::{
    parse_font_size, GenerationOptions, GenerationRequest, Layout, DEFAULT_END_SECS,
    DEFAULT_START_SECS,
};
