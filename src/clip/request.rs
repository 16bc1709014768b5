//! # Generation Request
//!
//! Turns a [`ClipBoard`] selection plus the user's styling options into the
//! multipart fields expected by `POST /generate`.
//!
//! ## Form fields
//!
//! | field         | value                                           |
//! |---------------|-------------------------------------------------|
//! | `clips`       | selected filenames, comma-joined, pick order    |
//! | `order`       | original clip indices, comma-joined, pick order |
//! | `start_times` | `0` per selected clip                           |
//! | `end_times`   | `10` per selected clip                          |
//! | `layout`      | `landscape` or `shorts`                         |
//! | `script`      | narration text                                  |
//! | `font_size`   | positive integer                                |
//! | `font_family` | font name                                       |

use crate::clip::board::ClipBoard;
use crate::clip::error::{ClipError, ClipResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Start offset assigned to every selected clip.
pub const DEFAULT_START_SECS: u32 = 0;

/// End offset assigned to every selected clip.
pub const DEFAULT_END_SECS: u32 = 10;

/// Output frame orientation understood by the render backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Landscape,
    Shorts,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Landscape => "landscape",
            Layout::Shorts => "shorts",
        }
    }

    /// Target frame size (width, height) the backend renders for this layout.
    pub fn frame_size(self) -> (u32, u32) {
        match self {
            Layout::Landscape => (1280, 720),
            Layout::Shorts => (720, 1280),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Layout::Landscape => Layout::Shorts,
            Layout::Shorts => Layout::Landscape,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(Layout::Landscape),
            "shorts" => Ok(Layout::Shorts),
            _ => Err(ClipError::UnknownLayout(s.to_string())),
        }
    }
}

/// Styling options read from the input controls at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub layout: Layout,
    pub script: String,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            script: String::new(),
            font_size: 48,
            font_family: "Arial".to_string(),
        }
    }
}

/// Parse a font size typed by the user.
pub fn parse_font_size(raw: &str) -> ClipResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ClipError::InvalidFontSize(raw.to_string())),
    }
}

/// A fully materialised submission for `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub clips: Vec<String>,
    pub order: Vec<usize>,
    pub start_times: Vec<u32>,
    pub end_times: Vec<u32>,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Snapshot the board's selection into a request.
    ///
    /// Fails with [`ClipError::EmptySelection`] when nothing is selected and
    /// with [`ClipError::InvalidFontSize`] for a zero font size.
    pub fn build(board: &ClipBoard, options: &GenerationOptions) -> ClipResult<Self> {
        if !board.has_selection() {
            return Err(ClipError::EmptySelection);
        }
        if options.font_size == 0 {
            return Err(ClipError::InvalidFontSize("0".to_string()));
        }

        let order = board.selection().to_vec();
        let clips = board
            .selected_clips()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let count = order.len();

        Ok(Self {
            clips,
            order,
            start_times: vec![DEFAULT_START_SECS; count],
            end_times: vec![DEFAULT_END_SECS; count],
            options: options.clone(),
        })
    }

    /// Text fields in submission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("clips", self.clips.join(",")),
            ("order", join(&self.order)),
            ("start_times", join(&self.start_times)),
            ("end_times", join(&self.end_times)),
            ("layout", self.options.layout.as_str().to_string()),
            ("script", self.options.script.clone()),
            ("font_size", self.options.font_size.to_string()),
            ("font_family", self.options.font_family.clone()),
        ]
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
