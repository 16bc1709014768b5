//! # Backend API
//!
//! HTTP client for the clip backend.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /fetch?keyword=<kw>   -> {"clips": ["cats_1234.mp4", ...]}
//! POST /generate (multipart) -> {"video": "final_5678.mp4"}
//!
//! GET  /temp_videos/<clip>   search results (served by the backend)
//! GET  /final_videos/<video> rendered output
//! ```

mod client;
mod error;

pub use client::{
    clip_media_url, final_media_url, ClipClient, CLIP_MEDIA_PREFIX, FINAL_MEDIA_PREFIX,
};
pub use error::{ApiError, ApiResult};
