use crate::clip::error::{ClipError, ClipResult};

/// Clip list returned by the last applied search plus the user's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipBoard {
    clips: Vec<String>,
    selected: Vec<usize>,
}

impl ClipBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from an existing clip list with nothing selected.
    pub fn with_clips(clips: Vec<String>) -> Self {
        Self {
            clips,
            selected: Vec::new(),
        }
    }

    /// Replace the clip list wholesale. The selection is always cleared.
    pub fn replace_clips(&mut self, clips: Vec<String>) {
        self.clips = clips;
        self.selected.clear();
    }

    pub fn clips(&self) -> &[String] {
        &self.clips
    }

    pub fn clip(&self, index: usize) -> Option<&str> {
        self.clips.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Selected indices in the order they were picked.
    pub fn selection(&self) -> &[usize] {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// 1-based playback position of a selected clip.
    pub fn selection_rank(&self, index: usize) -> Option<usize> {
        self.selected
            .iter()
            .position(|&i| i == index)
            .map(|pos| pos + 1)
    }

    /// Flip membership of `index` in the selection.
    ///
    /// Returns `true` when the clip is selected after the call. Removing keeps
    /// the relative order of the remaining entries; adding appends.
    pub fn toggle(&mut self, index: usize) -> ClipResult<bool> {
        if index >= self.clips.len() {
            return Err(ClipError::IndexOutOfRange {
                index,
                len: self.clips.len(),
            });
        }

        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(index);
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected clip names in playback order.
    pub fn selected_clips(&self) -> Vec<&str> {
        self.selected
            .iter()
            .filter_map(|&i| self.clip(i))
            .collect()
    }
}
