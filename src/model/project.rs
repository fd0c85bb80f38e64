use crate::foundation::core::Canvas;
use crate::model::frame::FrameData;

/// A canvas plus the ordered frame stack placed on it.
///
/// Frame order is both spatial layering (later frames draw on top) and
/// temporal playback/export order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Ordered frame stack.
    pub frames: Vec<FrameData>,
}

impl Project {
    /// New project with an empty frame stack.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frames: Vec::new(),
        }
    }

    /// Indices of frames participating in default export/playback.
    pub fn enabled_indices(&self) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.disabled)
            .map(|(i, _)| i)
            .collect()
    }

    /// Duplicate the frames at `indices`, inserting the copies (in selection
    /// order) directly after the last selected frame. Returns the indices of
    /// the inserted copies. Out-of-range indices are ignored.
    pub fn duplicate(&mut self, indices: &[usize]) -> Vec<usize> {
        let mut selected: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.frames.len())
            .collect();
        selected.sort_unstable();
        selected.dedup();
        let Some(&last) = selected.last() else {
            return Vec::new();
        };

        let copies: Vec<FrameData> = selected.iter().map(|&i| self.frames[i].clone()).collect();
        let insert_at = last + 1;
        let new_indices: Vec<usize> = (insert_at..insert_at + copies.len()).collect();
        self.frames.splice(insert_at..insert_at, copies);
        new_indices
    }

    /// Reverse the order of the frames at `indices`, leaving all other frames
    /// in place. Out-of-range indices are ignored.
    pub fn reverse(&mut self, indices: &[usize]) {
        let mut selected: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.frames.len())
            .collect();
        selected.sort_unstable();
        selected.dedup();

        let mut lo = 0;
        let mut hi = selected.len();
        while lo + 1 < hi {
            hi -= 1;
            self.frames.swap(selected[lo], selected[hi]);
            lo += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/project.rs"]
mod tests;
