//! Immediate-mode line geometry rebuilt every frame
//!
//! A manual object alternates between two states. While *building*, lines can
//! be appended. `end()` submits what was built as the visible geometry and
//! closes the buffer; `begin()` reopens an empty one. The physics debug
//! renderer relies on this to redraw collider outlines once per frame.

use glam::Vec3;

use super::components::Colour;

/// A single coloured line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
    pub colour: Colour,
}

/// Error from writing to a manual object outside `begin()`/`end()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotBuilding;

/// Line buffer with a begin/end edit lifecycle
#[derive(Debug, Clone)]
pub struct ManualObject {
    /// Lines written since the last `begin()`
    building: Vec<Line>,
    /// Lines visible since the last `end()`
    submitted: Vec<Line>,
    is_building: bool,
    /// Number of completed `end()` calls
    submissions: u64,
}

impl ManualObject {
    /// Create a manual object that is already building
    #[must_use]
    pub fn new() -> Self {
        Self {
            building: Vec::new(),
            submitted: Vec::new(),
            is_building: true,
            submissions: 0,
        }
    }

    /// Start a fresh edit, discarding anything built but not submitted
    pub fn begin(&mut self) {
        self.building.clear();
        self.is_building = true;
    }

    /// Submit the lines built since `begin()`
    ///
    /// # Errors
    ///
    /// Returns [`NotBuilding`] if `begin()` was not called first
    pub fn end(&mut self) -> Result<(), NotBuilding> {
        if !self.is_building {
            return Err(NotBuilding);
        }
        std::mem::swap(&mut self.building, &mut self.submitted);
        self.building.clear();
        self.is_building = false;
        self.submissions += 1;
        Ok(())
    }

    /// Append a line to the edit in progress
    ///
    /// # Errors
    ///
    /// Returns [`NotBuilding`] outside `begin()`/`end()`
    pub fn add_line(&mut self, start: Vec3, end: Vec3, colour: Colour) -> Result<(), NotBuilding> {
        if !self.is_building {
            return Err(NotBuilding);
        }
        self.building.push(Line { start, end, colour });
        Ok(())
    }

    /// Whether lines can currently be added
    #[must_use]
    pub const fn is_building(&self) -> bool {
        self.is_building
    }

    /// Lines made visible by the last `end()`
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.submitted
    }

    /// Number of lines in the edit in progress
    #[must_use]
    pub fn pending_lines(&self) -> usize {
        self.building.len()
    }

    /// Number of completed submissions
    #[must_use]
    pub const fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl Default for ManualObject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_object_accepts_lines() {
        let mut lines = ManualObject::new();
        assert!(lines.is_building());
        lines.add_line(Vec3::ZERO, Vec3::X, Colour::RED).unwrap();
        assert_eq!(lines.pending_lines(), 1);
        assert!(lines.lines().is_empty());
    }

    #[test]
    fn test_end_submits_and_closes() {
        let mut lines = ManualObject::new();
        lines.add_line(Vec3::ZERO, Vec3::X, Colour::RED).unwrap();
        lines.add_line(Vec3::ZERO, Vec3::Y, Colour::GREEN).unwrap();
        lines.end().unwrap();

        assert!(!lines.is_building());
        assert_eq!(lines.lines().len(), 2);
        assert_eq!(lines.lines()[1].end, Vec3::Y);
        assert_eq!(lines.submissions(), 1);

        assert_eq!(lines.add_line(Vec3::ZERO, Vec3::Z, Colour::BLUE), Err(NotBuilding));
        assert_eq!(lines.end(), Err(NotBuilding));
    }

    #[test]
    fn test_begin_keeps_submitted_until_next_end() {
        let mut lines = ManualObject::new();
        lines.add_line(Vec3::ZERO, Vec3::X, Colour::RED).unwrap();
        lines.end().unwrap();

        lines.begin();
        assert_eq!(lines.lines().len(), 1);
        assert_eq!(lines.pending_lines(), 0);

        lines.end().unwrap();
        assert!(lines.lines().is_empty());
        assert_eq!(lines.submissions(), 2);
    }

    #[test]
    fn test_begin_twice_discards_partial_edit() {
        let mut lines = ManualObject::new();
        lines.add_line(Vec3::ZERO, Vec3::X, Colour::RED).unwrap();
        lines.begin();
        assert_eq!(lines.pending_lines(), 0);
    }
}
