//! Bridge from rapier's debug renderer to a scene manual object

use glam::Vec3;
use rapier3d::pipeline::{DebugRenderBackend, DebugRenderObject};
use rapier3d::prelude::*;

use crate::scene::{Colour, ManualObject, NotBuilding};

/// Writes every debug line rapier emits into a [`ManualObject`].
///
/// `draw_line` cannot fail, so the first write rejected by the object is
/// remembered and reported by [`finish`](Self::finish).
pub(crate) struct DebugLineWriter<'a> {
    lines: &'a mut ManualObject,
    written: usize,
    rejected: Option<NotBuilding>,
}

impl<'a> DebugLineWriter<'a> {
    pub(crate) fn new(lines: &'a mut ManualObject) -> Self {
        Self {
            lines,
            written: 0,
            rejected: None,
        }
    }

    /// Number of lines written, or the first rejection
    pub(crate) fn finish(self) -> Result<usize, NotBuilding> {
        match self.rejected {
            Some(error) => Err(error),
            None => Ok(self.written),
        }
    }
}

impl DebugRenderBackend for DebugLineWriter<'_> {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        if self.rejected.is_some() {
            return;
        }
        let start = Vec3::new(a.x, a.y, a.z);
        let end = Vec3::new(b.x, b.y, b.z);
        match self.lines.add_line(start, end, Colour::from_hsla(color)) {
            Ok(()) => self.written += 1,
            Err(error) => self.rejected = Some(error),
        }
    }
}
