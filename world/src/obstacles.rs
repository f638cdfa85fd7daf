//! Static obstacle layout.

use arena_core::{Point, Rect};

/// Immutable set of rectangles that block movement and projectiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct ObstacleMap {
    rects: Vec<Rect>,
}

impl ObstacleMap {
    pub(crate) fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    /// Reports whether any obstacle strictly contains the point.
    pub(crate) fn blocked(&self, point: Point) -> bool {
        self.rects.iter().any(|rect| rect.contains_point(point))
    }

    pub(crate) fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub(crate) fn len(&self) -> usize {
        self.rects.len()
    }
}
