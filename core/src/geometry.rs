//! Planar geometry shared by the world, systems, and adapters.

use serde::{Deserialize, Serialize};

/// Position in arena space measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Point {
    /// Arena origin in the upper-left corner.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Unit vector pointing from `self` toward `target`.
    ///
    /// Returns `None` when both points coincide, since no direction exists.
    #[must_use]
    pub fn direction_to(self, target: Point) -> Option<Vector> {
        Vector::new(target.x - self.x, target.y - self.y).normalized()
    }

    /// Returns the point displaced by the provided vector.
    #[must_use]
    pub fn translated(self, offset: Vector) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }
}

/// Displacement or velocity in arena space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f32,
    /// Vertical component.
    pub dy: f32,
}

impl Vector {
    /// Vector with no magnitude.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Unit-length copy of the vector, or `None` for degenerate input.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let length = self.length();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        Some(Self::new(self.dx / length, self.dy / length))
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }
}

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its origin and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether the point lies strictly inside the rectangle.
    ///
    /// Points on an edge are outside, so an entity can slide flush along a wall.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x > self.x
            && point.x < self.x + self.width
            && point.y > self.y
            && point.y < self.y + self.height
    }
}

/// Playable extent of the arena, supplied by the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    width: f32,
    height: f32,
}

impl ArenaBounds {
    /// Creates bounds spanning `[0, width] x [0, height]`.
    ///
    /// Negative or non-finite extents collapse to zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Horizontal extent of the arena.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the arena.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether the point lies within the arena, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
