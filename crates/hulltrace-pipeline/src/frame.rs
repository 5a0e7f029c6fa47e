//! Image frame geometry: which frame sides a point touches, and snapping
//! near-frame coordinates exactly onto the frame.
//!
//! The frame spans pixel centers, so the far bounds are `width - 1` and
//! `height - 1`: the largest coordinate the mask sampler can produce.
//! Both the hull builder and the path segmenter use this convention.

use crate::types::{Dimensions, Point};

/// One side of the image frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// `y = 0`.
    Top,
    /// `y = height - 1`.
    Bottom,
    /// `x = 0`.
    Left,
    /// `x = width - 1`.
    Right,
}

impl BoundarySide {
    /// All four sides.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    const fn bit(self) -> u8 {
        match self {
            Self::Top => 0b0001,
            Self::Bottom => 0b0010,
            Self::Left => 0b0100,
            Self::Right => 0b1000,
        }
    }
}

/// The set of frame sides a point touches: empty, one side, or two at a
/// corner (more on degenerate one-pixel images).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides(u8);

impl Sides {
    /// No sides.
    pub const NONE: Self = Self(0);

    /// Returns `true` if no side is touched.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `side` is in the set.
    #[must_use]
    pub const fn contains(self, side: BoundarySide) -> bool {
        self.0 & side.bit() != 0
    }

    /// Returns `true` if the two sets share at least one side.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The set with `side` added.
    #[must_use]
    pub const fn with(self, side: BoundarySide) -> Self {
        Self(self.0 | side.bit())
    }

    /// Iterate over the contained sides.
    pub fn iter(self) -> impl Iterator<Item = BoundarySide> {
        BoundarySide::ALL.into_iter().filter(move |&s| self.contains(s))
    }
}

/// The image frame plus the tolerance used to decide frame contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    max_x: f64,
    max_y: f64,
    epsilon: f64,
}

impl Frame {
    /// Frame for an image of the given dimensions.
    ///
    /// Points within `epsilon` (inclusive) of a bound touch that side.
    #[must_use]
    pub fn new(dimensions: Dimensions, epsilon: f64) -> Self {
        Self {
            max_x: f64::from(dimensions.width.saturating_sub(1)),
            max_y: f64::from(dimensions.height.saturating_sub(1)),
            epsilon,
        }
    }

    /// Right bound (`width - 1`).
    #[must_use]
    pub const fn max_x(&self) -> f64 {
        self.max_x
    }

    /// Bottom bound (`height - 1`).
    #[must_use]
    pub const fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Which sides `p` touches.
    #[must_use]
    pub fn sides(&self, p: Point) -> Sides {
        let mut sides = Sides::NONE;
        if p.y.abs() <= self.epsilon {
            sides = sides.with(BoundarySide::Top);
        }
        if (p.y - self.max_y).abs() <= self.epsilon {
            sides = sides.with(BoundarySide::Bottom);
        }
        if p.x.abs() <= self.epsilon {
            sides = sides.with(BoundarySide::Left);
        }
        if (p.x - self.max_x).abs() <= self.epsilon {
            sides = sides.with(BoundarySide::Right);
        }
        sides
    }

    /// Returns `true` if `p` touches any side.
    #[must_use]
    pub fn touches(&self, p: Point) -> bool {
        !self.sides(p).is_empty()
    }

    /// Move each near-frame coordinate of `p` exactly onto its bound.
    ///
    /// Idempotent: a snapped point touches the same sides and snaps to
    /// itself.
    #[must_use]
    pub fn snap(&self, p: Point) -> Point {
        let sides = self.sides(p);
        let mut snapped = p;
        if sides.contains(BoundarySide::Left) {
            snapped.x = 0.0;
        } else if sides.contains(BoundarySide::Right) {
            snapped.x = self.max_x;
        }
        if sides.contains(BoundarySide::Top) {
            snapped.y = 0.0;
        } else if sides.contains(BoundarySide::Bottom) {
            snapped.y = self.max_y;
        }
        snapped
    }

    /// Snap every vertex, producing a new vertex array.
    #[must_use]
    pub fn snap_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.snap(p)).collect()
    }
}
