//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the fundamental geometric types used throughout Nodemap
//! for calculating positions, sizes, and bounding rectangles of boxes and nodes.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or vector) in world space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Nodemap uses the screen convention shared with SVG and canvas rendering:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Boxes are anchored at their top-left corner, nodes at their center.

/// Distances below this value are treated as coincident.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// A 2D point representing a position (or a displacement) in world space.
///
/// # Examples
///
/// ```
/// # use nodemap_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates the unit vector pointing at `angle` radians
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the Euclidean length of the vector from the origin
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector with the same direction.
    ///
    /// Vectors shorter than [`COINCIDENT_EPSILON`] have no direction, so
    /// `fallback` is returned instead.
    pub fn normalize_or(self, fallback: Point) -> Self {
        let length = self.hypot();
        if length < COINCIDENT_EPSILON {
            fallback
        } else {
            self.scale(1.0 / length)
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the larger of the two dimensions
    pub fn max_dimension(self) -> f64 {
        self.width.max(self.height)
    }
}

/// A rectangle described by its minimum and maximum coordinates.
///
/// # Examples
///
/// ```
/// # use nodemap_core::geometry::{Bounds, Point, Size};
/// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
/// let b = Bounds::new_from_top_left(Point::new(150.0, 0.0), Size::new(100.0, 50.0));
///
/// assert!(!a.overlaps(&b, 10.0));
/// assert!(a.overlaps(&b, 25.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds centered on `center` with the given size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;

        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates bounds whose top-left corner is `top_left`
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the smallest bounds enclosing every item, or `None` for an empty iterator.
    pub fn enclosing(items: impl IntoIterator<Item = Bounds>) -> Option<Self> {
        items
            .into_iter()
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `padding` on every side
    pub fn expand(&self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    /// Returns true if the point lies inside or on the edge of the bounds
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Tests whether two rectangles overlap once each is expanded by `padding`.
    ///
    /// The rectangles only count as separated when a strict gap exists on at
    /// least one axis; touching edges overlap. Because both sides are padded,
    /// the required clearance between the original rectangles is `2 * padding`.
    pub fn overlaps(&self, other: &Self, padding: f64) -> bool {
        let a = self.expand(padding);
        let b = other.expand(padding);

        let separated_x = a.max_x < b.min_x || b.max_x < a.min_x;
        let separated_y = a.max_y < b.min_y || b.max_y < a.min_y;

        !(separated_x || separated_y)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn padding_strategy() -> impl Strategy<Value = f64> {
        0.0f64..100.0
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Overlap is symmetric in its two arguments.
    fn check_overlap_is_symmetric(a: Bounds, b: Bounds, padding: f64) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.overlaps(&b, padding), b.overlaps(&a, padding));
        Ok(())
    }

    /// Growing the padding can only turn separated rectangles into overlapping ones.
    fn check_overlap_is_monotonic_in_padding(
        a: Bounds,
        b: Bounds,
        padding: f64,
    ) -> Result<(), TestCaseError> {
        if a.overlaps(&b, padding) {
            prop_assert!(a.overlaps(&b, padding + 10.0));
        }
        Ok(())
    }

    /// Normalized non-zero vectors have unit length.
    fn check_normalize_has_unit_length(p: Point) -> Result<(), TestCaseError> {
        prop_assume!(p.hypot() > 1e-6);
        let unit = p.normalize_or(Point::new(1.0, 0.0));
        prop_assert!(approx_eq!(f64, unit.hypot(), 1.0, epsilon = 1e-9));
        Ok(())
    }

    /// Merged bounds should contain both original bounds.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        for b in [b1, b2] {
            prop_assert!(merged.min_x() <= b.min_x());
            prop_assert!(merged.min_y() <= b.min_y());
            prop_assert!(merged.max_x() >= b.max_x());
            prop_assert!(merged.max_y() >= b.max_y());
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in bounds_strategy(), b in bounds_strategy(), padding in padding_strategy()) {
            check_overlap_is_symmetric(a, b, padding)?;
        }

        #[test]
        fn overlap_is_monotonic_in_padding(a in bounds_strategy(), b in bounds_strategy(), padding in padding_strategy()) {
            check_overlap_is_monotonic_in_padding(a, b, padding)?;
        }

        #[test]
        fn normalize_has_unit_length(p in point_strategy()) {
            check_normalize_has_unit_length(p)?;
        }

        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }
    }
}
