//! Geometric primitives for diagram layout and legend placement.
//!
//! This module provides the value types used throughout Callout to describe
//! where regions sit on screen and where legend labels are placed.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Callout uses the SVG coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Every rectangle is expressed relative to some coordinate space (usually a
//! layout node). Moving a rectangle into its parent's space is a matter of
//! [`Bounds::translate`] by the child's origin.

use serde::Deserialize;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use callout_core::geometry::Point;
/// let origin = Point::new(10.0, 20.0);
/// let moved = origin.add_point(Point::new(5.0, -5.0));
/// assert_eq!(moved.x(), 15.0);
/// assert_eq!(moved.y(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
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
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new size with the specified width
    pub fn with_width(self, width: f32) -> Self {
        Self { width, ..self }
    }

    /// Returns a new size with the specified height
    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Returns the component-wise maximum of two sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new size grown by the given insets
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns a new size shrunk by the given insets, never below zero
    pub fn sub_padding(self, insets: Insets) -> Self {
        Self {
            width: (self.width - insets.horizontal_sum()).max(0.0),
            height: (self.height - insets.vertical_sum()).max(0.0),
        }
    }
}

/// An axis-aligned rectangle with minimum and maximum coordinates.
///
/// # Examples
///
/// ```
/// # use callout_core::geometry::{Bounds, Point, Size};
/// let bounds = Bounds::new_from_top_left(Point::new(30.0, 0.0), Size::new(20.0, 10.0));
/// assert_eq!(bounds.center_x(), 40.0);
/// assert!(bounds.contains_x(30.0));
/// assert!(bounds.contains_x(50.0));
/// assert!(!bounds.contains_x(50.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates new bounds centered on `center`
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

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the horizontal center of the bounds
    pub fn center_x(self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    /// Returns the vertical center of the bounds
    pub fn center_y(self) -> f32 {
        (self.min_y + self.max_y) / 2.0
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a [`Size`]
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns true if `x` lies within the horizontal span, edges included.
    pub fn contains_x(self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }

    /// Returns true if `point` lies inside the bounds, edges included.
    pub fn contains(self, point: Point) -> bool {
        self.contains_x(point.x) && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Moves the bounds by the specified offset.
    ///
    /// # Examples
    ///
    /// ```
    /// # use callout_core::geometry::{Bounds, Point, Size};
    /// let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(50.0, 30.0));
    /// let moved = bounds.translate(Point::new(100.0, 50.0));
    /// assert_eq!(moved.min_x(), 110.0);
    /// assert_eq!(moved.min_y(), 70.0);
    /// assert_eq!(moved.width(), 50.0);
    /// ```
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

/// Spacing around an element, with potentially different values per side.
///
/// Deserializes either from a single number (uniform) or from a table with
/// `top`, `right`, `bottom` and `left` keys, each defaulting to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "InsetsRepr")]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InsetsRepr {
    Uniform(f32),
    Sides {
        #[serde(default)]
        top: f32,
        #[serde(default)]
        right: f32,
        #[serde(default)]
        bottom: f32,
        #[serde(default)]
        left: f32,
    },
}

impl From<InsetsRepr> for Insets {
    fn from(repr: InsetsRepr) -> Self {
        match repr {
            InsetsRepr::Uniform(value) => Insets::uniform(value),
            InsetsRepr::Sides {
                top,
                right,
                bottom,
                left,
            } => Insets::new(top, right, bottom, left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_size_padding() {
        let size = Size::new(10.0, 20.0);
        let padded = size.add_padding(Insets::uniform(5.0));
        assert_eq!(padded, Size::new(20.0, 30.0));
        assert_eq!(padded.sub_padding(Insets::uniform(5.0)), size);

        // Shrinking never goes negative
        let shrunk = size.sub_padding(Insets::uniform(50.0));
        assert_eq!(shrunk, Size::default());
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(30.0, 40.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
        assert_eq!(bounds.to_size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn test_bounds_zero_width_span() {
        let bounds = Bounds::new_from_center(Point::new(42.0, 0.0), Size::new(0.0, 10.0));

        assert_eq!(bounds.min_x(), bounds.max_x());
        assert_eq!(bounds.center_x(), 42.0);
        assert!(bounds.contains_x(42.0));
        assert!(!bounds.contains_x(42.1));
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(10.0, 10.0)));
        assert!(!bounds.contains(Point::new(10.5, 5.0)));
        assert!(!bounds.contains(Point::new(5.0, -0.5)));
    }

    #[test]
    fn test_bounds_translate_keeps_size() {
        let bounds = Bounds::new_from_top_left(Point::new(3.0, 4.0), Size::new(5.0, 6.0));
        let moved = bounds.translate(Point::new(100.0, -20.0));

        assert_eq!(moved.min_point(), Point::new(103.0, -16.0));
        assert_eq!(moved.to_size(), bounds.to_size());
    }

    #[derive(Deserialize)]
    struct Holder {
        insets: Insets,
    }

    #[test]
    fn test_insets_deserialize_uniform() {
        let holder: Holder = toml::from_str("insets = 40").unwrap();
        assert_eq!(holder.insets, Insets::uniform(40.0));
    }

    #[test]
    fn test_insets_deserialize_sides() {
        let holder: Holder = toml::from_str("insets = { top = 1, left = 4 }").unwrap();
        assert_eq!(holder.insets, Insets::new(1.0, 0.0, 0.0, 4.0));
        assert_eq!(holder.insets.horizontal_sum(), 4.0);
        assert_eq!(holder.insets.vertical_sum(), 1.0);
    }
}
