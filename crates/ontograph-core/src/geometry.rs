//! Geometric primitives for diagram pages.
//!
//! This module provides the axis-aligned geometry used to relate shapes
//! on a page.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in page space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle with intersection and containment tests
//!
//! # Coordinate System
//!
//! Page coordinates follow the drawing tool's convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! A rectangle is stored as its top-left origin plus a size. Rectangles with
//! a non-positive width or height are *empty*: they never intersect or
//! contain anything.
//!
//! # Host Notation
//!
//! Documents write points as `{x, y}` and rectangles as `{{x, y}, {w, h}}`.
//! [`Point::parse`] and [`Bounds::parse`] read that notation.

use std::fmt;

use winnow::{
    Parser as _,
    ascii::{float, multispace0},
    combinator::{delimited, separated_pair},
    error::ModalResult,
};

/// A 2D point in page coordinate space.
///
/// # Examples
///
/// ```
/// # use ontograph_core::geometry::Point;
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 20.0);
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

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Parses a point written in host notation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ontograph_core::geometry::Point;
    /// let p = Point::parse("{12.5, -3}").unwrap();
    /// assert_eq!(p, Point::new(12.5, -3.0));
    /// assert!(Point::parse("12, 3").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        pair.parse(text.trim()).ok().map(|(x, y)| Self::new(x, y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x as i64, self.y as i64)
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
}

/// An axis-aligned rectangle defined by its top-left origin and size.
///
/// The relation tests follow bounding-box semantics:
///
/// - [`Bounds::intersects`] is true when the interiors overlap. Touching
///   edges do not count.
/// - [`Bounds::contains`] is true when the other rectangle lies entirely
///   inside this one. Shared edges are allowed, so a rectangle contains
///   itself.
///
/// Both tests are false whenever either rectangle is empty.
///
/// # Examples
///
/// ```
/// # use ontograph_core::geometry::{Bounds, Point, Size};
/// let outer = Bounds::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
/// let inner = Bounds::new(Point::new(10.0, 10.0), Size::new(20.0, 20.0));
///
/// assert!(outer.contains(&inner));
/// assert!(!inner.contains(&outer));
/// assert!(outer.intersects(&inner));
/// assert!(inner.intersects(&outer));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    origin: Point,
    size: Size,
}

impl Bounds {
    /// Creates bounds from a top-left origin and a size
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns the top-left corner
    pub fn origin(self) -> Point {
        self.origin
    }

    /// Returns the size of the rectangle
    pub fn size(self) -> Size {
        self.size
    }

    pub fn min_x(self) -> f64 {
        self.origin.x
    }

    pub fn min_y(self) -> f64 {
        self.origin.y
    }

    pub fn max_x(self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Returns true when the rectangle has no area.
    pub fn is_empty(self) -> bool {
        // Negated comparisons so NaN extents count as empty.
        !(self.size.width > 0.0) || !(self.size.height > 0.0)
    }

    /// Returns true when the interiors of both rectangles overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        other.max_x() > self.min_x()
            && other.max_y() > self.min_y()
            && other.min_x() < self.max_x()
            && other.min_y() < self.max_y()
    }

    /// Returns true when `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ontograph_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let b = Bounds::new(Point::new(20.0, 5.0), Size::new(10.0, 10.0));
    ///
    /// let merged = a.merge(&b);
    /// assert_eq!(merged.min_x(), 0.0);
    /// assert_eq!(merged.max_x(), 30.0);
    /// assert_eq!(merged.max_y(), 15.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Self::new(
            Point::new(min_x, min_y),
            Size::new(max_x - min_x, max_y - min_y),
        )
    }

    /// Parses a rectangle written in host notation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ontograph_core::geometry::Bounds;
    /// let b = Bounds::parse("{{10, 20}, {30.5, 40}}").unwrap();
    /// assert_eq!(b.min_x(), 10.0);
    /// assert_eq!(b.max_x(), 40.5);
    /// assert_eq!(b.max_y(), 60.0);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        rect.parse(text.trim()).ok().map(|((x, y), (w, h))| {
            Self::new(Point::new(x, y), Size::new(w, h))
        })
    }
}

/// Parses a single padded number
fn number(input: &mut &str) -> ModalResult<f64> {
    delimited(multispace0, float, multispace0).parse_next(input)
}

/// Parses `{a, b}`
fn pair(input: &mut &str) -> ModalResult<(f64, f64)> {
    delimited('{', separated_pair(number, ',', number), '}').parse_next(input)
}

/// Parses `{{x, y}, {w, h}}`
fn rect(input: &mut &str) -> ModalResult<((f64, f64), (f64, f64))> {
    delimited(
        ('{', multispace0),
        separated_pair(pair, (multispace0, ',', multispace0), pair),
        (multispace0, '}'),
    )
    .parse_next(input)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -500.0..500.0f64,
            -500.0..500.0f64,
            0.0..300.0f64,
            0.0..300.0f64,
        )
            .prop_map(|(x, y, w, h)| Bounds::new(Point::new(x, y), Size::new(w, h)))
    }

    proptest! {
        #[test]
        fn intersects_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn containment_implies_intersection(a in bounds_strategy(), b in bounds_strategy()) {
            if a.contains(&b) {
                prop_assert!(a.intersects(&b));
            }
        }

        #[test]
        fn empty_bounds_never_intersect(a in bounds_strategy(), x in -500.0..500.0f64, y in -500.0..500.0f64) {
            let empty = Bounds::new(Point::new(x, y), Size::new(0.0, 10.0));
            prop_assert!(!a.intersects(&empty));
            prop_assert!(!a.contains(&empty));
        }

        #[test]
        fn merge_is_commutative(a in bounds_strategy(), b in bounds_strategy()) {
            prop_assert_eq!(a.merge(&b), b.merge(&a));
        }
    }
}
