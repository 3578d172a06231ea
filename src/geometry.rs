//! Fundamental geometric types for planar truss modelling.

use nalgebra::Vector2;

/// Position in the plane of the truss.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Planar force vector applied to a joint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Force {
    /// Force component acting along the global X axis.
    pub x: f64,
    /// Force component acting along the global Y axis.
    pub y: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Force {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Force> for Vector2<f64> {
    fn from(value: Force) -> Self {
        value.to_vector()
    }
}

/// Axis-aligned rectangle enclosing every joint of a truss.
///
/// Drawing collaborators use it to scale and offset the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Lower-left corner.
    pub min: Point,
    /// Upper-right corner.
    pub max: Point,
}

impl BoundingBox {
    /// Smallest box containing all `points`, or `None` when there are none.
    ///
    /// # Examples
    /// ```
    /// use trussjoint::{point, BoundingBox};
    ///
    /// let bounds = BoundingBox::enclosing([point(0.0, 0.0), point(30.0, -20.0)])
    ///     .expect("non-empty");
    /// assert_eq!(bounds.min, point(0.0, -20.0));
    /// assert_eq!(bounds.width(), 30.0);
    /// ```
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bounds, p| BoundingBox {
                min: Point::new(bounds.min.x.min(p.x), bounds.min.y.min(p.y)),
                max: Point::new(bounds.max.x.max(p.x), bounds.max.y.max(p.y)),
            },
        ))
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Unit vector pointing from `from` towards `to`, given the member length.
///
/// The caller guarantees `length` is the non-zero distance between the points.
#[must_use]
pub fn unit_direction(from: Point, to: Point, length: f64) -> Vector2<f64> {
    (to.to_vector() - from.to_vector()) / length
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use trussjoint::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use trussjoint::force;
///
/// let load = force(0.0, -20.0);
/// assert_eq!(load.y, -20.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64) -> Force {
    Force::new(x, y)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn point_to_vector_roundtrip() {
        let origin = Point::new(1.0, 2.0);
        let vector: Vector2<f64> = origin.into();
        assert_eq!(vector, Vector2::new(1.0, 2.0));
        assert_eq!(Point::from(vector), origin);
    }

    #[test]
    fn force_defaults_to_zero() {
        assert_eq!(Force::default(), Force::new(0.0, 0.0));
    }

    #[test]
    fn distance_is_euclidean() {
        assert_relative_eq!(point(0.0, 0.0).distance_to(point(10.0, -20.0)), 500.0_f64.sqrt());
    }

    #[test]
    fn unit_direction_is_normalised() {
        let from = point(15.0, 0.0);
        let to = point(20.0, -20.0);
        let direction = unit_direction(from, to, from.distance_to(to));
        assert_relative_eq!(direction.norm(), 1.0, epsilon = 1.0e-12);
        assert!(direction.x > 0.0 && direction.y < 0.0);
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        assert!(BoundingBox::enclosing(std::iter::empty::<Point>()).is_none());
    }

    #[test]
    fn bounding_box_spans_all_points() {
        let bounds =
            BoundingBox::enclosing([point(10.0, -20.0), point(0.0, 0.0), point(30.0, 5.0)])
                .expect("non-empty");
        assert_eq!(bounds.min, point(0.0, -20.0));
        assert_eq!(bounds.max, point(30.0, 5.0));
        assert_relative_eq!(bounds.height(), 25.0);
    }
}
