//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Defined by minimum and maximum corner points. The diagonal of a mesh's
/// AABB is the natural length scale used throughout the registration
/// pipeline for tolerances and kernel widths.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 4.0, 0.0),
/// );
///
/// assert!((aabb.diagonal() - 5.0).abs() < 1e-12);
/// assert!(aabb.contains(&Point3::new(1.0, 1.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    ///
    /// The corners are swapped per-axis if min > max.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an empty (inverted) AABB.
    ///
    /// An empty AABB has min > max, which is the identity for
    /// [`Aabb::expand_to_include`].
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB from an iterator of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Check if the AABB is empty (has no valid volume).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the size (dimensions) of the AABB.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the center of the AABB.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Get the diagonal length of the AABB.
    ///
    /// This is the "object size" used to scale registration tolerances
    /// and robust-kernel widths.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Check if the AABB contains a point.
    ///
    /// Points on the boundary are considered inside.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Squared distance from a point to the box.
    ///
    /// Zero for points inside or on the boundary. This is the lower bound
    /// used to prune subtrees during nearest-surface-point descent.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    ///
    /// assert_eq!(aabb.distance_squared_to(&Point3::new(0.5, 0.5, 0.5)), 0.0);
    /// assert!((aabb.distance_squared_to(&Point3::new(3.0, 0.5, 0.5)) - 4.0).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, point: &Point3<f64>) -> f64 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - self.max.y);
        let dz = (self.min.z - point.z).max(0.0).max(point.z - self.max.z);
        dz.mul_add(dz, dx.mul_add(dx, dy * dy))
    }

    /// Compute the union (enclosing AABB) of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Expand the AABB to include a point.
    ///
    /// Modifies the AABB in place.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Expand the AABB by a uniform margin on all sides.
    ///
    /// Negative margins shrink the box.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point3::new(
                self.min.x - margin,
                self.min.y - margin,
                self.min.z - margin,
            ),
            max: Point3::new(
                self.max.x + margin,
                self.max.y + margin,
                self.max.z + margin,
            ),
        }
    }

    /// Get the index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_points() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 3.0),
            Point3::new(-2.0, 8.0, 1.0),
        ];

        let aabb = Aabb::from_points(points.iter());
        assert!((aabb.min.x - (-2.0)).abs() < f64::EPSILON);
        assert!((aabb.min.y - 0.0).abs() < f64::EPSILON);
        assert!((aabb.min.z - 0.0).abs() < f64::EPSILON);
        assert!((aabb.max.x - 10.0).abs() < f64::EPSILON);
        assert!((aabb.max.y - 8.0).abs() < f64::EPSILON);
        assert!((aabb.max.z - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn aabb_empty() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
    }

    #[test]
    fn aabb_contains() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));

        assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
        assert!(aabb.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(aabb.contains(&Point3::new(10.0, 10.0, 10.0)));
        assert!(!aabb.contains(&Point3::new(-1.0, 5.0, 5.0)));
    }

    #[test]
    fn aabb_diagonal() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 2.0));
        assert!((aabb.diagonal() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn aabb_distance_squared_inside_is_zero() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(aabb.distance_squared_to(&Point3::new(0.5, 0.5, 0.5)).abs() < f64::EPSILON);
        // Boundary counts as inside
        assert!(aabb.distance_squared_to(&Point3::new(1.0, 1.0, 1.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn aabb_distance_squared_outside() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        // Straight out along one axis
        assert!((aabb.distance_squared_to(&Point3::new(2.0, 0.5, 0.5)) - 1.0).abs() < 1e-12);
        // Corner distance: (1,1,1) away from (2,2,2)
        assert!((aabb.distance_squared_to(&Point3::new(2.0, 2.0, 2.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn aabb_union() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 5.0, 5.0));
        let b = Aabb::new(Point3::new(3.0, 3.0, 3.0), Point3::new(10.0, 10.0, 10.0));
        let u = a.union(&b);
        assert!((u.min.x - 0.0).abs() < f64::EPSILON);
        assert!((u.max.x - 10.0).abs() < f64::EPSILON);

        // Union with empty is identity
        let u2 = a.union(&Aabb::empty());
        assert_eq!(u2, a);
    }

    #[test]
    fn aabb_expanded() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
        let expanded = aabb.expanded(2.0);
        assert!((expanded.min.x - (-2.0)).abs() < f64::EPSILON);
        assert!((expanded.max.x - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn aabb_longest_axis() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 10.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
    }
}
