use std::fmt;

#[cfg(feature = "json_export")]
use json::{array, JsonValue};

/// A point in 2D real space. One is associated with each local node of a [`QuadForest`](crate::forest::quad::QuadForest).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }

    /// The point halfway between `a` and `b`
    pub fn between(a: &Self, b: &Self) -> Self {
        Self::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    pub fn dist(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;

        (dx.powi(2) + dy.powi(2)).sqrt()
    }
}

impl fmt::Display for Point2d {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.10}, {:.10})", self.x, self.y)
    }
}

#[cfg(feature = "json_export")]
impl From<Point2d> for JsonValue {
    fn from(point: Point2d) -> Self {
        array![point.x, point.y]
    }
}

/// A point in 3D real space. One is associated with each local node of an [`OctForest`](crate::forest::oct::OctForest).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    /// The point halfway between `a` and `b`
    pub fn between(a: &Self, b: &Self) -> Self {
        Self::new(
            (a.x + b.x) / 2.0,
            (a.y + b.y) / 2.0,
            (a.z + b.z) / 2.0,
        )
    }

    pub fn dist(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;

        (dx.powi(2) + dy.powi(2) + dz.powi(2)).sqrt()
    }
}

impl fmt::Display for Point3d {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.10}, {:.10}, {:.10})", self.x, self.y, self.z)
    }
}

#[cfg(feature = "json_export")]
impl From<Point3d> for JsonValue {
    fn from(point: Point3d) -> Self {
        array![point.x, point.y, point.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_2d_distances() {
        let a = Point2d::new(0.0, 0.0);
        let b = Point2d::from([3.0, 4.0]);

        assert!((a.dist(&b) - 5.0).abs() < 1e-14);

        let mid = Point2d::between(&a, &b);
        assert!((mid.x - 1.5).abs() < 1e-14);
        assert!((mid.y - 2.0).abs() < 1e-14);
    }

    #[test]
    fn point_3d_distances() {
        let a = Point3d::new(1.0, 1.0, 1.0);
        let b = Point3d::from([1.0, 1.0, 3.5]);

        assert!((a.dist(&b) - 2.5).abs() < 1e-14);

        let mid = Point3d::between(&a, &b);
        assert!((mid.z - 2.25).abs() < 1e-14);
    }
}
