//! Points tagged with the frame they are expressed in

use std::ops::Mul;

use glam::DVec3;

use super::error::SceneError;
use super::tree::{NodeId, Scene};

/// A 2D point in the local coordinate system of a scene node.
///
/// A `frame` of `None` marks a frame-independent vector: the result of
/// arithmetic such as midpoints and normals, which is never re-localized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub frame: Option<NodeId>,
}

impl Point {
    pub fn new(x: f64, y: f64, frame: Option<NodeId>) -> Self {
        Self { x, y, frame }
    }

    /// A point in the given node's frame
    pub fn at(frame: NodeId, x: f64, y: f64) -> Self {
        Self::new(x, y, Some(frame))
    }

    /// A frame-independent vector
    pub fn vector(x: f64, y: f64) -> Self {
        Self::new(x, y, None)
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Homogeneous column `[x, y, 1]ᵗ`
    pub fn to_matrix_column(&self) -> DVec3 {
        DVec3::new(self.x, self.y, 1.0)
    }

    /// Convert this point into the frame of `target`.
    ///
    /// `target == None` converts into the document's global frame. A point
    /// without a frame is a free vector and keeps its coordinates.
    pub fn localize(&self, scene: &Scene, target: Option<NodeId>) -> Result<Point, SceneError> {
        let Some(frame) = self.frame else {
            return Ok(Point::new(self.x, self.y, target));
        };
        if Some(frame) == target {
            return Ok(*self);
        }
        let global_self = scene.global_transform(frame);
        let global_target = match target {
            Some(target) => scene.global_transform(target),
            None => glam::DMat3::IDENTITY,
        };
        let inverse = global_target.inverse();
        if global_target.determinant() == 0.0 || !inverse.is_finite() {
            let name = target.map(|t| scene.describe(t)).unwrap_or_default();
            return Err(SceneError::SingularTransform { frame: name });
        }
        let v = inverse * global_self * self.to_matrix_column();
        Ok(Point::new(v.x / v.z, v.y / v.z, target))
    }

    /// Vector sum, `other` localized into this point's frame first
    pub fn add(&self, other: &Point, scene: &Scene) -> Result<Point, SceneError> {
        let other = self.align(other, scene)?;
        Ok(Point::new(self.x + other.x, self.y + other.y, self.frame))
    }

    /// Vector difference, `other` localized into this point's frame first
    pub fn subtract(&self, other: &Point, scene: &Scene) -> Result<Point, SceneError> {
        let other = self.align(other, scene)?;
        Ok(Point::new(self.x - other.x, self.y - other.y, self.frame))
    }

    fn align(&self, other: &Point, scene: &Scene) -> Result<Point, SceneError> {
        if other.frame.is_none() {
            return Ok(*other);
        }
        other.localize(scene, self.frame)
    }

    /// Componentwise multiplication, frame unchanged
    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor, self.frame)
    }

    /// Euclidean distance between the raw coordinates
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point at `factor` along the way from `self` to `other`
    pub fn partwise(&self, other: &Point, factor: f64) -> Point {
        Point::vector(
            self.x + (other.x - self.x) * factor,
            self.y + (other.y - self.y) * factor,
        )
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        self.partwise(other, 0.5)
    }

    /// Unit vector pointing from `self` toward `other`
    pub fn normalize(&self, other: &Point) -> Result<Point, SceneError> {
        let length = self.distance(other);
        if length == 0.0 {
            return Err(SceneError::DegenerateVector);
        }
        Ok(Point::vector(
            (other.x - self.x) / length,
            (other.y - self.y) / length,
        ))
    }

    /// Rotate the vector `(x, y)` about the origin, frame unchanged
    pub fn rotate(&self, angle_degrees: f64) -> Point {
        let (sin_a, cos_a) = angle_degrees.to_radians().sin_cos();
        Point::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
            self.frame,
        )
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, factor: f64) -> Point {
        self.scale(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::transform::Transform;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_arithmetic_in_one_frame() {
        let scene = Scene::new(100.0, 100.0);
        let root = scene.root();
        let a = Point::at(root, 1.0, 2.0);
        let b = Point::at(root, 3.0, 5.0);

        let sum = a.add(&b, &scene).unwrap();
        assert_eq!(sum, Point::at(root, 4.0, 7.0));
        let diff = b.subtract(&a, &scene).unwrap();
        assert_eq!(diff, Point::at(root, 2.0, 3.0));
        assert_eq!(a * 2.0, Point::at(root, 2.0, 4.0));
    }

    #[test]
    fn test_add_localizes_other_frame() {
        let mut scene = Scene::new(100.0, 100.0);
        let root = scene.root();
        let group = scene.insert_group(root).unwrap();
        scene
            .push_transform(group, Transform::translate(10.0, 20.0))
            .unwrap();

        // (10, 20) in the root frame is the group's origin
        let origin = Point::at(root, 10.0, 20.0);
        let p = Point::at(group, 1.0, 1.0);
        let sum = p.add(&origin, &scene).unwrap();
        assert!(approx_eq(sum.x, 1.0));
        assert!(approx_eq(sum.y, 1.0));
        assert_eq!(sum.frame, Some(group));
    }

    #[test]
    fn test_free_vector_is_not_localized() {
        let mut scene = Scene::new(100.0, 100.0);
        let root = scene.root();
        let group = scene.insert_group(root).unwrap();
        scene
            .push_transform(group, Transform::uniform_scale(3.0))
            .unwrap();

        let p = Point::at(group, 1.0, 1.0);
        let moved = p.add(&Point::vector(2.0, 0.0), &scene).unwrap();
        assert_eq!(moved, Point::at(group, 3.0, 1.0));
    }

    #[test]
    fn test_midpoint_and_partwise_are_frame_free() {
        let scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let a = Point::at(root, 0.0, 0.0);
        let b = Point::at(root, 10.0, 4.0);
        assert_eq!(a.midpoint(&b), Point::vector(5.0, 2.0));
        assert_eq!(a.partwise(&b, 0.25), Point::vector(2.5, 1.0));
    }

    #[test]
    fn test_distance_and_normalize() {
        let a = Point::vector(0.0, 0.0);
        let b = Point::vector(3.0, 4.0);
        assert!(approx_eq(a.distance(&b), 5.0));
        let n = a.normalize(&b).unwrap();
        assert!(approx_eq(n.x, 0.6));
        assert!(approx_eq(n.y, 0.8));
    }

    #[test]
    fn test_normalize_zero_length_fails() {
        let a = Point::vector(2.0, 2.0);
        let err = a.normalize(&a).unwrap_err();
        assert!(matches!(err, SceneError::DegenerateVector));
    }

    #[test]
    fn test_rotate_keeps_frame() {
        let scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let r = Point::at(root, 1.0, 0.0).rotate(90.0);
        assert!(approx_eq(r.x, 0.0));
        assert!(approx_eq(r.y, 1.0));
        assert_eq!(r.frame, Some(root));
    }

    #[test]
    fn test_localize_into_singular_frame_fails() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        let flat = scene.insert_group(root).unwrap();
        scene
            .push_transform(flat, Transform::scale(1.0, 0.0))
            .unwrap();

        let err = Point::at(root, 1.0, 1.0)
            .localize(&scene, Some(flat))
            .unwrap_err();
        assert!(matches!(err, SceneError::SingularTransform { .. }));
    }

    #[test]
    fn test_matrix_column() {
        let p = Point::vector(2.0, 3.0);
        assert_eq!(p.to_matrix_column(), DVec3::new(2.0, 3.0, 1.0));
    }
}
