//! # View Frustum Culling
//!
//! Visibility tests of axis-aligned boxes against the camera frustum.
//!
//! The frustum keeps five clip-space planes (left, right, bottom, top, near) taken
//! from row combinations of the view-projection matrix, plus its eight world-space
//! corners. The far plane is not tested: chunks beyond it are already excluded by
//! the render distance.
//!
//! `is_inside` first checks whether any box corner lies inside all five planes.
//! If none does, it tests the six world axes for a separating plane between the
//! box and the frustum corners. Anything neither test can decide is reported as
//! visible, so the test may over-draw but never drops a visible box.

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, SquareMatrix, Vector4};

/// Clip-space relative tolerance for the plane tests, scaled by `max(|w|, 1)`.
const PLANE_EPSILON: f32 = 1e-6;

/// The eight corners of the normalized device coordinate cube.
#[rustfmt::skip]
const NDC_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [-1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0],
];

/// An axis-aligned bounding box in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(min.x, max.y, max.z),
            Point3::new(max.x, max.y, max.z),
        ]
    }
}

/// A view frustum built from a combined projection × view matrix.
#[derive(Copy, Clone, Debug)]
pub struct Frustum {
    view_projection: Matrix4<f32>,
    /// Left, right, bottom, top, near.
    planes: [Vector4<f32>; 5],
    corners: [Point3<f32>; 8],
}

impl Frustum {
    /// Builds the frustum from `view_projection` and its precomputed inverse.
    ///
    /// # Arguments
    /// * `view_projection` - Projection × view matrix (OpenGL clip conventions)
    /// * `inverse` - The inverse of `view_projection`
    pub fn new(view_projection: Matrix4<f32>, inverse: Matrix4<f32>) -> Self {
        let m = view_projection;
        let planes = [
            m.row(3) + m.row(0),
            m.row(3) - m.row(0),
            m.row(3) + m.row(1),
            m.row(3) - m.row(1),
            m.row(3) + m.row(2),
        ];

        let corners = NDC_CORNERS.map(|[x, y, z]| {
            let p = inverse * Vector4::new(x, y, z, 1.0);
            // Homogeneous divide; a degenerate w leaves the raw point.
            if p.w.abs() > f32::EPSILON {
                Point3::new(p.x / p.w, p.y / p.w, p.z / p.w)
            } else {
                Point3::new(p.x, p.y, p.z)
            }
        });

        Self {
            view_projection,
            planes,
            corners,
        }
    }

    /// Builds the frustum, inverting `view_projection` itself.
    ///
    /// # Returns
    /// `None` if the matrix is singular.
    pub fn from_view_projection(view_projection: Matrix4<f32>) -> Option<Self> {
        view_projection
            .invert()
            .map(|inverse| Self::new(view_projection, inverse))
    }

    /// World-space frustum corners, near plane first.
    pub fn corners(&self) -> &[Point3<f32>; 8] {
        &self.corners
    }

    /// `true` if a point, given in homogeneous world coordinates, is on the inner
    /// side of all five planes.
    fn inside_all_planes(&self, point: Vector4<f32>) -> bool {
        let w = self.planes_w(point);
        let eps = PLANE_EPSILON * w.abs().max(1.0);
        self.planes.iter().all(|plane| -plane.dot(point) <= eps)
    }

    #[inline]
    fn planes_w(&self, point: Vector4<f32>) -> f32 {
        self.view_projection.row(3).dot(point)
    }

    /// Conservative visibility test of a box against the frustum.
    ///
    /// # Returns
    /// `false` only when the box is provably outside.
    pub fn is_inside(&self, aabb: &Aabb) -> bool {
        let any_corner_inside = aabb
            .corners()
            .iter()
            .any(|corner| self.inside_all_planes(corner.to_homogeneous()));
        if any_corner_inside {
            return true;
        }

        let separated = [
            self.corners.iter().all(|c| c.x > aabb.max.x),
            self.corners.iter().all(|c| c.x < aabb.min.x),
            self.corners.iter().all(|c| c.y > aabb.max.y),
            self.corners.iter().all(|c| c.y < aabb.min.y),
            self.corners.iter().all(|c| c.z > aabb.max.z),
            self.corners.iter().all(|c| c.z < aabb.min.z),
        ];
        !separated.contains(&true)
    }
}
