//! Vector geometry primitives shared by the solid elements.
//!
//! Non-planar faces are approximated by triangles; solids are treated as
//! prismatoids between two end faces or, for tetrahedra, as a single
//! signed tetrahedral volume.

use nalgebra::Vector3;

use crate::error::{Result, SolidError};

/// Half the magnitude of `a × b`: the area of the triangle spanned by the
/// edge vectors `a` and `b`.
pub fn area(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    0.5 * a.cross(b).norm()
}

/// Signed volume of the tetrahedron `n1..n4`:
///
/// V = (n1 − n4) · ((n2 − n4) × (n3 − n4)) / 6
///
/// The sign follows the vertex winding. Callers that need a physical volume
/// take the absolute value themselves.
pub fn volume4(
    n1: &Vector3<f64>,
    n2: &Vector3<f64>,
    n3: &Vector3<f64>,
    n4: &Vector3<f64>,
) -> f64 {
    (n1 - n4).dot(&(n2 - n4).cross(&(n3 - n4))) / 6.0
}

pub fn triangle_centroid(n1: &Vector3<f64>, n2: &Vector3<f64>, n3: &Vector3<f64>) -> Vector3<f64> {
    (n1 + n2 + n3) / 3.0
}

/// Vector area of triangle `n1, n2, n3` (normal direction, magnitude = area).
pub fn triangle_normal(n1: &Vector3<f64>, n2: &Vector3<f64>, n3: &Vector3<f64>) -> Vector3<f64> {
    0.5 * (n2 - n1).cross(&(n3 - n1))
}

/// Vector area of the (possibly warped) quadrilateral `n1..n4`, taken from
/// the cross product of its diagonals.
pub fn quad_normal(
    n1: &Vector3<f64>,
    n2: &Vector3<f64>,
    n3: &Vector3<f64>,
    n4: &Vector3<f64>,
) -> Vector3<f64> {
    0.5 * (n3 - n1).cross(&(n4 - n2))
}

/// Area and centroid of a quadrilateral face.
///
/// The face is split into triangles (n1, n2, n4) and (n2, n3, n4); the
/// result is the summed area and the area-weighted mean of the two triangle
/// centroids.
pub fn area_centroid(
    n1: &Vector3<f64>,
    n2: &Vector3<f64>,
    n3: &Vector3<f64>,
    n4: &Vector3<f64>,
    tolerance: f64,
) -> Result<(f64, Vector3<f64>)> {
    let area1 = area(&(n1 - n2), &(n2 - n4));
    let c1 = triangle_centroid(n1, n2, n4);

    let area2 = area(&(n2 - n4), &(n2 - n3));
    let c2 = triangle_centroid(n2, n3, n4);

    let total = area1 + area2;
    if total <= tolerance {
        return Err(SolidError::DegenerateGeometry(format!(
            "quadrilateral face area {total:e} is at or below tolerance {tolerance:e}"
        )));
    }
    Ok((total, (c1 * area1 + c2 * area2) / total))
}

/// End face of a prismatoid: area, centroid and vector area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub area: f64,
    pub centroid: Vector3<f64>,
    pub normal: Vector3<f64>,
}

/// Volume between two end faces: `(A1 + A2) / 2 · h`, where `h` is the
/// centroid displacement `c1 − c2` projected on the mean normal of the two
/// faces. Always non-negative.
pub fn prismatoid_volume(bottom: &Face, top: &Face, tolerance: f64) -> Result<f64> {
    let axis = bottom.normal + top.normal;
    let length = axis.norm();
    if length <= tolerance {
        return Err(SolidError::DegenerateGeometry(format!(
            "end faces have no common normal (|n1 + n2| = {length:e})"
        )));
    }
    let height = (bottom.centroid - top.centroid).dot(&axis) / length;
    Ok(((bottom.area + top.area) / 2.0 * height).abs())
}
