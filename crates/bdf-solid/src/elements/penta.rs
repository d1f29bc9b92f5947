//! Pentahedral (wedge) solid elements: CPENTA6 and CPENTA15
//!
//! End face A is G1, G2, G3 and end face B is G4, G5, G6, with G(i+3)
//! opposite G(i). CPENTA15 mid-side nodes G7..G15 are carried through
//! but the geometry uses the six corners only.

use nalgebra::Vector3;

use super::base::{SolidBase, SolidElement, SolidKind};
use crate::error::Result;
use crate::geometry::{Face, area, prismatoid_volume, triangle_centroid, triangle_normal};
use crate::mesh::MeshLookup;

fn triangle_face(n1: &Vector3<f64>, n2: &Vector3<f64>, n3: &Vector3<f64>) -> Face {
    Face {
        area: area(&(n3 - n1), &(n2 - n1)),
        centroid: triangle_centroid(n1, n2, n3),
        normal: triangle_normal(n1, n2, n3),
    }
}

/// Midpoint of the end-face centroids. A collapsed end face still has a
/// well-defined corner average, so this never fails.
fn penta_centroid(corners: &[Vector3<f64>; 6]) -> Vector3<f64> {
    let [n1, n2, n3, n4, n5, n6] = corners;
    (triangle_centroid(n1, n2, n3) + triangle_centroid(n4, n5, n6)) / 2.0
}

/// Degenerate only when the end-face normals cancel out, which covers
/// both end faces collapsing as well as opposed windings.
fn penta_volume(corners: &[Vector3<f64>; 6], tolerance: f64) -> Result<f64> {
    let [n1, n2, n3, n4, n5, n6] = corners;
    let bottom = triangle_face(n1, n2, n3);
    let top = triangle_face(n4, n5, n6);
    prismatoid_volume(&bottom, &top, tolerance)
}

/// CPENTA6: 6-node wedge
#[derive(Debug, Clone, PartialEq)]
pub struct CPenta6 {
    base: SolidBase<6>,
}

impl CPenta6 {
    pub fn new(eid: i32, pid: i32, nodes: [i32; 6]) -> Result<Self> {
        SolidBase::new(Self::KIND, eid, pid, &nodes.map(Some)).map(Self::from_base)
    }
}

impl SolidElement<6> for CPenta6 {
    const KIND: SolidKind = SolidKind::CPenta6;

    fn from_base(base: SolidBase<6>) -> Self {
        Self { base }
    }

    fn base(&self) -> &SolidBase<6> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolidBase<6> {
        &mut self.base
    }

    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        Ok(penta_centroid(&self.base.corner_positions(mesh)?))
    }

    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        penta_volume(&self.base.corner_positions(mesh)?, mesh.degenerate_tolerance())
    }
}

/// CPENTA15: 15-node wedge
#[derive(Debug, Clone, PartialEq)]
pub struct CPenta15 {
    base: SolidBase<15>,
}

impl CPenta15 {
    pub fn new(eid: i32, pid: i32, nodes: &[Option<i32>]) -> Result<Self> {
        SolidBase::new(Self::KIND, eid, pid, nodes).map(Self::from_base)
    }
}

impl SolidElement<15> for CPenta15 {
    const KIND: SolidKind = SolidKind::CPenta15;

    fn from_base(base: SolidBase<15>) -> Self {
        Self { base }
    }

    fn base(&self) -> &SolidBase<15> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolidBase<15> {
        &mut self.base
    }

    /// Midpoint of the two end-face centroids, same as CPENTA6
    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        Ok(penta_centroid(&self.base.corner_positions(mesh)?))
    }

    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        penta_volume(&self.base.corner_positions(mesh)?, mesh.degenerate_tolerance())
    }
}
