//! Hexahedral solid elements: CHEXA8 and CHEXA20
//!
//! Node ordering (Nastran convention):
//! ```text
//!        8----------7
//!       /|         /|
//!      / |        / |
//!     5----------6  |
//!     |  4-------|--3
//!     | /        | /
//!     |/         |/
//!     1----------2
//! ```
//!
//! - End face A: G1..G4, end face B: G5..G8
//! - CHEXA20 mid-side nodes G9..G20 are stored but do not enter the
//!   geometry; both variants use the corner-only prismatoid approximation.

use nalgebra::Vector3;

use super::base::{SolidBase, SolidElement, SolidKind};
use crate::error::Result;
use crate::geometry::{Face, area_centroid, prismatoid_volume, quad_normal};
use crate::mesh::MeshLookup;

/// Area-weighted end faces (G1..G4 and G5..G8) of a hexahedron
fn end_faces(corners: &[Vector3<f64>; 8], tolerance: f64) -> Result<(Face, Face)> {
    let [n1, n2, n3, n4, n5, n6, n7, n8] = corners;

    let (area1, centroid1) = area_centroid(n1, n2, n3, n4, tolerance)?;
    let (area2, centroid2) = area_centroid(n5, n6, n7, n8, tolerance)?;

    Ok((
        Face {
            area: area1,
            centroid: centroid1,
            normal: quad_normal(n1, n2, n3, n4),
        },
        Face {
            area: area2,
            centroid: centroid2,
            normal: quad_normal(n5, n6, n7, n8),
        },
    ))
}

fn hexa_centroid(corners: &[Vector3<f64>; 8], tolerance: f64) -> Result<Vector3<f64>> {
    let (bottom, top) = end_faces(corners, tolerance)?;
    Ok((bottom.centroid + top.centroid) / 2.0)
}

fn hexa_volume(corners: &[Vector3<f64>; 8], tolerance: f64) -> Result<f64> {
    let (bottom, top) = end_faces(corners, tolerance)?;
    prismatoid_volume(&bottom, &top, tolerance)
}

/// CHEXA8: 8-node hexahedron
#[derive(Debug, Clone, PartialEq)]
pub struct CHexa8 {
    base: SolidBase<8>,
}

impl CHexa8 {
    pub fn new(eid: i32, pid: i32, nodes: [i32; 8]) -> Result<Self> {
        SolidBase::new(Self::KIND, eid, pid, &nodes.map(Some)).map(Self::from_base)
    }
}

impl SolidElement<8> for CHexa8 {
    const KIND: SolidKind = SolidKind::CHexa8;

    fn from_base(base: SolidBase<8>) -> Self {
        Self { base }
    }

    fn base(&self) -> &SolidBase<8> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolidBase<8> {
        &mut self.base
    }

    /// Mean of the area-weighted centroids of the two end faces
    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        hexa_centroid(&self.base.corner_positions(mesh)?, mesh.degenerate_tolerance())
    }

    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        hexa_volume(&self.base.corner_positions(mesh)?, mesh.degenerate_tolerance())
    }
}

/// CHEXA20: 20-node hexahedron; any mid-side node may be absent
#[derive(Debug, Clone, PartialEq)]
pub struct CHexa20 {
    base: SolidBase<20>,
}

impl CHexa20 {
    pub fn new(eid: i32, pid: i32, nodes: &[Option<i32>]) -> Result<Self> {
        SolidBase::new(Self::KIND, eid, pid, nodes).map(Self::from_base)
    }
}

impl SolidElement<20> for CHexa20 {
    const KIND: SolidKind = SolidKind::CHexa20;

    fn from_base(base: SolidBase<20>) -> Self {
        Self { base }
    }

    fn base(&self) -> &SolidBase<20> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolidBase<20> {
        &mut self.base
    }

    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        hexa_centroid(&self.base.corner_positions(mesh)?, mesh.degenerate_tolerance())
    }

    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        hexa_volume(&self.base.corner_positions(mesh)?, mesh.degenerate_tolerance())
    }
}
