//! Tetrahedral solid elements: CTETRA4 and CTETRA10
//!
//! CTETRA10 mid-side nodes G5..G10 sit on edges 1-2, 2-3, 3-1, 1-4, 2-4
//! and 3-4. Both variants compute geometry from the four corners.

use nalgebra::Vector3;

use super::base::{SolidBase, SolidElement, SolidKind};
use crate::error::Result;
use crate::geometry::volume4;
use crate::mesh::MeshLookup;

fn tetra_centroid([n1, n2, n3, n4]: &[Vector3<f64>; 4]) -> Vector3<f64> {
    (n1 + n2 + n3 + n4) / 4.0
}

fn tetra_volume([n1, n2, n3, n4]: &[Vector3<f64>; 4]) -> f64 {
    volume4(n1, n2, n3, n4).abs()
}

/// CTETRA4: 4-node tetrahedron
#[derive(Debug, Clone, PartialEq)]
pub struct CTetra4 {
    base: SolidBase<4>,
}

impl CTetra4 {
    pub fn new(eid: i32, pid: i32, nodes: [i32; 4]) -> Result<Self> {
        SolidBase::new(Self::KIND, eid, pid, &nodes.map(Some)).map(Self::from_base)
    }
}

impl SolidElement<4> for CTetra4 {
    const KIND: SolidKind = SolidKind::CTetra4;

    fn from_base(base: SolidBase<4>) -> Self {
        Self { base }
    }

    fn base(&self) -> &SolidBase<4> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolidBase<4> {
        &mut self.base
    }

    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        Ok(tetra_centroid(&self.base.corner_positions(mesh)?))
    }

    /// A flat tetrahedron has zero volume; that is not an error.
    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        Ok(tetra_volume(&self.base.corner_positions(mesh)?))
    }
}

/// CTETRA10: 10-node tetrahedron
#[derive(Debug, Clone, PartialEq)]
pub struct CTetra10 {
    base: SolidBase<10>,
}

impl CTetra10 {
    pub fn new(eid: i32, pid: i32, nodes: &[Option<i32>]) -> Result<Self> {
        SolidBase::new(Self::KIND, eid, pid, nodes).map(Self::from_base)
    }
}

impl SolidElement<10> for CTetra10 {
    const KIND: SolidKind = SolidKind::CTetra10;

    fn from_base(base: SolidBase<10>) -> Self {
        Self { base }
    }

    fn base(&self) -> &SolidBase<10> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolidBase<10> {
        &mut self.base
    }

    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        Ok(tetra_centroid(&self.base.corner_positions(mesh)?))
    }

    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        Ok(tetra_volume(&self.base.corner_positions(mesh)?))
    }
}
