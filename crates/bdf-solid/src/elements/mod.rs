//! Solid element library
//!
//! Implements the six Nastran solid element variants:
//! - CHEXA8 / CHEXA20 (hexahedra)
//! - CPENTA6 / CPENTA15 (wedges)
//! - CTETRA4 / CTETRA10 (tetrahedra)
//!
//! Each variant is its own type implementing [`SolidElement`]; [`Solid`] is
//! the closed union used wherever elements of mixed kinds are stored.

pub mod base;
pub mod hexa;
pub mod penta;
pub mod tetra;

pub use base::{SolidBase, SolidElement, SolidKind};
pub use hexa::{CHexa8, CHexa20};
pub use penta::{CPenta6, CPenta15};
pub use tetra::{CTetra4, CTetra10};

use bdf_card::{Card, Field};
use nalgebra::Vector3;

use crate::error::Result;
use crate::mesh::MeshLookup;

/// Any supported solid element
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    CHexa8(CHexa8),
    CHexa20(CHexa20),
    CPenta6(CPenta6),
    CPenta15(CPenta15),
    CTetra4(CTetra4),
    CTetra10(CTetra10),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Solid::CHexa8($e) => $body,
            Solid::CHexa20($e) => $body,
            Solid::CPenta6($e) => $body,
            Solid::CPenta15($e) => $body,
            Solid::CTetra4($e) => $body,
            Solid::CTetra10($e) => $body,
        }
    };
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Solid {
                fn from(element: $variant) -> Self {
                    Solid::$variant(element)
                }
            }
        )*
    };
}

impl_from_variant!(CHexa8, CHexa20, CPenta6, CPenta15, CTetra4, CTetra10);

impl Solid {
    /// Read a CHEXA, CPENTA or CTETRA card, choosing the linear variant
    /// unless the card carries mid-side node fields.
    pub fn from_card(card: &Card) -> Result<Self> {
        Self::from_card_as(SolidKind::for_card(card)?, card)
    }

    /// Read a card as a specific variant
    pub fn from_card_as(kind: SolidKind, card: &Card) -> Result<Self> {
        Ok(match kind {
            SolidKind::CHexa8 => CHexa8::from_card(card)?.into(),
            SolidKind::CHexa20 => CHexa20::from_card(card)?.into(),
            SolidKind::CPenta6 => CPenta6::from_card(card)?.into(),
            SolidKind::CPenta15 => CPenta15::from_card(card)?.into(),
            SolidKind::CTetra4 => CTetra4::from_card(card)?.into(),
            SolidKind::CTetra10 => CTetra10::from_card(card)?.into(),
        })
    }

    /// Build from a positional `[eid, pid, G1, ...]` tuple
    pub fn from_data(kind: SolidKind, data: &[Option<i32>]) -> Result<Self> {
        Ok(match kind {
            SolidKind::CHexa8 => CHexa8::from_data(data)?.into(),
            SolidKind::CHexa20 => CHexa20::from_data(data)?.into(),
            SolidKind::CPenta6 => CPenta6::from_data(data)?.into(),
            SolidKind::CPenta15 => CPenta15::from_data(data)?.into(),
            SolidKind::CTetra4 => CTetra4::from_data(data)?.into(),
            SolidKind::CTetra10 => CTetra10::from_data(data)?.into(),
        })
    }

    pub fn kind(&self) -> SolidKind {
        dispatch!(self, e => e.base().kind())
    }

    pub fn card_name(&self) -> &'static str {
        self.kind().card_name()
    }

    pub fn eid(&self) -> i32 {
        dispatch!(self, e => e.eid())
    }

    pub fn pid(&self) -> i32 {
        dispatch!(self, e => e.pid())
    }

    /// Node slots in order; absent mid-side nodes are `None`
    pub fn node_ids(&self) -> &[Option<i32>] {
        dispatch!(self, e => e.node_ids().as_slice())
    }

    pub fn cross_reference(&mut self, mesh: &dyn MeshLookup) -> Result<()> {
        dispatch!(self, e => e.cross_reference(mesh))
    }

    pub fn is_cross_referenced(&self) -> bool {
        dispatch!(self, e => e.is_cross_referenced())
    }

    pub fn node_positions(&self, mesh: &dyn MeshLookup) -> Result<Vec<Option<Vector3<f64>>>> {
        dispatch!(self, e => Ok(e.node_positions(mesh)?.to_vec()))
    }

    pub fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>> {
        dispatch!(self, e => e.centroid(mesh))
    }

    pub fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        dispatch!(self, e => e.volume(mesh))
    }

    pub fn rho(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        dispatch!(self, e => e.rho(mesh))
    }

    pub fn mass(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        dispatch!(self, e => e.mass(mesh))
    }

    /// Property id the element resolved to
    pub fn resolved_pid(&self, mesh: &dyn MeshLookup) -> Result<i32> {
        dispatch!(self, e => e.base().resolved_pid(mesh))
    }

    /// Same variant with the same ids and node slots. Elements of different
    /// variants are never the same card.
    pub fn is_same_card(&self, other: &Solid) -> bool {
        match (self, other) {
            (Solid::CHexa8(a), Solid::CHexa8(b)) => a.is_same_card(b),
            (Solid::CHexa20(a), Solid::CHexa20(b)) => a.is_same_card(b),
            (Solid::CPenta6(a), Solid::CPenta6(b)) => a.is_same_card(b),
            (Solid::CPenta15(a), Solid::CPenta15(b)) => a.is_same_card(b),
            (Solid::CTetra4(a), Solid::CTetra4(b)) => a.is_same_card(b),
            (Solid::CTetra10(a), Solid::CTetra10(b)) => a.is_same_card(b),
            _ => false,
        }
    }

    pub fn raw_fields(&self) -> Vec<Field> {
        dispatch!(self, e => e.raw_fields())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::materials::{Material, Property};
    use crate::mesh::{Mesh, Node};

    pub const UNIT_TETRA: [[f64; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];

    pub const UNIT_WEDGE: [[f64; 3]; 6] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
    ];

    pub const UNIT_CUBE: [[f64; 3]; 8] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];

    /// Nodes numbered from 1 in the given order, PSOLID 1 → MAT1 1 with
    /// density 2.0.
    pub fn mesh_from_points(points: &[[f64; 3]]) -> Mesh {
        let mut mesh = Mesh::new();
        for (i, [x, y, z]) in points.iter().enumerate() {
            mesh.add_node(Node::new(i as i32 + 1, *x, *y, *z)).unwrap();
        }
        mesh.add_material(Material::new(1, 2.0)).unwrap();
        mesh.add_property(Property::new(1, 1)).unwrap();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{UNIT_CUBE, UNIT_TETRA, mesh_from_points};
    use super::*;
    use approx::assert_relative_eq;
    use bdf_card::Deck;

    #[test]
    fn from_card_picks_variant_by_length() {
        let deck = Deck::parse_str(
            "CHEXA,1,1,1,2,3,4,5,6\n+,7,8\nCTETRA,2,1,1,2,3,4,5\nCPENTA,3,1,1,2,3,4,5,6\n",
        )
        .unwrap();
        let kinds: Vec<SolidKind> = deck
            .cards
            .iter()
            .map(|card| Solid::from_card(card).unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            vec![SolidKind::CHexa8, SolidKind::CTetra10, SolidKind::CPenta6]
        );
    }

    #[test]
    fn dispatches_geometry_to_the_variant() {
        let mesh = mesh_from_points(&UNIT_CUBE);
        let mut solid = Solid::from(CHexa8::new(4, 1, [1, 2, 3, 4, 5, 6, 7, 8]).unwrap());
        solid.cross_reference(&mesh).unwrap();
        assert_eq!(solid.eid(), 4);
        assert_eq!(solid.card_name(), "CHEXA");
        assert_eq!(solid.node_ids().len(), 8);
        assert_relative_eq!(solid.volume(&mesh).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(solid.mass(&mesh).unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(solid.resolved_pid(&mesh).unwrap(), 1);
    }

    #[test]
    fn different_variants_are_never_the_same_card() {
        let data = [Some(1), Some(1), Some(1), Some(2), Some(3), Some(4)];
        let linear = Solid::from_data(SolidKind::CTetra4, &data).unwrap();
        let quadratic = Solid::from_data(SolidKind::CTetra10, &data).unwrap();
        assert!(linear.is_same_card(&linear.clone()));
        assert!(!linear.is_same_card(&quadratic));
    }

    #[test]
    fn node_positions_cover_every_slot() {
        let mesh = mesh_from_points(&UNIT_TETRA);
        let mut solid =
            Solid::from(CTetra10::new(1, 1, &[Some(1), Some(2), Some(3), Some(4)]).unwrap());
        solid.cross_reference(&mesh).unwrap();
        let positions = solid.node_positions(&mesh).unwrap();
        assert_eq!(positions.len(), 10);
        assert_eq!(positions[3], Some(Vector3::new(0.0, 0.0, 1.0)));
        assert!(positions[4].is_none());
    }
}
