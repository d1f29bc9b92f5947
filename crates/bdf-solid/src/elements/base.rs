//! State and behavior shared by every solid element variant.

use std::fmt::{Display, Formatter};

use bdf_card::{Card, Field};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolidError};
use crate::mesh::{MeshLookup, NodeIndex, PropertyIndex};

/// The six supported solid element variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SolidKind {
    /// 8-node hexahedron
    CHexa8,
    /// 20-node hexahedron (8 corners + 12 mid-side)
    CHexa20,
    /// 6-node pentahedron (wedge)
    CPenta6,
    /// 15-node pentahedron (6 corners + 9 mid-side)
    CPenta15,
    /// 4-node tetrahedron
    CTetra4,
    /// 10-node tetrahedron (4 corners + 6 mid-side)
    CTetra10,
}

impl SolidKind {
    /// Bulk-data card name; linear and quadratic variants share it
    pub fn card_name(self) -> &'static str {
        match self {
            SolidKind::CHexa8 | SolidKind::CHexa20 => "CHEXA",
            SolidKind::CPenta6 | SolidKind::CPenta15 => "CPENTA",
            SolidKind::CTetra4 | SolidKind::CTetra10 => "CTETRA",
        }
    }

    pub fn corner_count(self) -> usize {
        match self {
            SolidKind::CHexa8 | SolidKind::CHexa20 => 8,
            SolidKind::CPenta6 | SolidKind::CPenta15 => 6,
            SolidKind::CTetra4 | SolidKind::CTetra10 => 4,
        }
    }

    /// Number of node slots
    pub fn max_nodes(self) -> usize {
        match self {
            SolidKind::CHexa8 => 8,
            SolidKind::CHexa20 => 20,
            SolidKind::CPenta6 => 6,
            SolidKind::CPenta15 => 15,
            SolidKind::CTetra4 => 4,
            SolidKind::CTetra10 => 10,
        }
    }

    pub fn is_quadratic(self) -> bool {
        self.max_nodes() > self.corner_count()
    }

    /// Pick the variant for a card: the linear one when the card carries no
    /// fields past the last corner node, the quadratic one otherwise.
    pub fn for_card(card: &Card) -> Result<Self> {
        let (linear, quadratic) = match card.name() {
            "CHEXA" => (SolidKind::CHexa8, SolidKind::CHexa20),
            "CPENTA" => (SolidKind::CPenta6, SolidKind::CPenta15),
            "CTETRA" => (SolidKind::CTetra4, SolidKind::CTetra10),
            other => {
                return Err(SolidError::Construction(format!(
                    "{other} is not a solid element card"
                )));
            }
        };
        if card.len() <= 3 + linear.max_nodes() {
            Ok(linear)
        } else {
            Ok(quadratic)
        }
    }
}

impl Display for SolidKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.card_name(), self.max_nodes())
    }
}

/// Node and property references after cross-referencing
#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved<const N: usize> {
    property: PropertyIndex,
    nodes: [Option<NodeIndex>; N],
}

/// Identifier state of a solid element with `N` node slots.
///
/// Slots are positional: slot `i` always holds grid point `G(i+1)`, and an
/// absent mid-side node stays `None` in its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidBase<const N: usize> {
    kind: SolidKind,
    eid: i32,
    pid: i32,
    nodes: [Option<i32>; N],
    resolved: Option<Resolved<N>>,
}

impl<const N: usize> SolidBase<N> {
    /// Validate ids and node count, producing an unresolved element.
    pub fn new(kind: SolidKind, eid: i32, pid: i32, nids: &[Option<i32>]) -> Result<Self> {
        debug_assert_eq!(kind.max_nodes(), N);

        if eid <= 0 {
            return Err(SolidError::Construction(format!(
                "{kind} element id must be positive, got {eid}"
            )));
        }
        if pid <= 0 {
            return Err(SolidError::Construction(format!(
                "{kind} {eid}: property id must be positive, got {pid}"
            )));
        }
        if nids.len() > N {
            return Err(SolidError::Construction(format!(
                "{kind} {eid}: {} node slots given, at most {N} allowed",
                nids.len()
            )));
        }
        if !kind.is_quadratic() && nids.len() != N {
            return Err(SolidError::Construction(format!(
                "{kind} {eid}: expected {N} nodes, got {}",
                nids.len()
            )));
        }

        let mut nodes = [None; N];
        for (slot, nid) in nodes.iter_mut().zip(nids) {
            *slot = *nid;
        }

        if let Some(missing) = nodes[..kind.corner_count()].iter().position(Option::is_none) {
            return Err(SolidError::Construction(format!(
                "{kind} {eid}: corner node G{} is missing",
                missing + 1
            )));
        }
        if let Some(bad) = nodes.iter().flatten().find(|&&id| id <= 0) {
            return Err(SolidError::Construction(format!(
                "{kind} {eid}: node id must be positive, got {bad}"
            )));
        }

        Ok(Self {
            kind,
            eid,
            pid,
            nodes,
            resolved: None,
        })
    }

    /// `NAME EID PID G1 G2 ...`
    pub fn from_card(kind: SolidKind, card: &Card) -> Result<Self> {
        if card.name() != kind.card_name() {
            return Err(SolidError::Construction(format!(
                "{kind} cannot be read from a {} card",
                card.name()
            )));
        }
        let eid = card.integer(1)?;
        let pid = card.integer(2)?;
        if card.len() > 3 + N {
            return Err(SolidError::Construction(format!(
                "{kind} {eid}: {} node fields, at most {N} allowed",
                card.len() - 3
            )));
        }
        let nids = (3..3 + N)
            .map(|i| card.integer_or_blank(i))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(kind, eid, pid, &nids)
    }

    /// Positional tuple `[eid, pid, G1, G2, ...]`.
    ///
    /// Linear variants need exactly `2 + N` entries; quadratic variants
    /// accept anything from the corner nodes up to all `N` slots.
    pub fn from_data(kind: SolidKind, data: &[Option<i32>]) -> Result<Self> {
        let min = 2 + kind.corner_count();
        let max = 2 + N;
        if !(min..=max).contains(&data.len()) {
            let expected = if min == max {
                max.to_string()
            } else {
                format!("{min} to {max}")
            };
            return Err(SolidError::Construction(format!(
                "{kind}: data tuple has {} entries, expected {expected}",
                data.len()
            )));
        }
        let eid = data[0].ok_or_else(|| {
            SolidError::Construction(format!("{kind}: data tuple has no element id"))
        })?;
        let pid = data[1].ok_or_else(|| {
            SolidError::Construction(format!("{kind} {eid}: data tuple has no property id"))
        })?;
        Self::new(kind, eid, pid, &data[2..])
    }

    pub fn kind(&self) -> SolidKind {
        self.kind
    }

    pub fn eid(&self) -> i32 {
        self.eid
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn node_ids(&self) -> &[Option<i32>; N] {
        &self.nodes
    }

    pub fn is_cross_referenced(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolve node and property ids against the mesh. Calling it again on
    /// a resolved element does nothing.
    pub fn cross_reference(&mut self, mesh: &dyn MeshLookup) -> Result<()> {
        if self.resolved.is_some() {
            return Ok(());
        }
        let resolved_nodes = mesh
            .nodes(&self.nodes)
            .map_err(|e| self.with_context(e))?;
        let nodes: [Option<NodeIndex>; N] = resolved_nodes.try_into().map_err(|v: Vec<_>| {
            SolidError::Resolution(format!(
                "{} {}: mesh returned {} nodes for {N} slots",
                self.kind,
                self.eid,
                v.len()
            ))
        })?;
        let property = mesh
            .property(self.pid)
            .map_err(|e| self.with_context(e))?;

        self.resolved = Some(Resolved { property, nodes });
        Ok(())
    }

    fn with_context(&self, error: SolidError) -> SolidError {
        match error {
            SolidError::Resolution(msg) => {
                SolidError::Resolution(format!("{} {}: {msg}", self.kind, self.eid))
            }
            other => other,
        }
    }

    fn resolved(&self) -> Result<&Resolved<N>> {
        self.resolved.as_ref().ok_or_else(|| {
            SolidError::Resolution(format!(
                "{} {} has not been cross-referenced",
                self.kind, self.eid
            ))
        })
    }

    /// Positions of all slots in order; absent slots are `None`.
    pub fn node_positions(&self, mesh: &dyn MeshLookup) -> Result<[Option<Vector3<f64>>; N]> {
        let resolved = self.resolved()?;
        let mut positions = [None; N];
        for (slot, node) in positions.iter_mut().zip(&resolved.nodes) {
            if let Some(index) = node {
                *slot = Some(mesh.position(*index)?);
            }
        }
        Ok(positions)
    }

    /// Positions of the first `C` slots, which must all be present.
    pub fn corner_positions<const C: usize>(
        &self,
        mesh: &dyn MeshLookup,
    ) -> Result<[Vector3<f64>; C]> {
        let resolved = self.resolved()?;
        let mut corners = [Vector3::zeros(); C];
        for (i, corner) in corners.iter_mut().enumerate() {
            let index = resolved.nodes.get(i).copied().flatten().ok_or_else(|| {
                SolidError::Resolution(format!(
                    "{} {}: corner node G{} is absent",
                    self.kind,
                    self.eid,
                    i + 1
                ))
            })?;
            *corner = mesh.position(index)?;
        }
        Ok(corners)
    }

    pub fn rho(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        mesh.density(self.resolved()?.property)
    }

    /// Id of the property the element resolved to, or the stored id before
    /// cross-referencing.
    pub fn resolved_pid(&self, mesh: &dyn MeshLookup) -> Result<i32> {
        match &self.resolved {
            Some(resolved) => mesh.property_id(resolved.property),
            None => Ok(self.pid),
        }
    }

    pub fn is_same_card(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.eid == other.eid
            && self.pid == other.pid
            && self.nodes == other.nodes
    }

    /// `[name, eid, pid, G1 .. GN]`, absent slots as blanks.
    pub fn raw_fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(3 + N);
        fields.push(Field::from(self.kind.card_name()));
        fields.push(Field::Integer(self.eid));
        fields.push(Field::Integer(self.pid));
        fields.extend(self.nodes.iter().map(|&nid| Field::from(nid)));
        fields
    }
}

/// Capability set of a solid element with `N` node slots.
///
/// Variants supply the topology-specific `centroid` and `volume`; identity,
/// resolution, density and serialization come from the shared base.
/// Geometry is recomputed from the current node positions on every call.
pub trait SolidElement<const N: usize>: Sized {
    const KIND: SolidKind;

    fn from_base(base: SolidBase<N>) -> Self;

    fn base(&self) -> &SolidBase<N>;

    fn base_mut(&mut self) -> &mut SolidBase<N>;

    fn centroid(&self, mesh: &dyn MeshLookup) -> Result<Vector3<f64>>;

    /// Physical (non-negative) volume
    fn volume(&self, mesh: &dyn MeshLookup) -> Result<f64>;

    fn from_card(card: &Card) -> Result<Self> {
        SolidBase::from_card(Self::KIND, card).map(Self::from_base)
    }

    fn from_data(data: &[Option<i32>]) -> Result<Self> {
        SolidBase::from_data(Self::KIND, data).map(Self::from_base)
    }

    /// Bulk-data card name (`CHEXA`, `CPENTA` or `CTETRA`)
    fn card_name(&self) -> &'static str {
        Self::KIND.card_name()
    }

    fn eid(&self) -> i32 {
        self.base().eid()
    }

    fn pid(&self) -> i32 {
        self.base().pid()
    }

    fn node_ids(&self) -> &[Option<i32>; N] {
        self.base().node_ids()
    }

    fn cross_reference(&mut self, mesh: &dyn MeshLookup) -> Result<()> {
        self.base_mut().cross_reference(mesh)
    }

    fn is_cross_referenced(&self) -> bool {
        self.base().is_cross_referenced()
    }

    fn node_positions(&self, mesh: &dyn MeshLookup) -> Result<[Option<Vector3<f64>>; N]> {
        self.base().node_positions(mesh)
    }

    fn rho(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        self.base().rho(mesh)
    }

    /// `rho * volume`, no unit conversion
    fn mass(&self, mesh: &dyn MeshLookup) -> Result<f64> {
        Ok(self.rho(mesh)? * self.volume(mesh)?)
    }

    fn is_same_card(&self, other: &Self) -> bool {
        self.base().is_same_card(other.base())
    }

    fn raw_fields(&self) -> Vec<Field> {
        self.base().raw_fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdf_card::Deck;

    #[test]
    fn kind_node_counts() {
        assert_eq!(SolidKind::CHexa20.corner_count(), 8);
        assert_eq!(SolidKind::CHexa20.max_nodes(), 20);
        assert!(SolidKind::CPenta15.is_quadratic());
        assert!(!SolidKind::CTetra4.is_quadratic());
        assert_eq!(SolidKind::CTetra10.to_string(), "CTETRA10");
    }

    #[test]
    fn kind_is_chosen_from_field_count() {
        let deck = Deck::parse_str(concat!(
            "CTETRA,1,1,1,2,3,4\n",
            "CTETRA,2,1,1,2,3,4,5\n",
            "CPENTA,3,1,1,2,3,4,5,6\n",
            "CQUAD4,4,1,1,2,3,4\n",
        ))
        .unwrap();
        assert_eq!(SolidKind::for_card(&deck.cards[0]).unwrap(), SolidKind::CTetra4);
        assert_eq!(SolidKind::for_card(&deck.cards[1]).unwrap(), SolidKind::CTetra10);
        assert_eq!(SolidKind::for_card(&deck.cards[2]).unwrap(), SolidKind::CPenta6);
        assert!(SolidKind::for_card(&deck.cards[3]).is_err());
    }

    #[test]
    fn quadratic_slots_are_padded_not_compacted() {
        let nodes = [Some(1), Some(2), Some(3), Some(4), None, Some(6)];
        let base = SolidBase::<10>::new(SolidKind::CTetra10, 1, 2, &nodes).unwrap();
        assert_eq!(base.node_ids()[4], None);
        assert_eq!(base.node_ids()[5], Some(6));
        assert_eq!(base.node_ids()[9], None);
    }

    #[test]
    fn linear_variant_rejects_absent_nodes() {
        let nodes = [Some(1), Some(2), None, Some(4)];
        let err = SolidBase::<4>::new(SolidKind::CTetra4, 1, 1, &nodes)
            .expect_err("absent corner");
        assert!(err.to_string().contains("G3"));
    }

    #[test]
    fn quadratic_variant_requires_corners() {
        let mut nids = vec![Some(1); 8];
        nids[7] = None;
        assert!(SolidBase::<20>::new(SolidKind::CHexa20, 1, 1, &nids).is_err());
    }

    #[test]
    fn rejects_non_positive_ids() {
        let nodes = [Some(1), Some(2), Some(3), Some(4)];
        assert!(SolidBase::<4>::new(SolidKind::CTetra4, 0, 1, &nodes).is_err());
        assert!(SolidBase::<4>::new(SolidKind::CTetra4, 1, -1, &nodes).is_err());
        assert!(
            SolidBase::<4>::new(SolidKind::CTetra4, 1, 1, &[Some(1), Some(2), Some(3), Some(0)])
                .is_err()
        );
    }

    #[test]
    fn raw_fields_keep_blank_slots() {
        let corners = [Some(1), Some(2), Some(3), Some(4)];
        let base = SolidBase::<10>::new(SolidKind::CTetra10, 7, 3, &corners).unwrap();
        let fields = base.raw_fields();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[0], Field::from("CTETRA"));
        assert_eq!(fields[1], Field::Integer(7));
        assert_eq!(fields[2], Field::Integer(3));
        assert!(fields[7..].iter().all(Field::is_blank));
    }
}
