//! Model container: a mesh plus its solid elements.
//!
//! Elements are keyed by element id and iterate in id order. Building a
//! model from a deck reads the cards in deck order, so properties may appear
//! after the elements that use them; nothing is resolved until
//! [`Model::cross_reference`] runs.

use std::collections::BTreeMap;

use bdf_card::{Deck, print_card};
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::ModelConfig;
use crate::elements::{Solid, SolidKind};
use crate::error::{Result, SolidError};
use crate::materials::{Material, Property};
use crate::mesh::{Mesh, Node};

/// Total mass and mass-weighted center of gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f64,
    pub center_of_gravity: Vector3<f64>,
}

#[derive(Debug)]
pub struct Model {
    config: ModelConfig,
    mesh: Mesh,
    elements: BTreeMap<i32, Solid>,
}

impl Model {
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mesh: Mesh::with_tolerance(config.degenerate_tolerance),
            config,
            elements: BTreeMap::new(),
        })
    }

    /// Build a model from the GRID, MAT1, PSOLID and solid element cards
    /// of a deck. The model is not cross-referenced.
    pub fn from_deck(deck: &Deck, config: ModelConfig) -> Result<Self> {
        let mut model = Self::new(config)?;
        let mut skipped: BTreeMap<String, usize> = BTreeMap::new();

        for card in &deck.cards {
            match card.name() {
                "GRID" => {
                    model.mesh.add_node(Node::from_card(card)?)?;
                }
                "MAT1" => {
                    model.mesh.add_material(Material::from_card(card)?)?;
                }
                "PSOLID" => {
                    model.mesh.add_property(Property::from_card(card)?)?;
                }
                "CHEXA" | "CPENTA" | "CTETRA" => {
                    model.add_element(Solid::from_card(card)?)?;
                }
                other if model.config.skip_unsupported_cards => {
                    if model.config.verbose {
                        eprintln!(
                            "[bdf-solid] skipping unsupported card {other} (line {})",
                            card.line_start
                        );
                    }
                    *skipped.entry(other.to_string()).or_insert(0) += 1;
                }
                other => {
                    return Err(SolidError::Construction(format!(
                        "unsupported card {other} at line {}",
                        card.line_start
                    )));
                }
            }
        }

        if model.config.verbose {
            eprintln!(
                "[bdf-solid] deck read: {} nodes, {} materials, {} properties, {} elements, \
                 {} cards skipped",
                model.mesh.num_nodes(),
                model.mesh.num_materials(),
                model.mesh.num_properties(),
                model.elements.len(),
                skipped.values().sum::<usize>()
            );
        }
        Ok(model)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Mutable mesh access, e.g. to move nodes. Cross-referenced elements
    /// keep their indices and pick up the new positions.
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    /// Add an element. Re-adding an identical card is a no-op; a different
    /// element with the same id is rejected.
    pub fn add_element(&mut self, element: impl Into<Solid>) -> Result<()> {
        let element = element.into();
        let eid = element.eid();
        match self.elements.get(&eid) {
            Some(existing) if existing.is_same_card(&element) => Ok(()),
            Some(existing) => Err(SolidError::Construction(format!(
                "duplicate element id {eid}: {} conflicts with existing {}",
                element.kind(),
                existing.kind()
            ))),
            None => {
                self.elements.insert(eid, element);
                Ok(())
            }
        }
    }

    pub fn element(&self, eid: i32) -> Option<&Solid> {
        self.elements.get(&eid)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Solid> {
        self.elements.values()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Resolve every element against the mesh, in parallel.
    ///
    /// Stops at the first failure. Elements resolved before it stay
    /// resolved; calling again retries only the unresolved ones.
    pub fn cross_reference(&mut self) -> Result<()> {
        let mesh = &self.mesh;
        let pending = self
            .elements
            .values()
            .filter(|e| !e.is_cross_referenced())
            .count();

        self.elements
            .par_iter_mut()
            .try_for_each(|(_, element)| element.cross_reference(mesh))?;

        if self.config.verbose {
            eprintln!("[bdf-solid] cross-referenced {pending} elements");
        }
        Ok(())
    }

    /// Per-element mass and centroid, in element id order
    fn element_masses(&self) -> Result<Vec<(f64, Vector3<f64>)>> {
        let mesh = &self.mesh;
        self.elements
            .par_iter()
            .map(|(_, element)| -> Result<(f64, Vector3<f64>)> {
                Ok((element.mass(mesh)?, element.centroid(mesh)?))
            })
            .collect()
    }

    pub fn total_mass(&self) -> Result<f64> {
        let mesh = &self.mesh;
        let masses = self
            .elements
            .par_iter()
            .map(|(_, element)| element.mass(mesh))
            .collect::<Result<Vec<f64>>>()?;
        Ok(masses.iter().sum())
    }

    pub fn mass_properties(&self) -> Result<MassProperties> {
        let masses = self.element_masses()?;
        let mass: f64 = masses.iter().map(|(m, _)| m).sum();
        if mass.abs() <= self.config.degenerate_tolerance {
            return Err(SolidError::DegenerateGeometry(format!(
                "total mass {mass:e} is too small to locate a center of gravity"
            )));
        }
        let moment = masses
            .iter()
            .fold(Vector3::zeros(), |acc: Vector3<f64>, (m, c)| acc + c * *m);
        Ok(MassProperties {
            mass,
            center_of_gravity: moment / mass,
        })
    }

    pub fn statistics(&self) -> ModelStatistics {
        let mut element_kind_counts = BTreeMap::new();
        for element in self.elements.values() {
            *element_kind_counts.entry(element.kind()).or_insert(0) += 1;
        }

        ModelStatistics {
            num_nodes: self.mesh.num_nodes(),
            num_properties: self.mesh.num_properties(),
            num_materials: self.mesh.num_materials(),
            num_elements: self.elements.len(),
            element_kind_counts,
        }
    }

    /// Small-field bulk data for the whole model: nodes, materials,
    /// properties, then elements in id order.
    pub fn write_bulk(&self) -> Result<String> {
        let records = self
            .mesh
            .nodes_iter()
            .map(Node::raw_fields)
            .chain(self.mesh.materials_iter().map(Material::raw_fields))
            .chain(self.mesh.properties_iter().map(Property::raw_fields))
            .chain(self.elements.values().map(Solid::raw_fields));

        let mut out = String::new();
        for fields in records {
            out.push_str(&print_card(&fields)?);
        }
        Ok(out)
    }
}

/// Model statistics for reporting
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatistics {
    pub num_nodes: usize,
    pub num_properties: usize,
    pub num_materials: usize,
    pub num_elements: usize,
    /// Count of each element variant
    pub element_kind_counts: BTreeMap<SolidKind, usize>,
}

impl ModelStatistics {
    /// Format as a human-readable string
    pub fn format(&self) -> String {
        let mut lines = vec![
            format!("Nodes: {}", self.num_nodes),
            format!("Materials: {}", self.num_materials),
            format!("Properties: {}", self.num_properties),
            format!("Elements: {}", self.num_elements),
        ];

        if !self.element_kind_counts.is_empty() {
            lines.push("Element types:".to_string());
            for (kind, count) in &self.element_kind_counts {
                lines.push(format!("  {kind}: {count}"));
            }
        }

        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CHexa8, CTetra4};
    use approx::assert_relative_eq;

    const DECK: &str = "\
BEGIN BULK
GRID,1,,0.,0.,0.
GRID,2,,1.,0.,0.
GRID,3,,0.,1.,0.
GRID,4,,0.,0.,1.
CTETRA,10,5,1,2,3,4
PSOLID,5,7
MAT1,7,2.1+11,,0.3,6.
CORD2R,1,,0.,0.,0.,0.,0.,1.
ENDDATA
";

    fn model() -> Model {
        let deck = Deck::parse_str(DECK).unwrap();
        Model::from_deck(&deck, ModelConfig::default()).unwrap()
    }

    #[test]
    fn builds_from_deck_and_skips_unknown_cards() {
        let model = model();
        let stats = model.statistics();
        assert_eq!(stats.num_nodes, 4);
        assert_eq!(stats.num_materials, 1);
        assert_eq!(stats.num_properties, 1);
        assert_eq!(stats.element_kind_counts.get(&SolidKind::CTetra4), Some(&1));
        assert!(!model.element(10).unwrap().is_cross_referenced());
    }

    #[test]
    fn unknown_cards_fail_when_not_skipped() {
        let deck = Deck::parse_str(DECK).unwrap();
        let config = ModelConfig {
            skip_unsupported_cards: false,
            ..ModelConfig::default()
        };
        let err = Model::from_deck(&deck, config).expect_err("CORD2R unsupported");
        assert!(err.to_string().contains("CORD2R"));
    }

    #[test]
    fn property_defined_after_element_resolves() {
        let mut model = model();
        model.cross_reference().unwrap();
        let tetra = model.element(10).unwrap();
        assert_eq!(tetra.rho(model.mesh()).unwrap(), 6.0);
        assert_relative_eq!(model.total_mass().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mass_properties_weight_centroids() {
        let mut model = model();
        let corners = [
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [3.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 0.0, 1.0],
            [3.0, 0.0, 1.0],
            [3.0, 1.0, 1.0],
            [2.0, 1.0, 1.0],
        ];
        for (id, [x, y, z]) in (5..).zip(corners) {
            model.mesh_mut().add_node(Node::new(id, x, y, z)).unwrap();
        }
        model
            .add_element(CHexa8::new(20, 5, [5, 6, 7, 8, 9, 10, 11, 12]).unwrap())
            .unwrap();
        model.cross_reference().unwrap();

        // tetra: mass 1 at (0.25, 0.25, 0.25); cube: mass 6 at (2.5, 0.5, 0.5)
        let props = model.mass_properties().unwrap();
        assert_relative_eq!(props.mass, 7.0, epsilon = 1e-12);
        assert_relative_eq!(
            props.center_of_gravity,
            Vector3::new(15.25 / 7.0, 3.25 / 7.0, 3.25 / 7.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_mass_has_no_center_of_gravity() {
        let mut model = Model::new(ModelConfig::default()).unwrap();
        let err = model.mass_properties().expect_err("empty model");
        assert!(matches!(err, SolidError::DegenerateGeometry(_)));

        model.mesh_mut().add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(model.total_mass().unwrap(), 0.0);
    }

    #[test]
    fn duplicate_element_ids() {
        let mut model = model();
        let same = CTetra4::new(10, 5, [1, 2, 3, 4]).unwrap();
        assert!(model.add_element(same).is_ok());
        assert_eq!(model.num_elements(), 1);

        let different = CTetra4::new(10, 5, [1, 2, 4, 3]).unwrap();
        let err = model.add_element(different).expect_err("conflicting eid");
        assert!(matches!(err, SolidError::Construction(_)));
    }

    #[test]
    fn cross_reference_failure_is_reported() {
        let mut model = model();
        model.add_element(CTetra4::new(11, 99, [1, 2, 3, 4]).unwrap()).unwrap();
        let err = model.cross_reference().expect_err("property 99 missing");
        assert!(err.to_string().contains("property 99"));
        assert!(!model.element(11).unwrap().is_cross_referenced());
        assert!(matches!(model.total_mass(), Err(SolidError::Resolution(_))));
    }

    #[test]
    fn write_bulk_reparses_to_the_same_model() {
        let model = model();
        let bulk = model.write_bulk().unwrap();
        let deck = Deck::parse_str(&bulk).unwrap();
        let reread = Model::from_deck(&deck, ModelConfig::default()).unwrap();

        assert_eq!(reread.mesh().node(3), model.mesh().node(3));
        assert_eq!(reread.mesh().get_material(7), model.mesh().get_material(7));
        assert!(reread.element(10).unwrap().is_same_card(model.element(10).unwrap()));
    }

    #[test]
    fn statistics_format_and_json() {
        let stats = model().statistics();
        let text = stats.format();
        assert!(text.contains("Nodes: 4"));
        assert!(text.contains("  CTETRA4: 1"));

        let json: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
        assert_eq!(json["num_elements"], 1);
        assert_eq!(json["element_kind_counts"]["CTetra4"], 1);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ModelConfig {
            degenerate_tolerance: f64::NAN,
            ..ModelConfig::default()
        };
        assert!(matches!(Model::new(config), Err(SolidError::Config(_))));
    }
}
