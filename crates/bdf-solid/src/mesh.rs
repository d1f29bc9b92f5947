//! Mesh arena: nodes, properties and materials.
//!
//! Entities live in contiguous stores and are addressed by index handles.
//! The stores are append-only, so an index handed out to an element stays
//! valid for the lifetime of the mesh. Node coordinates may be updated in
//! place; elements read them on every geometry query.

use std::collections::HashMap;

use bdf_card::{Card, Field};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DEGENERATE_TOLERANCE;
use crate::error::{Result, SolidError};
use crate::materials::{Material, Property, expect_name, positive_id};

/// A grid point in the mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID (from the GRID card)
    pub id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    pub fn new(id: i32, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    /// `GRID  ID  CP  X1  X2  X3`; only the basic coordinate system is
    /// supported, so CP must be blank or 0.
    pub fn from_card(card: &Card) -> Result<Self> {
        expect_name(card, "GRID")?;
        let id = positive_id(card, 1, "node id")?;
        if let Some(cp) = card.integer_or_blank(2)?
            && cp != 0
        {
            return Err(SolidError::Construction(format!(
                "GRID {id}: coordinate system {cp} is not supported"
            )));
        }
        Ok(Self {
            id,
            x: card.real_or_blank(3)?.unwrap_or(0.0),
            y: card.real_or_blank(4)?.unwrap_or(0.0),
            z: card.real_or_blank(5)?.unwrap_or(0.0),
        })
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn raw_fields(&self) -> Vec<Field> {
        vec![
            Field::from("GRID"),
            Field::Integer(self.id),
            Field::Blank,
            Field::Real(self.x),
            Field::Real(self.y),
            Field::Real(self.z),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyIndex(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialIndex(usize);

/// What an element needs from the mesh to cross-reference itself and
/// evaluate its geometry.
pub trait MeshLookup {
    /// Resolve node ids in order; absent slots stay absent.
    fn nodes(&self, ids: &[Option<i32>]) -> Result<Vec<Option<NodeIndex>>>;

    /// Resolve a property id. Fails if the property or its material is unknown.
    fn property(&self, pid: i32) -> Result<PropertyIndex>;

    /// Id of a resolved property
    fn property_id(&self, property: PropertyIndex) -> Result<i32>;

    fn position(&self, node: NodeIndex) -> Result<Vector3<f64>>;

    /// Density of the material behind a resolved property
    fn density(&self, property: PropertyIndex) -> Result<f64>;

    fn degenerate_tolerance(&self) -> f64 {
        DEFAULT_DEGENERATE_TOLERANCE
    }
}

/// Owner of all nodes, properties and materials
#[derive(Debug, Clone)]
pub struct Mesh {
    nodes: Vec<Node>,
    node_index: HashMap<i32, NodeIndex>,
    properties: Vec<Property>,
    property_index: HashMap<i32, PropertyIndex>,
    materials: Vec<Material>,
    material_index: HashMap<i32, MaterialIndex>,
    degenerate_tolerance: f64,
}

impl Mesh {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_DEGENERATE_TOLERANCE)
    }

    pub fn with_tolerance(degenerate_tolerance: f64) -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::new(),
            properties: Vec::new(),
            property_index: HashMap::new(),
            materials: Vec::new(),
            material_index: HashMap::new(),
            degenerate_tolerance,
        }
    }

    /// Add a node; a second node with the same id is rejected.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex> {
        if self.node_index.contains_key(&node.id) {
            return Err(SolidError::Construction(format!("duplicate node id {}", node.id)));
        }
        let index = NodeIndex(self.nodes.len());
        self.node_index.insert(node.id, index);
        self.nodes.push(node);
        Ok(index)
    }

    pub fn add_material(&mut self, material: Material) -> Result<MaterialIndex> {
        if self.material_index.contains_key(&material.id) {
            return Err(SolidError::Construction(format!(
                "duplicate material id {}",
                material.id
            )));
        }
        let index = MaterialIndex(self.materials.len());
        self.material_index.insert(material.id, index);
        self.materials.push(material);
        Ok(index)
    }

    /// Add a property. Its material may be added later; it is looked up when
    /// an element resolves the property.
    pub fn add_property(&mut self, property: Property) -> Result<PropertyIndex> {
        if self.property_index.contains_key(&property.id) {
            return Err(SolidError::Construction(format!(
                "duplicate property id {}",
                property.id
            )));
        }
        let index = PropertyIndex(self.properties.len());
        self.property_index.insert(property.id, index);
        self.properties.push(property);
        Ok(index)
    }

    pub fn node(&self, id: i32) -> Option<&Node> {
        self.node_index.get(&id).map(|&NodeIndex(i)| &self.nodes[i])
    }

    pub fn get_property(&self, id: i32) -> Option<&Property> {
        self.property_index.get(&id).map(|&PropertyIndex(i)| &self.properties[i])
    }

    pub fn get_material(&self, id: i32) -> Option<&Material> {
        self.material_index.get(&id).map(|&MaterialIndex(i)| &self.materials[i])
    }

    /// Move a node. Elements see the new position on their next query.
    pub fn set_node_position(&mut self, id: i32, [x, y, z]: [f64; 3]) -> Result<()> {
        let &NodeIndex(i) = self
            .node_index
            .get(&id)
            .ok_or_else(|| SolidError::Resolution(format!("node {id} does not exist")))?;
        let node = &mut self.nodes[i];
        node.x = x;
        node.y = y;
        node.z = z;
        Ok(())
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn properties_iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn materials_iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_properties(&self) -> usize {
        self.properties.len()
    }

    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    fn material_of(&self, property: &Property) -> Result<&Material> {
        self.get_material(property.material_id).ok_or_else(|| {
            SolidError::Resolution(format!(
                "property {} references missing material {}",
                property.id, property.material_id
            ))
        })
    }

    fn property_at(&self, PropertyIndex(i): PropertyIndex) -> Result<&Property> {
        self.properties
            .get(i)
            .ok_or_else(|| SolidError::Resolution(format!("property index {i} is out of range")))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshLookup for Mesh {
    fn nodes(&self, ids: &[Option<i32>]) -> Result<Vec<Option<NodeIndex>>> {
        ids.iter()
            .map(|slot| {
                slot.map(|id| {
                    self.node_index
                        .get(&id)
                        .copied()
                        .ok_or_else(|| SolidError::Resolution(format!("node {id} does not exist")))
                })
                .transpose()
            })
            .collect()
    }

    fn property(&self, pid: i32) -> Result<PropertyIndex> {
        let index = *self
            .property_index
            .get(&pid)
            .ok_or_else(|| SolidError::Resolution(format!("property {pid} does not exist")))?;
        self.material_of(self.property_at(index)?)?;
        Ok(index)
    }

    fn property_id(&self, property: PropertyIndex) -> Result<i32> {
        Ok(self.property_at(property)?.id)
    }

    fn position(&self, NodeIndex(i): NodeIndex) -> Result<Vector3<f64>> {
        self.nodes
            .get(i)
            .map(Node::position)
            .ok_or_else(|| SolidError::Resolution(format!("node index {i} is out of range")))
    }

    fn density(&self, property: PropertyIndex) -> Result<f64> {
        Ok(self.material_of(self.property_at(property)?)?.density)
    }

    fn degenerate_tolerance(&self) -> f64 {
        self.degenerate_tolerance
    }
}
