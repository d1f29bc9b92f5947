//! Nastran solid elements.
//!
//! This crate provides:
//! - **Geometry** primitives: triangle area, signed tetrahedral volume,
//!   quadrilateral area/centroid and prismatoid volume
//! - **Mesh** arena of nodes (`GRID`), properties (`PSOLID`) and materials (`MAT1`)
//! - **Elements**: CHEXA8/20, CPENTA6/15, CTETRA4/10 with cross-referencing,
//!   centroid, volume, density and mass
//! - **Model** container that reads a bulk-data deck and writes it back
//!
//! Elements are created unresolved from a card or a positional data tuple,
//! cross-referenced once against a [`MeshLookup`], then queried. Geometry is
//! always evaluated from the current node positions.

pub mod config;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod materials;
pub mod mesh;
pub mod model;

pub use config::{DEFAULT_DEGENERATE_TOLERANCE, ModelConfig};
pub use elements::{
    CHexa8, CHexa20, CPenta6, CPenta15, CTetra4, CTetra10, Solid, SolidBase, SolidElement,
    SolidKind,
};
pub use error::{Result, SolidError};
pub use materials::{Material, Property};
pub use mesh::{MaterialIndex, Mesh, MeshLookup, Node, NodeIndex, PropertyIndex};
pub use model::{MassProperties, Model, ModelStatistics};
