//! Material (`MAT1`) and solid property (`PSOLID`) cards.
//!
//! Elements only need the density reached through property → material, but
//! the remaining isotropic constants are kept so the cards can be written
//! back unchanged.

use bdf_card::{Card, Field};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolidError};

/// Isotropic material (`MAT1  MID  E  G  NU  RHO`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material ID
    pub id: i32,
    /// Young's modulus (E)
    pub elastic_modulus: Option<f64>,
    /// Shear modulus (G)
    pub shear_modulus: Option<f64>,
    /// Poisson's ratio (ν)
    pub poissons_ratio: Option<f64>,
    /// Mass density (ρ); a blank field means 0.0
    pub density: f64,
}

impl Material {
    /// Create a material carrying only a density
    pub fn new(id: i32, density: f64) -> Self {
        Self {
            id,
            elastic_modulus: None,
            shear_modulus: None,
            poissons_ratio: None,
            density,
        }
    }

    pub fn from_card(card: &Card) -> Result<Self> {
        expect_name(card, "MAT1")?;
        let id = positive_id(card, 1, "material id")?;
        Ok(Self {
            id,
            elastic_modulus: card.real_or_blank(2)?,
            shear_modulus: card.real_or_blank(3)?,
            poissons_ratio: card.real_or_blank(4)?,
            density: card.real_or_blank(5)?.unwrap_or(0.0),
        })
    }

    pub fn raw_fields(&self) -> Vec<Field> {
        vec![
            Field::from("MAT1"),
            Field::Integer(self.id),
            self.elastic_modulus.map_or(Field::Blank, Field::Real),
            self.shear_modulus.map_or(Field::Blank, Field::Real),
            self.poissons_ratio.map_or(Field::Blank, Field::Real),
            Field::Real(self.density),
        ]
    }
}

/// Solid element property (`PSOLID  PID  MID`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub material_id: i32,
}

impl Property {
    pub fn new(id: i32, material_id: i32) -> Self {
        Self { id, material_id }
    }

    pub fn from_card(card: &Card) -> Result<Self> {
        expect_name(card, "PSOLID")?;
        Ok(Self {
            id: positive_id(card, 1, "property id")?,
            material_id: positive_id(card, 2, "material id")?,
        })
    }

    pub fn raw_fields(&self) -> Vec<Field> {
        vec![
            Field::from("PSOLID"),
            Field::Integer(self.id),
            Field::Integer(self.material_id),
        ]
    }
}

pub(crate) fn expect_name(card: &Card, name: &str) -> Result<()> {
    if card.name() != name {
        return Err(SolidError::Construction(format!(
            "expected a {name} card, got {}",
            card.name()
        )));
    }
    Ok(())
}

pub(crate) fn positive_id(card: &Card, index: usize, what: &str) -> Result<i32> {
    let id = card.integer(index)?;
    if id <= 0 {
        return Err(SolidError::Construction(format!(
            "{} {what} must be positive, got {id}",
            card.name()
        )));
    }
    Ok(id)
}
