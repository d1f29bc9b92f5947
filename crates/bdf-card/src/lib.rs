//! Nastran bulk-data card reader.
//!
//! This crate provides:
//! - **Field** values with Nastran real shorthand (`7.85+3`)
//! - **Deck** parser for free-field and small-field entries with continuations
//! - **Card** indexed access (`field(i)`, `fields(start, stop)`) and typed getters
//! - **Small-field writer** for re-emitting cards

pub mod deck;
pub mod error;
pub mod field;
mod printer;

pub use deck::{Card, Deck, FIELDS_PER_LINE, SMALL_FIELD_WIDTH};
pub use error::{CardError, Result};
pub use field::Field;
pub use printer::print_card;
