//! Core value types shared across the engine

pub mod bbox;
pub mod field;
pub mod storm;

pub use bbox::BoundingBox;
pub use field::{FieldGrid, FieldKind, ScoreGrid};
pub use storm::StormCell;
