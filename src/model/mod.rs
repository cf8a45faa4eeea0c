//! # Dataset Model
//!
//! Plain DTOs that cross every boundary: index record → resolver → host.
//!
//! Design rule: no renderer types and no fetch logic here.
//! This module is pure data with no I/O and no state.

pub mod hint;
pub mod assay;
pub mod provenance;
pub mod entity;
pub mod recipe;

pub use hint::{Hint, HintSet, UnknownHint};
pub use assay::AssayDescriptor;
pub use provenance::{Provenance, ProvenanceStep};
pub use entity::{EntityRef, FileEntry, ParentRef};
pub use recipe::{OverlayRecipe, Recipe};
