//! EPIC overlay selection.
//!
//! Runs after the primary recipe and independently of it. Every EPIC
//! category maps to one overlay through [`OVERLAY_TABLE`]; today there is a
//! single category, segmentation masks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::OverlayRecipe;
use crate::{Error, Result};

/// Kind of EPIC a dataset is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpicCategory {
    SegmentationMask,
}

impl EpicCategory {
    /// Category of the EPIC with this id. Only segmentation-mask EPICs exist
    /// so far, so every id lands there.
    pub fn of(_epic_id: &str) -> Self {
        EpicCategory::SegmentationMask
    }
}

pub const OVERLAY_TABLE: &[(EpicCategory, OverlayRecipe)] =
    &[(EpicCategory::SegmentationMask, OverlayRecipe::SegmentationMask)];

/// Pick the overlay for an EPIC. Callers check for an id first; `None` is
/// rejected rather than defaulted.
pub fn select_overlay(epic_id: Option<&str>) -> Result<OverlayRecipe> {
    let epic_id = epic_id.ok_or(Error::MissingEpicId)?;
    let category = EpicCategory::of(epic_id);
    let overlay = lookup(OVERLAY_TABLE, category)?;
    debug!(epic_id, ?category, %overlay, "overlay selected");
    Ok(overlay)
}

/// A category missing from the table is a build-time gap, not a lookup failure.
fn lookup(table: &[(EpicCategory, OverlayRecipe)], category: EpicCategory) -> Result<OverlayRecipe> {
    table
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, overlay)| *overlay)
        .ok_or_else(|| Error::Config(format!("no overlay registered for EPIC category {category:?}")))
}
