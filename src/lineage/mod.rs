//! Lineage walk: is this dataset rendered on its own, or lifted?
//!
//! "Vis-lifting" shows a derived dataset's image pyramids on its parent's
//! page, because only the derived (support) dataset carries renderable
//! imagery. When the caller supplies a parent, the walker decides which
//! lifted recipe applies, if any. Without a parent it reports
//! [`Lineage::Direct`] and the decision tree takes over.
//!
//! ```text
//!   parent? ──no──► Direct
//!      │yes
//!      ├─ segmentation_mask + EPIC id ──► LiftedSegmentation(Epic)
//!      ├─ segmentation_mask ────────────► LiftedSegmentation(Kaggle)
//!      ├─ is_support + is_image ────────► LiftedSupport (by ancestor assay)
//!      └─ otherwise ────────────────────► Unsupported (no visualization)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ancestor::AncestorResolver;
use crate::config::ResolverConfig;
use crate::fetch::AssayFetch;
use crate::model::{EntityRef, Hint, ParentRef, Recipe};
use crate::Result;

/// Where segmentation masks of a lifted dataset come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStyle {
    /// Masks attached to an EPIC.
    Epic,
    /// Kaggle-challenge style masks.
    Kaggle,
}

/// Outcome of the lineage walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lineage {
    /// No parent: the dataset is resolved on its own.
    Direct,
    LiftedSegmentation { style: SegmentationStyle },
    /// A support image pyramid lifted onto its parent; `ancestor_assay` is
    /// the parent's assay name as fetched, if it had one.
    LiftedSupport { ancestor_uuid: Option<String>, ancestor_assay: Option<String>, recipe: Recipe },
    /// A parent was given but this dataset has nothing to lift.
    Unsupported,
}

impl Lineage {
    /// The recipe the walk settled on. `None` means "defer to the decision tree".
    pub fn recipe(&self) -> Option<Recipe> {
        match self {
            Lineage::Direct => None,
            Lineage::LiftedSegmentation { style: SegmentationStyle::Epic } => Some(Recipe::EpicSegImagePyramid),
            Lineage::LiftedSegmentation { style: SegmentationStyle::Kaggle } => Some(Recipe::KaggleSegImagePyramid),
            Lineage::LiftedSupport { recipe, .. } => Some(*recipe),
            Lineage::Unsupported => Some(Recipe::Null),
        }
    }

    pub fn is_lifted(&self) -> bool {
        matches!(self, Lineage::LiftedSegmentation { .. } | Lineage::LiftedSupport { .. })
    }
}

// ============================================================================
// LineageWalker
// ============================================================================

pub struct LineageWalker<'c> {
    config: &'c ResolverConfig,
}

impl<'c> LineageWalker<'c> {
    pub fn new(config: &'c ResolverConfig) -> Self {
        Self { config }
    }

    /// Walk one step up from `entity`. Only the `LiftedSupport` branch
    /// touches the fetch capability, and only for the parent.
    pub fn walk<F: AssayFetch + ?Sized>(
        &self,
        entity: &EntityRef,
        parent: Option<&ParentRef>,
        epic_id: Option<&str>,
        ancestors: &mut AncestorResolver<'_, F>,
    ) -> Result<Lineage> {
        let Some(parent) = parent else {
            return Ok(Lineage::Direct);
        };
        let hints = &entity.hints;

        let lineage = if hints.has(Hint::SegmentationMask) && epic_id.is_some() {
            Lineage::LiftedSegmentation { style: SegmentationStyle::Epic }
        } else if hints.has(Hint::SegmentationMask) {
            Lineage::LiftedSegmentation { style: SegmentationStyle::Kaggle }
        } else if hints.has_all(&[Hint::IsSupport, Hint::IsImage]) {
            let ancestor_assay = self.parent_assay(parent, ancestors)?;
            let recipe = self.support_recipe(ancestor_assay.as_deref());
            Lineage::LiftedSupport {
                ancestor_uuid: parent.uuid().map(str::to_string),
                ancestor_assay,
                recipe,
            }
        } else {
            Lineage::Unsupported
        };

        debug!(parent = ?parent.uuid(), ?lineage, "lineage resolved");
        Ok(lineage)
    }

    /// The parent's assay name. A parent handed over as an entity with a
    /// known assay is used as-is; otherwise it is fetched once by uuid.
    fn parent_assay<F: AssayFetch + ?Sized>(
        &self,
        parent: &ParentRef,
        ancestors: &mut AncestorResolver<'_, F>,
    ) -> Result<Option<String>> {
        match parent {
            ParentRef::Entity(entity) if entity.assay_name.is_some() => Ok(entity.assay_name.clone()),
            ParentRef::Entity(entity) => match entity.uuid.as_deref() {
                Some(uuid) => Ok(ancestors.resolve(uuid)?.assay_name.clone()),
                None => {
                    debug!("parent entity has neither uuid nor assay; using generic pyramid");
                    Ok(None)
                }
            },
            ParentRef::Uuid(uuid) => Ok(ancestors.resolve(uuid)?.assay_name.clone()),
        }
    }

    /// Dispatch a lifted support pyramid by its ancestor's assay. Never fails:
    /// anything unrecognized gets the generic image pyramid.
    pub fn support_recipe(&self, ancestor_assay: Option<&str>) -> Recipe {
        let assays = &self.config.assays;
        match ancestor_assay {
            Some(name) if name == assays.seqfish => Recipe::SeqFish,
            Some(name) if name == assays.maldi_ims => Recipe::Ims,
            Some(name) if name == assays.nanodesi => Recipe::NanoDesi,
            _ => Recipe::ImagePyramid,
        }
    }
}
