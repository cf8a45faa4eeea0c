//! Recipe decision tree: hints, assay name and provenance to one recipe.
//!
//! Only reached for datasets resolved on their own (lineage `Direct`).
//! Rules are tried top to bottom and the first match wins; hint
//! combinations overlap in real data, so the order *is* the contract.
//!
//! ```text
//!   1. epic is the only hint              → ObjectByAnalyte
//!   2. is_image
//!      a. + rna                           → SpatialMultiomic
//!      b. + sprm + anndata                → MultiImageSprm
//!      c. + codex, sprm→anndata step      → StitchedCytokitSprm
//!         + codex                         → TiledSprm
//!      d. + geomx                         → GeoMx
//!      e. + xenium                        → XeniumMultiomic
//!      f. seqFish / MALDI-IMS assay       → SeqFish / Ims
//!         NanoDESI immediate ancestor     → NanoDesi
//!         otherwise                       → ImagePyramid
//!   3. rna
//!      a. + atac                          → MultiomicAnndataZarr
//!      b. + json_based                    → RnaSeqJson
//!      c. slide-seq assay                 → SpatialRnaSeqAnnDataZarr
//!         otherwise                       → RnaSeqAnnDataZarr
//!   4. atac                               → AtacSeqJson
//!   5.                                    → Null
//! ```

use tracing::{debug, trace};

use crate::ancestor::AncestorResolver;
use crate::config::ResolverConfig;
use crate::fetch::AssayFetch;
use crate::model::{EntityRef, Hint, HintSet, Recipe};
use crate::Result;

pub struct RecipeResolver<'c> {
    config: &'c ResolverConfig,
}

impl<'c> RecipeResolver<'c> {
    pub fn new(config: &'c ResolverConfig) -> Self {
        Self { config }
    }

    /// Object-by-analyte EPICs carry `epic` and nothing else. They are fully
    /// self-contained and bypass every other rule, lineage included.
    pub fn is_object_by_analyte(hints: &HintSet) -> bool {
        hints.is_only(Hint::Epic)
    }

    /// Resolve `entity` on its own. The only I/O is the rule 2f scan of
    /// immediate ancestors.
    pub fn resolve<F: AssayFetch + ?Sized>(
        &self,
        entity: &EntityRef,
        ancestors: &mut AncestorResolver<'_, F>,
    ) -> Result<Recipe> {
        let hints = &entity.hints;

        let (recipe, rule) = if Self::is_object_by_analyte(hints) {
            (Recipe::ObjectByAnalyte, "epic_only")
        } else if hints.has(Hint::IsImage) {
            self.resolve_image(entity, ancestors)?
        } else if hints.has(Hint::Rna) {
            self.resolve_rna(entity)
        } else if hints.has(Hint::Atac) {
            (Recipe::AtacSeqJson, "atac")
        } else {
            (Recipe::Null, "no_match")
        };

        debug!(uuid = ?entity.uuid, %hints, rule, %recipe, "recipe resolved");
        Ok(recipe)
    }

    fn resolve_image<F: AssayFetch + ?Sized>(
        &self,
        entity: &EntityRef,
        ancestors: &mut AncestorResolver<'_, F>,
    ) -> Result<(Recipe, &'static str)> {
        let hints = &entity.hints;

        if hints.has(Hint::Rna) {
            // Visium without probes
            return Ok((Recipe::SpatialMultiomic, "image.rna"));
        }
        if hints.has_all(&[Hint::Sprm, Hint::Anndata]) {
            // CellDIVE: DeepCell + SPRM
            return Ok((Recipe::MultiImageSprm, "image.sprm_anndata"));
        }
        if hints.has(Hint::Codex) {
            return Ok(if entity.provenance.contains_step(&self.config.stitched_sprm_step) {
                (Recipe::StitchedCytokitSprm, "image.codex.stitched")
            } else {
                (Recipe::TiledSprm, "image.codex.tiled")
            });
        }
        if hints.has(Hint::Geomx) {
            return Ok((Recipe::GeoMx, "image.geomx"));
        }
        if hints.has(Hint::Xenium) {
            return Ok((Recipe::XeniumMultiomic, "image.xenium"));
        }

        let assays = &self.config.assays;
        if entity.is_assay(&assays.seqfish) {
            return Ok((Recipe::SeqFish, "image.assay.seqfish"));
        }
        if entity.is_assay(&assays.maldi_ims) {
            return Ok((Recipe::Ims, "image.assay.ims"));
        }
        if self.has_ancestor_assay(entity, &assays.nanodesi, ancestors)? {
            return Ok((Recipe::NanoDesi, "image.ancestor.nanodesi"));
        }
        Ok((Recipe::ImagePyramid, "image.pyramid"))
    }

    fn resolve_rna(&self, entity: &EntityRef) -> (Recipe, &'static str) {
        let hints = &entity.hints;

        if hints.has(Hint::Atac) {
            // multiome MuData: 10x Multiome, SNARE-Seq
            return (Recipe::MultiomicAnndataZarr, "rna.atac");
        }
        if hints.has(Hint::JsonBased) {
            return (Recipe::RnaSeqJson, "rna.json");
        }
        // not JSON: AnnData-backed
        if entity.is_assay(&self.config.assays.slideseq) {
            return (Recipe::SpatialRnaSeqAnnDataZarr, "rna.slideseq");
        }
        (Recipe::RnaSeqAnnDataZarr, "rna.anndata")
    }

    /// Scan the entity's immediate ancestors (one level, never further) for
    /// one of the given assay. Stops at the first hit.
    fn has_ancestor_assay<F: AssayFetch + ?Sized>(
        &self,
        entity: &EntityRef,
        assay: &str,
        ancestors: &mut AncestorResolver<'_, F>,
    ) -> Result<bool> {
        for uuid in &entity.immediate_ancestor_ids {
            if ancestors.resolve(uuid)?.is_assay(assay) {
                trace!(uuid = %uuid, assay, "immediate ancestor matched");
                return Ok(true);
            }
        }
        Ok(false)
    }
}
