//! Recipes: opaque names for the rendering strategy chosen for a dataset.
//!
//! A `Recipe` says *which* renderer applies, never *how* it renders. Binding
//! recipes to executable renderers is the job of a
//! [`RecipeRegistry`](crate::registry::RecipeRegistry) owned by the host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The primary rendering strategy for one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipe {
    /// No visualization.
    Null,
    /// Self-contained object-by-analyte EPIC data.
    ObjectByAnalyte,
    /// Visium-style image + RNA AnnData.
    SpatialMultiomic,
    /// CellDIVE-style multi-image SPRM with AnnData.
    MultiImageSprm,
    /// Legacy JSON-backed CODEX/SPRM tiles.
    TiledSprm,
    /// CODEX stitched by Cytokit, SPRM converted to AnnData.
    StitchedCytokitSprm,
    GeoMx,
    XeniumMultiomic,
    ImagePyramid,
    SeqFish,
    Ims,
    NanoDesi,
    EpicSegImagePyramid,
    KaggleSegImagePyramid,
    MultiomicAnndataZarr,
    /// Legacy JSON-backed RNA-seq scatterplot.
    RnaSeqJson,
    SpatialRnaSeqAnnDataZarr,
    RnaSeqAnnDataZarr,
    /// Legacy JSON-backed ATAC-seq scatterplot.
    AtacSeqJson,
}

impl Recipe {
    pub const ALL: [Recipe; 19] = [
        Recipe::Null,
        Recipe::ObjectByAnalyte,
        Recipe::SpatialMultiomic,
        Recipe::MultiImageSprm,
        Recipe::TiledSprm,
        Recipe::StitchedCytokitSprm,
        Recipe::GeoMx,
        Recipe::XeniumMultiomic,
        Recipe::ImagePyramid,
        Recipe::SeqFish,
        Recipe::Ims,
        Recipe::NanoDesi,
        Recipe::EpicSegImagePyramid,
        Recipe::KaggleSegImagePyramid,
        Recipe::MultiomicAnndataZarr,
        Recipe::RnaSeqJson,
        Recipe::SpatialRnaSeqAnnDataZarr,
        Recipe::RnaSeqAnnDataZarr,
        Recipe::AtacSeqJson,
    ];

    pub fn is_null(self) -> bool {
        self == Recipe::Null
    }

    /// Stable snake_case identifier (same as the serde form).
    pub fn id(self) -> &'static str {
        match self {
            Recipe::Null => "null",
            Recipe::ObjectByAnalyte => "object_by_analyte",
            Recipe::SpatialMultiomic => "spatial_multiomic",
            Recipe::MultiImageSprm => "multi_image_sprm",
            Recipe::TiledSprm => "tiled_sprm",
            Recipe::StitchedCytokitSprm => "stitched_cytokit_sprm",
            Recipe::GeoMx => "geo_mx",
            Recipe::XeniumMultiomic => "xenium_multiomic",
            Recipe::ImagePyramid => "image_pyramid",
            Recipe::SeqFish => "seq_fish",
            Recipe::Ims => "ims",
            Recipe::NanoDesi => "nano_desi",
            Recipe::EpicSegImagePyramid => "epic_seg_image_pyramid",
            Recipe::KaggleSegImagePyramid => "kaggle_seg_image_pyramid",
            Recipe::MultiomicAnndataZarr => "multiomic_anndata_zarr",
            Recipe::RnaSeqJson => "rna_seq_json",
            Recipe::SpatialRnaSeqAnnDataZarr => "spatial_rna_seq_ann_data_zarr",
            Recipe::RnaSeqAnnDataZarr => "rna_seq_ann_data_zarr",
            Recipe::AtacSeqJson => "atac_seq_json",
        }
    }

    /// Name of the view-config builder that historically implemented this
    /// recipe. Hosts that still key renderers by builder name use this.
    pub fn builder_name(self) -> &'static str {
        match self {
            Recipe::Null => "NullViewConfBuilder",
            Recipe::ObjectByAnalyte => "ObjectByAnalyteConfBuilder",
            Recipe::SpatialMultiomic => "SpatialMultiomicAnnDataZarrViewConfBuilder",
            Recipe::MultiImageSprm => "MultiImageSPRMAnndataViewConfBuilder",
            Recipe::TiledSprm => "TiledSPRMViewConfBuilder",
            Recipe::StitchedCytokitSprm => "StitchedCytokitSPRMViewConfBuilder",
            Recipe::GeoMx => "GeoMxImagePyramidViewConfBuilder",
            Recipe::XeniumMultiomic => "XeniumMultiomicAnnDataZarrViewConfBuilder",
            Recipe::ImagePyramid => "ImagePyramidViewConfBuilder",
            Recipe::SeqFish => "SeqFISHViewConfBuilder",
            Recipe::Ims => "IMSViewConfBuilder",
            Recipe::NanoDesi => "NanoDESIViewConfBuilder",
            Recipe::EpicSegImagePyramid => "EpicSegImagePyramidViewConfBuilder",
            Recipe::KaggleSegImagePyramid => "KaggleSegImagePyramidViewConfBuilder",
            Recipe::MultiomicAnndataZarr => "MultiomicAnndataZarrViewConfBuilder",
            Recipe::RnaSeqJson => "RNASeqViewConfBuilder",
            Recipe::SpatialRnaSeqAnnDataZarr => "SpatialRNASeqAnnDataZarrViewConfBuilder",
            Recipe::RnaSeqAnnDataZarr => "RNASeqAnnDataZarrViewConfBuilder",
            Recipe::AtacSeqJson => "ATACSeqViewConfBuilder",
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Accepts either the snake_case id or the historical builder name.
impl FromStr for Recipe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recipe::ALL
            .into_iter()
            .find(|r| r.id() == s || r.builder_name() == s)
            .ok_or_else(|| Error::UnknownRecipe(s.to_string()))
    }
}

/// Post-processing overlay applied after the primary recipe renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayRecipe {
    /// EPIC segmentation masks drawn over the base image.
    SegmentationMask,
}

impl OverlayRecipe {
    pub fn builder_name(self) -> &'static str {
        match self {
            OverlayRecipe::SegmentationMask => "SegmentationMaskBuilder",
        }
    }
}

impl fmt::Display for OverlayRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayRecipe::SegmentationMask => f.write_str("segmentation_mask"),
        }
    }
}
