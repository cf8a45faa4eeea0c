//! Resolver configuration.
//!
//! The names the decision tree matches on exactly. They are the assay-type
//! service's canonical spellings; hosts pointed at a differently-spelled
//! service override them here instead of patching rules.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const SEQFISH: &str = "seqFish";
pub const MALDI_IMS: &str = "MALDI-IMS";
pub const NANODESI: &str = "NanoDESI";
pub const SALMON_RNASEQ_SLIDE: &str = "salmon_rnaseq_slideseq";

/// Pipeline step that marks CODEX output converted to AnnData.
pub const SPRM_TO_ANNDATA_STEP: &str = "sprm-to-anndata.cwl";

/// Assay names with dedicated recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssayNames {
    pub seqfish: String,
    pub maldi_ims: String,
    pub nanodesi: String,
    pub slideseq: String,
}

impl Default for AssayNames {
    fn default() -> Self {
        Self {
            seqfish: SEQFISH.into(),
            maldi_ims: MALDI_IMS.into(),
            nanodesi: NANODESI.into(),
            slideseq: SALMON_RNASEQ_SLIDE.into(),
        }
    }
}

/// Configuration for a [`Resolver`](crate::Resolver).
///
/// Missing fields in a serialized config fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub assays: AssayNames,
    pub stitched_sprm_step: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            assays: AssayNames::default(),
            stitched_sprm_step: SPRM_TO_ANNDATA_STEP.into(),
        }
    }
}

impl ResolverConfig {
    /// Parse a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("invalid resolver config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty names: an empty name would match records whose field
    /// is present but blank.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("assays.seqfish", &self.assays.seqfish),
            ("assays.maldi_ims", &self.assays.maldi_ims),
            ("assays.nanodesi", &self.assays.nanodesi),
            ("assays.slideseq", &self.assays.slideseq),
            ("stitched_sprm_step", &self.stitched_sprm_step),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}
