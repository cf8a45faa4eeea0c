//! Assay descriptors, as served by the assay-type service.

use serde::{Deserialize, Serialize};

use super::HintSet;
use crate::{Error, Result};

/// Assay metadata for one dataset: its assay name and default hints.
///
/// Immutable once fetched. The wire shape matches the assay-type service
/// response (`soft_assaytype`, `vitessce-hints`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssayDescriptor {
    #[serde(rename = "soft_assaytype", default)]
    pub assay_name: Option<String>,
    #[serde(rename = "vitessce-hints", default)]
    pub hints: HintSet,
}

impl AssayDescriptor {
    pub fn new(assay_name: impl Into<String>) -> Self {
        Self {
            assay_name: Some(assay_name.into()),
            hints: HintSet::empty(),
        }
    }

    pub fn with_hints(mut self, hints: impl Into<HintSet>) -> Self {
        self.hints = hints.into();
        self
    }

    /// Exact, case-sensitive assay-name comparison.
    pub fn is_assay(&self, name: &str) -> bool {
        self.assay_name.as_deref() == Some(name)
    }

    /// Decode a service response. Anything that is not a JSON object, or
    /// whose fields have the wrong shape, is a malformed record.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::MalformedRecord(format!(
                "assay descriptor must be a JSON object, got {value}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(raw)?)
    }
}
