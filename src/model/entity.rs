//! Dataset references built from search-index records.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{HintSet, Provenance};
use crate::{Error, Result};

/// One entry of a dataset's file manifest. Only presence matters here;
/// renderers read the paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub rel_path: String,
}

impl FileEntry {
    pub fn new(rel_path: impl Into<String>) -> Self {
        Self { rel_path: rel_path.into() }
    }
}

/// The parent a support dataset is lifted onto: either already in hand,
/// or a uuid whose assay metadata is fetched on demand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Uuid(String),
    Entity(Box<EntityRef>),
}

impl ParentRef {
    pub fn uuid(&self) -> Option<&str> {
        match self {
            ParentRef::Uuid(uuid) => Some(uuid),
            ParentRef::Entity(entity) => entity.uuid.as_deref(),
        }
    }
}

impl From<&str> for ParentRef {
    fn from(uuid: &str) -> Self {
        ParentRef::Uuid(uuid.to_string())
    }
}

impl From<String> for ParentRef {
    fn from(uuid: String) -> Self {
        ParentRef::Uuid(uuid)
    }
}

impl From<EntityRef> for ParentRef {
    fn from(entity: EntityRef) -> Self {
        ParentRef::Entity(Box::new(entity))
    }
}

/// A dataset as seen by the resolver. Built per request and never mutated
/// during a resolution.
///
/// `uuid` is optional only so that a record without one can be represented
/// and rejected at resolution time with [`Error::MissingUuid`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "IndexRecord")]
pub struct EntityRef {
    pub uuid: Option<String>,
    pub hints: HintSet,
    pub assay_name: Option<String>,
    pub provenance: Provenance,
    pub files: Vec<FileEntry>,
    /// Direct parents in the derivation DAG. Usually one or two.
    pub immediate_ancestor_ids: SmallVec<[String; 2]>,
    pub parent: Option<ParentRef>,
    /// The search index's own "has a visualization" flag, set at indexing time.
    pub visualization: bool,
}

impl EntityRef {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: Some(uuid.into()), ..Self::default() }
    }

    /// An entity with no uuid. Resolving it fails validation.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_hints(mut self, hints: impl Into<HintSet>) -> Self {
        self.hints = hints.into();
        self
    }

    pub fn with_raw_hints<I>(mut self, raw: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.hints = HintSet::parse(raw);
        self
    }

    pub fn with_assay(mut self, assay_name: impl Into<String>) -> Self {
        self.assay_name = Some(assay_name.into());
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn with_file(mut self, rel_path: impl Into<String>) -> Self {
        self.files.push(FileEntry::new(rel_path));
        self
    }

    pub fn with_ancestor(mut self, uuid: impl Into<String>) -> Self {
        let uuid = uuid.into();
        if !self.immediate_ancestor_ids.contains(&uuid) {
            self.immediate_ancestor_ids.push(uuid);
        }
        self
    }

    pub fn with_parent(mut self, parent: impl Into<ParentRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_visualization_flag(mut self, flag: bool) -> Self {
        self.visualization = flag;
        self
    }

    /// The entity's uuid, or the validation error every resolution raises
    /// for an entity without one.
    pub fn require_uuid(&self) -> Result<&str> {
        self.uuid.as_deref().ok_or(Error::MissingUuid)
    }

    pub fn is_assay(&self, name: &str) -> bool {
        self.assay_name.as_deref() == Some(name)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Decode a search-index `_source` document.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::MalformedRecord(format!(
                "entity record must be a JSON object, got {value}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }
}

// ============================================================================
// Index record wire shape
// ============================================================================

/// Search-index document, as much of it as resolution reads. Every field
/// may be absent or null in real records.
#[derive(Deserialize)]
struct IndexRecord {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(rename = "vitessce-hints", default)]
    hints: Option<Vec<String>>,
    #[serde(default)]
    soft_assaytype: Option<String>,
    #[serde(default)]
    metadata: Option<IndexMetadata>,
    /// Flattened records carry the DAG list at the top level.
    #[serde(default)]
    dag_provenance_list: Option<Provenance>,
    #[serde(default)]
    files: Option<Vec<FileEntry>>,
    #[serde(default)]
    immediate_ancestor_ids: Option<Vec<String>>,
    #[serde(default)]
    immediate_ancestors: Option<Vec<AncestorStub>>,
    #[serde(default)]
    parent: Option<ParentRef>,
    #[serde(default)]
    visualization: Option<bool>,
}

#[derive(Deserialize)]
struct IndexMetadata {
    #[serde(default)]
    dag_provenance_list: Option<Provenance>,
    #[serde(default)]
    files: Option<Vec<FileEntry>>,
}

#[derive(Deserialize)]
struct AncestorStub {
    #[serde(default)]
    uuid: Option<String>,
}

impl From<IndexRecord> for EntityRef {
    fn from(record: IndexRecord) -> Self {
        // Full documents nest these under metadata; flattened ones do not.
        let (nested_provenance, nested_files) = match record.metadata {
            Some(metadata) => (metadata.dag_provenance_list, metadata.files),
            None => (None, None),
        };
        let provenance = nested_provenance.or(record.dag_provenance_list).unwrap_or_default();
        let files = nested_files.or(record.files).unwrap_or_default();

        let mut ancestors: SmallVec<[String; 2]> = SmallVec::new();
        let stub_ids = record
            .immediate_ancestors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.uuid);
        for uuid in record.immediate_ancestor_ids.unwrap_or_default().into_iter().chain(stub_ids) {
            if !uuid.is_empty() && !ancestors.contains(&uuid) {
                ancestors.push(uuid);
            }
        }

        // Fixtures and older callers encode "no parent" as an empty string.
        let parent = record.parent.filter(|p| !matches!(p, ParentRef::Uuid(u) if u.is_empty()));

        EntityRef {
            uuid: record.uuid,
            hints: HintSet::parse(record.hints.unwrap_or_default()),
            assay_name: record.soft_assaytype,
            provenance,
            files,
            immediate_ancestor_ids: ancestors,
            parent,
            visualization: record.visualization.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_index_record() {
        let entity = EntityRef::from_json(
            r#"{
                "uuid": "43213991a54ce196d406707ffe2e86bd",
                "vitessce-hints": ["codex", "is_image", "sprm"],
                "soft_assaytype": "CODEX",
                "metadata": {"dag_provenance_list": [
                    {"origin": "https://github.com/hubmapconsortium/codex-pipeline", "name": "pipeline.cwl"},
                    {"origin": "https://github.com/hubmapconsortium/portal-containers", "name": "sprm-to-anndata.cwl"}
                ]},
                "files": [{"rel_path": "pipeline_output/expr/reg001_expr.ome.tiff", "size": 10}],
                "immediate_ancestors": [{"uuid": "a1"}, {"uuid": "a2"}],
                "immediate_ancestor_ids": ["a1"]
            }"#,
        )
        .unwrap();

        assert_eq!(entity.uuid.as_deref(), Some("43213991a54ce196d406707ffe2e86bd"));
        assert_eq!(entity.hints, HintSet::from([Hint::Codex, Hint::IsImage, Hint::Sprm]));
        assert!(entity.is_assay("CODEX"));
        assert!(entity.provenance.contains_step("sprm-to-anndata.cwl"));
        assert!(entity.has_files());
        assert_eq!(entity.immediate_ancestor_ids.as_slice(), &["a1".to_string(), "a2".to_string()]);
        assert_eq!(entity.parent, None);
    }

    #[test]
    fn test_files_nested_under_metadata() {
        let entity = EntityRef::from_json(
            r#"{
                "uuid": "d1",
                "metadata": {"files": [{"rel_path": "ometiff-pyramids/ims.ome.tif"}]},
                "files": [{"rel_path": "top-level.txt"}]
            }"#,
        )
        .unwrap();
        assert_eq!(entity.files, vec![FileEntry::new("ometiff-pyramids/ims.ome.tif")]);

        let flattened = EntityRef::from_json(r#"{"uuid": "d2", "metadata": {}, "files": [{"rel_path": "a"}]}"#).unwrap();
        assert_eq!(flattened.files, vec![FileEntry::new("a")]);
    }

    #[test]
    fn test_decode_nulls_and_missing_uuid() {
        let entity = EntityRef::from_json(
            r#"{"vitessce-hints": null, "files": null, "visualization": null, "parent": ""}"#,
        )
        .unwrap();
        assert_eq!(entity, EntityRef::anonymous());
        assert!(matches!(entity.require_uuid(), Err(Error::MissingUuid)));
    }

    #[test]
    fn test_decode_parent_forms() {
        let by_uuid = EntityRef::from_json(r#"{"uuid": "s", "parent": "p"}"#).unwrap();
        assert_eq!(by_uuid.parent, Some(ParentRef::Uuid("p".into())));

        let by_entity = EntityRef::from_json(
            r#"{"uuid": "s", "parent": {"uuid": "p", "soft_assaytype": "seqFish"}}"#,
        )
        .unwrap();
        let parent = by_entity.parent.unwrap();
        assert_eq!(parent.uuid(), Some("p"));
        match parent {
            ParentRef::Entity(e) => assert!(e.is_assay("seqFish")),
            other => panic!("expected entity parent, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_record_is_malformed() {
        let err = EntityRef::from_json_value(serde_json::json!("uuid")).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(_)));
    }

    #[test]
    fn test_with_ancestor_dedups() {
        let entity = EntityRef::new("e").with_ancestor("a").with_ancestor("a").with_ancestor("b");
        assert_eq!(entity.immediate_ancestor_ids.len(), 2);
    }
}
