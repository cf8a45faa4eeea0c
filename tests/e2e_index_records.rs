//! End-to-end tests starting from search-index JSON documents.
//!
//! Each record is decoded with `EntityRef::from_json_value`, assay lookups
//! are served from decoded assay-type responses, and the recipe is compared
//! with the historical builder name the portal expects.

use pretty_assertions::assert_eq;
use serde_json::json;
use vis_recipe::{
    AssayDescriptor, Context, EntityRef, MemoryCatalog, PagePlan, Recipe, RecipeRegistry, Resolver,
};

fn assay_service() -> MemoryCatalog {
    let responses = [
        ("c6a254b2dc2ed46b002500ade163a7cc", json!({"soft_assaytype": "seqFish", "vitessce-hints": ["is_image"]})),
        ("3bc3ad124014a632d558255626bf38c9", json!({"soft_assaytype": "MALDI-IMS", "vitessce-hints": ["is_image"]})),
        ("6b93107731199733f266bbd0f3bc9747", json!({"soft_assaytype": "NanoDESI", "vitessce-hints": ["is_image"]})),
        ("8adc3c31ca84ec4b958ed20a7c4f4919", json!({"soft_assaytype": "PAS", "vitessce-hints": ["is_image"]})),
        ("2c2179ea741d3bbb47772172a316a2bf", json!({"soft_assaytype": "Null", "vitessce-hints": []})),
    ];
    let catalog = MemoryCatalog::new();
    for (uuid, response) in responses {
        catalog.insert(uuid, AssayDescriptor::from_json_value(response).unwrap());
    }
    catalog
}

fn builder_for(record: serde_json::Value) -> &'static str {
    let entity = EntityRef::from_json_value(record).unwrap();
    let recipe = Resolver::new(assay_service()).resolve(&entity, &Context::new()).unwrap();
    RecipeRegistry::builder_names().bind(recipe).copied().unwrap()
}

#[test]
fn test_direct_records() {
    let cases = [
        (
            json!({"uuid": "2c2179ea741d3bbb47772172a316a2bf", "vitessce-hints": []}),
            "NullViewConfBuilder",
        ),
        (
            json!({
                "uuid": "43213991a54ce196d406707ffe2e86bd",
                "vitessce-hints": ["codex", "is_image", "sprm", "anndata_missing"],
                "metadata": {"dag_provenance_list": [
                    {"origin": "https://github.com/hubmapconsortium/codex-pipeline", "name": "pipeline.cwl"},
                    {"origin": "https://github.com/hubmapconsortium/portal-containers", "name": "sprm-to-anndata.cwl"}
                ]}
            }),
            "StitchedCytokitSPRMViewConfBuilder",
        ),
        (
            json!({
                "uuid": "b69d1e2ad1bf1455eee991fce301b191",
                "vitessce-hints": ["codex", "is_image", "json_based"],
                "metadata": {"dag_provenance_list": [{"name": "pipeline.cwl"}]}
            }),
            "TiledSPRMViewConfBuilder",
        ),
        (
            json!({"uuid": "c3be5650e93907b68ddbdb22b948db32", "vitessce-hints": ["is_image", "sprm", "anndata"]}),
            "MultiImageSPRMAnndataViewConfBuilder",
        ),
        (
            json!({"uuid": "72ec02cf1390428c1e9dc2c88928f5f5", "vitessce-hints": ["is_image", "rna", "spatial"]}),
            "SpatialMultiomicAnnDataZarrViewConfBuilder",
        ),
        (
            json!({"uuid": "272789a950b2b5d4b9387a1cf66ad487", "vitessce-hints": ["rna", "atac"], "soft_assaytype": "10x_multiome"}),
            "MultiomicAnndataZarrViewConfBuilder",
        ),
        (
            json!({"uuid": "c019a1cd35aab4d2b4a6ff221e92aaab", "vitessce-hints": ["rna", "json_based"]}),
            "RNASeqViewConfBuilder",
        ),
        (
            json!({"uuid": "2a590db3d7ab1e1512816b165d95cdcf", "vitessce-hints": ["rna"], "soft_assaytype": "salmon_rnaseq_slideseq"}),
            "SpatialRNASeqAnnDataZarrViewConfBuilder",
        ),
        (
            json!({"uuid": "e65175561b4b17da5352e3837aa0e497", "vitessce-hints": ["rna"], "soft_assaytype": "salmon_rnaseq_10x"}),
            "RNASeqAnnDataZarrViewConfBuilder",
        ),
        (
            json!({"uuid": "d4493657cde29702c5ed73932da5317c", "vitessce-hints": ["atac", "json_based"]}),
            "ATACSeqViewConfBuilder",
        ),
        (
            json!({"uuid": "d3130f4a89946cc6b300b115a3120b7a", "vitessce-hints": ["epic"]}),
            "ObjectByAnalyteConfBuilder",
        ),
        (
            json!({"uuid": "geomx", "vitessce-hints": ["is_image", "geomx", "anndata"]}),
            "GeoMxImagePyramidViewConfBuilder",
        ),
        (
            json!({"uuid": "xenium", "vitessce-hints": ["is_image", "xenium", "anndata"]}),
            "XeniumMultiomicAnnDataZarrViewConfBuilder",
        ),
        (
            json!({
                "uuid": "nanodesi-image",
                "vitessce-hints": ["is_image"],
                "immediate_ancestors": [{"uuid": "6b93107731199733f266bbd0f3bc9747", "entity_type": "Dataset"}]
            }),
            "NanoDESIViewConfBuilder",
        ),
    ];

    for (record, expected) in cases {
        let uuid = record["uuid"].as_str().unwrap_or("?").to_string();
        assert_eq!(builder_for(record), expected, "record {uuid}");
    }
}

#[test]
fn test_lifted_records() {
    let cases = [
        ("9db61adfc017670a196ea9b3ca1852a0", "c6a254b2dc2ed46b002500ade163a7cc", "SeqFISHViewConfBuilder"),
        ("a6116772446f6d1c1f6b3d2e9735cfe0", "3bc3ad124014a632d558255626bf38c9", "IMSViewConfBuilder"),
        ("e1c4370da5523ab5c9be581d1d76ca20", "6b93107731199733f266bbd0f3bc9747", "NanoDESIViewConfBuilder"),
        ("f9ae931b8b49252f150d7f8bf1d2d13f", "8adc3c31ca84ec4b958ed20a7c4f4919", "ImagePyramidViewConfBuilder"),
    ];

    for (support, parent, expected) in cases {
        let record = json!({
            "uuid": support,
            "vitessce-hints": ["is_support", "is_image"],
            "parent": parent,
            "files": [{"rel_path": "ometiff-pyramids/image.ome.tif"}]
        });
        assert_eq!(builder_for(record), expected, "support {support}");
    }
}

#[test]
fn test_non_image_support_record() {
    let record = json!({
        "uuid": "f9ae931b8b49252f150d7f8bf1d2d13f-bad",
        "vitessce-hints": ["is_support"],
        "parent": "8adc3c31ca84ec4b958ed20a7c4f4919"
    });
    let entity = EntityRef::from_json_value(record).unwrap();
    let resolver = Resolver::new(assay_service());
    assert!(!resolver.has_visualization(&entity, &Context::new()).unwrap());
}

#[test]
fn test_kaggle_segmentation_record() {
    let record = json!({
        "uuid": "seg-mask",
        "vitessce-hints": ["segmentation_mask", "is_image", "pyramid"],
        "parent": "8adc3c31ca84ec4b958ed20a7c4f4919"
    });
    assert_eq!(builder_for(record), "KaggleSegImagePyramidViewConfBuilder");
}

#[test]
fn test_page_plan_from_records() {
    let primary = EntityRef::from_json_value(json!({
        "uuid": "3bc3ad124014a632d558255626bf38c9",
        "vitessce-hints": [],
        "soft_assaytype": "MALDI-IMS"
    }))
    .unwrap();
    let descendant = EntityRef::from_json_value(json!({
        "uuid": "a6116772446f6d1c1f6b3d2e9735cfe0",
        "vitessce-hints": ["is_support", "is_image"],
        "files": [{"rel_path": "ometiff-pyramids/ims.ome.tif"}]
    }))
    .unwrap();

    let catalog = assay_service();
    let resolver = Resolver::new(catalog.clone());
    let plan = resolver.plan_page(&primary, Some(&descendant), None).unwrap();

    assert_eq!(plan.recipe(), Recipe::Ims);
    assert_eq!(plan.vis_lifted_uuid(), Some("a6116772446f6d1c1f6b3d2e9735cfe0"));
    // the primary's own record named its assay
    assert_eq!(catalog.fetch_count(), 0);

    let serialized = serde_json::to_value(&plan).unwrap();
    assert_eq!(serialized["plan"], json!("resolved"));
    assert_eq!(serialized["resolution"]["recipe"], json!("ims"));
    assert_eq!(serialized["resolution"]["lineage"]["state"], json!("lifted_support"));
}

#[test]
fn test_page_plan_reads_descendant_files_from_metadata() {
    let primary = EntityRef::from_json_value(json!({
        "uuid": "3bc3ad124014a632d558255626bf38c9",
        "vitessce-hints": [],
        "soft_assaytype": "MALDI-IMS"
    }))
    .unwrap();
    let descendant = EntityRef::from_json_value(json!({
        "uuid": "ABC123",
        "vitessce-hints": ["is_support", "is_image"],
        "metadata": {"files": [{"rel_path": "ometiff-pyramids/ims.ome.tif"}]}
    }))
    .unwrap();

    let plan = Resolver::new(assay_service()).plan_page(&primary, Some(&descendant), None).unwrap();

    assert_eq!(plan.error_message(), None);
    assert_eq!(plan.recipe(), Recipe::Ims);
    assert_eq!(plan.vis_lifted_uuid(), Some("ABC123"));
}

#[test]
fn test_empty_page_plan() {
    let entity = EntityRef::from_json_value(json!({
        "uuid": "2c2179ea741d3bbb47772172a316a2bf",
        "vitessce-hints": ["rna"],
        "visualization": false
    }))
    .unwrap();
    let plan = Resolver::new(assay_service()).plan_page(&entity, None, None).unwrap();
    assert_eq!(plan, PagePlan::Empty);
}
