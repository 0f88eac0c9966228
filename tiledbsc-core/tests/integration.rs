//! Integration tests walking collection → dataset → array layouts.

use std::collections::BTreeMap;

use tiledbsc_core::{
    GroupError, GroupStore, GroupWriter, Manifest, MemoryGroupStore, ObjectKind, Soma,
    SomaCollection, member_uris,
};

/// Builds a SOMA with `obs`, `var` and an `X` group holding one layer.
fn add_soma(store: &MemoryGroupStore, uri: &str) {
    store.create_group(uri).unwrap();
    store.create_array(&format!("{uri}/obs")).unwrap();
    store.create_array(&format!("{uri}/var")).unwrap();
    store.create_group(&format!("{uri}/X")).unwrap();
    store.create_array(&format!("{uri}/X/data")).unwrap();
    store.add_member(&format!("{uri}/X"), "data", "data", true).unwrap();
    store.add_member(uri, "obs", "obs", true).unwrap();
    store.add_member(uri, "var", "var", true).unwrap();
    store.add_member(uri, "X", "X", true).unwrap();
}

fn collect(soco: &SomaCollection<'_, MemoryGroupStore>) -> BTreeMap<String, Vec<String>> {
    soco.somas()
        .unwrap()
        .into_iter()
        .map(|(name, soma)| {
            let arrays = soma.list_arrays().unwrap().keys().cloned().collect();
            (name.to_string(), arrays)
        })
        .collect()
}

#[test]
fn collection_to_arrays() {
    let store = MemoryGroupStore::new();
    store.create_group("file:///data/soco").unwrap();
    add_soma(&store, "file:///data/soco/pbmc3k");
    add_soma(&store, "file:///data/soco/pbmc_small");
    store.add_member("file:///data/soco", "pbmc3k", "pbmc3k", true).unwrap();
    store.add_member("file:///data/soco", "pbmc_small", "pbmc_small", true).unwrap();

    let soco = SomaCollection::open(&store, "file:///data/soco");
    let walked = collect(&soco);

    let expected: Vec<String> = ["X/data", "obs", "var"].map(String::from).to_vec();
    assert_eq!(walked.len(), 2);
    assert_eq!(walked["pbmc3k"], expected);
    assert_eq!(walked["pbmc_small"], expected);
}

#[test]
fn leaf_two_groups_deep() {
    let store = MemoryGroupStore::new();
    store.create_group("/root").unwrap();
    store.create_group("/root/g1").unwrap();
    store.create_group("/root/g1/g2").unwrap();
    store.create_array("/root/g1/g2/leaf").unwrap();
    store.add_member("/root", "g1", "g1", true).unwrap();
    store.add_member("/root/g1", "g2", "g2", true).unwrap();
    store.add_member("/root/g1/g2", "leaf", "leaf", true).unwrap();

    let soma = Soma::open(&store, "/root");
    let arrays = soma.list_arrays().unwrap();

    assert_eq!(arrays.len(), 1);
    assert_eq!(arrays["g1/g2/leaf"], "/root/g1/g2/leaf");
}

#[test]
fn registered_array_under_file_root() {
    let store = MemoryGroupStore::new();
    store.create_group("file:///data/R").unwrap();
    store.create_array("tiledb://acct/X-abc123").unwrap();
    store.add_member("file:///data/R", "X", "tiledb://acct/X-abc123", false).unwrap();

    let soma = Soma::open(&store, "file:///data/R");

    let expected = BTreeMap::from([("X".to_string(), "file:///data/R/X".to_string())]);
    assert_eq!(soma.list_arrays().unwrap(), &expected);
    assert!(soma.group_uri_override());
}

#[test]
fn mixed_registered_and_path_members() {
    let store = MemoryGroupStore::new();
    store.create_group("/data/pbmc").unwrap();
    store.create_array("/data/pbmc/obs").unwrap();
    store.create_array("s3://bucket/var").unwrap();
    store.create_group("tiledb://acct/obsm-1").unwrap();
    store.create_array("tiledb://acct/pca-2").unwrap();
    store.add_member("tiledb://acct/obsm-1", "X_pca", "tiledb://acct/pca-2", false).unwrap();
    store.add_member("/data/pbmc", "obs", "obs", true).unwrap();
    store.add_member("/data/pbmc", "var", "s3://bucket/var", false).unwrap();
    store.add_member("/data/pbmc", "obsm", "tiledb://acct/obsm-1", false).unwrap();

    let soma = Soma::open(&store, "/data/pbmc/");
    let arrays = soma.list_arrays().unwrap();

    assert_eq!(arrays["obs"], "/data/pbmc/obs");
    assert_eq!(arrays["var"], "s3://bucket/var");
    assert_eq!(arrays["obsm/X_pca"], "/data/pbmc/obsm/X_pca");
}

#[test]
fn trailing_separators_do_not_matter() {
    let store = MemoryGroupStore::new();
    add_soma(&store, "tiledb://x/y");

    let plain = Soma::open(&store, "tiledb://x/y");
    let slashed = Soma::open(&store, "tiledb://x/y///");

    assert_eq!(plain.uri(), slashed.uri());
    assert_eq!(plain.list_arrays().unwrap(), slashed.list_arrays().unwrap());

    let plain = SomaCollection::open(&store, "tiledb://x/y");
    let slashed = SomaCollection::open(&store, "tiledb://x/y///");
    assert_eq!(plain.uri(), slashed.uri());
}

#[test]
fn deeply_nested_collections_flatten() {
    let store = MemoryGroupStore::new();
    store.create_group("/soco").unwrap();
    store.create_group("/soco/2022").unwrap();
    store.create_group("/soco/2022/june").unwrap();
    add_soma(&store, "/soco/top");
    add_soma(&store, "/soco/2022/june/ds1");
    store.add_member("/soco", "top", "top", true).unwrap();
    store.add_member("/soco", "2022", "2022", true).unwrap();
    store.add_member("/soco/2022", "june", "june", true).unwrap();
    store.add_member("/soco/2022/june", "ds1", "ds1", true).unwrap();

    let soco = SomaCollection::open(&store, "/soco");
    let somas = soco.list_somas().unwrap();

    let names: Vec<_> = somas.keys().map(String::as_str).collect();
    assert_eq!(names, ["ds1", "top"]);
    assert_eq!(somas["ds1"], "/soco/2022/june/ds1");
}

#[test]
fn collection_listing_is_memoized() {
    let store = MemoryGroupStore::new();
    store.create_group("/soco").unwrap();
    add_soma(&store, "/soco/a");
    store.add_member("/soco", "a", "a", true).unwrap();

    let soco = SomaCollection::open(&store, "/soco");
    assert_eq!(soco.list_somas().unwrap().len(), 1);

    add_soma(&store, "/soco/b");
    store.add_member("/soco", "b", "b", true).unwrap();

    assert_eq!(soco.list_somas().unwrap().len(), 1);
    assert_eq!(SomaCollection::open(&store, "/soco").list_somas().unwrap().len(), 2);
}

#[test]
fn missing_soma_member_fails_whole_collection() {
    let store = MemoryGroupStore::new();
    store.create_group("/soco").unwrap();
    add_soma(&store, "/soco/a");
    store.create_group("/soco/gone").unwrap();
    store.add_member("/soco", "a", "a", true).unwrap();
    store.add_member("/soco", "gone", "gone", true).unwrap();
    store.deny("/soco/gone");

    let soco = SomaCollection::open(&store, "/soco");

    assert!(matches!(soco.list_somas(), Err(GroupError::AccessDenied(_))));
    assert!(soco.somas().is_err());
}

#[test]
fn manifest_layout_and_direct_members() {
    let manifest: Manifest = serde_json::from_str(
        r#"{
            "arrays": ["/data/soma/obs", "/shared/var"],
            "groups": {
                "/data/soma": [
                    { "name": "obs" },
                    { "name": "var", "uri": "/shared/var", "relative": false }
                ]
            }
        }"#,
    )
    .unwrap();
    let store = MemoryGroupStore::new();
    manifest.apply(&store).unwrap();

    let direct = member_uris(&store, "/data/soma").unwrap();
    assert_eq!(direct["obs"], "/data/soma/obs");
    assert_eq!(direct["var"], "/shared/var");

    assert_eq!(store.object_kind("/data/soma").unwrap(), Some(ObjectKind::Group));
    assert_eq!(store.object_kind("/shared/var").unwrap(), Some(ObjectKind::Array));
}
