// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn local_asset_source_reads_file_rooted_at_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("foo.txt"), b"hello").unwrap();
    let source = LocalAssetSource::new(dir.path());
    assert_eq!(source.read("foo.txt").unwrap(), b"hello");
    assert_eq!(source.stat("foo.txt").unwrap().kind, AssetKind::File);
}

#[test]
fn local_asset_source_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let source = LocalAssetSource::new(dir.path());
    assert_eq!(
        source.read("nope.txt"),
        Err(AssetError::NotFound("nope.txt".to_string()))
    );
}

#[test]
fn local_asset_source_glob_matches_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.tmpl"), b"a").unwrap();
    std::fs::write(dir.path().join("b.tmpl"), b"b").unwrap();
    std::fs::write(dir.path().join("c.txt"), b"c").unwrap();
    let source = LocalAssetSource::new(dir.path());
    let mut matches = source.glob("*.tmpl").unwrap();
    matches.sort();
    assert_eq!(matches, vec!["a.tmpl", "b.tmpl"]);
}

#[test]
fn embedded_asset_source_read_and_stat() {
    let mut assets = EmbeddedAssetSource::new();
    assets.insert("configs/nginx.conf.tmpl", b"server {}".to_vec());
    assert_eq!(
        assets.read("configs/nginx.conf.tmpl").unwrap(),
        b"server {}"
    );
    assert_eq!(
        assets.stat("configs/nginx.conf.tmpl").unwrap().kind,
        AssetKind::File
    );
    assert_eq!(assets.stat("configs").unwrap().kind, AssetKind::Dir);
}

#[test]
fn embedded_asset_source_read_dir_lists_immediate_children() {
    let mut assets = EmbeddedAssetSource::new();
    assets.insert("configs/a.tmpl", b"a".to_vec());
    assets.insert("configs/sub/b.tmpl", b"b".to_vec());
    let mut children = assets.read_dir("configs").unwrap();
    children.sort();
    assert_eq!(children, vec!["a.tmpl", "sub"]);
}

#[test]
fn embedded_asset_source_glob() {
    let mut assets = EmbeddedAssetSource::new();
    assets.insert("configs/a.tmpl", b"a".to_vec());
    assets.insert("configs/b.conf", b"b".to_vec());
    let matches = assets.glob("configs/*.tmpl").unwrap();
    assert_eq!(matches, vec!["configs/a.tmpl"]);
}

#[test]
fn join_and_basename_helpers() {
    assert_eq!(join("configs", "a.tmpl"), "configs/a.tmpl");
    assert_eq!(join("", "a.tmpl"), "a.tmpl");
    assert_eq!(basename("configs/a.tmpl"), "a.tmpl");
    assert_eq!(basename("a.tmpl"), "a.tmpl");
}
