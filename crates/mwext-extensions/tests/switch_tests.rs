//! Switching installed extensions between install sources

mod common;

use common::*;
use mwext_extensions::batch::{self, SwitchOutcome};
use mwext_extensions::types::TagData;
use mwext_extensions::{SourceData, SourceKind};
use serde_json::json;

const GIT_SOURCES: [&str; 3] = ["git-tag", "git-master", "git-rel"];

fn composer_installed(host: &HostFixture) {
    host.write_composer(
        &json!({ "require": { "mediawiki/foo": "^1.4" } }),
        &json!({ "packages": [{ "name": "mediawiki/foo", "version": "1.4.0" }] }),
    )
    .unwrap();
    host.composer_extension("Foo", "mediawiki/foo").unwrap();
}

#[tokio::test]
async fn test_no_source_migrates_out_of_composer() {
    let host = HostFixture::new("1.35.0").unwrap();
    let (services, _) = fake_services();
    let local = host.extensions(services).create("Foo");

    for kind in [SourceKind::GitTag, SourceKind::GitMaster, SourceKind::GitRel] {
        let err = local
            .source_for(kind)
            .switch_from(SourceKind::Composer)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("UNSUPPORTED_SWITCH"), "{}", kind);
    }
}

#[tokio::test]
async fn test_nothing_migrates_into_composer() {
    let host = HostFixture::new("1.35.0").unwrap();
    let (services, _) = fake_services();
    let local = host.extensions(services).create("Foo");

    for kind in [SourceKind::GitTag, SourceKind::GitMaster, SourceKind::GitRel] {
        let err = local
            .source_for(SourceKind::Composer)
            .switch_from(kind)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("UNSUPPORTED_SWITCH"), "{}", kind);
    }
}

#[tokio::test]
async fn test_switch_from_composer_without_force() {
    let host = HostFixture::new("1.35.0").unwrap();
    composer_installed(&host);
    let (services, packages) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &["composer", "git-master"], Some("unused".to_string()));

    let err = batch::switch(&local, &remote, SourceKind::GitMaster, false)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("UNSUPPORTED_SWITCH"));
    assert!(packages.calls().is_empty());
    assert!(local.exists().await);
}

#[tokio::test]
async fn test_switch_to_active_source() {
    let host = HostFixture::new("1.35.0").unwrap();
    let upstream = Upstream::new().unwrap();
    upstream.install_branch(&host.extension_dir("Foo"), "master").unwrap();

    let (services, _) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &GIT_SOURCES, Some(upstream.url()));

    let err = batch::switch(&local, &remote, SourceKind::GitMaster, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("SAME_SOURCE"));
}

#[tokio::test]
async fn test_switch_to_unadvertised_source() {
    let host = HostFixture::new("1.35.0").unwrap();
    let upstream = Upstream::new().unwrap();
    upstream.tag("v1.0.0").unwrap();
    upstream.install_branch(&host.extension_dir("Foo"), "master").unwrap();

    let (services, _) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &["git-master"], Some(upstream.url()));

    let err = batch::switch(&local, &remote, SourceKind::GitTag, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("INCOMPATIBLE_SOURCE"));
}

#[tokio::test]
async fn test_switch_master_to_tag() {
    let host = HostFixture::new("1.35.0").unwrap();
    let upstream = Upstream::new().unwrap();
    upstream.tag("v1.0.0").unwrap();
    upstream.commit("Next").unwrap();
    upstream.tag("v1.1.0").unwrap();
    upstream.commit("Unreleased").unwrap();
    upstream.install_branch(&host.extension_dir("Foo"), "master").unwrap();

    let (services, _) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &GIT_SOURCES, Some(upstream.url()));

    let outcome = batch::switch(&local, &remote, SourceKind::GitTag, false)
        .await
        .unwrap();
    assert_eq!(outcome, SwitchOutcome::Switched);

    let source = local.detect_source().await.unwrap().unwrap();
    assert_eq!(
        source.data(),
        Some(SourceData::GitTag(TagData {
            version_tag: "v1.1.0".to_string(),
            version: "1.1.0".to_string(),
        }))
    );
}

#[tokio::test]
async fn test_switch_tag_to_master() {
    let host = HostFixture::new("1.35.0").unwrap();
    let upstream = Upstream::new().unwrap();
    upstream.tag("v1.0.0").unwrap();
    let head = upstream.commit("Unreleased").unwrap();
    upstream.install(&host.extension_dir("Foo"), "v1.0.0").unwrap();

    let (services, _) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &GIT_SOURCES, Some(upstream.url()));

    let outcome = batch::switch(&local, &remote, SourceKind::GitMaster, false)
        .await
        .unwrap();
    assert_eq!(outcome, SwitchOutcome::Switched);

    let source = local.detect_source().await.unwrap().unwrap();
    assert_eq!(source.kind(), SourceKind::GitMaster);
    assert_eq!(git(&host.extension_dir("Foo"), &["rev-parse", "HEAD"]).unwrap(), head);
}

#[tokio::test]
async fn test_switch_master_to_rel_creates_tracking_branch() {
    let host = HostFixture::new("1.35.0").unwrap();
    let upstream = Upstream::new().unwrap();
    upstream.install_branch(&host.extension_dir("Foo"), "master").unwrap();

    // The release branch appears upstream after the clone
    let rel = upstream.commit("Branch point").unwrap();
    upstream.branch("REL1_35").unwrap();

    let (services, _) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &GIT_SOURCES, Some(upstream.url()));

    let outcome = batch::switch(&local, &remote, SourceKind::GitRel, false)
        .await
        .unwrap();
    assert_eq!(outcome, SwitchOutcome::Switched);

    let source = local.detect_source().await.unwrap().unwrap();
    assert_eq!(source.kind(), SourceKind::GitRel);
    assert_eq!(source.list_info(), Some(format!("REL1_35; {}", &rel[..7])));

    let dir = host.extension_dir("Foo");
    assert_eq!(
        git(&dir, &["rev-parse", "--abbrev-ref", "REL1_35@{upstream}"]).unwrap(),
        "origin/REL1_35"
    );
}

#[tokio::test]
async fn test_forced_switch_from_composer_removes_package() {
    let host = HostFixture::new("1.35.0").unwrap();
    composer_installed(&host);
    let upstream = Upstream::new().unwrap();

    let dir = host.extension_dir("Foo");
    let (services, packages) = services_with(
        FakeRegistry::new(),
        RecordingPackageManager::new().owning("mediawiki/foo", &dir),
    );
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &["composer", "git-master"], Some(upstream.url()));

    let outcome = batch::switch(&local, &remote, SourceKind::GitMaster, true)
        .await
        .unwrap();
    assert_eq!(outcome, SwitchOutcome::Replaced { archived: None });
    assert_eq!(
        packages.actions(),
        vec![("remove".to_string(), "mediawiki/foo".to_string())]
    );

    let source = local.detect_source().await.unwrap().unwrap();
    assert_eq!(source.kind(), SourceKind::GitMaster);
}

#[tokio::test]
async fn test_switch_from_unknown_source() {
    let host = HostFixture::new("1.35.0").unwrap();
    let upstream = Upstream::new().unwrap();
    let dir = host.extension_dir("Foo");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("LocalSettings.snippet"), "hand edited").unwrap();

    let (services, _) = fake_services();
    let local = host.extensions(services).resolve("Foo").await.unwrap();
    let remote = remote_record("Foo", &GIT_SOURCES, Some(upstream.url()));

    let err = batch::switch(&local, &remote, SourceKind::GitMaster, false)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("UNSUPPORTED_SWITCH"));

    let outcome = batch::switch(&local, &remote, SourceKind::GitMaster, true)
        .await
        .unwrap();
    let SwitchOutcome::Replaced {
        archived: Some(archived),
    } = outcome
    else {
        panic!("Expected a relocated copy, got {:?}", outcome);
    };

    assert!(archived.join("LocalSettings.snippet").is_file());
    assert!(!dir.join("LocalSettings.snippet").exists());
    let source = local.detect_source().await.unwrap().unwrap();
    assert_eq!(source.kind(), SourceKind::GitMaster);

    std::fs::remove_dir_all(archived).unwrap();
}
