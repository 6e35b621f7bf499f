//! Tests for the engine registry.

mod test_utils;

use medialoom_error::{EngineErrorKind, MedialoomError, MedialoomErrorKind};
use medialoom_storage::{EngineContext, EngineRegistry};
use tempfile::TempDir;
use test_utils::{MockConfig, instance, mock_descriptor, test_settings};

fn engine_error(err: &MedialoomError) -> &EngineErrorKind {
    match err.kind() {
        MedialoomErrorKind::Engine(e) => e.kind(),
        other => panic!("expected engine error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_type_rejected() {
    let mut registry = EngineRegistry::new();
    registry
        .register(mock_descriptor("dup", MockConfig::declining()).0)
        .expect("first registration");
    let err = registry
        .register(mock_descriptor("dup", MockConfig::declining()).0)
        .expect_err("duplicate");
    assert!(matches!(
        engine_error(&err),
        EngineErrorKind::DuplicateEngineType(t) if t == "dup"
    ));
}

#[test]
fn test_singleton_violation() {
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let existing = vec![instance(1, "youtube"), instance(2, "local_files")];

    let err = registry
        .check_new_instance(&existing, "youtube")
        .expect_err("youtube is a singleton");
    assert!(matches!(
        engine_error(&err),
        EngineErrorKind::SingletonViolation(t) if t == "youtube"
    ));

    let descriptor = registry
        .check_new_instance(&existing, "local_files")
        .expect("local_files allows many instances");
    assert_eq!(descriptor.engine_type(), "local_files");
}

#[test]
fn test_unknown_type_on_new_instance() {
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let err = registry
        .check_new_instance(&[], "ftp")
        .expect_err("ftp is not registered");
    assert!(matches!(engine_error(&err), EngineErrorKind::UnknownEngineType(t) if t == "ftp"));
}

#[test]
fn test_constraints_exclude_self() {
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let youtube = registry.constraints("youtube").expect("constraints");
    assert!(youtube.try_after().contains("local_files"));
    assert!(youtube.try_after().contains("media_folders"));
    assert!(!youtube.try_after().contains("youtube"));

    let remote = registry.constraints("remote_urls").expect("constraints");
    assert!(remote.try_after().contains("vimeo"));
    assert!(remote.try_before().is_empty());
}

#[test]
fn test_builtin_default_data() {
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let youtube = registry.get("youtube").expect("youtube registered");
    assert_eq!(youtube.data_template()["oembed_endpoint"], "https://www.youtube.com/oembed");
    assert!(youtube.is_singleton());
    assert!(youtube.in_family("embed"));

    let bliptv = registry.get("bliptv").expect("bliptv registered");
    assert!(bliptv.data_template()["oembed_endpoint"].is_null());

    let local = registry.get("local_files").expect("local_files registered");
    assert!(!local.is_singleton());
    assert!(local.data_template()["path"].is_null());
}

#[test]
fn test_instantiate_skips_disabled_and_unknown() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let mut registry = EngineRegistry::new();
    registry
        .register(mock_descriptor("mock", MockConfig::declining()).0)
        .expect("register");

    let instances = vec![
        instance(1, "mock"),
        instance(2, "mock").with_enabled(false),
        instance(3, "retired"),
    ];
    let context = EngineContext::new(reqwest::Client::new(), &settings);

    let enabled = registry.instantiate(&instances, &context).expect("instantiate");
    assert_eq!(enabled.iter().map(|e| e.id()).collect::<Vec<_>>(), vec![1]);

    let all = registry
        .instantiate_all(&instances, &context)
        .expect("instantiate all");
    assert_eq!(all.iter().map(|e| e.id()).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn test_invalid_instance_data() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let context = EngineContext::new(reqwest::Client::new(), &settings);

    let broken = medialoom_core::EngineInstance::new(
        1,
        "local_files",
        "Broken",
        serde_json::json!({"path": 42}),
    );
    let err = registry
        .get("local_files")
        .expect("builtin")
        .build(broken, &context)
        .expect_err("path must be a string");
    assert!(matches!(
        engine_error(&err),
        EngineErrorKind::InvalidSettings { engine, .. } if engine == "local_files"
    ));
}

#[test]
fn test_instantiate_skips_invalid_instance_data() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let context = EngineContext::new(reqwest::Client::new(), &settings);

    let instances = vec![
        medialoom_core::EngineInstance::new(
            1,
            "local_files",
            "Broken",
            serde_json::json!({"path": 42}),
        ),
        instance(2, "remote_urls"),
        medialoom_core::EngineInstance::new(
            3,
            "media_folders",
            "Retired",
            serde_json::json!({"path": 5}),
        )
        .with_enabled(false),
    ];

    let enabled = registry.instantiate(&instances, &context).expect("instantiate");
    assert_eq!(enabled.iter().map(|e| e.id()).collect::<Vec<_>>(), vec![2]);

    let all = registry
        .instantiate_all(&instances, &context)
        .expect("instantiate all");
    assert_eq!(all.iter().map(|e| e.id()).collect::<Vec<_>>(), vec![2]);
}
