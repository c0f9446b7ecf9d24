//! Integration tests for dependency installation

mod common;

use common::*;
use setuptemplate_core::RuntimeConfig;
use setuptemplate_projects::environment::{install, InstallRequest, Platform};
use setuptemplate_projects::ErrorKind;
use std::fs;

#[tokio::test]
async fn test_install_with_named_venv() {
    let (_t, project) = utf8_tempdir();
    fs::create_dir(project.join("venv")).unwrap();
    fs::write(project.join("requirements.txt"), "django>=4.2\n").unwrap();
    let runner = RecordingRunner::new();

    let request = InstallRequest::new(project.clone()).with_venv(Some("venv".to_string()));
    install(&runner, &request, &RuntimeConfig::default(), Platform::Posix)
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0].args;
    assert!(args.contains(&project.join("venv/bin/activate").to_string()));
    assert!(args.contains(&project.join("requirements.txt").to_string()));
    assert!(args.contains(&"pip".to_string()));
}

#[tokio::test]
async fn test_install_discovers_venv() {
    let (_t, project) = utf8_tempdir();
    fs::create_dir_all(project.join("backend/.venv")).unwrap();
    fs::write(project.join("requirements.txt"), "flask\n").unwrap();
    let runner = RecordingRunner::new();

    let outcome = install(
        &runner,
        &InstallRequest::new(project.clone()),
        &RuntimeConfig::default(),
        Platform::Posix,
    )
    .await
    .unwrap();

    assert_eq!(outcome.environment.path, project.join("backend/.venv"));
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_explicit_venv_missing() {
    let (_t, project) = utf8_tempdir();
    fs::create_dir(project.join("venv")).unwrap();
    fs::write(project.join("requirements.txt"), "flask\n").unwrap();
    let runner = RecordingRunner::new();

    let request = InstallRequest::new(project).with_venv(Some(".venv".to_string()));
    let err = install(&runner, &request, &RuntimeConfig::default(), Platform::Posix)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::VenvNotFound);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_no_manifest() {
    let (_t, project) = utf8_tempdir();
    fs::create_dir(project.join("venv")).unwrap();
    let runner = RecordingRunner::new();

    let err = install(
        &runner,
        &InstallRequest::new(project),
        &RuntimeConfig::default(),
        Platform::Posix,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ManifestNotFound);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_explicit_manifest_outside_project() {
    let (_t, project) = utf8_tempdir();
    let (_r, elsewhere) = utf8_tempdir();
    fs::create_dir(project.join("env")).unwrap();
    let manifest = elsewhere.join("prod.txt");
    fs::write(&manifest, "fastapi\nuvicorn\n").unwrap();
    let runner = RecordingRunner::new();

    let request = InstallRequest::new(project).with_requirements(Some(manifest.clone()));
    let outcome = install(&runner, &request, &RuntimeConfig::default(), Platform::Posix)
        .await
        .unwrap();

    assert_eq!(outcome.manifest, manifest);
    assert_eq!(runner.calls()[0].args.last(), Some(&manifest.to_string()));
}
