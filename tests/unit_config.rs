use std::fs;

use clap::Parser;
use ws_addressing::{CliArgs, InspectorConfig, OutputFormat};

#[test]
fn merges_config_file_and_cli_overrides() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let config_dir = tempfile::tempdir().expect("config tempdir");
    let config_path = config_dir.path().join("inspector.yaml");
    let yaml = format!(
        "workspace_root: {}\nstrict: true\nextensions:\n  - xml\n  - SOAP\n",
        workspace.path().display()
    );
    fs::write(&config_path, yaml).expect("write config");

    let args = CliArgs::parse_from([
        "wsa",
        "--config",
        config_path.to_str().unwrap(),
        "--workspace-root",
        workspace.path().to_str().unwrap(),
        "--extensions",
        "soap,.XML",
        "--name-glob",
        "headers/*.xml",
    ]);
    let config = InspectorConfig::from_args(args).expect("config");

    assert_eq!(config.workspace_root, workspace.path().to_path_buf());
    assert_eq!(
        config.supported_extensions,
        vec!["soap".to_string(), "xml".to_string()]
    );
    assert_eq!(config.name_glob.as_deref(), Some("headers/*.xml"));
    assert!(config.strict);
    assert_eq!(config.format, OutputFormat::Text);
}

#[test]
fn empty_extensions_is_error() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let args = CliArgs {
        config: None,
        workspace_root: Some(workspace.path().to_path_buf()),
        extensions: Some(Vec::new()),
        document: None,
        name_glob: None,
        folder: None,
        format: None,
        strict: false,
    };
    let err = InspectorConfig::from_args(args).expect_err("expected failure");
    assert!(err.to_string().contains("at least one document extension"));
}

#[test]
fn ensure_workspace_root_errors_for_missing_dir() {
    let config = InspectorConfig {
        workspace_root: std::path::PathBuf::from("/this/does/not/exist"),
        supported_extensions: vec!["xml".to_string()],
        single_document: None,
        name_glob: None,
        folder: None,
        format: OutputFormat::Text,
        strict: false,
    };
    let err = config.ensure_workspace_root().expect_err("missing dir");
    assert!(
        err.to_string()
            .contains("workspace root \"/this/does/not/exist\"")
    );
}

#[test]
fn single_document_sets_default_workspace_root() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let document = workspace.path().join("notification.xml");
    fs::write(&document, b"<x/>").expect("write document");

    let args = CliArgs::parse_from(["wsa", "--document", document.to_str().unwrap()]);
    let config = InspectorConfig::from_args(args).expect("config");

    assert_eq!(config.workspace_root, workspace.path().to_path_buf());
    assert_eq!(
        config
            .single_document()
            .expect("single document")
            .to_path_buf(),
        document
    );
}

#[test]
fn single_document_extension_must_be_allowed() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let document = workspace.path().join("notes.txt");
    fs::write(&document, b"hello").expect("write document");

    let args = CliArgs::parse_from(["wsa", "--document", document.to_str().unwrap()]);
    let err = InspectorConfig::from_args(args).expect_err("expected failure");
    assert!(err.to_string().contains("does not match allowed extensions"));
}

#[test]
fn missing_single_document_is_an_error() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let args = CliArgs::parse_from([
        "wsa",
        "--workspace-root",
        workspace.path().to_str().unwrap(),
        "--document",
        "absent.xml",
    ]);
    let err = InspectorConfig::from_args(args).expect_err("expected failure");
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn format_cli_override_parses() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let args = CliArgs::parse_from([
        "wsa",
        "--workspace-root",
        workspace.path().to_str().unwrap(),
        "--format",
        "json",
    ]);
    let config = InspectorConfig::from_args(args).expect("config");

    assert_eq!(config.format, OutputFormat::Json);
}

#[test]
fn strict_comes_from_file_when_cli_flag_is_absent() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let config_dir = tempfile::tempdir().expect("config tempdir");
    let config_path = config_dir.path().join("inspector.json");
    let json = format!(
        "{{\"workspace_root\": {:?}, \"strict\": true}}",
        workspace.path().to_str().unwrap()
    );
    fs::write(&config_path, json).expect("write config");

    let args = CliArgs::parse_from(["wsa", "--config", config_path.to_str().unwrap()]);
    let config = InspectorConfig::from_args(args).expect("config");
    assert!(config.strict);
}

#[test]
fn resolve_path_joins_relative_paths() {
    let workspace = tempfile::tempdir().expect("workspace tempdir");
    let config = InspectorConfig {
        workspace_root: workspace.path().to_path_buf(),
        supported_extensions: vec!["xml".to_string()],
        single_document: None,
        name_glob: None,
        folder: None,
        format: OutputFormat::Text,
        strict: false,
    };

    assert_eq!(
        config.resolve_path("sub/doc.xml"),
        workspace.path().join("sub/doc.xml")
    );
    assert_eq!(
        config.resolve_path("/absolute/doc.xml"),
        std::path::PathBuf::from("/absolute/doc.xml")
    );
}
