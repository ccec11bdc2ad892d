use std::fs;
use std::path::Path;

use ws_addressing::inspect::{self, DocumentFilter};
use ws_addressing::{InspectorConfig, OutputFormat};

const GOOD_DOC: &str = "<Header xmlns:wsa=\"http://www.w3.org/2005/08/addressing\">\
    <wsa:To>http://example.org/service</wsa:To>\
    <wsa:RetryAfter>5000</wsa:RetryAfter>\
    </Header>";

const BAD_DOC: &str = "<Header xmlns:wsa=\"http://www.w3.org/2005/08/addressing\">\
    <wsa:RetryAfter>-1</wsa:RetryAfter>\
    </Header>";

fn config_for(root: &Path) -> InspectorConfig {
    InspectorConfig {
        workspace_root: root.to_path_buf(),
        supported_extensions: vec!["xml".to_string()],
        single_document: None,
        name_glob: None,
        folder: None,
        format: OutputFormat::Text,
        strict: false,
    }
}

#[test]
fn scan_only_picks_up_allowed_extensions() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::write(workspace.path().join("message.xml"), GOOD_DOC).expect("write");
    fs::write(workspace.path().join("notes.txt"), "not xml").expect("write");

    let config = config_for(workspace.path());
    let report = inspect::scan_workspace(&config, &DocumentFilter::default()).expect("scan");

    assert_eq!(report.document_count, 1);
    assert!(report.documents[0].path.ends_with("message.xml"));
}

#[test]
fn summaries_surface_header_values() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::write(workspace.path().join("message.xml"), GOOD_DOC).expect("write");

    let config = config_for(workspace.path());
    let report = inspect::scan_workspace(&config, &DocumentFilter::default()).expect("scan");

    let document = &report.documents[0];
    assert!(document.bytes > 0);
    assert!(document.last_modified.is_some());
    let headers = document.headers.as_ref().expect("headers");
    assert_eq!(headers.to.as_deref(), Some("http://example.org/service"));
    assert_eq!(headers.retry_after, Some(5000));
    assert_eq!(headers.header_count, 2);
    assert!(document.notes.is_empty());
}

#[test]
fn undecodable_documents_become_notes_when_lenient() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::write(workspace.path().join("bad.xml"), BAD_DOC).expect("write");

    let config = config_for(workspace.path());
    let report = inspect::scan_workspace(&config, &DocumentFilter::default()).expect("scan");

    let document = &report.documents[0];
    assert!(document.headers.is_none());
    assert_eq!(document.notes.len(), 1);
    assert!(document.notes[0].contains("not decodable"));
}

#[test]
fn strict_mode_fails_on_the_first_undecodable_document() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::write(workspace.path().join("bad.xml"), BAD_DOC).expect("write");

    let mut config = config_for(workspace.path());
    config.strict = true;
    let err =
        inspect::scan_workspace(&config, &DocumentFilter::default()).expect_err("strict failure");
    assert!(err.to_string().contains("failed to decode"));
}

#[test]
fn glob_filter_limits_the_scan() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::create_dir(workspace.path().join("soap")).expect("mkdir");
    fs::write(workspace.path().join("soap/one.xml"), GOOD_DOC).expect("write");
    fs::write(workspace.path().join("two.xml"), GOOD_DOC).expect("write");

    let config = config_for(workspace.path());
    let filter = DocumentFilter::new(Some("soap/*.xml".to_string()), None).expect("filter");
    let report = inspect::scan_workspace(&config, &filter).expect("scan");

    assert_eq!(report.document_count, 1);
    assert!(report.documents[0].path.ends_with("one.xml"));
}

#[test]
fn folder_filter_matches_the_direct_parent() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::create_dir(workspace.path().join("inbound")).expect("mkdir");
    fs::create_dir(workspace.path().join("outbound")).expect("mkdir");
    fs::write(workspace.path().join("inbound/a.xml"), GOOD_DOC).expect("write");
    fs::write(workspace.path().join("outbound/b.xml"), GOOD_DOC).expect("write");

    let config = config_for(workspace.path());
    let filter = DocumentFilter::new(None, Some("Inbound".to_string())).expect("filter");
    let report = inspect::scan_workspace(&config, &filter).expect("scan");

    assert_eq!(report.document_count, 1);
    assert!(report.documents[0].path.ends_with("a.xml"));
}

#[test]
fn invalid_glob_is_rejected() {
    let err = DocumentFilter::new(Some("[".to_string()), None).expect_err("bad glob");
    assert!(err.to_string().contains("invalid glob pattern"));
}

#[test]
fn run_handles_a_single_document_lock() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let document = workspace.path().join("message.xml");
    fs::write(&document, GOOD_DOC).expect("write");

    let mut config = config_for(workspace.path());
    config.single_document = Some(document);
    let report = inspect::run(&config).expect("run");

    assert_eq!(report.document_count, 1);
    let headers = report.documents[0].headers.as_ref().expect("headers");
    assert_eq!(headers.retry_after, Some(5000));
}

#[test]
fn documents_without_addressing_headers_are_noted() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::write(workspace.path().join("plain.xml"), "<inventory/>").expect("write");

    let config = config_for(workspace.path());
    let report = inspect::scan_workspace(&config, &DocumentFilter::default()).expect("scan");

    let document = &report.documents[0];
    let headers = document.headers.as_ref().expect("headers");
    assert_eq!(headers.header_count, 0);
    assert!(document.notes[0].contains("no addressing headers"));
}

#[test]
fn text_rendering_lists_headers_and_notes() {
    let workspace = tempfile::tempdir().expect("tempdir");
    fs::write(workspace.path().join("message.xml"), GOOD_DOC).expect("write");

    let config = config_for(workspace.path());
    let report = inspect::scan_workspace(&config, &DocumentFilter::default()).expect("scan");
    let rendered = inspect::render_text(&report);

    assert!(rendered.contains("1 document(s)"));
    assert!(rendered.contains("To: http://example.org/service"));
    assert!(rendered.contains("RetryAfter: 5000"));
}
