use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use globset::{Glob, GlobMatcher};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::InspectorConfig;
use crate::model::AddressingHeaders;
use crate::xml::decode_headers;

/// Narrows a workspace scan to a subset of documents.
#[derive(Debug, Default)]
pub struct DocumentFilter {
    name_glob: Option<GlobMatcher>,
    folder: Option<String>,
}

impl DocumentFilter {
    pub fn new(name_glob: Option<String>, folder: Option<String>) -> Result<Self> {
        let matcher = if let Some(glob) = name_glob {
            Some(
                Glob::new(&glob)
                    .map_err(|err| anyhow!("invalid glob pattern {glob}: {err}"))?
                    .compile_matcher(),
            )
        } else {
            None
        };

        Ok(Self {
            name_glob: matcher,
            folder: folder.map(|f| f.to_ascii_lowercase()),
        })
    }

    /// Matches against the path relative to the workspace root.
    pub fn matches(&self, relative: &Path) -> bool {
        if let Some(glob) = &self.name_glob
            && !glob.is_match(relative)
        {
            return false;
        }

        if let Some(expected) = &self.folder {
            let actual = relative
                .parent()
                .and_then(|parent| parent.file_name())
                .map(|name| name.to_string_lossy().to_ascii_lowercase());
            match actual {
                Some(folder) if &folder == expected => {}
                _ => return false,
            }
        }

        true
    }
}

/// The addressing headers of one document, reduced to report form.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderSummary {
    pub to: Option<String>,
    pub from: Option<String>,
    pub reply_to: Option<String>,
    pub fault_to: Option<String>,
    pub action: Option<String>,
    pub message_id: Option<String>,
    pub relates_to: Vec<String>,
    pub retry_after: Option<u64>,
    pub header_count: usize,
}

impl HeaderSummary {
    pub fn from_headers(headers: &AddressingHeaders) -> Self {
        Self {
            to: uri_of(&headers.to),
            from: address_of(&headers.from),
            reply_to: address_of(&headers.reply_to),
            fault_to: address_of(&headers.fault_to),
            action: uri_of(&headers.action),
            message_id: uri_of(&headers.message_id),
            relates_to: headers
                .relates_to
                .iter()
                .map(|relates| relates.uri.clone())
                .collect(),
            retry_after: headers.retry_after.as_ref().and_then(|value| value.value()),
            header_count: headers.header_count(),
        }
    }
}

fn uri_of(slot: &Option<crate::model::AttributedUri>) -> Option<String> {
    slot.as_ref()
        .and_then(|uri| uri.value())
        .map(str::to_string)
}

fn address_of(slot: &Option<crate::model::EndpointReference>) -> Option<String> {
    slot.as_ref()
        .and_then(|endpoint| endpoint.address_uri())
        .map(str::to_string)
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub path: String,
    pub bytes: u64,
    pub last_modified: Option<String>,
    /// `None` when the document could not be decoded (see `notes`).
    pub headers: Option<HeaderSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub workspace: String,
    pub scanned_at: String,
    pub document_count: usize,
    pub documents: Vec<DocumentSummary>,
}

/// Runs the configured inspection: a single document when one is locked,
/// otherwise a workspace scan.
pub fn run(config: &InspectorConfig) -> Result<ScanReport> {
    if let Some(document) = config.single_document() {
        let summary = inspect_file(config, document)?;
        Ok(ScanReport {
            workspace: display_path(&config.workspace_root),
            scanned_at: now_rfc3339(),
            document_count: 1,
            documents: vec![summary],
        })
    } else {
        let filter = DocumentFilter::new(config.name_glob.clone(), config.folder.clone())?;
        scan_workspace(config, &filter)
    }
}

/// Walks the workspace root and summarizes every matching document.
pub fn scan_workspace(config: &InspectorConfig, filter: &DocumentFilter) -> Result<ScanReport> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(&config.workspace_root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !config.allows_extension(path) {
            continue;
        }
        let relative = path.strip_prefix(&config.workspace_root).unwrap_or(path);
        if !filter.matches(relative) {
            continue;
        }
        documents.push(inspect_file(config, path)?);
    }
    documents.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(
        workspace = %config.workspace_root.display(),
        document_count = documents.len(),
        "workspace scan complete"
    );

    Ok(ScanReport {
        workspace: display_path(&config.workspace_root),
        scanned_at: now_rfc3339(),
        document_count: documents.len(),
        documents,
    })
}

/// Summarizes one document. Codec failures become notes unless the
/// configuration is strict; I/O failures always propagate.
pub fn inspect_file(config: &InspectorConfig, path: &Path) -> Result<DocumentSummary> {
    let metadata =
        fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    let last_modified = metadata
        .modified()
        .ok()
        .map(|time| DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true));

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut notes = Vec::new();
    let headers = match decode_headers(BufReader::new(file)) {
        Ok(headers) => {
            if headers.is_empty() {
                notes.push("no addressing headers found".to_string());
            }
            Some(HeaderSummary::from_headers(&headers))
        }
        Err(error) if !config.strict => {
            tracing::warn!(path = %path.display(), %error, "document not decodable");
            notes.push(format!("not decodable as addressing headers: {error}"));
            None
        }
        Err(error) => {
            return Err(anyhow::Error::from(error))
                .with_context(|| format!("failed to decode {}", path.display()));
        }
    };

    Ok(DocumentSummary {
        path: display_path(path),
        bytes: metadata.len(),
        last_modified,
        headers,
        notes,
    })
}

/// Human-readable rendering of a report for the text output format.
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "workspace {} — {} document(s) at {}\n",
        report.workspace, report.document_count, report.scanned_at
    ));
    for document in &report.documents {
        out.push_str(&format!("{} ({} bytes)\n", document.path, document.bytes));
        if let Some(headers) = &document.headers {
            if headers.header_count == 0 {
                out.push_str("  no addressing headers\n");
            } else {
                push_field(&mut out, "To", headers.to.as_deref());
                push_field(&mut out, "From", headers.from.as_deref());
                push_field(&mut out, "ReplyTo", headers.reply_to.as_deref());
                push_field(&mut out, "FaultTo", headers.fault_to.as_deref());
                push_field(&mut out, "Action", headers.action.as_deref());
                push_field(&mut out, "MessageID", headers.message_id.as_deref());
                for relates in &headers.relates_to {
                    out.push_str(&format!("  RelatesTo: {relates}\n"));
                }
                if let Some(retry_after) = headers.retry_after {
                    out.push_str(&format!("  RetryAfter: {retry_after}\n"));
                }
            }
        }
        for note in &document.notes {
            out.push_str(&format!("  note: {note}\n"));
        }
    }
    out
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("  {label}: {value}\n"));
    }
}

fn display_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if raw.contains('\\') {
        raw.replace('\\', "/")
    } else {
        raw.into_owned()
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
