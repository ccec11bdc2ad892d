use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSIONS: &[&str] = &["xml", "soap"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InspectorConfig {
    pub workspace_root: PathBuf,
    pub supported_extensions: Vec<String>,
    pub single_document: Option<PathBuf>,
    pub name_glob: Option<String>,
    pub folder: Option<String>,
    pub format: OutputFormat,
    pub strict: bool,
}

impl InspectorConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            workspace_root: cli_workspace_root,
            extensions: cli_extensions,
            document: cli_document,
            name_glob: cli_name_glob,
            folder: cli_folder,
            format: cli_format,
            strict: cli_strict,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            workspace_root: file_workspace_root,
            extensions: file_extensions,
            document: file_document,
            name_glob: file_name_glob,
            folder: file_folder,
            format: file_format,
            strict: file_strict,
        } = file_config;

        let single_document = cli_document.or(file_document);

        let workspace_root = cli_workspace_root
            .or(file_workspace_root)
            .or_else(|| {
                single_document.as_ref().and_then(|path| {
                    if path.is_absolute() {
                        path.parent().map(|parent| parent.to_path_buf())
                    } else {
                        None
                    }
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut supported_extensions = cli_extensions
            .or(file_extensions)
            .unwrap_or_else(|| {
                DEFAULT_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_string())
                    .collect()
            })
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect::<Vec<_>>();

        supported_extensions.sort();
        supported_extensions.dedup();

        anyhow::ensure!(
            !supported_extensions.is_empty(),
            "at least one document extension must be provided"
        );

        let single_document = single_document.map(|path| {
            if path.is_absolute() {
                path
            } else {
                workspace_root.join(path)
            }
        });

        if let Some(document_path) = single_document.as_ref() {
            anyhow::ensure!(
                document_path.exists(),
                "configured document {:?} does not exist",
                document_path
            );
            anyhow::ensure!(
                document_path.is_file(),
                "configured document {:?} is not a file",
                document_path
            );
            let allowed = document_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
                .map(|ext| supported_extensions.contains(&ext))
                .unwrap_or(false);
            anyhow::ensure!(
                allowed,
                "configured document {:?} does not match allowed extensions {:?}",
                document_path,
                supported_extensions
            );
        }

        let format = cli_format.or(file_format).unwrap_or(OutputFormat::Text);
        let strict = cli_strict || file_strict.unwrap_or(false);

        Ok(Self {
            workspace_root,
            supported_extensions,
            single_document,
            name_glob: cli_name_glob.or(file_name_glob),
            folder: cli_folder.or(file_folder),
            format,
            strict,
        })
    }

    pub fn ensure_workspace_root(&self) -> Result<()> {
        anyhow::ensure!(
            self.workspace_root.exists(),
            "workspace root {:?} does not exist",
            self.workspace_root
        );
        anyhow::ensure!(
            self.workspace_root.is_dir(),
            "workspace root {:?} is not a directory",
            self.workspace_root
        );
        if let Some(document) = self.single_document.as_ref() {
            anyhow::ensure!(
                document.exists(),
                "configured document {:?} does not exist",
                document
            );
            anyhow::ensure!(
                document.is_file(),
                "configured document {:?} is not a file",
                document
            );
        }
        Ok(())
    }

    pub fn resolve_path<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.workspace_root.join(relative)
        }
    }

    pub fn single_document(&self) -> Option<&Path> {
        self.single_document.as_deref()
    }

    pub fn allows_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.supported_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "wsa", about = "WS-Addressing header inspector", version)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "WSA_WORKSPACE",
        value_name = "DIR",
        help = "Workspace root containing XML documents"
    )]
    pub workspace_root: Option<PathBuf>,

    #[arg(
        long,
        env = "WSA_EXTENSIONS",
        value_name = "EXT",
        value_delimiter = ',',
        help = "Comma-separated list of document extensions to scan"
    )]
    pub extensions: Option<Vec<String>>,

    #[arg(
        long,
        env = "WSA_DOCUMENT",
        value_name = "FILE",
        help = "Inspect a single document instead of scanning the workspace"
    )]
    pub document: Option<PathBuf>,

    #[arg(
        long,
        value_name = "GLOB",
        help = "Only scan documents whose workspace-relative path matches the glob"
    )]
    pub name_glob: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Only scan documents directly inside the named folder"
    )]
    pub folder: Option<String>,

    #[arg(
        long,
        env = "WSA_FORMAT",
        value_enum,
        value_name = "FORMAT",
        help = "Report output format (text or json)"
    )]
    pub format: Option<OutputFormat>,

    #[arg(
        long,
        help = "Fail on the first undecodable document instead of recording a note"
    )]
    pub strict: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    workspace_root: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    document: Option<PathBuf>,
    name_glob: Option<String>,
    folder: Option<String>,
    format: Option<OutputFormat>,
    strict: Option<bool>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
