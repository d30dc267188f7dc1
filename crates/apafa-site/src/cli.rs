use std::path::PathBuf;

use apafa_core::{LoadPolicy, Page};
use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "apafa", version, about = "Render the APAFA website pages from their JSON fixtures")]
pub struct Cli {
    /// Config file (default: ~/.config/apafa-web/config.json)
    #[arg(long, global = true, env = "APAFA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = "APAFA_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render pages from their templates
    Render(RenderArgs),
    /// Load one resource and print it as JSON
    Fetch(FetchArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Page to render: index, padres, notificaciones, reuniones or all
    #[arg(long, default_value = "all", value_parser = parse_pages)]
    pub page: Pages,

    /// Abandon a page when any of its resources fails instead of using placeholders
    #[arg(long)]
    pub strict: bool,

    /// Directory holding <page>.html templates
    #[arg(long, env = "APAFA_TEMPLATES_DIR")]
    pub templates: Option<PathBuf>,

    /// Directory rendered pages are written to
    #[arg(long, env = "APAFA_OUT_DIR")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl RenderArgs {
    pub fn policy(&self) -> LoadPolicy {
        if self.strict {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Fallback
        }
    }

    pub fn apply(&self, config: &mut Config) {
        self.source.apply(config);
        if let Some(ref dir) = self.templates {
            config.templates_dir = Some(dir.clone());
        }
        if let Some(ref dir) = self.out {
            config.out_dir = Some(dir.clone());
        }
    }
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Resource name, e.g. stats or resumen_financiero
    pub name: String,

    /// Always fetch, bypassing the loader cache
    #[arg(long)]
    pub no_cache: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also write the effective configuration to the config file
    #[arg(long)]
    pub save: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Where fixtures come from and how hard to try
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Origin serving the fixtures, e.g. https://colegio.example.org
    #[arg(long, env = "APAFA_ORIGIN")]
    pub origin: Option<String>,

    /// Path of the fixtures under the origin
    #[arg(long, env = "APAFA_BASE_PATH")]
    pub base_path: Option<String>,

    /// Read fixtures from a local directory instead of over HTTP
    #[arg(long, env = "APAFA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, env = "APAFA_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Extra attempts after the first failure
    #[arg(long, env = "APAFA_RETRIES")]
    pub retries: Option<u32>,
}

impl SourceArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref origin) = self.origin {
            config.loader.origin = origin.clone();
        }
        if let Some(ref base_path) = self.base_path {
            config.loader.base_path = base_path.clone();
        }
        if let Some(ref dir) = self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.loader.timeout_ms = timeout_ms;
        }
        if let Some(retries) = self.retries {
            config.loader.retries = retries;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pages(pub Vec<Page>);

fn parse_pages(s: &str) -> Result<Pages, String> {
    if s == "all" {
        return Ok(Pages(Page::ALL.to_vec()));
    }
    s.split(',')
        .map(|name| name.trim().parse::<Page>())
        .collect::<Result<Vec<_>, _>>()
        .map(Pages)
}
