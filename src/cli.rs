use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::render::RenderOptions;

#[derive(Parser, Debug)]
#[command(
    name = "crlv",
    version,
    about = "Field extraction for CRLV vehicle-registration documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List and hash the documents of an input directory.
    Inventory(InventoryArgs),
    /// Extract fields from every document of an input directory.
    Extract(ExtractArgs),
    /// Show lines, label positions, and field outcomes for one document.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Keep the physical column layout when rendering PDFs.
    #[arg(long, default_value_t = false)]
    pub layout: bool,

    #[arg(long)]
    pub max_pages: Option<usize>,

    /// JSON file overriding label offsets and lookahead horizons.
    #[arg(long)]
    pub layout_profile: Option<PathBuf>,
}

impl RenderArgs {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            layout: self.layout,
            max_pages: self.max_pages,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory for results and the run manifest. Defaults to the input directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub csv_path: Option<PathBuf>,

    #[arg(long)]
    pub json_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Worker threads; defaults to one per core.
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Omit the UTF-8 byte order mark from the CSV output.
    #[arg(long, default_value_t = false)]
    pub no_csv_bom: bool,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long)]
    pub document: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,
}
