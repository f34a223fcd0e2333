//! Chart packaging action
//!
//! Resolves stamps, stages the chart sources into a scratch directory,
//! drives the external packaging tool, and relocates the produced archive
//! and its metadata record to the declared output paths.

use clap::Parser;
use std::path::PathBuf;

use stampack::fail;
use stampack_core::{
    ChartManifest, ChartMetadata, CoreError, StagedChart, StampMap, ToolCommand, files,
};

#[derive(Parser, Debug)]
#[command(name = "stampack-packager")]
#[command(version)]
#[command(about = "Assemble and package a chart from build outputs", long_about = None)]
struct PackagerArgs {
    /// A chart template file. May be repeated; directory structure below
    /// the nearest `templates` ancestor is preserved.
    #[arg(long = "template", required = true)]
    templates: Vec<PathBuf>,

    /// The chart manifest (`Chart.yaml`) source file.
    #[arg(long)]
    chart: PathBuf,

    /// The chart values (`values.yaml`) source file.
    #[arg(long)]
    values: PathBuf,

    /// A dependency chart archive to place under `charts/`. May be repeated.
    #[arg(long = "dep")]
    deps: Vec<PathBuf>,

    /// The path to the chart-packaging executable.
    #[arg(long)]
    helm: PathBuf,

    /// A plugins directory to expose to the packaging tool.
    #[arg(long = "helm_plugins")]
    helm_plugins: Option<PathBuf>,

    /// Where to place the packaged chart archive.
    #[arg(long)]
    output: PathBuf,

    /// Where to write the chart name/version metadata record.
    #[arg(long = "metadata_output")]
    metadata_output: PathBuf,

    /// An image manifest describing a container image used by the chart.
    /// May be repeated.
    #[arg(long = "image_manifest")]
    image_manifests: Vec<PathBuf>,

    /// The stable build status file.
    #[arg(long = "stable_status_file")]
    stable_status_file: Option<PathBuf>,

    /// The volatile build status file.
    #[arg(long = "volatile_status_file")]
    volatile_status_file: Option<PathBuf>,

    /// The name of the current workspace, used to qualify image labels.
    #[arg(long = "workspace_name")]
    workspace_name: String,
}

fn run(args: &PackagerArgs) -> stampack::Result<()> {
    let chart_source = files::read_to_string(&args.chart)?;
    let values_source = files::read_to_string(&args.values)?;

    // Stable first, then volatile: the most recently computed fact wins
    // duplicate keys.
    let status_files: Vec<PathBuf> = [&args.stable_status_file, &args.volatile_status_file]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let stamps = StampMap::resolve(&args.image_manifests, &args.workspace_name, &status_files)?;

    let manifest = ChartManifest::prepare(&chart_source, &stamps)?;
    let values = stamps.apply(&values_source);

    let staged = StagedChart::assemble(&manifest, &values, &args.templates, &args.deps)?;

    let tool = ToolCommand::new(&args.helm, staged.scratch(), args.helm_plugins.as_deref())?;
    tool.run(&["package", "."], staged.root())?;

    let archive = staged.find_archive()?;
    files::move_file(&archive, &args.output)?;

    let file_name = archive
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CoreError::MetadataParse {
            name: archive.display().to_string(),
        })?;
    ChartMetadata::from_archive_name(file_name)?.write(&args.metadata_output)?;

    Ok(())
}

fn main() {
    let args = PackagerArgs::parse();
    if let Err(err) = run(&args) {
        fail(err);
    }
}
