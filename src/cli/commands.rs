//! CLI command definitions for iconforge.
//!
//! Three subcommands cover the icon package workflow: `build` generates the
//! components, `update` merges upstream icon-set commits and `package` copies
//! the release files next to the build output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::package;
use crate::pipeline::{BuildConfig, CountPolicy, PipelineDriver, DEFAULT_INDEX_FILE};
use crate::vcs::{ShellRunner, SubmoduleSync, SyncOutcome};

/// Svelte component generator for the Material Design icon set.
#[derive(Parser)]
#[command(name = "iconforge")]
#[command(about = "Generate Svelte components from the Material Design SVG icon set")]
#[command(version)]
#[command(
    long_about = "iconforge converts every SVG of the vendored MaterialDesign submodule into a Svelte component, optionally with a barrel index.\n\nExample usage:\n  iconforge build --index\n  iconforge update\n  iconforge package"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Convert the SVG icon set into components.
    Build(BuildArgs),

    /// Fetch the icon-set submodule and commit any new upstream commits.
    ///
    /// Fetches the remote, checks for new commits on the tracked branch, then
    /// pulls them and records the bump as "auto-merged <before>..<after>".
    Update(UpdateArgs),

    /// Copy package.json, README.md and the icon-set LICENSE into the output directory.
    Package(PackageArgs),
}

/// Arguments for `iconforge build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Print every built file instead of the progress line.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate an index file re-exporting every component.
    #[arg(long)]
    pub index: bool,

    /// Index file name inside the output directory (implies --index).
    #[arg(long)]
    pub index_file: Option<String>,

    /// Size the progress total by every nested file instead of the top-level entries.
    #[arg(long)]
    pub count_nested: bool,

    /// Project root containing the MaterialDesign submodule (default: ICONFORGE_ROOT or `.`).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Override the source icon directory.
    #[arg(short = 's', long)]
    pub source: Option<PathBuf>,

    /// Override the output directory.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Extension of generated components.
    #[arg(short = 'e', long)]
    pub extension: Option<String>,

    /// Maximum number of component writes in flight.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `iconforge update`.
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Project root containing the MaterialDesign submodule.
    #[arg(long, env = "ICONFORGE_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Remote to fetch from.
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Upstream branch to merge.
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `iconforge package`.
#[derive(Parser, Debug)]
pub struct PackageArgs {
    /// Project root containing package.json and the MaterialDesign submodule.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Override the output directory.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments from the process environment.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build(args) => run_build_command(args).await,
        Commands::Update(args) => run_update_command(args).await,
        Commands::Package(args) => run_package_command(args).await,
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Moves the configuration to `root`. Directory variables from `lookup` keep
/// precedence over the re-derived layout.
fn relocate<F>(config: BuildConfig, root: &Path, lookup: &F) -> BuildConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = config.with_root(root);
    if let Some(dir) = lookup("ICONFORGE_SOURCE_DIR") {
        config = config.with_source_dir(dir);
    }
    if let Some(dir) = lookup("ICONFORGE_OUTPUT_DIR") {
        config = config.with_output_dir(dir);
    }
    config
}

/// Resolves the build configuration: environment first, then flags.
pub fn build_config(args: &BuildArgs) -> anyhow::Result<BuildConfig> {
    build_config_with(args, env_lookup)
}

/// Same as [`build_config`] with an explicit variable source.
pub fn build_config_with<F>(args: &BuildArgs, lookup: F) -> anyhow::Result<BuildConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = BuildConfig::from_lookup(&lookup)?;

    if let Some(root) = &args.root {
        config = relocate(config, root, &lookup);
    }
    if let Some(source) = &args.source {
        config = config.with_source_dir(source);
    }
    if let Some(output) = &args.output {
        config = config.with_output_dir(output);
    }
    if let Some(extension) = &args.extension {
        config = config.with_extension(extension);
    }
    if let Some(name) = &args.index_file {
        config = config.with_index_file(name);
    } else if args.index && config.index_file.is_none() {
        config = config.with_index_file(DEFAULT_INDEX_FILE);
    }
    if args.count_nested {
        config = config.with_count_policy(CountPolicy::Recursive);
    }
    if let Some(max) = args.concurrency {
        config = config.with_max_concurrent_writes(max);
    }

    config = config.with_verbose(args.verbose);
    config.validate()?;
    Ok(config)
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn run_build_command(args: BuildArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let mut driver = PipelineDriver::new(config, Arc::new(ShellRunner::new()));
    let report = driver.run().await?;

    if args.json {
        let json_output = serde_json::to_string_pretty(&report)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("Build successful");
    println!("  Components: {}", report.written);
    println!("  Output dir: {}", report.output_dir.display());
    if let Some(index) = &report.index_path {
        println!("  Index:      {}", index.display());
    }
    Ok(())
}

async fn run_update_command(args: UpdateArgs) -> anyhow::Result<()> {
    let sync = SubmoduleSync::new(Arc::new(ShellRunner::new()), &args.root)
        .with_remote(&args.remote)
        .with_branch(&args.branch);
    let outcome = sync.update().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SyncOutcome::UpToDate => println!("Already up to date"),
        SyncOutcome::Merged {
            commits,
            before,
            after,
        } => {
            println!("There are {} new commits.", commits);
            println!("Successfully merged new commits ({}..{})", before, after);
        }
    }
    Ok(())
}

/// Resolves the packaging configuration from `lookup` and the flags.
pub fn package_config_with<F>(args: &PackageArgs, lookup: F) -> anyhow::Result<BuildConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = BuildConfig::from_lookup(&lookup)?;
    if let Some(root) = &args.root {
        config = relocate(config, root, &lookup);
    }
    if let Some(output) = &args.output {
        config = config.with_output_dir(output);
    }
    Ok(config)
}

async fn run_package_command(args: PackageArgs) -> anyhow::Result<()> {
    let config = package_config_with(&args, env_lookup)?;

    let report = package::copy_release_files(&config).await?;
    info!(copied = report.copied.len(), "Packaged release files");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Packaged {} {}",
        report.name.as_deref().unwrap_or("(unnamed)"),
        report.version.as_deref().unwrap_or("")
    );
    for file in &report.copied {
        println!("  {}", file.display());
    }
    Ok(())
}
