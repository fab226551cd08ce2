use anyhow::{Context as AnyhowContext, Result};
use bom_rollup::{build_matrices, write_csv_files, write_json_file};
use bom_tree::{TreeFormat, TreeParser};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

mod report;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "bom-matrix")]
#[command(about = "Direct and rolled-up part matrices from a CAD assembly tree export", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Tree export to read (one node per line)
    pub input: PathBuf,

    /// Output directory (defaults to the input file's directory)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// TOML file overriding the tree export conventions
    #[arg(long)]
    pub tree_format: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// DirectChildren.csv and RollupPartsOnly.csv
    Csv,
    /// assembly_matrix.json with both matrices
    Json,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Directory the outputs land in: `--out-dir`, else next to the input
fn output_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.out_dir {
        return dir.clone();
    }
    match cli.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn load_format(path: Option<&Path>) -> Result<TreeFormat> {
    match path {
        Some(path) => TreeFormat::from_path(path)
            .with_context(|| format!("Failed to load tree format {}", path.display())),
        None => Ok(TreeFormat::default()),
    }
}

/// Parse the export, build both matrices and write them; returns written files
pub fn run(cli: &Cli) -> Result<Vec<PathBuf>> {
    let format = load_format(cli.tree_format.as_deref())?;
    let parser = TreeParser::new(format).context("Invalid tree format")?;

    let tree = parser
        .parse_path(&cli.input)
        .with_context(|| format!("Failed to parse tree export {}", cli.input.display()))?;

    if tree.kinds.assemblies().next().is_none() {
        log::warn!(
            "No assemblies found in {}; matrices will be empty",
            cli.input.display()
        );
    }
    if tree.stats.depth_jumps > 0 {
        log::warn!(
            "{} lines were indented more than one level below their parent",
            tree.stats.depth_jumps
        );
    }

    let set = build_matrices(&tree).context("Failed to build assembly matrices")?;
    log::info!("{}", report::describe_run(&tree, &set));

    let out_dir = output_dir(cli);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let written = match cli.format {
        OutputFormat::Csv => write_csv_files(&set, &out_dir)?,
        OutputFormat::Json => vec![write_json_file(&set, &out_dir, cli.pretty)?],
    };

    Ok(written)
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let written = run(&cli)?;
    print_stdout(&report::render_summary(&written))
}
