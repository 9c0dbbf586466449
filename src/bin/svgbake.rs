use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use svgbake::batch::{BatchOptions, DefaultNamingStrategy, NamingStrategy as _};

#[derive(Parser, Debug)]
#[command(name = "svgbake", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake a single SVG/SVGZ file into a Rust source file.
    File(FileArgs),
    /// Bake every SVG/SVGZ file in a directory.
    Dir(DirArgs),
}

#[derive(Parser, Debug)]
struct FileArgs {
    /// Input SVG or SVGZ file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output Rust source path.
    #[arg(long)]
    out: PathBuf,

    /// Generated type name; derived from the file name when omitted.
    #[arg(long)]
    name: Option<String>,

    /// Namespace recorded in the generated header.
    #[arg(long)]
    namespace: Option<String>,

    /// Generate the resizable icon variant.
    #[arg(long)]
    resizable: bool,

    /// Byte threshold for splitting the painting code into procedures.
    #[arg(long, default_value_t = svgbake::DEFAULT_CHUNK_THRESHOLD_BYTES)]
    chunk_threshold: usize,
}

#[derive(Parser, Debug)]
struct DirArgs {
    /// Input directory with SVG/SVGZ files.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output directory; defaults to the input directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Namespace recorded in every generated header.
    #[arg(long)]
    namespace: Option<String>,

    /// Generate the resizable icon variant.
    #[arg(long)]
    resizable: bool,

    /// Byte threshold for splitting the painting code into procedures.
    #[arg(long, default_value_t = svgbake::DEFAULT_CHUNK_THRESHOLD_BYTES)]
    chunk_threshold: usize,

    /// Write a JSON report of converted and failed inputs.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::File(args) => cmd_file(args),
        Command::Dir(args) => cmd_dir(args),
    }
}

fn cmd_file(args: FileArgs) -> anyhow::Result<()> {
    let data = std::fs::read(&args.in_path)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;
    let scene = svgbake::scene_from_svg(&data)
        .with_context(|| format!("resolve '{}'", args.in_path.display()))?;

    let type_name = args
        .name
        .unwrap_or_else(|| DefaultNamingStrategy.type_name(&args.in_path));
    let mut opts = svgbake::BakeOptions::new(type_name)
        .resizable(args.resizable)
        .chunk_threshold_bytes(args.chunk_threshold);
    if let Some(namespace) = args.namespace {
        opts = opts.namespace(namespace);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let mut out = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    svgbake::transcode(&scene, &opts, &mut out)
        .with_context(|| format!("transcode '{}'", args.in_path.display()))?;
    out.flush()?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_dir(args: DirArgs) -> anyhow::Result<()> {
    let opts = BatchOptions {
        namespace: args.namespace,
        resizable: args.resizable,
        chunk_threshold_bytes: args.chunk_threshold,
        out_dir: args.out_dir,
    };

    let report = svgbake::batch::convert_dir(&args.in_dir, &DefaultNamingStrategy, &opts)
        .with_context(|| format!("convert directory '{}'", args.in_dir.display()))?;

    for converted in &report.converted {
        eprintln!("wrote {}", converted.output.display());
    }
    for failed in &report.failed {
        eprintln!("failed {}: {}", failed.input.display(), failed.error);
    }

    if let Some(report_path) = &args.report {
        let file = File::create(report_path)
            .with_context(|| format!("create report '{}'", report_path.display()))?;
        serde_json::to_writer_pretty(file, &report).with_context(|| "write report JSON")?;
        eprintln!("wrote {}", report_path.display());
    }

    if report.converted.is_empty() && !report.failed.is_empty() {
        anyhow::bail!("no input could be converted");
    }
    Ok(())
}
