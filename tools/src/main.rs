use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mimic_tools::{
    collect_tag_files, decode_tag, format_summary, format_tag_pretty, format_ticks_pretty,
    load_blocks, load_config, run_dragon_realtime, run_dragon_script, run_piston_scene, summarize,
    DragonScript, PistonScene, TickRecord,
};
use tag::TagLimits;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mimic-tools",
    version,
    about = "mimic scenario runner and tag decoder"
)]
struct Cli {
    /// Optional simulation config JSON; overrides the scenario's own.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Optional block table JSON; defaults to the built-in subset.
    #[arg(long, global = true)]
    blocks: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a piston scene to completion and list the emitted messages.
    Piston {
        /// Path to the scene JSON.
        scene: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        /// Include the encoded bytes of every message in hex.
        #[arg(long)]
        bytes: bool,
    },
    /// Run a scripted dragon and list or count the emitted messages.
    Dragon {
        /// Path to the script JSON.
        script: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
        /// Include the encoded bytes of every message in hex.
        #[arg(long)]
        bytes: bool,
        /// Run on the tick driver against the wall clock.
        #[arg(long)]
        realtime: bool,
    },
    /// Decode network-format tag files and print them depth-first.
    DecodeTag {
        /// A tag file, or a directory of tag files.
        path: PathBuf,
        /// Optional glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Print each tag on one line.
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
    Summary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let blocks = load_blocks(cli.blocks.as_deref()).context("load blocks")?;
    match cli.command {
        Command::Piston {
            scene,
            format,
            bytes,
        } => {
            let scene = PistonScene::from_json(&read(&scene, "scene")?)?;
            let config = load_config(cli.config.as_deref(), scene.config.as_ref())?;
            let ticks = run_piston_scene(&scene, blocks, config, bytes)?;
            print_ticks(&ticks, format)?;
        }
        Command::Dragon {
            script,
            format,
            bytes,
            realtime,
        } => {
            let script = DragonScript::from_json(&read(&script, "script")?)?;
            let config = load_config(cli.config.as_deref(), script.config.as_ref())?;
            let ticks = if realtime {
                run_dragon_realtime(&script, blocks, config, bytes)?
            } else {
                run_dragon_script(&script, blocks, config, bytes)?
            };
            print_ticks(&ticks, format)?;
        }
        Command::DecodeTag {
            path,
            glob,
            compact,
        } => {
            let limits = TagLimits::default();
            if path.is_dir() {
                let files = collect_tag_files(&path, glob.as_deref())?;
                if files.is_empty() {
                    bail!("no tag files in {}", path.display());
                }
                for file in files {
                    println!("== {} ({} bytes) ==", file.path.display(), file.size);
                    print_tag(&file.path, &limits, compact)?;
                }
            } else {
                print_tag(&path, &limits, compact)?;
            }
        }
    }
    Ok(())
}

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {what} {}", path.display()))
}

fn print_ticks(ticks: &[TickRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(ticks).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => print!("{}", format_ticks_pretty(ticks)),
        OutputFormat::Summary => print!("{}", format_summary(&summarize(ticks))),
    }
    Ok(())
}

fn print_tag(path: &Path, limits: &TagLimits, compact: bool) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read tag {}", path.display()))?;
    let root = decode_tag(&bytes, limits).with_context(|| format!("in {}", path.display()))?;
    if compact {
        println!("{root}");
    } else {
        print!("{}", format_tag_pretty(&root));
    }
    Ok(())
}
