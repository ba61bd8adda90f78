use crate::config::{Config, load_config};
use crate::ir::{Member, MemberGraph};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_members;
use crate::relationship::relationship_labels;
use crate::render::{render_empty_svg, render_svg, write_output_svg};
use crate::snapshot::TreeScene;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EMPTY_STATE_MESSAGE: &str = "No family tree to show yet";

#[derive(Parser, Debug)]
#[command(name = "ftree", version, about = "Family tree layout and relationship labels")]
pub struct Args {
    /// Members file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Print relationship labels as seen by this member instead of a layout
    #[arg(long = "observer")]
    pub observer: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let members = parse_members(&input)?;

    if let Some(observer) = args.observer.as_deref() {
        let table = label_table(observer, &members, &config);
        return write_text(&table, args.output.as_deref());
    }

    let scene = TreeScene::build(&members, &config.layout);
    if scene.is_none() {
        tracing::warn!("no member has a parent, a child and a spouse; rendering the empty state");
    }

    match args.output_format {
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), scene.as_ref())?,
        OutputFormat::Svg => {
            let svg = scene_svg(scene.as_ref(), &config);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = png_output(args.output.as_deref())?;
            let svg = scene_svg(scene.as_ref(), &config);
            write_png(&svg, output, &config)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn scene_svg(scene: Option<&TreeScene>, config: &Config) -> String {
    match scene {
        Some(scene) => render_svg(scene, &config.render),
        None => render_empty_svg(EMPTY_STATE_MESSAGE, &config.render),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn label_table(observer: &str, members: &[Member], config: &Config) -> String {
    let graph = MemberGraph::new(members);
    let mut out = String::new();
    for (member, relation) in relationship_labels(observer, &graph, &config.labels) {
        let _ = writeln!(out, "{}\t{}\t{}", member.id, member.display_name(), relation);
    }
    out
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// PNG bytes never go to stdout.
fn png_output(output: Option<&Path>) -> Result<&Path> {
    output.ok_or_else(|| anyhow::anyhow!("png output needs a file: pass -o/--output <FILE>"))
}
