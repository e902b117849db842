//! masktools - pack grayscale textures into mask channels and split them back

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use mask_core::Channel;
use mask_ops::{CreationMethod, EdgeMode, ResizeFilter};
use std::path::PathBuf;
use std::str::FromStr;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "masktools")]
#[command(author, version, about = "Channel mixer and splitter for packed mask textures")]
#[command(long_about = "
Packs up to four grayscale textures into the R, G, B and A channels of one
mask texture, or splits a packed texture back into one texture per channel.

Examples:
  masktools mix --red ao.png --green rough.png --blue metal.png
  masktools mix --red orm.png:b --alpha height.png:r --resolution 1024 -o mask.png
  masktools mix --red ao.png --filter-red cubic-sharp --name Rock
  masktools mix --red tile.png --edge-x wrap --edge-y wrap --resolution 256
  masktools split T_Rock_ORM.png --keep-empty
  masktools --backend material split a.png b.png --out-dir split/
  masktools --config masktools.yaml config --dump
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Creation method for both operations: pixel-data, material, shader
    #[arg(long, global = true)]
    backend: Option<CreationMethod>,

    /// Root directory for relative inputs and exported assets
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack channels from up to four sources into one mask
    #[command(visible_alias = "m")]
    Mix(MixArgs),

    /// Split a packed texture into one texture per channel
    #[command(visible_alias = "s")]
    Split(SplitArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// A mixer slot source given as `path[:channel]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotArg {
    /// Source image.
    pub path: PathBuf,
    /// Channel to read, `None` for the slot's own channel.
    pub channel: Option<Channel>,
}

impl FromStr for SlotArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty source path".into());
        }
        // Only treat the suffix as a channel if it parses as one, so that
        // `C:\textures\ao.png` stays a path.
        if let Some((path, ch)) = s.rsplit_once(':') {
            if let (false, Ok(channel)) = (path.is_empty(), ch.parse::<Channel>()) {
                return Ok(Self {
                    path: PathBuf::from(path),
                    channel: Some(channel),
                });
            }
        }
        Ok(Self {
            path: PathBuf::from(s),
            channel: None,
        })
    }
}

#[derive(Args)]
struct MixArgs {
    /// Red slot source, `path[:r|g|b|a]`
    #[arg(short, long)]
    red: Option<SlotArg>,

    /// Green slot source, `path[:r|g|b|a]`
    #[arg(short, long)]
    green: Option<SlotArg>,

    /// Blue slot source, `path[:r|g|b|a]`
    #[arg(short, long)]
    blue: Option<SlotArg>,

    /// Alpha slot source, `path[:r|g|b|a]`
    #[arg(short, long)]
    alpha: Option<SlotArg>,

    /// Red slot filter
    #[arg(long)]
    filter_red: Option<ResizeFilter>,

    /// Green slot filter
    #[arg(long)]
    filter_green: Option<ResizeFilter>,

    /// Blue slot filter
    #[arg(long)]
    filter_blue: Option<ResizeFilter>,

    /// Alpha slot filter
    #[arg(long)]
    filter_alpha: Option<ResizeFilter>,

    /// Filter for every slot without its own --filter-*
    #[arg(short, long)]
    filter: Option<ResizeFilter>,

    /// Horizontal edge handling for every slot: clamp, wrap
    #[arg(long)]
    edge_x: Option<EdgeMode>,

    /// Vertical edge handling for every slot: clamp, wrap
    #[arg(long)]
    edge_y: Option<EdgeMode>,

    /// Output side length in pixels
    #[arg(long)]
    resolution: Option<u32>,

    /// Write the mask to this file instead of exporting it as an asset
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Asset name
    #[arg(long)]
    name: Option<String>,

    /// Asset name prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Asset name suffix
    #[arg(long)]
    suffix: Option<String>,

    /// Export folder under the root
    #[arg(long)]
    folder: Option<PathBuf>,
}

#[derive(Args)]
struct SplitArgs {
    /// Packed textures to split
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Emit constant channels too
    #[arg(long, conflicts_with = "discard_empty")]
    keep_empty: bool,

    /// Skip channels that only hold 0 and 255
    #[arg(long)]
    discard_empty: bool,

    /// Directory to export into instead of the root
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Print the full configuration as YAML
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let globals = commands::Globals::new(cli.config.as_deref(), cli.backend, cli.root)?;
    match cli.command {
        Commands::Mix(args) => commands::mix::run(args, &globals),
        Commands::Split(args) => commands::split::run(args, &globals),
        Commands::Config(args) => commands::config::run(args, &globals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_arg() {
        let a: SlotArg = "ao.png".parse().unwrap();
        assert_eq!(a.path, PathBuf::from("ao.png"));
        assert_eq!(a.channel, None);

        let b: SlotArg = "textures/orm.png:b".parse().unwrap();
        assert_eq!(b.path, PathBuf::from("textures/orm.png"));
        assert_eq!(b.channel, Some(Channel::Blue));

        let c: SlotArg = "C:\\tex\\ao.png".parse().unwrap();
        assert_eq!(c.channel, None);

        assert!("".parse::<SlotArg>().is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "masktools",
            "-vv",
            "--backend",
            "material",
            "mix",
            "--red",
            "ao.png:g",
            "--filter-red",
            "cubic-sharp",
            "--resolution",
            "256",
            "--edge-x",
            "wrap",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.backend, Some(CreationMethod::Material));
        match cli.command {
            Commands::Mix(args) => {
                assert_eq!(args.red.unwrap().channel, Some(Channel::Green));
                assert_eq!(args.filter_red, Some(ResizeFilter::CubicSharp));
                assert_eq!(args.resolution, Some(256));
                assert_eq!(args.edge_x, Some(EdgeMode::Wrap));
                assert_eq!(args.edge_y, None);
            }
            _ => panic!("expected mix"),
        }
    }

    #[test]
    fn test_keep_and_discard_conflict() {
        let res = Cli::try_parse_from(["masktools", "split", "a.png", "--keep-empty", "--discard-empty"]);
        assert!(res.is_err());
    }
}
