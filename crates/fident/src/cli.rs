use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "fident",
    version = env!("CARGO_PKG_VERSION"),
    about,
    long_about = None,
    propagate_version = true,
    subcommand_negates_reqs = true,
    args_conflicts_with_subcommands = true
)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    #[command(flatten)]
    pub drop: DropArg,

    /// Config file to load instead of ./fident.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(name = "ocr", about = "Recognize text in an image")]
    Ocr(OcrArg),
    #[command(alias = "cfg", name = "config", about = "Print the effective configuration")]
    Config,
}

/// Files dropped onto the window, in drop order.
#[derive(Clone, Debug, Default, Args)]
pub struct DropArg {
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Codepage label for ZIP names that are not UTF-8
    #[arg(long)]
    pub codepage: Option<String>,

    /// Archives extracted at the same time
    #[arg(short = 'j', long)]
    pub max_concurrent: Option<usize>,

    /// Directory to allocate extraction sessions in
    #[arg(long, value_name = "DIR")]
    pub temp_root: Option<PathBuf>,

    /// Keep session directories after exit
    #[arg(short, long)]
    pub keep: bool,

    /// Recognize text in every image of the batch
    #[arg(long)]
    pub ocr: bool,
}

#[derive(Clone, Debug, Args)]
pub struct OcrArg {
    pub image: PathBuf,

    #[arg(short, long)]
    pub lang: Option<String>,

    #[arg(long, value_name = "DIR")]
    pub tessdata: Option<PathBuf>,
}
